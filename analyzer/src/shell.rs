//! Menu-driven console loop.
//!
//! The shell is a two-state machine: it keeps returning to [`State::Menu`]
//! after every action until the user picks "Exit" or input runs out.

use link_parser::extract_video_id;
use std::io::{self, BufRead, Write};
use std::process::Command;
use tracing::{debug, info};
use video_client::{FailureKind, VideoLookup};

const MENU_RULE_WIDTH: usize = 34;

const MENU_TITLE: &str = "====- YouTube Video Analyzer -====";
const CHOICE_PROMPT: &str = "Your choice: ";
const LINK_PROMPT: &str =
    "Enter the link to the video (for example: https://youtube.com/watch?v=dQw4w9WgXcQ): ";
const CONTINUE_PROMPT: &str = "\nPress Enter to continue...";
const EXIT_PROMPT: &str = "\nPress Enter to exit...";

const INVALID_LINK: &str = "\n❌ Error: Invalid link format or video not found!";
const LOOKUP_FAILED: &str = "\n❌ Error: Unable to retrieve video data!";
const WRONG_CHOICE: &str = "\n❌ Wrong choice, try again!";
const FAREWELL: &str = "\nThank you for using the app!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Menu,
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    CheckVideo,
    Exit,
    Invalid,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Self {
        match input.trim() {
            "1" => MenuChoice::CheckVideo,
            "2" => MenuChoice::Exit,
            _ => MenuChoice::Invalid,
        }
    }
}

pub struct Shell<L, R, W> {
    lookup: L,
    input: R,
    output: W,
    clear_screen: bool,
}

impl<L, R, W> Shell<L, R, W>
where
    L: VideoLookup,
    R: BufRead,
    W: Write,
{
    /// Screen clearing starts disabled
    pub fn new(lookup: L, input: R, output: W) -> Self {
        Self {
            lookup,
            input,
            output,
            clear_screen: false,
        }
    }

    pub fn with_clear_screen(mut self, enabled: bool) -> Self {
        self.clear_screen = enabled;
        self
    }

    /// Run until the user exits or input is exhausted
    pub fn run(&mut self) -> io::Result<()> {
        let mut state = State::Menu;
        while state == State::Menu {
            state = self.step()?;
        }
        info!("analyzer session finished");
        Ok(())
    }

    /// Show the menu once and handle a single choice
    pub fn step(&mut self) -> io::Result<State> {
        self.clear()?;
        self.print_menu()?;

        let Some(choice) = self.prompt(CHOICE_PROMPT)? else {
            writeln!(self.output)?;
            return Ok(State::Terminated);
        };

        match MenuChoice::parse(&choice) {
            MenuChoice::Exit => {
                writeln!(self.output, "{}", FAREWELL)?;
                Ok(State::Terminated)
            }
            MenuChoice::CheckVideo => {
                self.check_video()?;
                Ok(State::Menu)
            }
            MenuChoice::Invalid => {
                writeln!(self.output, "{}", WRONG_CHOICE)?;
                self.pause(CONTINUE_PROMPT)?;
                Ok(State::Menu)
            }
        }
    }

    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(self.output, "{}", MENU_TITLE)?;
        writeln!(self.output, "Select an action:")?;
        writeln!(self.output, "1. Check video information")?;
        writeln!(self.output, "2. Exit")?;
        writeln!(self.output, "{}", "=".repeat(MENU_RULE_WIDTH))
    }

    fn check_video(&mut self) -> io::Result<()> {
        self.clear()?;
        let rule = "=".repeat(MENU_RULE_WIDTH);

        writeln!(self.output, "{}", rule)?;
        let link = self.prompt(LINK_PROMPT)?.unwrap_or_default();
        writeln!(self.output, "{}", rule)?;

        let Some(id) = extract_video_id(&link) else {
            debug!("no video id in input");
            writeln!(self.output, "{}", INVALID_LINK)?;
            return self.pause(CONTINUE_PROMPT);
        };

        match self.lookup.fetch(&id) {
            Ok(video) => write!(self.output, "{}", report::render(&video))?,
            Err(e) => {
                // A missing video is an answer, not a failure worth diagnosing
                if e.kind() != FailureKind::NotFound {
                    writeln!(self.output, "[❌] Error receiving data: {}", e)?;
                }
                writeln!(self.output, "{}", LOOKUP_FAILED)?;
            }
        }

        self.pause(CONTINUE_PROMPT)
    }

    /// Print `text` and read one line. `None` at end of input.
    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn pause(&mut self, text: &str) -> io::Result<()> {
        self.prompt(text).map(|_| ())
    }

    fn clear(&mut self) -> io::Result<()> {
        if self.clear_screen {
            self.output.flush()?;
            clear_terminal();
        }
        Ok(())
    }
}

/// Tell the user how to provide a key, then wait for acknowledgement
pub fn print_setup_instructions<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<()> {
    writeln!(
        output,
        "\n⚠️ Please set your YouTube Data API key in the {} environment variable!",
        crate::config::API_KEY_VAR
    )?;
    writeln!(output, "You can get the key here: https://console.cloud.google.com/")?;
    write!(output, "{}", EXIT_PROMPT)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(())
}

fn clear_terminal() {
    let status = if cfg!(windows) {
        Command::new("cmd").args(["/C", "cls"]).status()
    } else {
        Command::new("clear").status()
    };
    if let Err(e) = status {
        debug!(error = %e, "could not clear the screen");
    }
}
