//! Interactive YouTube video analyzer.
//!
//! Reads a video link from the console, looks the video up through the
//! Data API and prints a statistics report.

pub mod config;
pub mod shell;

pub use config::{AnalyzerConfig, ConfigError};
pub use shell::{MenuChoice, Shell, State};
