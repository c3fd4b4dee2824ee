use analyzer::shell::{self, Shell};
use analyzer::{AnalyzerConfig, ConfigError};
use std::io;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use video_client::YouTubeClient;

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Logs go to stderr and stay quiet by default so the menu is readable
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(true))
        .with(env_filter)
        .init();

    let mut input = io::stdin().lock();
    let mut output = io::stdout().lock();

    let config = match AnalyzerConfig::from_env() {
        Ok(config) => config,
        Err(ConfigError::MissingApiKey) => {
            shell::print_setup_instructions(&mut input, &mut output)?;
            return Ok(ExitCode::FAILURE);
        }
    };

    let client = match YouTubeClient::with_base_url(config.api_key.clone(), &config.api_base_url) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "failed to build HTTP client");
            return Ok(ExitCode::FAILURE);
        }
    };
    info!(base_url = %client.base_url(), "starting analyzer");

    Shell::new(client, input, output)
        .with_clear_screen(config.clear_screen)
        .run()?;

    Ok(ExitCode::SUCCESS)
}
