//! Configuration and CLI argument handling

use clap::Parser;
use std::{path::PathBuf, time::Duration};

use crate::constants::{CONFIG_FILE, SHUTDOWN_GRACE, WARNING_THRESHOLD_SECS};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "shutdown-timer")]
#[command(about = "Countdown timer that shuts the computer down, with an always-on-top overlay")]
#[command(version)]
pub struct Config {
    /// Port to bind the control server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Settings document, relative to the working directory
    #[arg(long, default_value = CONFIG_FILE)]
    pub config_file: PathBuf,

    /// Read and write the settings document on disk
    #[arg(long)]
    pub persist: bool,

    /// Remaining seconds at which the shutdown warning appears
    #[arg(long, default_value_t = WARNING_THRESHOLD_SECS)]
    pub warning_seconds: f64,

    /// Delay between countdown completion and the host shutdown
    #[arg(long, default_value_t = SHUTDOWN_GRACE.as_secs())]
    pub grace_seconds: u64,

    /// Log the shutdown instead of performing it
    #[arg(long)]
    pub dry_run: bool,

    /// Start with the overlay hidden
    #[arg(long)]
    pub hide_overlay: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn grace(&self) -> Duration {
        Duration::from_secs(self.grace_seconds)
    }
}
