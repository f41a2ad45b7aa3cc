//! Command-line argument definitions for the synoptic CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control the diagram to load, where document
//! messages are read from, configuration file selection, and logging
//! verbosity.

use clap::Parser;

/// Command-line arguments for the headless synoptic host
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// URL of the SVG synoptic to load once the host page is ready
    #[arg(help = "URL of the SVG synoptic")]
    pub url: Option<String>,

    /// File with JSON-lines messages; standard input if omitted
    #[arg(short, long)]
    pub input: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override the host page from the configuration
    #[arg(long)]
    pub host_page: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
