//! CLI logic for the headless synoptic host.
//!
//! The binary hosts a synoptic in a console rendering backend, reads document
//! messages and host requests as JSON lines, and prints every operation the
//! view is asked to perform.

pub mod error_adapter;

mod args;
mod config;
mod console;

pub use args::Args;
pub use config::load_config;
pub use console::{
    ConsoleBackend, ConsoleView, SessionSummary, SharedOutput, console_handlers, run_session,
};

use std::{
    cell::RefCell,
    fs::File,
    io::{self, BufRead, BufReader},
    rc::Rc,
};

use log::info;

use synoptic::SynopticError;

/// Run the synoptic CLI application
///
/// Loads the configuration, then drives a console session from the input
/// file (or standard input) and writes the view output to standard output.
///
/// # Errors
///
/// Returns `SynopticError` for:
/// - Configuration loading errors
/// - File I/O errors
/// - Failure to create the initial view
pub fn run(args: &Args) -> Result<SessionSummary, SynopticError> {
    info!(
        url:? = args.url,
        input:? = args.input;
        "Starting synoptic session"
    );

    let mut app_config = config::load_config(args.config.as_ref())?;
    if let Some(host_page) = &args.host_page {
        app_config = app_config.with_host_page(host_page);
    }

    let input: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(io::stdin().lock()),
    };
    let output = Rc::new(RefCell::new(io::stdout()));

    run_session(app_config, args.url.as_deref(), input, output)
}
