//! Error adapter for converting SynopticError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use synoptic::SynopticError;

/// Adapter giving a [`SynopticError`] a diagnostic code and help text.
pub struct ErrorAdapter<'a>(pub &'a SynopticError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            SynopticError::Io(_) => "synoptic::io",
            SynopticError::Config(_) => "synoptic::config",
            SynopticError::Bridge(_) => "synoptic::bridge",
            SynopticError::NotReady(_) => "synoptic::not_ready",
            SynopticError::QueueFull(_) => "synoptic::queue_full",
            SynopticError::LoadFailed(_) => "synoptic::load_failed",
            SynopticError::NoView => "synoptic::no_view",
            SynopticError::UnknownView(_) => "synoptic::unknown_view",
            SynopticError::View(_) => "synoptic::view",
            SynopticError::Script(_) => "synoptic::script",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            SynopticError::Config(_) => "check the TOML file passed with --config",
            SynopticError::NotReady(_) => {
                "send a loadFinished message first, or set bridge.pending = \"queue\""
            }
            SynopticError::QueueFull(_) => "raise bridge.max_pending or load the host page sooner",
            SynopticError::NoView => "pass a synoptic URL or send a setUrl request",
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}
