//! Error types for synoptic surface operations.
//!
//! This module provides the main error type [`SynopticError`] which wraps the
//! error conditions that can occur while bridging a host and an embedded
//! document, and [`BridgeError`] for malformed calls made by document-side
//! script.

use std::io;

use thiserror::Error;

use synoptic_core::event::UnknownButton;

use crate::{channel::DocumentState, surface::ViewId};

/// The main error type for synoptic operations.
///
/// Commands are fire-and-forget: a successful return only means the script
/// was handed to the rendering engine. Failures inside document-side script
/// are never reported here; they reach the diagnostics sink instead.
#[derive(Debug, Error)]
pub enum SynopticError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),

    #[error("Document is not ready for commands (state: {0})")]
    NotReady(DocumentState),

    #[error("Too many commands queued before the document became ready (limit: {0})")]
    QueueFull(usize),

    #[error("Host page failed to load; command `{0}` was not delivered")]
    LoadFailed(&'static str),

    #[error("No synoptic view has been created")]
    NoView,

    #[error("Unknown view {0}")]
    UnknownView(ViewId),

    #[error("View error: {0}")]
    View(String),

    #[error("Script evaluation failed: {0}")]
    Script(String),
}

/// A document-side call that does not match the bridge object's interface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    #[error("unknown bridge method `{0}`")]
    UnknownMethod(String),

    #[error("bridge method `{method}` expects {expected} argument(s), got {actual}")]
    Arity {
        method: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error(transparent)]
    Button(#[from] UnknownButton),
}
