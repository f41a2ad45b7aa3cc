//! Synoptic - a bidirectional event bridge for embedded SVG synoptics.
//!
//! An SVG synoptic is a schematic diagram rendered inside a web view, where
//! pan, zoom, selection and tooltips run as document-side script. This crate
//! connects that document to the host application:
//!
//! - Document script calls the [`BridgeObject`] exposed under a fixed global
//!   name. Calls become typed events, are announced to [`EventRegistry`]
//!   observers and are routed to host hooks by the [`EventRouter`].
//! - The host issues commands (zoom, select, tooltip content, load) through
//!   a [`CommandSink`]. The [`CommandChannel`] turns them into escaped script
//!   text and holds them back until the hosted page is ready.
//! - [`SynopticSurface`] owns the views and ties everything together.
//!
//! The rendering engine itself is abstracted by [`RenderBackend`] and
//! [`DocumentView`].

pub mod bridge;
pub mod channel;
pub mod config;
pub mod diagnostics;
pub mod router;
pub mod view;

mod error;
mod surface;

pub use synoptic_core::{command, event, identifier, message, script, visible_set};

pub use bridge::{BridgeObject, EventRegistry};
pub use channel::{CommandChannel, CommandSink, DocumentState};
pub use diagnostics::{DiagnosticsSink, LogSink};
pub use error::{BridgeError, SynopticError};
pub use router::{EventRouter, Handlers};
pub use surface::{SynopticSurface, ViewId};
pub use view::{DocumentView, RenderBackend};
