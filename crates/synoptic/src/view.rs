//! Interface to the rendering engine.
//!
//! The engine that parses and paints the hosted documents is an external
//! collaborator. The surface only needs to create views, expose the bridge
//! name inside them, navigate them to a page, evaluate script and resize
//! them. Load completion, bridge calls and console output travel the other
//! way: the embedding code reports them to
//! [`SynopticSurface`](crate::SynopticSurface) as they happen.

use std::path::Path;

use crate::{SynopticError, config::ViewSettings};

/// A single rendering view hosting one document.
pub trait DocumentView {
    /// Binds the bridge object under `name` in the document's script namespace.
    ///
    /// Must happen before any document script referencing `name` executes.
    fn expose_bridge(&mut self, name: &str) -> Result<(), SynopticError>;

    /// Starts loading `page`. Completion is reported asynchronously.
    fn navigate(&mut self, page: &Path) -> Result<(), SynopticError>;

    /// Hands `script` to the document's script engine.
    ///
    /// Returns once the script is dispatched. Errors raised by the script
    /// itself are reported through the console, not here.
    fn evaluate(&mut self, script: &str) -> Result<(), SynopticError>;

    /// Resizes the view.
    fn resize(&mut self, width: u32, height: u32);
}

/// Factory for views, typically wrapping a windowing toolkit's web view.
pub trait RenderBackend {
    type View: DocumentView;

    /// Creates a new view with the given rendering options applied.
    fn create_view(&mut self, settings: &ViewSettings) -> Result<Self::View, SynopticError>;
}
