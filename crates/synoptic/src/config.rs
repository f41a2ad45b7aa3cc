//! Configuration types for synoptic surfaces.
//!
//! This module provides configuration structures that control how views are
//! created and how the bridge behaves. All types implement
//! [`serde::Deserialize`] for flexible loading from external sources.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining view and bridge settings.
//! - [`ViewSettings`] - Rendering options applied once when a view is created.
//! - [`BridgeConfig`] - Bridge naming and command queueing behaviour.
//!
//! # Example
//!
//! ```
//! # use synoptic::config::{AppConfig, ContextMenu, PendingPolicy};
//! let config = AppConfig::default();
//! assert_eq!(config.bridge().name(), "Widget");
//! assert_eq!(config.view().context_menu(), ContextMenu::Disabled);
//! assert_eq!(config.bridge().pending(), PendingPolicy::Queue);
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Global name under which the bridge object is exposed to document script.
pub const DEFAULT_BRIDGE_NAME: &str = "Widget";

/// Host page loaded into every new view before the diagram.
pub const DEFAULT_HOST_PAGE: &str = "web/local.html";

/// Default bound on commands queued before a document is ready.
pub const DEFAULT_MAX_PENDING: usize = 256;

/// Top-level configuration combining view and bridge settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// View configuration section.
    #[serde(default)]
    view: ViewSettings,

    /// Bridge configuration section.
    #[serde(default)]
    bridge: BridgeConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified view and bridge settings.
    pub fn new(view: ViewSettings, bridge: BridgeConfig) -> Self {
        Self { view, bridge }
    }

    /// Returns the view settings.
    pub fn view(&self) -> &ViewSettings {
        &self.view
    }

    /// Returns the bridge configuration.
    pub fn bridge(&self) -> &BridgeConfig {
        &self.bridge
    }

    /// Returns the configuration with a different host page.
    pub fn with_host_page(mut self, host_page: impl Into<PathBuf>) -> Self {
        self.view.host_page = host_page.into();
        self
    }

    /// Returns the configuration with a different bridge configuration.
    pub fn with_bridge(mut self, bridge: BridgeConfig) -> Self {
        self.bridge = bridge;
        self
    }
}

/// Whether the rendering surface shows its own context menu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextMenu {
    Enabled,
    /// Right clicks are left to the document, which reports them through the bridge.
    #[default]
    Disabled,
}

/// Rendering options applied once when a view is created.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    /// Tile the backing store. Disable if there are rendering artifacts.
    tiled_backing_store: bool,

    /// Antialias text. Off by default for faster panning.
    text_antialiasing: bool,

    /// Context menu policy.
    context_menu: ContextMenu,

    /// Page that hosts the diagram document and the bridge object.
    host_page: PathBuf,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            tiled_backing_store: true,
            text_antialiasing: false,
            context_menu: ContextMenu::Disabled,
            host_page: PathBuf::from(DEFAULT_HOST_PAGE),
        }
    }
}

impl ViewSettings {
    pub fn tiled_backing_store(&self) -> bool {
        self.tiled_backing_store
    }

    pub fn text_antialiasing(&self) -> bool {
        self.text_antialiasing
    }

    pub fn context_menu(&self) -> ContextMenu {
        self.context_menu
    }

    pub fn host_page(&self) -> &Path {
        &self.host_page
    }
}

/// What happens to commands issued before the diagram load was requested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingPolicy {
    /// Hold commands and deliver them in order once the host page is ready.
    #[default]
    Queue,
    /// Fail with [`SynopticError::NotReady`](crate::SynopticError::NotReady).
    Reject,
}

/// Bridge naming and command queueing behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Global name of the bridge object in document script.
    name: String,

    /// Policy for commands issued too early.
    pending: PendingPolicy,

    /// Maximum number of queued commands per view.
    max_pending: usize,

    /// Raise console errors from document script as routed events.
    promote_console_errors: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_BRIDGE_NAME.to_string(),
            pending: PendingPolicy::Queue,
            max_pending: DEFAULT_MAX_PENDING,
            promote_console_errors: true,
        }
    }
}

impl BridgeConfig {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pending(&self) -> PendingPolicy {
        self.pending
    }

    pub fn max_pending(&self) -> usize {
        self.max_pending
    }

    pub fn promote_console_errors(&self) -> bool {
        self.promote_console_errors
    }

    /// Returns the configuration with a different pending policy.
    pub fn with_pending(mut self, pending: PendingPolicy) -> Self {
        self.pending = pending;
        self
    }

    /// Returns the configuration with a different queue bound.
    pub fn with_max_pending(mut self, max_pending: usize) -> Self {
        self.max_pending = max_pending;
        self
    }

    /// Returns the configuration with console error promotion toggled.
    pub fn with_promote_console_errors(mut self, promote: bool) -> Self {
        self.promote_console_errors = promote;
        self
    }
}
