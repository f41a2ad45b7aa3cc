//! Command channel from the host to a hosted document.
//!
//! [`CommandSink`] is the host-facing interface for issuing [`Command`]s.
//! [`CommandChannel`] implements it for one view, turning each command into
//! script text and tracking the document's load state so that nothing is
//! evaluated against a page that is not ready yet.
//!
//! # Document states
//!
//! ```text
//! Unloaded ─begin_loading─▶ Loading ─finish_loading(ok)─▶ Ready ─load(url)─▶ DiagramLoading
//!                              │                                                 │
//!                              └─finish_loading(!ok)─▶ Failed      first bridge call
//!                                                                                ▼
//!                                                                          DiagramReady
//! ```
//!
//! Commands submitted before `DiagramLoading` are queued or rejected according
//! to [`PendingPolicy`], except a load request, which replaces the diagram URL.
//! Once the diagram load has been requested, commands are evaluated
//! immediately: the document runs script on a single thread, so they execute
//! after `load(url)`.

use std::{collections::VecDeque, fmt, path::Path};

use log::{debug, error, info, trace, warn};

use synoptic_core::{command::Command, identifier::ModelId};

use crate::{
    SynopticError,
    bridge::BridgeObject,
    config::{BridgeConfig, PendingPolicy},
    view::DocumentView,
};

/// Load state of a hosted document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentState {
    /// The view exists but nothing was requested yet.
    Unloaded,
    /// The host page is loading.
    Loading,
    /// The host page is loaded and the bridge object is attached.
    Ready,
    /// `load(url)` was evaluated; the diagram is loading.
    DiagramLoading,
    /// The diagram document has called into the bridge.
    DiagramReady,
    /// The host page failed to load.
    Failed,
}

impl DocumentState {
    /// Returns `true` once commands are evaluated instead of held back.
    pub fn accepts_commands(&self) -> bool {
        matches!(self, Self::DiagramLoading | Self::DiagramReady)
    }
}

impl fmt::Display for DocumentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unloaded => "unloaded",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::DiagramLoading => "diagram_loading",
            Self::DiagramReady => "diagram_ready",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Receiver of host-issued commands.
///
/// Only [`submit`](Self::submit) is required; the remaining methods build the
/// matching [`Command`]. All of them are fire-and-forget: `Ok` means the
/// command was accepted, not that the document acted on it.
pub trait CommandSink {
    /// Accepts one command.
    fn submit(&mut self, command: Command) -> Result<(), SynopticError>;

    /// Moves the view so that the given item is visible.
    fn zoom_to(&mut self, kind: &str, name: &str) -> Result<(), SynopticError> {
        self.submit(Command::ZoomTo {
            kind: kind.to_string(),
            name: ModelId::new(name),
        })
    }

    /// Marks `names` as selected, clearing the previous selection first when
    /// `replace` is set.
    fn select(
        &mut self,
        kind: &str,
        names: Vec<ModelId>,
        replace: bool,
    ) -> Result<(), SynopticError> {
        self.submit(Command::Select {
            kind: kind.to_string(),
            names,
            replace,
        })
    }

    /// Clears the selection.
    fn unselect_all(&mut self) -> Result<(), SynopticError> {
        self.submit(Command::UnselectAll)
    }

    /// Provides tooltip HTML for an item.
    fn set_tooltip_content(&mut self, name: &str, html: &str) -> Result<(), SynopticError> {
        self.submit(Command::SetTooltipContent {
            name: ModelId::new(name),
            html: html.to_string(),
        })
    }

    /// Loads a diagram document into the host page.
    ///
    /// Before the diagram load has been requested this replaces the URL
    /// that will be loaded rather than queueing a second load.
    fn load_document(&mut self, url: &str) -> Result<(), SynopticError> {
        self.submit(Command::LoadDocument(url.to_string()))
    }
}

/// Command channel bound to a single view.
#[derive(Debug)]
pub struct CommandChannel<V> {
    view: V,
    diagram_url: String,
    state: DocumentState,
    pending: VecDeque<Command>,
    policy: PendingPolicy,
    max_pending: usize,
}

impl<V: DocumentView> CommandChannel<V> {
    /// Creates a channel for `view` that will load `diagram_url` once the
    /// host page is ready.
    pub fn new(view: V, diagram_url: impl Into<String>, config: &BridgeConfig) -> Self {
        Self {
            view,
            diagram_url: diagram_url.into(),
            state: DocumentState::Unloaded,
            pending: VecDeque::new(),
            policy: config.pending(),
            max_pending: config.max_pending(),
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn state(&self) -> DocumentState {
        self.state
    }

    /// Diagram document requested once the host page is ready.
    pub fn diagram_url(&self) -> &str {
        &self.diagram_url
    }

    /// Number of commands waiting for the document.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Attaches `bridge` and starts loading `host_page`.
    ///
    /// # Errors
    ///
    /// Fails if the view cannot expose the bridge or navigate.
    pub fn begin_loading(
        &mut self,
        bridge: &BridgeObject,
        host_page: &Path,
    ) -> Result<(), SynopticError> {
        self.view.expose_bridge(bridge.name())?;
        self.view.navigate(host_page)?;
        self.state = DocumentState::Loading;

        info!(
            view:% = bridge.view(),
            bridge = bridge.name(),
            host_page:? = host_page;
            "Loading host page"
        );
        Ok(())
    }

    /// Handles the host page's load-finished notification.
    ///
    /// On success the diagram load is requested and queued commands are
    /// delivered in submission order. If the view cannot evaluate the load
    /// request the channel stays in `Loading`, keeping its queue, so a later
    /// notification retries. On failure queued commands are dropped and every
    /// later command fails with [`SynopticError::LoadFailed`]. Notifications
    /// outside the `Loading` state are ignored.
    pub fn finish_loading(&mut self, ok: bool) -> Result<(), SynopticError> {
        if self.state != DocumentState::Loading {
            warn!(state:% = self.state; "Ignoring load-finished notification");
            return Ok(());
        }

        if !ok {
            self.state = DocumentState::Failed;
            let dropped = self.pending.len();
            self.pending.clear();
            error!(dropped; "Host page failed to load, dropping queued commands");
            return Ok(());
        }

        self.state = DocumentState::Ready;
        debug!("Host page ready");

        if let Err(err) = self.dispatch(&Command::LoadDocument(self.diagram_url.clone())) {
            self.state = DocumentState::Loading;
            warn!(err:%; "Diagram load request failed, waiting for another load-finished");
            return Err(err);
        }
        self.state = DocumentState::DiagramLoading;
        info!(url = self.diagram_url.as_str(); "Diagram load requested");

        self.flush()
    }

    /// Records that the diagram document is live.
    pub fn mark_diagram_ready(&mut self) {
        if self.state == DocumentState::DiagramLoading {
            self.state = DocumentState::DiagramReady;
            debug!("Diagram ready");
        }
    }

    fn flush(&mut self) -> Result<(), SynopticError> {
        if !self.pending.is_empty() {
            debug!(count = self.pending.len(); "Delivering queued commands");
        }
        while let Some(command) = self.pending.front() {
            let command = command.clone();
            self.dispatch(&command)?;
            self.pending.pop_front();
        }
        Ok(())
    }

    fn dispatch(&mut self, command: &Command) -> Result<(), SynopticError> {
        for call in command.script_calls() {
            let script = call.to_script();
            trace!(script = script.as_str(); "Evaluating script");
            self.view.evaluate(&script)?;
        }
        Ok(())
    }

    /// Handles a command submitted before the diagram load was requested.
    fn hold(&mut self, command: Command) -> Result<(), SynopticError> {
        if let Command::LoadDocument(url) = command {
            debug!(url = url.as_str(); "Replacing diagram URL before load");
            self.diagram_url = url;
            return Ok(());
        }

        match self.policy {
            PendingPolicy::Reject => Err(SynopticError::NotReady(self.state)),
            PendingPolicy::Queue if self.pending.len() >= self.max_pending => {
                Err(SynopticError::QueueFull(self.max_pending))
            }
            PendingPolicy::Queue => {
                self.pending.push_back(command);
                Ok(())
            }
        }
    }
}

impl<V: DocumentView> CommandSink for CommandChannel<V> {
    fn submit(&mut self, command: Command) -> Result<(), SynopticError> {
        debug!(command = command.name(), state:% = self.state; "Command submitted");

        match self.state {
            DocumentState::DiagramLoading | DocumentState::DiagramReady => {
                self.flush()?;
                self.dispatch(&command)
            }
            DocumentState::Failed => Err(SynopticError::LoadFailed(command.name())),
            _ => self.hold(command),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::surface::ViewId;

    #[derive(Debug, Default)]
    struct FakeView {
        exposed: Vec<String>,
        pages: Vec<PathBuf>,
        scripts: Vec<String>,
        fail_evaluate: bool,
    }

    impl DocumentView for FakeView {
        fn expose_bridge(&mut self, name: &str) -> Result<(), SynopticError> {
            self.exposed.push(name.to_string());
            Ok(())
        }

        fn navigate(&mut self, page: &Path) -> Result<(), SynopticError> {
            self.pages.push(page.to_path_buf());
            Ok(())
        }

        fn evaluate(&mut self, script: &str) -> Result<(), SynopticError> {
            if self.fail_evaluate {
                return Err(SynopticError::Script("view closed".to_string()));
            }
            self.scripts.push(script.to_string());
            Ok(())
        }

        fn resize(&mut self, _width: u32, _height: u32) {}
    }

    fn channel(config: &BridgeConfig) -> CommandChannel<FakeView> {
        CommandChannel::new(FakeView::default(), "diagram.svg", config)
    }

    fn loading_channel(config: &BridgeConfig) -> CommandChannel<FakeView> {
        let mut channel = channel(config);
        let bridge = BridgeObject::new(config.name(), ViewId::new(0));
        channel
            .begin_loading(&bridge, Path::new("web/local.html"))
            .unwrap();
        channel
    }

    #[test]
    fn test_begin_loading_exposes_bridge_before_navigating() {
        let channel = loading_channel(&BridgeConfig::default());
        assert_eq!(channel.state(), DocumentState::Loading);
        assert_eq!(channel.view().exposed, vec!["Widget".to_string()]);
        assert_eq!(channel.view().pages, vec![PathBuf::from("web/local.html")]);
        assert!(channel.view().scripts.is_empty());
    }

    #[test]
    fn test_commands_queue_until_load_finished() {
        let mut channel = loading_channel(&BridgeConfig::default());
        channel.zoom_to("device", "a/b/c").unwrap();
        assert!(channel.view().scripts.is_empty());
        assert_eq!(channel.pending_len(), 1);

        channel.finish_loading(true).unwrap();

        assert_eq!(channel.state(), DocumentState::DiagramLoading);
        assert_eq!(channel.pending_len(), 0);
        assert_eq!(
            channel.view().scripts,
            vec![
                r#"load("diagram.svg")"#.to_string(),
                r#"synoptic.zoomTo("device", "a/b/c")"#.to_string(),
            ]
        );
    }

    #[test]
    fn test_commands_before_navigation_are_queued_too() {
        let mut channel = channel(&BridgeConfig::default());
        channel.unselect_all().unwrap();
        assert_eq!(channel.state(), DocumentState::Unloaded);
        assert_eq!(channel.pending_len(), 1);
    }

    #[test]
    fn test_reject_policy() {
        let config = BridgeConfig::default().with_pending(PendingPolicy::Reject);
        let mut channel = loading_channel(&config);

        let err = channel.unselect_all().unwrap_err();
        assert!(matches!(
            err,
            SynopticError::NotReady(DocumentState::Loading)
        ));
        assert!(channel.view().scripts.is_empty());
    }

    #[test]
    fn test_queue_limit() {
        let config = BridgeConfig::default().with_max_pending(2);
        let mut channel = loading_channel(&config);

        channel.unselect_all().unwrap();
        channel.unselect_all().unwrap();
        let err = channel.unselect_all().unwrap_err();
        assert!(matches!(err, SynopticError::QueueFull(2)));
        assert_eq!(channel.pending_len(), 2);
    }

    #[test]
    fn test_failed_load_drops_queue() {
        let mut channel = loading_channel(&BridgeConfig::default());
        channel.unselect_all().unwrap();

        channel.finish_loading(false).unwrap();

        assert_eq!(channel.state(), DocumentState::Failed);
        assert_eq!(channel.pending_len(), 0);
        assert!(channel.view().scripts.is_empty());
        assert!(matches!(
            channel.zoom_to("device", "x"),
            Err(SynopticError::LoadFailed("zoom_to"))
        ));
    }

    #[test]
    fn test_duplicate_load_finished_is_ignored() {
        let mut channel = loading_channel(&BridgeConfig::default());
        channel.finish_loading(true).unwrap();
        channel.finish_loading(true).unwrap();

        let loads = channel
            .view()
            .scripts
            .iter()
            .filter(|s| s.starts_with("load("))
            .count();
        assert_eq!(loads, 1);
    }

    #[test]
    fn test_load_finished_before_navigation_is_ignored() {
        let mut channel = channel(&BridgeConfig::default());
        channel.finish_loading(true).unwrap();
        assert_eq!(channel.state(), DocumentState::Unloaded);
        assert!(channel.view().scripts.is_empty());
    }

    #[test]
    fn test_mark_diagram_ready() {
        let mut channel = loading_channel(&BridgeConfig::default());

        channel.mark_diagram_ready();
        assert_eq!(channel.state(), DocumentState::Loading);

        channel.finish_loading(true).unwrap();
        channel.mark_diagram_ready();
        assert_eq!(channel.state(), DocumentState::DiagramReady);
    }

    #[test]
    fn test_ready_channel_evaluates_select_in_order() {
        let mut channel = loading_channel(&BridgeConfig::default());
        channel.finish_loading(true).unwrap();

        channel
            .select("device", vec!["x".into(), "y".into()], true)
            .unwrap();

        assert_eq!(
            channel.view().scripts[1..],
            [
                "synoptic.unselectAll()".to_string(),
                r#"synoptic.select("device", "x")"#.to_string(),
                r#"synoptic.select("device", "y")"#.to_string(),
            ]
        );
    }

    #[test]
    fn test_failed_load_request_can_be_retried() {
        let mut channel = loading_channel(&BridgeConfig::default());
        channel.unselect_all().unwrap();
        channel.view_mut().fail_evaluate = true;

        assert!(matches!(
            channel.finish_loading(true),
            Err(SynopticError::Script(_))
        ));
        assert_eq!(channel.state(), DocumentState::Loading);
        assert_eq!(channel.pending_len(), 1);

        channel.view_mut().fail_evaluate = false;
        channel.finish_loading(true).unwrap();
        channel.zoom_to("device", "x").unwrap();

        assert_eq!(channel.state(), DocumentState::DiagramLoading);
        assert_eq!(channel.pending_len(), 0);
        assert_eq!(
            channel.view().scripts,
            vec![
                r#"load("diagram.svg")"#.to_string(),
                "synoptic.unselectAll()".to_string(),
                r#"synoptic.zoomTo("device", "x")"#.to_string(),
            ]
        );
    }

    #[test]
    fn test_failed_load_request_does_not_fill_queue() {
        let config = BridgeConfig::default().with_max_pending(3);
        let mut channel = loading_channel(&config);
        channel.view_mut().fail_evaluate = true;
        assert!(channel.finish_loading(true).is_err());

        channel.view_mut().fail_evaluate = false;
        channel.finish_loading(true).unwrap();
        for _ in 0..4 {
            channel.zoom_to("device", "x").unwrap();
        }

        assert_eq!(channel.pending_len(), 0);
        assert_eq!(channel.view().scripts.len(), 5);
    }

    #[test]
    fn test_early_load_document_replaces_diagram_url() {
        let mut channel = loading_channel(&BridgeConfig::default());
        channel.load_document("other.svg").unwrap();
        assert_eq!(channel.diagram_url(), "other.svg");
        assert_eq!(channel.pending_len(), 0);

        channel.finish_loading(true).unwrap();
        assert_eq!(channel.view().scripts, vec![r#"load("other.svg")"#.to_string()]);

        channel.load_document("third.svg").unwrap();
        assert_eq!(channel.view().scripts[1], r#"load("third.svg")"#);
    }

    #[test]
    fn test_early_load_document_is_accepted_when_rejecting() {
        let config = BridgeConfig::default().with_pending(PendingPolicy::Reject);
        let mut channel = loading_channel(&config);

        channel.load_document("other.svg").unwrap();
        assert!(matches!(
            channel.zoom_to("device", "x"),
            Err(SynopticError::NotReady(DocumentState::Loading))
        ));
        assert_eq!(channel.diagram_url(), "other.svg");
    }

    #[test]
    fn test_state_display() {
        assert_eq!(DocumentState::DiagramLoading.to_string(), "diagram_loading");
        assert!(DocumentState::DiagramReady.accepts_commands());
        assert!(!DocumentState::Ready.accepts_commands());
    }
}
