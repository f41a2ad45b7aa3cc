//! The synoptic surface: view lifecycle and host-facing API.

use std::fmt;

use log::{debug, info, warn};

use synoptic_core::{
    command::Command,
    event::BridgeEvent,
    identifier::ModelId,
    message::{ConsoleMessage, DocumentMessage},
};

use crate::{
    SynopticError,
    bridge::{BridgeObject, EventRegistry},
    channel::{CommandChannel, CommandSink, DocumentState},
    config::AppConfig,
    diagnostics::{DiagnosticsSink, LogSink},
    router::{EventRouter, Handlers},
    view::{DocumentView, RenderBackend},
};

/// Identifies one view created by a [`SynopticSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(usize);

impl ViewId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct HostedView<V> {
    bridge: BridgeObject,
    channel: CommandChannel<V>,
}

/// An embedded SVG synoptic.
///
/// The surface owns the views created through its [`RenderBackend`], a
/// [`BridgeObject`] per view, the [`EventRegistry`] and the [`EventRouter`].
/// The embedding code reports what happens inside each view (load
/// completion, bridge calls, console output) and the surface turns that into
/// hook calls and document commands.
///
/// Each call to [`set_url`](Self::set_url) adds a view next to the existing
/// ones. Earlier views are neither replaced nor detached: their events are
/// still routed, while commands always go to the newest view.
///
/// # Examples
///
/// ```rust,no_run
/// # use synoptic::{SynopticSurface, Handlers, RenderBackend, config::AppConfig};
/// # fn demo<B: RenderBackend>(backend: B) -> Result<(), synoptic::SynopticError> {
/// let mut surface = SynopticSurface::new(
///     backend,
///     AppConfig::default(),
///     Handlers::new(),
///     Some("file:///opt/synoptic/machine.svg"),
/// )?;
///
/// let view = surface.current_view().expect("a view was created");
/// surface.handle_load_finished(view, true)?;
/// surface.zoom_to("device", "sys/tg_test/1")?;
/// # Ok(())
/// # }
/// ```
pub struct SynopticSurface<B: RenderBackend> {
    backend: B,
    config: AppConfig,
    views: Vec<HostedView<B::View>>,
    registry: EventRegistry,
    router: EventRouter,
    diagnostics: Box<dyn DiagnosticsSink>,
}

impl<B: RenderBackend> SynopticSurface<B> {
    /// Creates a surface, with a first view if `url` is given.
    ///
    /// # Errors
    ///
    /// Fails if the view cannot be created or starts loading.
    pub fn new(
        backend: B,
        config: AppConfig,
        handlers: Handlers,
        url: Option<&str>,
    ) -> Result<Self, SynopticError> {
        let mut surface = Self {
            backend,
            config,
            views: Vec::new(),
            registry: EventRegistry::new(),
            router: EventRouter::new(handlers),
            diagnostics: Box::new(LogSink),
        };

        if let Some(url) = url {
            surface.set_url(url)?;
        }

        Ok(surface)
    }

    /// Replaces the diagnostics sink.
    pub fn with_diagnostics(mut self, sink: impl DiagnosticsSink + 'static) -> Self {
        self.diagnostics = Box::new(sink);
        self
    }

    /// Creates a new view that loads the host page, then the diagram at `url`.
    ///
    /// The new view is added alongside existing ones; see the type-level
    /// documentation.
    ///
    /// # Errors
    ///
    /// Fails if the view cannot be created or starts loading.
    pub fn set_url(&mut self, url: &str) -> Result<ViewId, SynopticError> {
        let id = ViewId::new(self.views.len());
        if !self.views.is_empty() {
            warn!(
                view:% = id,
                existing = self.views.len();
                "Adding a view next to existing ones; earlier views are not replaced"
            );
        }

        let view = self.backend.create_view(self.config.view())?;
        let bridge = BridgeObject::new(self.config.bridge().name(), id);
        let mut channel = CommandChannel::new(view, url, self.config.bridge());
        channel.begin_loading(&bridge, self.config.view().host_page())?;

        self.views.push(HostedView { bridge, channel });
        info!(view:% = id, url; "Synoptic view created");

        Ok(id)
    }

    /// Moves the newest view so that the given item is visible.
    pub fn zoom_to(&mut self, kind: &str, name: &str) -> Result<(), SynopticError> {
        self.current_channel()?.zoom_to(kind, name)
    }

    /// Marks `names` as selected in the newest view.
    ///
    /// With `replace`, the previous selection is cleared first.
    pub fn select<I, N>(&mut self, kind: &str, names: I, replace: bool) -> Result<(), SynopticError>
    where
        I: IntoIterator<Item = N>,
        N: Into<ModelId>,
    {
        let names = names.into_iter().map(Into::into).collect();
        debug!(kind, replace; "Selecting");
        self.current_channel()?.select(kind, names, replace)
    }

    /// Submits an arbitrary command to the newest view.
    pub fn submit(&mut self, command: Command) -> Result<(), SynopticError> {
        self.current_channel()?.submit(command)
    }

    /// Handles the host page's load-finished notification for `view`.
    pub fn handle_load_finished(&mut self, view: ViewId, ok: bool) -> Result<(), SynopticError> {
        debug!(view:% = view, ok; "Load finished");
        self.hosted_mut(view)?.channel.finish_loading(ok)
    }

    /// Handles a call made by document script on the bridge object of `view`.
    ///
    /// # Errors
    ///
    /// Returns [`SynopticError::Bridge`] for calls outside the bridge
    /// interface, and whatever the routed hook returns.
    pub fn invoke<S: AsRef<str>>(
        &mut self,
        view: ViewId,
        method: &str,
        args: &[S],
    ) -> Result<(), SynopticError> {
        let hosted = self.hosted_mut(view)?;
        let event = hosted.bridge.invoke(method, args)?;
        hosted.channel.mark_diagram_ready();
        self.dispatch(view, event)
    }

    /// Handles a console message from document script in `view`.
    ///
    /// The message always reaches the diagnostics sink. Errors are also
    /// routed as [`BridgeEvent::DocumentError`] when enabled in the bridge
    /// configuration.
    pub fn console_message(
        &mut self,
        view: ViewId,
        message: ConsoleMessage,
    ) -> Result<(), SynopticError> {
        self.hosted_mut(view)?;
        self.diagnostics.console_message(view, &message);

        if message.is_error() && self.config.bridge().promote_console_errors() {
            self.dispatch(view, BridgeEvent::DocumentError(message))?;
        }
        Ok(())
    }

    /// Handles any [`DocumentMessage`] reported for `view`.
    pub fn handle_message(
        &mut self,
        view: ViewId,
        message: DocumentMessage,
    ) -> Result<(), SynopticError> {
        match message {
            DocumentMessage::LoadFinished { ok } => self.handle_load_finished(view, ok),
            DocumentMessage::Call { method, args } => self.invoke(view, &method, &args),
            DocumentMessage::Console(console) => self.console_message(view, console),
        }
    }

    /// Resizes every view.
    pub fn resize(&mut self, width: u32, height: u32) {
        for hosted in &mut self.views {
            hosted.channel.view_mut().resize(width, height);
        }
    }

    /// The newest view, which receives commands.
    pub fn current_view(&self) -> Option<ViewId> {
        self.views.len().checked_sub(1).map(ViewId::new)
    }

    /// Number of views created so far.
    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    pub fn view(&self, view: ViewId) -> Option<&B::View> {
        self.views
            .get(view.index())
            .map(|hosted| hosted.channel.view())
    }

    pub fn state(&self, view: ViewId) -> Option<DocumentState> {
        self.views
            .get(view.index())
            .map(|hosted| hosted.channel.state())
    }

    pub fn bridge(&self, view: ViewId) -> Option<&BridgeObject> {
        self.views.get(view.index()).map(|hosted| &hosted.bridge)
    }

    pub fn router(&self) -> &EventRouter {
        &self.router
    }

    pub fn registry_mut(&mut self) -> &mut EventRegistry {
        &mut self.registry
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    fn dispatch(&mut self, view: ViewId, event: BridgeEvent) -> Result<(), SynopticError> {
        self.registry.raise(view, &event);

        let target = self
            .views
            .last_mut()
            .map(|hosted| &mut hosted.channel)
            .ok_or(SynopticError::NoView)?;
        self.router.route(view, event, target)
    }

    fn current_channel(&mut self) -> Result<&mut CommandChannel<B::View>, SynopticError> {
        self.views
            .last_mut()
            .map(|hosted| &mut hosted.channel)
            .ok_or(SynopticError::NoView)
    }

    fn hosted_mut(&mut self, view: ViewId) -> Result<&mut HostedView<B::View>, SynopticError> {
        self.views
            .get_mut(view.index())
            .ok_or(SynopticError::UnknownView(view))
    }
}

impl<B: RenderBackend> fmt::Debug for SynopticSurface<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SynopticSurface")
            .field("config", &self.config)
            .field("views", &self.views.len())
            .field("registry", &self.registry)
            .field("router", &self.router)
            .finish()
    }
}
