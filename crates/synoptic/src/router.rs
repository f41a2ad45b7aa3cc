//! Routing of bridge events to host hooks.
//!
//! Every kind of [`BridgeEvent`] has a hook slot in [`Handlers`]. Slots that
//! are not configured fall back to the `default_*` functions in this module,
//! which overrides may also call to extend rather than replace the default.
//!
//! | Hook | Default |
//! |------|---------|
//! | visible set changed | nothing |
//! | click | select the item, replacing the selection |
//! | right click | nothing |
//! | tooltip request | placeholder HTML for the first item |
//! | document error | log a warning |

use std::{
    collections::{HashMap, hash_map::Entry},
    fmt,
};

use log::{debug, warn};

use synoptic_core::{
    event::{BridgeEvent, InteractionEvent},
    identifier::ModelId,
    message::ConsoleMessage,
    visible_set::VisibleSet,
};

use crate::{SynopticError, channel::CommandSink, surface::ViewId};

/// Placeholder tooltip content used by [`default_tooltip_request`].
pub const PLACEHOLDER_TOOLTIP: &str = "<b>Hello</b>";

/// Hook for events carrying an item kind and name.
pub type ItemHook =
    Box<dyn FnMut(&mut dyn CommandSink, &str, &ModelId) -> Result<(), SynopticError>>;

/// Hook for visible set changes reported by one view.
pub type VisibleSetHook =
    Box<dyn FnMut(&mut dyn CommandSink, ViewId, &VisibleSet) -> Result<(), SynopticError>>;

/// Hook for events carrying a [`VisibleSet`].
pub type SetHook = Box<dyn FnMut(&mut dyn CommandSink, &VisibleSet) -> Result<(), SynopticError>>;

/// Hook for document-side errors.
pub type ErrorHook =
    Box<dyn FnMut(&mut dyn CommandSink, &ConsoleMessage) -> Result<(), SynopticError>>;

/// Host hooks, one per event kind.
///
/// # Examples
///
/// ```
/// use synoptic::Handlers;
///
/// let handlers = Handlers::new()
///     .with_right_click(|commands, kind, name| commands.zoom_to(kind, name))
///     .with_visible_set_changed(|_, view, set| {
///         println!("{} items visible in view {view}", set.len());
///         Ok(())
///     });
/// ```
#[derive(Default)]
pub struct Handlers {
    visible_set_changed: Option<VisibleSetHook>,
    click: Option<ItemHook>,
    right_click: Option<ItemHook>,
    tooltip_request: Option<SetHook>,
    document_error: Option<ErrorHook>,
}

impl Handlers {
    /// Creates handlers that all use the default behaviour.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the hook called whenever a view replaces its visible set.
    pub fn with_visible_set_changed(
        mut self,
        hook: impl FnMut(&mut dyn CommandSink, ViewId, &VisibleSet) -> Result<(), SynopticError>
        + 'static,
    ) -> Self {
        self.visible_set_changed = Some(Box::new(hook));
        self
    }

    /// Sets the hook called on a left click.
    pub fn with_click(
        mut self,
        hook: impl FnMut(&mut dyn CommandSink, &str, &ModelId) -> Result<(), SynopticError>
        + 'static,
    ) -> Self {
        self.click = Some(Box::new(hook));
        self
    }

    /// Sets the hook called on a right click.
    pub fn with_right_click(
        mut self,
        hook: impl FnMut(&mut dyn CommandSink, &str, &ModelId) -> Result<(), SynopticError>
        + 'static,
    ) -> Self {
        self.right_click = Some(Box::new(hook));
        self
    }

    /// Sets the hook called when the document asks for tooltip content.
    pub fn with_tooltip_request(
        mut self,
        hook: impl FnMut(&mut dyn CommandSink, &VisibleSet) -> Result<(), SynopticError> + 'static,
    ) -> Self {
        self.tooltip_request = Some(Box::new(hook));
        self
    }

    /// Sets the hook called for errors reported by document-side script.
    pub fn with_document_error(
        mut self,
        hook: impl FnMut(&mut dyn CommandSink, &ConsoleMessage) -> Result<(), SynopticError>
        + 'static,
    ) -> Self {
        self.document_error = Some(Box::new(hook));
        self
    }
}

impl fmt::Debug for Handlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handlers")
            .field("visible_set_changed", &self.visible_set_changed.is_some())
            .field("click", &self.click.is_some())
            .field("right_click", &self.right_click.is_some())
            .field("tooltip_request", &self.tooltip_request.is_some())
            .field("document_error", &self.document_error.is_some())
            .finish()
    }
}

/// Default visible-set hook. Subscription tracking needs an override.
pub fn default_visible_set_changed(
    _commands: &mut dyn CommandSink,
    view: ViewId,
    set: &VisibleSet,
) -> Result<(), SynopticError> {
    debug!(view:% = view, count = set.len(); "Visible set changed");
    Ok(())
}

/// Default click hook: select the clicked item, replacing the selection.
pub fn default_click(
    commands: &mut dyn CommandSink,
    kind: &str,
    name: &ModelId,
) -> Result<(), SynopticError> {
    commands.select(kind, vec![name.clone()], true)
}

/// Default right-click hook.
pub fn default_right_click(
    _commands: &mut dyn CommandSink,
    _kind: &str,
    _name: &ModelId,
) -> Result<(), SynopticError> {
    Ok(())
}

/// Default tooltip hook: placeholder content for the first requested item.
///
/// An empty request has no target and issues nothing.
pub fn default_tooltip_request(
    commands: &mut dyn CommandSink,
    set: &VisibleSet,
) -> Result<(), SynopticError> {
    match set.first() {
        Some(name) => commands.set_tooltip_content(name, PLACEHOLDER_TOOLTIP),
        None => {
            debug!("Tooltip requested for no items");
            Ok(())
        }
    }
}

/// Default document error hook.
pub fn default_document_error(
    _commands: &mut dyn CommandSink,
    message: &ConsoleMessage,
) -> Result<(), SynopticError> {
    warn!(
        source = message.source.as_str(),
        line = message.line;
        "Document script error: {}",
        message.message
    );
    Ok(())
}

/// Dispatches bridge events to [`Handlers`].
#[derive(Debug, Default)]
pub struct EventRouter {
    handlers: Handlers,
    visible_sets: HashMap<ViewId, VisibleSet>,
}

impl EventRouter {
    pub fn new(handlers: Handlers) -> Self {
        Self {
            handlers,
            visible_sets: HashMap::new(),
        }
    }

    /// Most recent visible set of `view`, or `None` if its document never
    /// reported one.
    pub fn visible_set(&self, view: ViewId) -> Option<&VisibleSet> {
        self.visible_sets.get(&view)
    }

    /// Runs the hook for `event` raised by `view`, issuing any resulting
    /// commands to `commands`.
    ///
    /// # Errors
    ///
    /// Propagates whatever the hook returns.
    pub fn route(
        &mut self,
        view: ViewId,
        event: BridgeEvent,
        commands: &mut dyn CommandSink,
    ) -> Result<(), SynopticError> {
        let handlers = &mut self.handlers;
        match event {
            BridgeEvent::VisibleSetChanged(set) => {
                let set = match self.visible_sets.entry(view) {
                    Entry::Occupied(mut entry) => {
                        entry.insert(set);
                        entry.into_mut()
                    }
                    Entry::Vacant(entry) => entry.insert(set),
                };
                match &mut handlers.visible_set_changed {
                    Some(hook) => hook(commands, view, set),
                    None => default_visible_set_changed(commands, view, set),
                }
            }
            BridgeEvent::Interaction(InteractionEvent::LeftClick { kind, name }) => {
                match &mut handlers.click {
                    Some(hook) => hook(commands, &kind, &name),
                    None => default_click(commands, &kind, &name),
                }
            }
            BridgeEvent::Interaction(InteractionEvent::RightClick { kind, name }) => {
                match &mut handlers.right_click {
                    Some(hook) => hook(commands, &kind, &name),
                    None => default_right_click(commands, &kind, &name),
                }
            }
            BridgeEvent::Interaction(InteractionEvent::TooltipRequest(set)) => {
                match &mut handlers.tooltip_request {
                    Some(hook) => hook(commands, &set),
                    None => default_tooltip_request(commands, &set),
                }
            }
            BridgeEvent::DocumentError(message) => match &mut handlers.document_error {
                Some(hook) => hook(commands, &message),
                None => default_document_error(commands, &message),
            },
        }
    }
}
