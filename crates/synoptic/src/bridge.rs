//! The bridge object and its event registry.
//!
//! [`BridgeObject`] is the only host object reachable from document script. It
//! accepts exactly the methods in [`BridgeObject::METHODS`] and turns each call
//! into a [`BridgeEvent`]. [`EventRegistry`] fans those events out to passive
//! observers before the [`EventRouter`](crate::EventRouter) acts on them.

use std::fmt;

use log::{debug, trace};

use synoptic_core::{
    event::{BridgeEvent, ButtonKind, InteractionEvent},
    visible_set::VisibleSet,
};

use crate::{error::BridgeError, surface::ViewId};

/// Document-side call reporting a click: `(button, kind, name)`.
pub const NOTIFY_SELECTION_INTERACTION: &str = "notifySelectionInteraction";

/// Document-side call requesting tooltip content: `(names)`.
pub const NOTIFY_TOOLTIP_REQUEST: &str = "notifyTooltipRequest";

/// Document-side call reporting a new visible set: `(names)`.
pub const NOTIFY_SUBSCRIPTION_CHANGE: &str = "notifySubscriptionChange";

/// Host object exposed into a document's script namespace.
///
/// # Examples
///
/// ```
/// use synoptic::{BridgeObject, ViewId};
/// use synoptic::event::{BridgeEvent, InteractionEvent};
///
/// let bridge = BridgeObject::new("Widget", ViewId::new(0));
/// let event = bridge
///     .invoke("notifySelectionInteraction", &["left", "device", "a/b/c"])
///     .unwrap();
/// assert!(matches!(
///     event,
///     BridgeEvent::Interaction(InteractionEvent::LeftClick { .. })
/// ));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeObject {
    name: String,
    view: ViewId,
}

impl BridgeObject {
    /// Methods callable from document script, with their arity.
    pub const METHODS: [(&'static str, usize); 3] = [
        (NOTIFY_SELECTION_INTERACTION, 3),
        (NOTIFY_TOOLTIP_REQUEST, 1),
        (NOTIFY_SUBSCRIPTION_CHANGE, 1),
    ];

    /// Creates a bridge object bound under `name` in the document of `view`.
    pub fn new(name: impl Into<String>, view: ViewId) -> Self {
        Self {
            name: name.into(),
            view,
        }
    }

    /// Global name of the object in document script.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// View whose document this object is attached to.
    pub fn view(&self) -> ViewId {
        self.view
    }

    /// Translates a document-side method call into an event.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError`] for methods outside [`Self::METHODS`], wrong
    /// argument counts, or a button other than `left`/`right`.
    pub fn invoke<S: AsRef<str>>(
        &self,
        method: &str,
        args: &[S],
    ) -> Result<BridgeEvent, BridgeError> {
        trace!(view:% = self.view, method, args_count = args.len(); "Bridge call");

        let (method, arity) = Self::METHODS
            .iter()
            .copied()
            .find(|(name, _)| *name == method)
            .ok_or_else(|| BridgeError::UnknownMethod(method.to_string()))?;

        if args.len() != arity {
            return Err(BridgeError::Arity {
                method,
                expected: arity,
                actual: args.len(),
            });
        }

        let args: Vec<&str> = args.iter().map(|arg| arg.as_ref()).collect();
        let event = match method {
            NOTIFY_SELECTION_INTERACTION => {
                let button: ButtonKind = args[0].parse()?;
                InteractionEvent::click(button, args[1], args[2]).into()
            }
            NOTIFY_TOOLTIP_REQUEST => {
                InteractionEvent::TooltipRequest(VisibleSet::parse(args[0])).into()
            }
            _ => BridgeEvent::VisibleSetChanged(VisibleSet::parse(args[0])),
        };

        debug!(view:% = self.view, event = event.name(); "Bridge event raised");
        Ok(event)
    }
}

/// Passive observer of raised bridge events.
pub type Observer = Box<dyn FnMut(ViewId, &BridgeEvent)>;

/// Fans raised events out to observers in registration order.
#[derive(Default)]
pub struct EventRegistry {
    observers: Vec<Observer>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer for every event raised from now on.
    pub fn subscribe(&mut self, observer: impl FnMut(ViewId, &BridgeEvent) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Number of registered observers.
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Notifies every observer of `event`.
    pub fn raise(&mut self, view: ViewId, event: &BridgeEvent) {
        for observer in &mut self.observers {
            observer(view, event);
        }
    }
}

impl fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRegistry")
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use synoptic_core::identifier::ModelId;

    use super::*;

    fn bridge() -> BridgeObject {
        BridgeObject::new("Widget", ViewId::new(0))
    }

    #[test]
    fn test_left_and_right_clicks() {
        let event = bridge()
            .invoke(NOTIFY_SELECTION_INTERACTION, &["left", "device", "a/b/c"])
            .unwrap();
        assert_eq!(
            event,
            BridgeEvent::Interaction(InteractionEvent::LeftClick {
                kind: "device".to_string(),
                name: ModelId::new("a/b/c"),
            })
        );

        let event = bridge()
            .invoke(NOTIFY_SELECTION_INTERACTION, &["right", "section", "Ring"])
            .unwrap();
        assert_eq!(
            event,
            BridgeEvent::Interaction(InteractionEvent::RightClick {
                kind: "section".to_string(),
                name: ModelId::new("Ring"),
            })
        );
    }

    #[test]
    fn test_tooltip_request_parses_list() {
        let event = bridge().invoke(NOTIFY_TOOLTIP_REQUEST, &["a,b"]).unwrap();
        assert_eq!(
            event,
            BridgeEvent::Interaction(InteractionEvent::TooltipRequest(VisibleSet::parse("a,b")))
        );
    }

    #[test]
    fn test_empty_subscription_change_is_empty_set() {
        let event = bridge().invoke(NOTIFY_SUBSCRIPTION_CHANGE, &[""]).unwrap();
        assert_eq!(event, BridgeEvent::VisibleSetChanged(VisibleSet::new()));
    }

    #[test]
    fn test_owned_arguments() {
        let args = vec!["x,y".to_string()];
        let event = bridge().invoke(NOTIFY_SUBSCRIPTION_CHANGE, &args).unwrap();
        assert_eq!(event, BridgeEvent::VisibleSetChanged(VisibleSet::parse("x,y")));
    }

    #[test]
    fn test_unknown_method() {
        let err = bridge().invoke("evaluate", &["anything"]).unwrap_err();
        assert_eq!(err, BridgeError::UnknownMethod("evaluate".to_string()));
    }

    #[test]
    fn test_wrong_arity() {
        let err = bridge()
            .invoke(NOTIFY_SELECTION_INTERACTION, &["left", "device"])
            .unwrap_err();
        assert_eq!(
            err,
            BridgeError::Arity {
                method: NOTIFY_SELECTION_INTERACTION,
                expected: 3,
                actual: 2,
            }
        );
    }

    #[test]
    fn test_unknown_button() {
        let err = bridge()
            .invoke(NOTIFY_SELECTION_INTERACTION, &["middle", "device", "x"])
            .unwrap_err();
        assert!(matches!(err, BridgeError::Button(_)));
    }

    #[test]
    fn test_registry_notifies_all_observers_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut registry = EventRegistry::new();

        for tag in ["first", "second"] {
            let seen = Rc::clone(&seen);
            registry.subscribe(move |view, event| {
                seen.borrow_mut().push(format!("{tag}:{view}:{}", event.name()));
            });
        }

        registry.raise(
            ViewId::new(1),
            &BridgeEvent::VisibleSetChanged(VisibleSet::new()),
        );

        assert_eq!(registry.len(), 2);
        assert_eq!(
            *seen.borrow(),
            vec![
                "first:1:visible_set_changed".to_string(),
                "second:1:visible_set_changed".to_string(),
            ]
        );
    }
}
