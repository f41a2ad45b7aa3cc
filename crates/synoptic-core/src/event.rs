//! Typed events raised by the bridge object.
//!
//! Document-side script reports interactions as plain strings. The bridge
//! object turns them into the events defined here before any host code sees
//! them.

use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::{identifier::ModelId, message::ConsoleMessage, visible_set::VisibleSet};

/// Mouse button reported with a selection interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonKind {
    Left,
    Right,
}

/// Error returned when a button name is neither `"left"` nor `"right"`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown button kind `{0}`, expected `left` or `right`")]
pub struct UnknownButton(pub String);

impl FromStr for ButtonKind {
    type Err = UnknownButton;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            _ => Err(UnknownButton(s.to_string())),
        }
    }
}

impl fmt::Display for ButtonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// A user interaction inside the rendered diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionEvent {
    /// An item was clicked with the primary button.
    LeftClick { kind: String, name: ModelId },
    /// An item was clicked with the secondary button.
    RightClick { kind: String, name: ModelId },
    /// The document needs tooltip content for these items.
    TooltipRequest(VisibleSet),
}

impl InteractionEvent {
    /// Builds a click event for the given button.
    pub fn click(button: ButtonKind, kind: impl Into<String>, name: impl Into<ModelId>) -> Self {
        let kind = kind.into();
        let name = name.into();
        match button {
            ButtonKind::Left => Self::LeftClick { kind, name },
            ButtonKind::Right => Self::RightClick { kind, name },
        }
    }
}

/// Any event the bridge can raise towards the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeEvent {
    Interaction(InteractionEvent),
    /// The set of visible elements changed. Replaces the previous set.
    VisibleSetChanged(VisibleSet),
    /// Document-side script reported an error on its console.
    DocumentError(ConsoleMessage),
}

impl BridgeEvent {
    /// Short name used in log records.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Interaction(InteractionEvent::LeftClick { .. }) => "left_click",
            Self::Interaction(InteractionEvent::RightClick { .. }) => "right_click",
            Self::Interaction(InteractionEvent::TooltipRequest(_)) => "tooltip_request",
            Self::VisibleSetChanged(_) => "visible_set_changed",
            Self::DocumentError(_) => "document_error",
        }
    }
}

impl From<InteractionEvent> for BridgeEvent {
    fn from(event: InteractionEvent) -> Self {
        Self::Interaction(event)
    }
}
