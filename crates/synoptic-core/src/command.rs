//! Host-issued commands and the script calls they expand to.
//!
//! A [`Command`] is what the host asks for ("select these items"). A
//! [`ScriptCall`] is one invocation of a document-side function. Commands are
//! one-way and fire-and-forget: nothing acknowledges them.
//!
//! # Document-side functions
//!
//! | Call | Script |
//! |------|--------|
//! | [`ScriptCall::Load`] | `load(url)` |
//! | [`ScriptCall::ZoomTo`] | `synoptic.zoomTo(kind, name)` |
//! | [`ScriptCall::Select`] | `synoptic.select(kind, name)` |
//! | [`ScriptCall::UnselectAll`] | `synoptic.unselectAll()` |
//! | [`ScriptCall::SetTooltipHtml`] | `synoptic.setTooltipHTML(name, html)` |

use std::fmt;

use crate::{identifier::ModelId, script::write_string_literal};

/// Global object through which the diagram document exposes its API.
pub const DOCUMENT_OBJECT: &str = "synoptic";

/// An instruction from the host to the embedded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Load the diagram document at `url` into the host page.
    LoadDocument(String),
    /// Move the view so that the given item is visible.
    ZoomTo { kind: String, name: ModelId },
    /// Mark items as selected, optionally clearing the previous selection first.
    Select {
        kind: String,
        names: Vec<ModelId>,
        replace: bool,
    },
    /// Clear the selection.
    UnselectAll,
    /// Provide tooltip HTML for an item.
    SetTooltipContent { name: ModelId, html: String },
}

impl Command {
    /// Expands the command into document-side calls, in execution order.
    ///
    /// A replacing selection always starts with [`ScriptCall::UnselectAll`],
    /// followed by one [`ScriptCall::Select`] per name in input order.
    ///
    /// # Examples
    ///
    /// ```
    /// use synoptic_core::command::{Command, ScriptCall};
    ///
    /// let command = Command::Select {
    ///     kind: "device".into(),
    ///     names: vec!["x".into(), "y".into()],
    ///     replace: true,
    /// };
    /// let calls = command.script_calls();
    /// assert_eq!(calls.len(), 3);
    /// assert_eq!(calls[0], ScriptCall::UnselectAll);
    /// ```
    pub fn script_calls(&self) -> Vec<ScriptCall> {
        match self {
            Self::LoadDocument(url) => vec![ScriptCall::Load(url.clone())],
            Self::ZoomTo { kind, name } => vec![ScriptCall::ZoomTo(kind.clone(), name.clone())],
            Self::Select {
                kind,
                names,
                replace,
            } => {
                let mut calls = Vec::with_capacity(names.len() + 1);
                if *replace {
                    calls.push(ScriptCall::UnselectAll);
                }
                calls.extend(
                    names
                        .iter()
                        .map(|name| ScriptCall::Select(kind.clone(), name.clone())),
                );
                calls
            }
            Self::UnselectAll => vec![ScriptCall::UnselectAll],
            Self::SetTooltipContent { name, html } => {
                vec![ScriptCall::SetTooltipHtml(name.clone(), html.clone())]
            }
        }
    }

    /// Short name used in log records.
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoadDocument(_) => "load_document",
            Self::ZoomTo { .. } => "zoom_to",
            Self::Select { .. } => "select",
            Self::UnselectAll => "unselect_all",
            Self::SetTooltipContent { .. } => "set_tooltip_content",
        }
    }
}

/// One invocation of a document-side function.
///
/// The [`Display`](fmt::Display) implementation renders the script source,
/// with every argument escaped by
/// [`string_literal`](crate::script::string_literal).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptCall {
    Load(String),
    ZoomTo(String, ModelId),
    Select(String, ModelId),
    UnselectAll,
    SetTooltipHtml(ModelId, String),
}

impl ScriptCall {
    /// Returns the script source for this call.
    pub fn to_script(&self) -> String {
        self.to_string()
    }

    fn function(&self) -> (bool, &'static str) {
        match self {
            Self::Load(_) => (false, "load"),
            Self::ZoomTo(..) => (true, "zoomTo"),
            Self::Select(..) => (true, "select"),
            Self::UnselectAll => (true, "unselectAll"),
            Self::SetTooltipHtml(..) => (true, "setTooltipHTML"),
        }
    }

    fn arguments(&self) -> Vec<&str> {
        match self {
            Self::Load(url) => vec![url.as_str()],
            Self::ZoomTo(kind, name) | Self::Select(kind, name) => {
                vec![kind.as_str(), name.as_str()]
            }
            Self::UnselectAll => Vec::new(),
            Self::SetTooltipHtml(name, html) => vec![name.as_str(), html.as_str()],
        }
    }
}

impl fmt::Display for ScriptCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (on_document, function) = self.function();
        if on_document {
            write!(f, "{DOCUMENT_OBJECT}.")?;
        }
        write!(f, "{function}(")?;
        for (idx, arg) in self.arguments().into_iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write_string_literal(f, arg)?;
        }
        f.write_str(")")
    }
}
