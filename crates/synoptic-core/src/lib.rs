//! Synoptic Core Types and Definitions
//!
//! This crate provides the foundational types shared by the host side and the
//! document side of an embedded SVG synoptic. It includes:
//!
//! - **Identifiers**: Opaque model identifiers ([`identifier::ModelId`])
//! - **Visible sets**: Ordered identifier lists reported by the document ([`visible_set`] module)
//! - **Events**: Typed events raised by the bridge object ([`event`] module)
//! - **Commands**: Host-issued instructions and their script form ([`command`] module)
//! - **Script**: String-literal escaping for generated script text ([`script`] module)
//! - **Messages**: Wire types exchanged with a rendering engine ([`message`] module)

pub mod command;
pub mod event;
pub mod identifier;
pub mod message;
pub mod script;
pub mod visible_set;
