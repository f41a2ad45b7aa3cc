//! Wire types exchanged with a rendering engine.
//!
//! A rendering engine that cannot call into the host directly can report
//! everything that happens inside a hosted document as a [`DocumentMessage`].
//! Messages are internally tagged by `type` and use camelCase field names:
//!
//! ```json
//! {"type": "loadFinished", "ok": true}
//! {"type": "call", "method": "notifySubscriptionChange", "args": ["a,b"]}
//! {"type": "console", "message": "boom", "line": 12, "source": "synoptic.js", "level": "error"}
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Something the rendering engine reports about a hosted document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DocumentMessage {
    /// The host page finished loading.
    LoadFinished { ok: bool },
    /// Document-side script invoked a method on the bridge object.
    Call {
        method: String,
        #[serde(default)]
        args: Vec<String>,
    },
    /// Document-side script wrote to its console.
    Console(ConsoleMessage),
}

/// Severity of a console message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsoleLevel {
    #[default]
    Log,
    Warning,
    Error,
}

impl fmt::Display for ConsoleLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Log => write!(f, "log"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A console message from document-side script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleMessage {
    pub message: String,
    #[serde(default)]
    pub line: u32,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub level: ConsoleLevel,
}

impl ConsoleMessage {
    /// Creates a plain log message.
    pub fn new(message: impl Into<String>, line: u32, source: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line,
            source: source.into(),
            level: ConsoleLevel::Log,
        }
    }

    /// Returns the message with the given severity.
    pub fn with_level(mut self, level: ConsoleLevel) -> Self {
        self.level = level;
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == ConsoleLevel::Error
    }
}

impl fmt::Display for ConsoleMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.source, self.line, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_finished_from_json() {
        let msg: DocumentMessage = serde_json::from_str(r#"{"type":"loadFinished","ok":false}"#)
            .expect("valid message");
        assert_eq!(msg, DocumentMessage::LoadFinished { ok: false });
    }

    #[test]
    fn test_call_from_json() {
        let msg: DocumentMessage = serde_json::from_str(
            r#"{"type":"call","method":"notifySelectionInteraction","args":["left","device","a/b/c"]}"#,
        )
        .expect("valid message");
        assert_eq!(
            msg,
            DocumentMessage::Call {
                method: "notifySelectionInteraction".to_string(),
                args: vec!["left".into(), "device".into(), "a/b/c".into()],
            }
        );
    }

    #[test]
    fn test_call_without_args() {
        let msg: DocumentMessage =
            serde_json::from_str(r#"{"type":"call","method":"ping"}"#).expect("valid message");
        assert!(matches!(msg, DocumentMessage::Call { args, .. } if args.is_empty()));
    }

    #[test]
    fn test_console_defaults() {
        let msg: DocumentMessage =
            serde_json::from_str(r#"{"type":"console","message":"hello"}"#).expect("valid message");
        let DocumentMessage::Console(console) = msg else {
            panic!("Expected console message");
        };
        assert_eq!(console.level, ConsoleLevel::Log);
        assert_eq!(console.line, 0);
        assert!(console.source.is_empty());
    }

    #[test]
    fn test_console_error_level() {
        let msg: DocumentMessage = serde_json::from_str(
            r#"{"type":"console","message":"x is undefined","line":3,"source":"main.js","level":"error"}"#,
        )
        .expect("valid message");
        let DocumentMessage::Console(console) = msg else {
            panic!("Expected console message");
        };
        assert!(console.is_error());
        assert_eq!(console.to_string(), "main.js:3: x is undefined");
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let result = serde_json::from_str::<DocumentMessage>(r#"{"type":"explode"}"#);
        assert!(result.is_err());
    }
}
