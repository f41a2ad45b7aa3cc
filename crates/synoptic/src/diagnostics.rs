//! Sink for console output of document-side script.

use log::{Level, log};

use synoptic_core::message::{ConsoleLevel, ConsoleMessage};

use crate::surface::ViewId;

/// Log target used by [`LogSink`].
pub const CONSOLE_TARGET: &str = "synoptic::console";

/// Receives console messages from hosted documents.
///
/// Implementations must not fail or block.
pub trait DiagnosticsSink {
    fn console_message(&mut self, view: ViewId, message: &ConsoleMessage);
}

/// Forwards console messages to the `log` facade.
///
/// Plain messages are logged at `debug` since documents tend to be chatty;
/// warnings and errors keep their severity.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticsSink for LogSink {
    fn console_message(&mut self, view: ViewId, message: &ConsoleMessage) {
        let level = match message.level {
            ConsoleLevel::Log => Level::Debug,
            ConsoleLevel::Warning => Level::Warn,
            ConsoleLevel::Error => Level::Error,
        };
        log!(
            target: CONSOLE_TARGET,
            level,
            view:% = view,
            source = message.source.as_str(),
            line = message.line;
            "{}",
            message.message
        );
    }
}

impl<F> DiagnosticsSink for F
where
    F: FnMut(ViewId, &ConsoleMessage),
{
    fn console_message(&mut self, view: ViewId, message: &ConsoleMessage) {
        self(view, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_sink() {
        let mut seen = Vec::new();
        {
            let mut sink = |view: ViewId, message: &ConsoleMessage| {
                seen.push(format!("{view} {message}"));
            };
            sink.console_message(ViewId::new(2), &ConsoleMessage::new("hi", 4, "main.js"));
        }
        assert_eq!(seen, vec!["2 main.js:4: hi".to_string()]);
    }

    #[test]
    fn test_log_sink_never_panics() {
        let mut sink = LogSink;
        sink.console_message(
            ViewId::new(0),
            &ConsoleMessage::new("", 0, "").with_level(ConsoleLevel::Error),
        );
    }
}
