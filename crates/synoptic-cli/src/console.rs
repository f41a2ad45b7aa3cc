//! Headless rendering backend and JSON-lines session driver.
//!
//! [`ConsoleBackend`] stands in for a real web view: instead of rendering, each
//! view writes what it is asked to do (bridge exposure, navigation, script
//! evaluation, resizes) as one line of text. [`run_session`] reads
//! newline-delimited JSON from an input, feeds document messages and host
//! requests into a [`SynopticSurface`], and keeps going past per-message
//! failures.
//!
//! # Input format
//!
//! Every line is one JSON object with a `type` field. An optional `view`
//! field selects the view a document message belongs to (default: newest).
//!
//! ```json
//! {"type": "loadFinished", "ok": true}
//! {"type": "call", "method": "notifySubscriptionChange", "args": ["a/b/c,d/e/f"]}
//! {"type": "console", "message": "hello", "line": 3, "source": "local.html"}
//! {"type": "zoomTo", "kind": "device", "name": "a/b/c"}
//! {"type": "select", "kind": "device", "names": ["a/b/c"], "replace": false}
//! {"type": "setUrl", "url": "file:///srv/other.svg"}
//! {"type": "resize", "width": 800, "height": 600}
//! ```

use std::{
    cell::RefCell,
    collections::HashMap,
    io::{BufRead, Write},
    path::Path,
    rc::Rc,
};

use log::{debug, info, warn};
use serde::Deserialize;

use synoptic::{
    DocumentView, Handlers, RenderBackend, SynopticError, SynopticSurface, ViewId,
    config::{AppConfig, ViewSettings},
    identifier::ModelId,
    message::DocumentMessage,
    visible_set::VisibleSet,
};

/// Output shared by all console views.
pub type SharedOutput<W> = Rc<RefCell<W>>;

/// A view that writes its operations to a shared output.
#[derive(Debug)]
pub struct ConsoleView<W> {
    index: usize,
    output: SharedOutput<W>,
}

impl<W: Write> ConsoleView<W> {
    fn emit(&self, op: &str, detail: &str) -> Result<(), SynopticError> {
        let mut output = self.output.borrow_mut();
        writeln!(output, "{op}[{}] {detail}", self.index)?;
        output.flush()?;
        Ok(())
    }
}

impl<W: Write> DocumentView for ConsoleView<W> {
    fn expose_bridge(&mut self, name: &str) -> Result<(), SynopticError> {
        self.emit("bridge", name)
    }

    fn navigate(&mut self, page: &Path) -> Result<(), SynopticError> {
        self.emit("navigate", &page.display().to_string())
    }

    fn evaluate(&mut self, script: &str) -> Result<(), SynopticError> {
        self.emit("eval", script)
    }

    fn resize(&mut self, width: u32, height: u32) {
        if let Err(err) = self.emit("resize", &format!("{width}x{height}")) {
            warn!(err:%; "Failed to report resize");
        }
    }
}

/// Backend creating [`ConsoleView`]s over one shared output.
#[derive(Debug)]
pub struct ConsoleBackend<W> {
    output: SharedOutput<W>,
    created: usize,
}

impl<W> ConsoleBackend<W> {
    pub fn new(output: SharedOutput<W>) -> Self {
        Self { output, created: 0 }
    }
}

impl<W: Write> RenderBackend for ConsoleBackend<W> {
    type View = ConsoleView<W>;

    fn create_view(&mut self, settings: &ViewSettings) -> Result<Self::View, SynopticError> {
        let view = ConsoleView {
            index: self.created,
            output: Rc::clone(&self.output),
        };
        self.created += 1;

        view.emit(
            "create",
            &format!(
                "tiled_backing_store={} text_antialiasing={} context_menu={:?}",
                settings.tiled_backing_store(),
                settings.text_antialiasing(),
                settings.context_menu(),
            ),
        )?;
        Ok(view)
    }
}

/// Requests a console user can make on behalf of the host.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum HostRequest {
    ZoomTo {
        kind: String,
        name: String,
    },
    Select {
        kind: String,
        names: Vec<String>,
        #[serde(default = "default_replace")]
        replace: bool,
    },
    SetUrl {
        url: String,
    },
    Resize {
        width: u32,
        height: u32,
    },
}

fn default_replace() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
enum Input {
    Document(DocumentMessage),
    Host(HostRequest),
}

/// Outcome of a finished session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Lines that were handled successfully.
    pub handled: usize,
    /// Lines that were malformed or whose handling failed.
    pub failed: usize,
}

/// Hooks used by the console host.
///
/// Clicks keep the default selection behaviour. Visible set changes are
/// logged per view as subscribe/unsubscribe deltas. Right clicks zoom to the
/// item and tooltips show the item name.
pub fn console_handlers() -> Handlers {
    let mut subscribed: HashMap<ViewId, VisibleSet> = HashMap::new();

    Handlers::new()
        .with_visible_set_changed(move |_, view, set| {
            let previous = subscribed.entry(view).or_default();
            let diff = set.diff(previous);
            if !diff.is_empty() {
                info!(
                    view:% = view,
                    subscribe:? = diff.added,
                    unsubscribe:? = diff.removed;
                    "Subscriptions changed"
                );
            }
            *previous = set.clone();
            Ok(())
        })
        .with_right_click(|commands, kind, name| {
            info!(kind, name = name.as_str(); "Right click");
            commands.zoom_to(kind, name)
        })
        .with_tooltip_request(|commands, set| {
            for name in set {
                commands.set_tooltip_content(name, &format!("<b>{name}</b>"))?;
            }
            Ok(())
        })
}

/// Runs a session reading JSON lines from `input` and writing view output to
/// `output`.
///
/// Malformed lines and failures of individual messages are logged and
/// counted; only I/O errors end the session early.
///
/// # Errors
///
/// Returns `SynopticError::Io` if reading the input or writing the output
/// fails, or any error from creating the initial view.
pub fn run_session<R, W>(
    config: AppConfig,
    url: Option<&str>,
    input: R,
    output: SharedOutput<W>,
) -> Result<SessionSummary, SynopticError>
where
    R: BufRead,
    W: Write + 'static,
{
    let backend = ConsoleBackend::new(output);
    let mut surface = SynopticSurface::new(backend, config, console_handlers(), url)?;
    let mut summary = SessionSummary::default();

    for (idx, line) in input.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }

        match handle_line(&mut surface, &line) {
            Ok(()) => summary.handled += 1,
            Err(SynopticError::Io(err)) => return Err(SynopticError::Io(err)),
            Err(err) => {
                warn!(line = line_no, err:%; "Message failed");
                summary.failed += 1;
            }
        }
    }

    info!(handled = summary.handled, failed = summary.failed; "Session finished");
    Ok(summary)
}

fn handle_line<W: Write>(
    surface: &mut SynopticSurface<ConsoleBackend<W>>,
    line: &str,
) -> Result<(), SynopticError> {
    let value: serde_json::Value = serde_json::from_str(line)
        .map_err(|err| SynopticError::View(format!("invalid JSON: {err}")))?;

    let view = match value.get("view") {
        Some(view) => {
            let index = view
                .as_u64()
                .and_then(|index| usize::try_from(index).ok())
                .ok_or_else(|| SynopticError::View(format!("invalid view: {view}")))?;
            Some(ViewId::new(index))
        }
        None => None,
    };

    let input: Input = serde_json::from_value(value)
        .map_err(|err| SynopticError::View(format!("unrecognised message: {err}")))?;
    debug!(input:?; "Handling input");

    match input {
        Input::Document(message) => {
            let view = view
                .or_else(|| surface.current_view())
                .ok_or(SynopticError::NoView)?;
            surface.handle_message(view, message)
        }
        Input::Host(HostRequest::ZoomTo { kind, name }) => surface.zoom_to(&kind, &name),
        Input::Host(HostRequest::Select {
            kind,
            names,
            replace,
        }) => surface.select(&kind, names.into_iter().map(ModelId::from), replace),
        Input::Host(HostRequest::SetUrl { url }) => surface.set_url(&url).map(|_| ()),
        Input::Host(HostRequest::Resize { width, height }) => {
            surface.resize(width, height);
            Ok(())
        }
    }
}
