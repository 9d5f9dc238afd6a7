// src/sink.rs

//! Where run results and narration go.
//!
//! Trigger strategies only talk to a [`Sink`]; rendering is somebody else's
//! problem. [`TerminalSink`] is the production implementation used by the
//! binary: results on stdout, narration through `tracing` on stderr.

use std::io::Write;
use std::sync::Mutex;

use tracing::{debug, info};

use crate::diagnostics::DiagnosticParser;
use crate::types::Operation;

/// Receiver for run results and log narration.
///
/// A sink may be shared by several runners and called from different Tokio
/// tasks, so implementations must be safe for concurrent use.
pub trait Sink: Send + Sync {
    /// Called once per completed run.
    fn show_output(&self, output: &str, exit_code: i32);

    /// Status and error narration.
    fn log(&self, line: &str);

    /// Current operation label.
    fn set_operation(&self, _op: Operation) {}
}

/// Plain terminal rendering.
///
/// - exit code 0 prints a one-line success marker;
/// - otherwise parsed diagnostics are printed as `file:line: message`,
///   falling back to the raw output when nothing could be parsed.
#[derive(Debug)]
pub struct TerminalSink {
    parser: DiagnosticParser,
    // Serialises whole reports so concurrent runs don't interleave lines.
    out: Mutex<()>,
}

impl TerminalSink {
    pub fn new(parser: DiagnosticParser) -> Self {
        Self {
            parser,
            out: Mutex::new(()),
        }
    }

    /// Render a run result to a string.
    pub fn render(&self, output: &str, exit_code: i32) -> String {
        if exit_code == 0 {
            return "build ok (exit 0)\n".to_string();
        }

        let diagnostics = self.parser.parse(output);
        if diagnostics.is_empty() {
            let mut raw = output.to_string();
            if !raw.ends_with('\n') {
                raw.push('\n');
            }
            return format!("build failed (exit {exit_code})\n{raw}");
        }

        let mut rendered = format!(
            "build failed (exit {exit_code}): {} diagnostic(s)\n",
            diagnostics.len()
        );
        for diag in diagnostics {
            rendered.push_str(&format!(
                "{}:{}: {}\n",
                diag.file_name,
                diag.line,
                diag.message.trim()
            ));
        }
        rendered
    }
}

impl Sink for TerminalSink {
    fn show_output(&self, output: &str, exit_code: i32) {
        let rendered = self.render(output, exit_code);
        let _guard = self.out.lock().unwrap_or_else(|e| e.into_inner());
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = stdout.write_all(rendered.as_bytes()).and_then(|_| stdout.flush()) {
            debug!(error = %e, "failed to write run output to stdout");
        }
    }

    fn log(&self, line: &str) {
        info!(target: "coco::runner", "{line}");
    }

    fn set_operation(&self, op: Operation) {
        debug!(operation = %op, "operation changed");
    }
}
