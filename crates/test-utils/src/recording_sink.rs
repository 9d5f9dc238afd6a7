use std::sync::Mutex;

use coco::sink::Sink;
use coco::types::Operation;
use tokio::sync::mpsc;

/// Everything a runner reported, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Output { output: String, exit_code: i32 },
    Log(String),
    Operation(Operation),
}

/// A sink that:
/// - keeps a full history of calls
/// - streams `show_output` calls over a channel so tests can await runs.
pub struct RecordingSink {
    history: Mutex<Vec<SinkEvent>>,
    outputs_tx: mpsc::UnboundedSender<(String, i32)>,
}

impl RecordingSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(String, i32)>) {
        let (outputs_tx, outputs_rx) = mpsc::unbounded_channel();
        let sink = Self {
            history: Mutex::new(Vec::new()),
            outputs_tx,
        };
        (sink, outputs_rx)
    }

    pub fn history(&self) -> Vec<SinkEvent> {
        self.history.lock().unwrap().clone()
    }

    pub fn logs(&self) -> Vec<String> {
        self.history()
            .into_iter()
            .filter_map(|e| match e {
                SinkEvent::Log(line) => Some(line),
                _ => None,
            })
            .collect()
    }

    pub fn output_count(&self) -> usize {
        self.history()
            .iter()
            .filter(|e| matches!(e, SinkEvent::Output { .. }))
            .count()
    }

    fn record(&self, event: SinkEvent) {
        self.history.lock().unwrap().push(event);
    }
}

impl Sink for RecordingSink {
    fn show_output(&self, output: &str, exit_code: i32) {
        self.record(SinkEvent::Output {
            output: output.to_string(),
            exit_code,
        });
        let _ = self.outputs_tx.send((output.to_string(), exit_code));
    }

    fn log(&self, line: &str) {
        self.record(SinkEvent::Log(line.to_string()));
    }

    fn set_operation(&self, op: Operation) {
        self.record(SinkEvent::Operation(op));
    }
}
