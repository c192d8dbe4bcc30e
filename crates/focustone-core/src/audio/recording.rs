use std::sync::Mutex;

use super::{ToneRequest, ToneSink};

/// Keeps every request in memory instead of playing it.
#[derive(Debug, Default)]
pub struct RecordingSink {
    requests: Mutex<Vec<ToneRequest>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything emitted so far, in emission order.
    pub fn requests(&self) -> Vec<ToneRequest> {
        self.requests
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Drain the recorded requests.
    pub fn take(&self) -> Vec<ToneRequest> {
        self.requests
            .lock()
            .map(|mut guard| std::mem::take(&mut *guard))
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.requests.lock().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ToneSink for RecordingSink {
    fn emit(&self, request: ToneRequest) {
        match self.requests.lock() {
            Ok(mut guard) => guard.push(request),
            Err(e) => tracing::warn!("recording sink poisoned: {e}"),
        }
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}
