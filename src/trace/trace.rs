use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::ui::panel::PanelName;

/// One line of the JSONL action trace.
#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub step: u64,

    pub action: String,
    pub path: Option<String>,

    pub outcome: String,
    pub active_panel: Option<String>,

    /// SHA-1 of the render target markup after the action
    pub fingerprint: Option<String>,
}

impl TraceEvent {
    pub fn now(step: u64, action: impl ToString) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            step,
            action: action.to_string(),
            path: None,
            outcome: "ok".to_string(),
            active_panel: None,
            fingerprint: None,
        }
    }

    pub fn with_path(mut self, path: &str) -> Self {
        self.path = Some(path.to_string());
        self
    }

    pub fn with_outcome(mut self, outcome: impl ToString) -> Self {
        self.outcome = outcome.to_string();
        self
    }

    pub fn with_panel(mut self, panel: Option<PanelName>) -> Self {
        self.active_panel = panel.map(|p| p.to_string());
        self
    }

    pub fn with_fingerprint(mut self, fingerprint: String) -> Self {
        self.fingerprint = Some(fingerprint);
        self
    }
}

pub fn text_fingerprint(text: &str) -> String {
    use sha1::{Digest, Sha1};

    let mut hasher = Sha1::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}
