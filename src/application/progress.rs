// ============================================================
// PROGRESS TRACKING
// ============================================================
// Shared state the /progress endpoint polls while a generation
// run is on a blocking thread.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Progress {
    pub status: String,
    pub percentage: u8,
    pub error: Option<String>,
}

#[derive(Clone, Default)]
pub struct ProgressTracker {
    inner: Arc<Mutex<Progress>>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&self) {
        *self.inner.lock().unwrap() = Progress {
            status: "Starting".to_string(),
            percentage: 0,
            error: None,
        };
    }

    pub fn set_phase(&self, status: impl Into<String>, percentage: u8) {
        let mut progress = self.inner.lock().unwrap();
        progress.status = status.into();
        progress.percentage = percentage;
    }

    pub fn complete(&self) {
        let mut progress = self.inner.lock().unwrap();
        progress.status = "Complete".to_string();
        progress.percentage = 100;
    }

    pub fn fail(&self, message: impl Into<String>) {
        let mut progress = self.inner.lock().unwrap();
        progress.status = "Error".to_string();
        progress.percentage = 0;
        progress.error = Some(message.into());
    }

    pub fn snapshot(&self) -> Progress {
        self.inner.lock().unwrap().clone()
    }
}

/// Locale phases cover 0-90%; the master phase takes the last 10.
pub fn locale_percentage(index: usize, total_locales: usize) -> u8 {
    ((index as f64 / (total_locales + 1) as f64) * 90.0) as u8
}
