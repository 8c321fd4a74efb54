use parking_lot::Mutex;
use std::collections::VecDeque;

use super::{LoadingOverlay, MessageLevel, Toast};

/// Toasts a [`RecordingSink`] keeps before dropping the oldest.
pub const DEFAULT_TOAST_HISTORY: usize = 100;

/// Renders toasts and loading overlays.
pub trait ToastSink: Send + Sync {
    fn show(&self, toast: &Toast);
    fn open_loading(&self, overlay: &LoadingOverlay);
    fn close_loading(&self, id: &str);
}

fn log_toast(toast: &Toast) {
    let title = toast.title.as_deref().unwrap_or("");
    match toast.level {
        MessageLevel::Error => tracing::error!(id = %toast.id, title = %title, "{}", toast.message),
        MessageLevel::Warning => tracing::warn!(id = %toast.id, title = %title, "{}", toast.message),
        MessageLevel::Success | MessageLevel::Info => {
            tracing::info!(id = %toast.id, kind = toast.level.as_str(), title = %title, "{}", toast.message)
        }
    }
}

/// Writes toasts and overlays to the log and keeps nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ToastSink for TracingSink {
    fn show(&self, toast: &Toast) {
        log_toast(toast);
    }

    fn open_loading(&self, overlay: &LoadingOverlay) {
        tracing::debug!(id = %overlay.id, text = %overlay.text, "Loading overlay opened");
    }

    fn close_loading(&self, id: &str) {
        tracing::debug!(id = %id, "Loading overlay closed");
    }
}

/// Keeps the most recent toasts and the currently open overlays, and logs them.
#[derive(Debug)]
pub struct RecordingSink {
    capacity: usize,
    toasts: Mutex<VecDeque<Toast>>,
    loading: Mutex<Vec<LoadingOverlay>>,
    closed: Mutex<usize>,
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_TOAST_HISTORY)
    }
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `capacity` toasts (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            toasts: Mutex::new(VecDeque::with_capacity(capacity)),
            loading: Mutex::new(Vec::new()),
            closed: Mutex::new(0),
        }
    }

    /// Retained toasts, oldest first.
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().iter().cloned().collect()
    }

    pub fn active_loading(&self) -> Vec<LoadingOverlay> {
        self.loading.lock().clone()
    }

    pub fn closed_count(&self) -> usize {
        *self.closed.lock()
    }
}

impl ToastSink for RecordingSink {
    fn show(&self, toast: &Toast) {
        log_toast(toast);
        let mut toasts = self.toasts.lock();
        if toasts.len() == self.capacity {
            toasts.pop_front();
        }
        toasts.push_back(toast.clone());
    }

    fn open_loading(&self, overlay: &LoadingOverlay) {
        tracing::debug!(id = %overlay.id, text = %overlay.text, "Loading overlay opened");
        self.loading.lock().push(overlay.clone());
    }

    fn close_loading(&self, id: &str) {
        tracing::debug!(id = %id, "Loading overlay closed");
        self.loading.lock().retain(|overlay| overlay.id != id);
        *self.closed.lock() += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NotificationCenter;
    use std::sync::Arc;

    #[test]
    fn test_recording_sink_drops_oldest_past_capacity() {
        let sink = Arc::new(RecordingSink::with_capacity(3));
        let center = NotificationCenter::new(sink.clone());

        for i in 0..5 {
            center.info(format!("message {}", i));
        }

        let messages: Vec<_> = sink.toasts().into_iter().map(|t| t.message).collect();
        assert_eq!(messages, vec!["message 2", "message 3", "message 4"]);
    }

    #[test]
    fn test_tracing_sink_handles_overlays() {
        let center = NotificationCenter::new(Arc::new(TracingSink));
        let toast = center.warning("disk almost full");
        assert_eq!(toast.level, MessageLevel::Warning);

        let handle = center.show_loading(Some("保存中"));
        center.hide_loading(&handle);
        center.hide_loading(&handle);
    }
}
