use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::ToastSink;

pub const DEFAULT_LOADING_TEXT: &str = "加载中...";
pub const LOADING_BACKGROUND: &str = "rgba(0, 0, 0, 0.7)";

/// What the sink is asked to draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadingOverlay {
    pub id: String,
    pub text: String,
    /// Blocks interaction with everything underneath
    pub lock: bool,
    pub background: String,
}

/// An open loading overlay. Closed on [`LoadingHandle::close`] or drop,
/// whichever comes first.
pub struct LoadingHandle {
    id: String,
    sink: Arc<dyn ToastSink>,
    closed: AtomicBool,
}

impl LoadingHandle {
    pub(super) fn open(sink: Arc<dyn ToastSink>, text: &str) -> Self {
        let overlay = LoadingOverlay {
            id: lib_utils::generate_id("loading_"),
            text: text.to_string(),
            lock: true,
            background: LOADING_BACKGROUND.to_string(),
        };
        sink.open_loading(&overlay);
        Self {
            id: overlay.id,
            sink,
            closed: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.sink.close_loading(&self.id);
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl Drop for LoadingHandle {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for LoadingHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadingHandle")
            .field("id", &self.id)
            .field("closed", &self.is_closed())
            .finish()
    }
}
