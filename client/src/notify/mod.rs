//! # Notifications
//!
//! Toasts, titled notifications and a blocking loading overlay.
//!
//! Rendering is pluggable through [`ToastSink`]. The default
//! [`TracingSink`] only writes to the log, which suits a headless client.
//! [`RecordingSink`] also keeps a bounded history for inspection.

mod loading;
mod sink;

pub use loading::{LoadingHandle, LoadingOverlay, DEFAULT_LOADING_TEXT, LOADING_BACKGROUND};
pub use sink::{RecordingSink, ToastSink, TracingSink, DEFAULT_TOAST_HISTORY};

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;

use crate::core::error::ClientError;

/// How long toasts and notifications stay on screen.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MessageLevel {
    Success,
    Warning,
    Error,
    #[default]
    Info,
}

impl MessageLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageLevel::Success => "success",
            MessageLevel::Warning => "warning",
            MessageLevel::Error => "error",
            MessageLevel::Info => "info",
        }
    }
}

/// A toast message, or a notification when it has a title.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: String,
    pub title: Option<String>,
    pub message: String,
    pub level: MessageLevel,
    pub duration: Duration,
    pub created_at: DateTime<Utc>,
}

impl Toast {
    fn new(title: Option<String>, message: String, level: MessageLevel) -> Self {
        Self {
            id: lib_utils::generate_id("toast_"),
            title,
            message,
            level,
            duration: DEFAULT_TOAST_DURATION,
            created_at: Utc::now(),
        }
    }
}

/// Front door for everything user-visible that is not a return value.
#[derive(Clone)]
pub struct NotificationCenter {
    sink: Arc<dyn ToastSink>,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(Arc::new(TracingSink))
    }
}

impl NotificationCenter {
    pub fn new(sink: Arc<dyn ToastSink>) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &Arc<dyn ToastSink> {
        &self.sink
    }

    pub fn show_message(&self, message: impl Into<String>, level: MessageLevel) -> Toast {
        let toast = Toast::new(None, message.into(), level);
        self.sink.show(&toast);
        toast
    }

    pub fn show_notification(&self, title: impl Into<String>, message: impl Into<String>, level: MessageLevel) -> Toast {
        let toast = Toast::new(Some(title.into()), message.into(), level);
        self.sink.show(&toast);
        toast
    }

    /// Open the full-screen loading overlay. `None` shows the default text.
    pub fn show_loading(&self, text: Option<&str>) -> LoadingHandle {
        LoadingHandle::open(self.sink.clone(), text.unwrap_or(DEFAULT_LOADING_TEXT))
    }

    /// Close an overlay. Closing an already closed overlay does nothing.
    pub fn hide_loading(&self, handle: &LoadingHandle) {
        handle.close();
    }

    pub fn success(&self, message: impl Into<String>) -> Toast {
        self.show_message(message, MessageLevel::Success)
    }

    pub fn error(&self, message: impl Into<String>) -> Toast {
        self.show_message(message, MessageLevel::Error)
    }

    pub fn warning(&self, message: impl Into<String>) -> Toast {
        self.show_message(message, MessageLevel::Warning)
    }

    pub fn info(&self, message: impl Into<String>) -> Toast {
        self.show_message(message, MessageLevel::Info)
    }

    /// Error toast with the user-facing text for `err`.
    pub fn client_error(&self, err: &ClientError) -> Toast {
        self.error(err.user_message())
    }
}
