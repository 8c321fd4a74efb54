//! HTTP plumbing shared by every API wrapper.
//!
//! - [`client`]: the configured `reqwest` client, bearer auth and cancellation
//! - [`retry`]: exponential backoff for idempotent requests
//! - [`batch`]: bounded-concurrency fan-out
//! - [`log_format`]: request/response/error log lines
//! - [`network`] and [`progress`]: connectivity probes and transfer progress

pub mod batch;
pub mod client;
pub mod log_format;
pub mod network;
pub mod progress;
pub mod retry;

pub use batch::{batch_requests, DEFAULT_BATCH_CONCURRENCY};
pub use client::{create_cancel_handle, create_http_client, ApiRequest, ApiResponse, CancelHandle, HttpClient, TokenSlot};
pub use log_format::{format_error_log, format_request_log, format_response_log, has_response_error, is_response_successful};
pub use network::{DEFAULT_CONNECTIVITY_PROBE, DEFAULT_IP_SERVICE};
pub use progress::{progress_percent, upload_progress_monitor, ProgressTracker};
pub use retry::{with_retry, RetryConfig};
