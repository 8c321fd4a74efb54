//! Upload and download progress reporting.

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use std::time::Instant;

use super::client::{ApiResponse, HttpClient};
use crate::core::error::{ClientError, Result};

/// Chunk size used when streaming upload bodies.
pub const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// Rounded percentage, or `None` when the total length is unknown or zero.
pub fn progress_percent(loaded: u64, total: Option<u64>) -> Option<u8> {
    match total {
        Some(total) if total > 0 => {
            let percent = (loaded as f64 * 100.0 / total as f64).round();
            Some(percent.clamp(0.0, 100.0) as u8)
        }
        _ => None,
    }
}

/// Accumulates transferred bytes and fires the callback when the
/// percentage changes.
pub struct ProgressTracker<F> {
    loaded: u64,
    total: Option<u64>,
    last: Option<u8>,
    on_progress: F,
}

impl<F: FnMut(u8)> ProgressTracker<F> {
    pub fn new(total: Option<u64>, on_progress: F) -> Self {
        Self {
            loaded: 0,
            total,
            last: None,
            on_progress,
        }
    }

    pub fn loaded(&self) -> u64 {
        self.loaded
    }

    pub fn advance(&mut self, bytes: usize) {
        self.loaded += bytes as u64;
        if let Some(percent) = progress_percent(self.loaded, self.total) {
            if self.last != Some(percent) {
                self.last = Some(percent);
                (self.on_progress)(percent);
            }
        }
    }
}

/// Wrap an upload body in a chunked stream that reports progress as
/// reqwest consumes it.
pub fn upload_progress_monitor<F>(
    data: Vec<u8>,
    chunk_size: usize,
    on_progress: F,
) -> impl Stream<Item = std::io::Result<Bytes>> + Send + 'static
where
    F: FnMut(u8) + Send + Sync + 'static,
{
    let total = data.len() as u64;
    let data = Bytes::from(data);
    let chunk_size = chunk_size.max(1);
    let chunks: Vec<Bytes> = (0..data.len())
        .step_by(chunk_size)
        .map(|start| data.slice(start..(start + chunk_size).min(data.len())))
        .collect();

    let mut tracker = ProgressTracker::new(Some(total), on_progress);
    stream::iter(chunks).map(move |chunk| {
        tracker.advance(chunk.len());
        Ok(chunk)
    })
}

impl HttpClient {
    /// GET `path` and stream the body, reporting the percentage whenever the
    /// server sent a `Content-Length`.
    pub async fn download_with_progress<F>(&self, path: &str, on_progress: F) -> Result<Vec<u8>>
    where
        F: FnMut(u8),
    {
        let url = self.url(path);
        let start = Instant::now();

        let mut builder = self.client.get(&url);
        if let Some(token) = self.token_slot().get() {
            builder = builder.bearer_auth(token);
        }
        let response = builder.send().await.map_err(ClientError::from)?;

        if !response.status().is_success() {
            let err = self
                .finish_response::<serde_json::Value>(&Method::GET, &url, response, 0, start)
                .await
                .err()
                .unwrap_or_else(|| ClientError::Decode("unexpected success body".to_string()));
            return Err(err);
        }

        let mut tracker = ProgressTracker::new(response.content_length(), on_progress);
        let mut buffer = Vec::new();
        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| ClientError::Network(format!("Download interrupted: {}", e)))?;
            tracker.advance(chunk.len());
            buffer.extend_from_slice(&chunk);
        }

        tracing::debug!(
            url = %url,
            bytes = buffer.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Download completed"
        );
        Ok(buffer)
    }

    /// Upload raw bytes with progress reporting. Uploads are never retried
    /// because the body stream is consumed.
    pub async fn upload_with_progress<T, F>(
        &self,
        method: Method,
        path: &str,
        content_type: &str,
        data: Vec<u8>,
        on_progress: F,
    ) -> Result<ApiResponse<T>>
    where
        T: DeserializeOwned,
        F: FnMut(u8) + Send + Sync + 'static,
    {
        let url = self.url(path);
        let content_type = HeaderValue::from_str(content_type)
            .map_err(|e| ClientError::Request(format!("invalid content type: {}", e)))?;
        let length = data.len();
        let body = reqwest::Body::wrap_stream(upload_progress_monitor(data, UPLOAD_CHUNK_SIZE, on_progress));

        let mut builder = self
            .client
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, content_type)
            .body(body);
        if let Some(token) = self.token_slot().get() {
            builder = builder.bearer_auth(token);
        }

        tracing::debug!(method = %method, url = %url, bytes = length, "Upload started");
        let start = Instant::now();
        let response = builder.send().await.map_err(ClientError::from)?;
        self.finish_response(&method, &url, response, 0, start).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_progress_percent() {
        assert_eq!(progress_percent(0, Some(200)), Some(0));
        assert_eq!(progress_percent(1, Some(3)), Some(33));
        assert_eq!(progress_percent(2, Some(3)), Some(67));
        assert_eq!(progress_percent(200, Some(200)), Some(100));
        assert_eq!(progress_percent(10, Some(0)), None);
        assert_eq!(progress_percent(10, None), None);
    }

    #[test]
    fn test_tracker_reports_only_changes() {
        let mut seen = Vec::new();
        {
            let mut tracker = ProgressTracker::new(Some(1000), |p| seen.push(p));
            tracker.advance(1);
            tracker.advance(1);
            tracker.advance(498);
            tracker.advance(500);
            assert_eq!(tracker.loaded(), 1000);
        }
        assert_eq!(seen, vec![0, 50, 100]);
    }

    #[tokio::test]
    async fn test_upload_monitor_chunks_and_reports() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let stream = upload_progress_monitor(vec![7u8; 10], 4, move |p| sink.lock().unwrap().push(p));

        let chunks: Vec<Bytes> = stream.map(|chunk| chunk.unwrap()).collect().await;
        assert_eq!(chunks.iter().map(Bytes::len).collect::<Vec<_>>(), vec![4, 4, 2]);
        assert_eq!(*seen.lock().unwrap(), vec![40, 80, 100]);
    }

    #[tokio::test]
    async fn test_upload_monitor_empty_body() {
        let stream = upload_progress_monitor(Vec::new(), 4, |_| {});
        let chunks: Vec<std::io::Result<Bytes>> = stream.collect().await;
        assert!(chunks.is_empty());
    }
}
