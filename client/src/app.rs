//! # Application Wiring
//!
//! Builds the object graph once: one token slot shared by the HTTP client
//! and the session store, one API client, one notification center.

use std::future::Future;
use std::sync::Arc;

use crate::config::ClientConfig;
use crate::core::error::Result;
use crate::notify::NotificationCenter;
use crate::services::api::ApiClient;
use crate::services::http::{batch_requests, TokenSlot};
use crate::store::{FileTokenStorage, SessionStore, TokenStorage};

/// Everything a front end needs to talk to the marketplace.
#[derive(Clone)]
pub struct MarketApp {
    pub api: ApiClient,
    pub session: SessionStore,
    pub notifications: NotificationCenter,
    pub batch_concurrency: usize,
}

impl MarketApp {
    /// Wire the client from configuration, restoring the session from
    /// `config.session_file`.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let storage = Arc::new(FileTokenStorage::new(config.session_file.clone()));
        Self::with_storage(config, storage, NotificationCenter::default())
    }

    pub fn with_storage(
        config: &ClientConfig,
        storage: Arc<dyn TokenStorage>,
        notifications: NotificationCenter,
    ) -> Result<Self> {
        let token = TokenSlot::new();
        let api = ApiClient::new(config, token.clone())?;
        let session = SessionStore::new(Arc::new(api.clone()), storage, token);

        tracing::debug!(
            base_url = %config.api_base_url,
            restored_session = session.is_logged_in(),
            "Market client ready"
        );

        Ok(Self {
            api,
            session,
            notifications,
            batch_concurrency: config.batch_concurrency,
        })
    }

    /// Run request factories with the configured concurrency limit.
    pub async fn batch<T, F, Fut, I>(&self, requests: I) -> Result<Vec<T>>
    where
        I: IntoIterator<Item = F>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        batch_requests(requests, self.batch_concurrency).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryTokenStorage;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_batch_uses_configured_concurrency() {
        let config = ClientConfig {
            batch_concurrency: 2,
            ..ClientConfig::default()
        };
        let app = MarketApp::with_storage(&config, Arc::new(MemoryTokenStorage::new()), NotificationCenter::default())
            .unwrap();

        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let requests = (0..6).map(|i| {
            let in_flight = in_flight.clone();
            let peak = peak.clone();
            move || async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                Ok(i)
            }
        });

        let mut results = app.batch(requests).await.unwrap();
        results.sort();
        assert_eq!(results, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(peak.load(Ordering::SeqCst), 2);
    }
}
