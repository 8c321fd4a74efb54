//! Connectivity probes.

use serde::Deserialize;

use super::client::HttpClient;

pub const DEFAULT_CONNECTIVITY_PROBE: &str = "https://www.google.com";
pub const DEFAULT_IP_SERVICE: &str = "https://api.ipify.org?format=json";

#[derive(Debug, Deserialize)]
struct IpResponse {
    ip: String,
}

impl HttpClient {
    /// HEAD `probe_url`; any response at all means we are online.
    pub async fn check_network_connection(&self, probe_url: &str) -> bool {
        match self.client.head(probe_url).send().await {
            Ok(response) => {
                tracing::debug!(status = response.status().as_u16(), url = %probe_url, "Network probe answered");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, url = %probe_url, "Network probe failed");
                false
            }
        }
    }

    /// Public IP as reported by `service_url` (`{"ip": "..."}`).
    pub async fn get_ip_address(&self, service_url: &str) -> Option<String> {
        let result = async {
            self.client
                .get(service_url)
                .send()
                .await?
                .error_for_status()?
                .json::<IpResponse>()
                .await
        }
        .await;

        match result {
            Ok(body) => Some(body.ip),
            Err(e) => {
                tracing::error!(error = %e, url = %service_url, "Failed to get IP address");
                None
            }
        }
    }
}
