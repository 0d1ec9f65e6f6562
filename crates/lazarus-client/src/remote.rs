use crate::{
    ClientError, ResurrectRequest, ResurrectResponse, StatusResponse, StopResponse,
    WatchdogStatus, ZonesResponse,
};
use std::time::Duration;
use tracing::debug;

/// Health probes must answer within this window or the backend is treated
/// as unreachable.
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(3);

/// Thin typed wrapper over the control-plane HTTP API.
#[derive(Debug, Clone)]
pub struct RemoteControlPlane {
    client: reqwest::Client,
    base: String,
}

impl RemoteControlPlane {
    /// Build a client for `endpoint` (e.g. `http://127.0.0.1:8080`).
    ///
    /// # Errors
    /// Returns `ClientError::InvalidEndpoint` if the HTTP client cannot be
    /// constructed.
    pub fn new(endpoint: &str) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(HEALTH_TIMEOUT)
            .build()
            .map_err(|e| ClientError::InvalidEndpoint(endpoint.to_string(), e.to_string()))?;

        Ok(Self {
            client,
            base: endpoint.trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.base
    }

    /// `GET /api/status`.
    ///
    /// # Errors
    /// Returns `ClientError::Http` on network failure, timeout, or a
    /// non-success status code.
    pub async fn status(&self) -> Result<StatusResponse, ClientError> {
        let url = format!("{}/api/status", self.base);
        debug!(%url, "Probing backend health");
        let response = self.client.get(&url).send().await?.error_for_status()?;
        Ok(response.json().await?)
    }

    /// `GET /api/zones`, the spot price arbitrage scan.
    ///
    /// # Errors
    /// Returns `ClientError::Http` on network or status failure.
    pub async fn zones(&self) -> Result<ZonesResponse, ClientError> {
        let url = format!("{}/api/zones", self.base);
        let response = self.client.get(&url).send().await?.error_for_status()?;
        Ok(response.json().await?)
    }

    /// `POST /api/resurrect`, asking the backend to bring an instance up.
    ///
    /// # Errors
    /// Returns `ClientError::Http` on network or status failure.
    pub async fn resurrect(&self, profile: &str) -> Result<ResurrectResponse, ClientError> {
        let url = format!("{}/api/resurrect", self.base);
        let body = ResurrectRequest {
            profile: profile.to_string(),
        };
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    /// `GET /api/watchdog`.
    ///
    /// # Errors
    /// Returns `ClientError::Http` on network or status failure.
    pub async fn watchdog(&self) -> Result<WatchdogStatus, ClientError> {
        let url = format!("{}/api/watchdog", self.base);
        let response = self.client.get(&url).send().await?.error_for_status()?;
        Ok(response.json().await?)
    }

    /// `POST /api/stop`.
    ///
    /// # Errors
    /// Returns `ClientError::Http` on network or status failure.
    pub async fn stop(&self) -> Result<StopResponse, ClientError> {
        let url = format!("{}/api/stop", self.base);
        let response = self.client.post(&url).send().await?.error_for_status()?;
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_stripped() {
        let remote = RemoteControlPlane::new("http://localhost:8080/").unwrap();
        assert_eq!(remote.endpoint(), "http://localhost:8080");
    }
}
