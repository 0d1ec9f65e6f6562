use crate::{
    ClientError, MockControlPlane, RemoteControlPlane, ResurrectResponse, StatusResponse,
    StopResponse, WatchdogStatus, ZonesResponse,
};
use std::time::Duration;
use tracing::{info, warn};

/// How often the dashboard re-probes a remote backend while running.
pub const HEALTH_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// The one control plane the dashboard talks to: either a live HTTP backend
/// or the in-process mock. Chosen once at startup with a health probe;
/// callers never branch on which variant they hold.
#[derive(Debug, Clone)]
pub enum ControlPlane {
    Remote(RemoteControlPlane),
    Mock(MockControlPlane),
}

impl ControlPlane {
    /// Probe `endpoint` and pick a backend. No endpoint, or an endpoint
    /// that fails the probe, means the mock.
    pub async fn select(endpoint: Option<&str>) -> Self {
        let Some(endpoint) = endpoint else {
            info!("No endpoint configured, using simulated control plane");
            return Self::Mock(MockControlPlane);
        };

        let remote = match RemoteControlPlane::new(endpoint) {
            Ok(remote) => remote,
            Err(e) => {
                warn!("Cannot build client for '{endpoint}': {e}, falling back to simulation");
                return Self::Mock(MockControlPlane);
            }
        };

        match remote.status().await {
            Ok(status) => {
                info!("Backend at {endpoint} is healthy: {}", status.status);
                Self::Remote(remote)
            }
            Err(e) => {
                warn!("Backend at {endpoint} failed health probe: {e}, falling back to simulation");
                Self::Mock(MockControlPlane)
            }
        }
    }

    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    /// Human-readable description of the backend for the footer.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Remote(remote) => remote.endpoint().to_string(),
            Self::Mock(_) => "simulation".to_string(),
        }
    }

    /// # Errors
    /// Returns `ClientError::Http` when a remote backend fails; the mock
    /// never fails.
    pub async fn status(&self) -> Result<StatusResponse, ClientError> {
        match self {
            Self::Remote(remote) => remote.status().await,
            Self::Mock(mock) => Ok(mock.status()),
        }
    }

    /// # Errors
    /// Returns `ClientError::Http` when a remote backend fails.
    pub async fn zones(&self) -> Result<ZonesResponse, ClientError> {
        match self {
            Self::Remote(remote) => remote.zones().await,
            Self::Mock(mock) => Ok(mock.zones()),
        }
    }

    /// # Errors
    /// Returns `ClientError::Http` when a remote backend fails.
    pub async fn resurrect(&self, profile: &str) -> Result<ResurrectResponse, ClientError> {
        match self {
            Self::Remote(remote) => remote.resurrect(profile).await,
            Self::Mock(mock) => Ok(mock.resurrect(profile)),
        }
    }

    /// # Errors
    /// Returns `ClientError::Http` when a remote backend fails.
    pub async fn watchdog(&self) -> Result<WatchdogStatus, ClientError> {
        match self {
            Self::Remote(remote) => remote.watchdog().await,
            Self::Mock(mock) => Ok(mock.watchdog()),
        }
    }

    /// # Errors
    /// Returns `ClientError::Http` when a remote backend fails.
    pub async fn stop(&self) -> Result<StopResponse, ClientError> {
        match self {
            Self::Remote(remote) => remote.stop().await,
            Self::Mock(mock) => Ok(mock.stop()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_endpoint_selects_mock() {
        let plane = ControlPlane::select(None).await;
        assert!(!plane.is_remote());
        assert_eq!(plane.describe(), "simulation");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_falls_back_to_mock() {
        // Reserved TEST-NET-1 address, nothing listens there.
        let plane = ControlPlane::select(Some("http://192.0.2.1:1")).await;
        assert!(!plane.is_remote());
    }

    #[tokio::test]
    async fn test_mock_operations_never_fail() {
        let plane = ControlPlane::select(None).await;
        assert!(plane.status().await.is_ok());
        assert!(plane.zones().await.is_ok());
        assert!(plane.resurrect("payments-api").await.is_ok());
        assert!(plane.watchdog().await.is_ok());
        assert!(plane.stop().await.is_ok());
    }
}
