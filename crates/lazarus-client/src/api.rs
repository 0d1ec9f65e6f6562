use serde::{Deserialize, Serialize};

/// Payload of `GET /api/status`. Anything that deserializes counts as a
/// healthy backend; the `status` string is shown verbatim in the footer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    #[serde(default)]
    pub version: Option<String>,
}

/// One zone row from the arbitrage scan, `GET /api/zones`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneQuote {
    pub zone: String,
    pub spot_price: f64,
    #[serde(default)]
    pub optimal: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZonesResponse {
    pub zones: Vec<ZoneQuote>,
}

impl ZonesResponse {
    /// The cheapest zone in the scan, if any.
    #[must_use]
    pub fn optimal(&self) -> Option<&ZoneQuote> {
        self.zones
            .iter()
            .min_by(|a, b| a.spot_price.total_cmp(&b.spot_price))
    }
}

/// Body of `POST /api/resurrect`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResurrectRequest {
    pub profile: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResurrectResponse {
    pub instance: String,
    pub zone: String,
    pub message: String,
}

/// Payload of `GET /api/watchdog`: the idle-shutdown signals the backend
/// watches before reclaiming an instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchdogStatus {
    pub active_users: u32,
    pub ssh_tunnels: u32,
    pub cpu_load: f64,
    pub idle_countdown_secs: u64,
}

impl WatchdogStatus {
    /// True when nothing holds the instance awake.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.active_users == 0 && self.ssh_tunnels == 0 && self.cpu_load < 10.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optimal_zone_is_cheapest() {
        let response = ZonesResponse {
            zones: vec![
                ZoneQuote {
                    zone: "us-east1-b".into(),
                    spot_price: 0.0094,
                    optimal: false,
                },
                ZoneQuote {
                    zone: "us-central1-a".into(),
                    spot_price: 0.0081,
                    optimal: true,
                },
            ],
        };
        assert_eq!(response.optimal().unwrap().zone, "us-central1-a");
    }

    #[test]
    fn test_watchdog_idle() {
        let busy = WatchdogStatus {
            active_users: 1,
            ssh_tunnels: 0,
            cpu_load: 2.0,
            idle_countdown_secs: 60,
        };
        assert!(!busy.is_idle());

        let idle = WatchdogStatus {
            active_users: 0,
            ssh_tunnels: 0,
            cpu_load: 1.5,
            idle_countdown_secs: 60,
        };
        assert!(idle.is_idle());
    }

    #[test]
    fn test_status_response_tolerates_missing_version() {
        let parsed: StatusResponse = serde_json::from_str(r#"{"status":"online"}"#).unwrap();
        assert_eq!(parsed.status, "online");
        assert!(parsed.version.is_none());
    }
}
