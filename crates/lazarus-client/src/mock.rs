use crate::{
    ResurrectResponse, StatusResponse, StopResponse, WatchdogStatus, ZoneQuote, ZonesResponse,
};
use rand::Rng;

/// Reference spot market used when no backend is reachable. Prices are
/// $/hour; the scan always lands on the cheapest row.
const SPOT_MARKET: &[(&str, f64)] = &[
    ("us-east1-b", 0.0094),
    ("europe-west1-b", 0.0110),
    ("asia-east1-a", 0.0125),
    ("us-central1-a", 0.0081),
];

const IDLE_COUNTDOWN_SECS: u64 = 60;

/// In-process stand-in for the control plane. Produces the same shapes the
/// HTTP API does, so the rest of the program never branches on which one it
/// is talking to.
#[derive(Debug, Default, Clone)]
pub struct MockControlPlane;

impl MockControlPlane {
    /// Always healthy.
    #[allow(clippy::unused_self)]
    #[must_use]
    pub fn status(&self) -> StatusResponse {
        StatusResponse {
            status: "online (simulated)".into(),
            version: None,
        }
    }

    /// Run the arbitrage scan over the reference market table.
    #[allow(clippy::unused_self)]
    #[must_use]
    pub fn zones(&self) -> ZonesResponse {
        let cheapest = SPOT_MARKET
            .iter()
            .map(|(_, price)| *price)
            .fold(f64::INFINITY, f64::min);

        ZonesResponse {
            zones: SPOT_MARKET
                .iter()
                .map(|(zone, price)| ZoneQuote {
                    zone: (*zone).to_string(),
                    spot_price: *price,
                    optimal: (*price - cheapest).abs() < f64::EPSILON,
                })
                .collect(),
        }
    }

    /// Pretend to start an instance in the optimal zone.
    #[must_use]
    pub fn resurrect(&self, profile: &str) -> ResurrectResponse {
        let zone = self
            .zones()
            .optimal()
            .map_or_else(|| "us-central1-a".to_string(), |q| q.zone.clone());

        let instance = petname::petname(2, "-")
            .map_or_else(|| format!("{profile}-0"), |name| format!("{profile}-{name}"));

        ResurrectResponse {
            instance,
            zone,
            message: format!("Resurrection dispatched for '{profile}'"),
        }
    }

    /// Invent plausible idle-watchdog readings. Mostly idle, occasionally a
    /// user or a tunnel shows up.
    #[allow(clippy::unused_self)]
    #[must_use]
    pub fn watchdog(&self) -> WatchdogStatus {
        let mut rng = rand::rng();
        let users: [u32; 4] = [0, 0, 0, 1];
        let tunnels: [u32; 4] = [0, 0, 1, 2];

        WatchdogStatus {
            active_users: users[rng.random_range(0..users.len())],
            ssh_tunnels: tunnels[rng.random_range(0..tunnels.len())],
            cpu_load: rng.random_range(0.5..15.0),
            idle_countdown_secs: IDLE_COUNTDOWN_SECS,
        }
    }

    #[allow(clippy::unused_self)]
    #[must_use]
    pub fn stop(&self) -> StopResponse {
        StopResponse {
            message: "Shutdown acknowledged".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_marks_cheapest_zone_optimal() {
        let mock = MockControlPlane;
        let scan = mock.zones();
        assert_eq!(scan.zones.len(), 4);

        let optimal: Vec<_> = scan.zones.iter().filter(|z| z.optimal).collect();
        assert_eq!(optimal.len(), 1);
        assert_eq!(optimal[0].zone, "us-central1-a");
        assert_eq!(scan.optimal().unwrap().zone, "us-central1-a");
    }

    #[test]
    fn test_resurrect_lands_in_optimal_zone() {
        let mock = MockControlPlane;
        let response = mock.resurrect("payments-api");
        assert_eq!(response.zone, "us-central1-a");
        assert!(response.instance.starts_with("payments-api-"));
    }

    #[test]
    fn test_watchdog_readings_in_range() {
        let mock = MockControlPlane;
        for _ in 0..100 {
            let reading = mock.watchdog();
            assert!(reading.active_users <= 1);
            assert!(reading.ssh_tunnels <= 2);
            assert!(reading.cpu_load >= 0.5 && reading.cpu_load < 15.0);
            assert_eq!(reading.idle_countdown_secs, 60);
        }
    }
}
