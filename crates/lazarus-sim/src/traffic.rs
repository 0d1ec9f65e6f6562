use crate::ChaosState;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// How many request rows the live traffic table keeps.
pub const TRAFFIC_WINDOW: usize = 15;

/// Jitter applied around each endpoint's baseline latency.
const LATENCY_VARIANCE_MS: i64 = 10;

struct EndpointTemplate {
    method: &'static str,
    path: &'static str,
    base_latency_ms: u64,
    hits_database: bool,
}

const ENDPOINTS: &[EndpointTemplate] = &[
    EndpointTemplate {
        method: "POST",
        path: "/v1/payments/authorize",
        base_latency_ms: 48,
        hits_database: true,
    },
    EndpointTemplate {
        method: "POST",
        path: "/v1/payments/capture",
        base_latency_ms: 61,
        hits_database: true,
    },
    EndpointTemplate {
        method: "GET",
        path: "/v1/customers/lookup",
        base_latency_ms: 35,
        hits_database: true,
    },
    EndpointTemplate {
        method: "GET",
        path: "/v1/ledger/balance",
        base_latency_ms: 54,
        hits_database: true,
    },
    EndpointTemplate {
        method: "POST",
        path: "/v1/kyc/verify",
        base_latency_ms: 112,
        hits_database: false,
    },
    EndpointTemplate {
        method: "GET",
        path: "/healthz",
        base_latency_ms: 4,
        hits_database: false,
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestRow {
    pub method: &'static str,
    pub path: &'static str,
    pub status: u16,
    pub latency_ms: u64,
}

impl RequestRow {
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.status >= 500
    }
}

/// Fakes a rolling table of API requests. Chaos flags bend the output:
/// network loss inflates latency and injects gateway timeouts, a database
/// outage turns every database-backed endpoint into a 500.
#[derive(Debug)]
pub struct TrafficGenerator {
    rng: StdRng,
    rows: VecDeque<RequestRow>,
}

impl TrafficGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::seeded(rand::rng().random())
    }

    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            rows: VecDeque::with_capacity(TRAFFIC_WINDOW),
        }
    }

    /// Generate one request row and insert it at the top of the table.
    pub fn tick(&mut self, chaos: ChaosState) -> RequestRow {
        let template = &ENDPOINTS[self.rng.random_range(0..ENDPOINTS.len())];

        let jitter = self
            .rng
            .random_range(-LATENCY_VARIANCE_MS..=LATENCY_VARIANCE_MS);
        let mut latency_ms = template.base_latency_ms.saturating_add_signed(jitter);

        let mut status: u16 = 200;

        if chaos.db_outage && template.hits_database {
            status = 500;
            latency_ms += self.rng.random_range(40..120);
        }

        if chaos.network_loss {
            latency_ms = latency_ms * 4 + self.rng.random_range(100..400);
            // Roughly a third of requests give up at the gateway.
            if status == 200 && self.rng.random_range(0..3) == 0 {
                status = 504;
            }
        }

        let row = RequestRow {
            method: template.method,
            path: template.path,
            status,
            latency_ms,
        };

        if self.rows.len() == TRAFFIC_WINDOW {
            self.rows.pop_back();
        }
        self.rows.push_front(row.clone());
        row
    }

    /// Rows newest first.
    #[must_use]
    pub fn rows(&self) -> impl Iterator<Item = &RequestRow> {
        self.rows.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }
}

impl Default for TrafficGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_bounded_and_newest_first() {
        let mut traffic = TrafficGenerator::seeded(3);
        let mut last = None;
        for _ in 0..40 {
            last = Some(traffic.tick(ChaosState::default()));
        }
        assert_eq!(traffic.len(), TRAFFIC_WINDOW);
        assert_eq!(traffic.rows().next(), last.as_ref());
    }

    #[test]
    fn test_healthy_traffic_is_all_200() {
        let mut traffic = TrafficGenerator::seeded(3);
        for _ in 0..100 {
            let row = traffic.tick(ChaosState::default());
            assert_eq!(row.status, 200);
            assert!(!row.is_error());
        }
    }

    #[test]
    fn test_db_outage_fails_database_endpoints() {
        let mut traffic = TrafficGenerator::seeded(3);
        let chaos = ChaosState {
            db_outage: true,
            ..ChaosState::default()
        };

        let mut saw_500 = false;
        for _ in 0..100 {
            let row = traffic.tick(chaos);
            if row.path == "/healthz" {
                assert_eq!(row.status, 200);
            } else if row.status == 500 {
                saw_500 = true;
            }
        }
        assert!(saw_500);
    }

    #[test]
    fn test_network_loss_inflates_latency() {
        let mut healthy = TrafficGenerator::seeded(9);
        let mut degraded = TrafficGenerator::seeded(9);
        let chaos = ChaosState {
            network_loss: true,
            ..ChaosState::default()
        };

        let healthy_total: u64 = (0..200)
            .map(|_| healthy.tick(ChaosState::default()).latency_ms)
            .sum();
        let degraded_total: u64 = (0..200).map(|_| degraded.tick(chaos).latency_ms).sum();

        assert!(degraded_total > healthy_total * 3);
    }
}
