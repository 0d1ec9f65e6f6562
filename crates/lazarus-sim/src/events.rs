use crate::ChaosState;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// How many entries the event feed keeps.
pub const EVENT_WINDOW: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSeverity {
    Info,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemEvent {
    pub severity: EventSeverity,
    pub message: &'static str,
}

const ROUTINE_EVENTS: &[SystemEvent] = &[
    SystemEvent {
        severity: EventSeverity::Info,
        message: "Autoscaler evaluated pool, no action taken",
    },
    SystemEvent {
        severity: EventSeverity::Info,
        message: "Snapshot of persistent disk completed",
    },
    SystemEvent {
        severity: EventSeverity::Info,
        message: "TLS certificate rotation scheduled",
    },
    SystemEvent {
        severity: EventSeverity::Info,
        message: "Container image garbage collection freed 412MB",
    },
    SystemEvent {
        severity: EventSeverity::Info,
        message: "Idle watchdog heartbeat acknowledged",
    },
    SystemEvent {
        severity: EventSeverity::Warning,
        message: "Spot reclaim probability elevated in current zone",
    },
    SystemEvent {
        severity: EventSeverity::Info,
        message: "Log shipper flushed 1,204 records",
    },
];

const CHAOS_EVENTS: &[SystemEvent] = &[
    SystemEvent {
        severity: EventSeverity::Warning,
        message: "Health check latency above threshold",
    },
    SystemEvent {
        severity: EventSeverity::Warning,
        message: "Upstream retries exhausted for 3 requests",
    },
    SystemEvent {
        severity: EventSeverity::Warning,
        message: "Connection pool saturation detected",
    },
];

/// Rolling feed of background platform events. Under chaos the feed mixes
/// in warning entries alongside routine ones.
#[derive(Debug)]
pub struct EventFeed {
    rng: StdRng,
    entries: VecDeque<SystemEvent>,
}

impl EventFeed {
    #[must_use]
    pub fn new() -> Self {
        Self::seeded(rand::rng().random())
    }

    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            entries: VecDeque::with_capacity(EVENT_WINDOW),
        }
    }

    /// Emit one event and prepend it to the feed.
    pub fn tick(&mut self, chaos: ChaosState) -> SystemEvent {
        let pool = if chaos.any_active() && self.rng.random_range(0..2) == 0 {
            CHAOS_EVENTS
        } else {
            ROUTINE_EVENTS
        };
        let event = pool[self.rng.random_range(0..pool.len())];

        if self.entries.len() == EVENT_WINDOW {
            self.entries.pop_back();
        }
        self.entries.push_front(event);
        event
    }

    /// Entries newest first.
    #[must_use]
    pub fn entries(&self) -> impl Iterator<Item = &SystemEvent> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for EventFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_is_bounded() {
        let mut feed = EventFeed::seeded(11);
        for _ in 0..200 {
            feed.tick(ChaosState::default());
        }
        assert_eq!(feed.len(), EVENT_WINDOW);
    }

    #[test]
    fn test_chaos_mixes_in_warnings() {
        let mut feed = EventFeed::seeded(11);
        let chaos = ChaosState {
            db_outage: true,
            ..ChaosState::default()
        };

        let mut saw_chaos_entry = false;
        for _ in 0..100 {
            let event = feed.tick(chaos);
            if CHAOS_EVENTS.contains(&event) {
                saw_chaos_entry = true;
            }
        }
        assert!(saw_chaos_entry);
    }
}
