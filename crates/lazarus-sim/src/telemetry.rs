use crate::ChaosState;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// How many samples the HUD charts keep.
pub const TELEMETRY_WINDOW: usize = 30;

const CPU_BASELINE: f64 = 45.0;
const CPU_STEP: f64 = 7.5;
const MEM_BASELINE: f64 = 60.0;
const MEM_STEP: f64 = 2.5;

/// Bounded random walk over 0..=100.
#[derive(Debug)]
struct Walk {
    value: f64,
    step: f64,
}

impl Walk {
    fn new(start: f64, step: f64) -> Self {
        Self { value: start, step }
    }

    fn advance(&mut self, rng: &mut StdRng) -> f64 {
        let delta = rng.random_range(-self.step..=self.step);
        self.value = (self.value + delta).clamp(0.0, 100.0);
        self.value
    }
}

/// One CPU/memory sample pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetrySample {
    pub cpu: f64,
    pub memory: f64,
}

/// Decorative CPU and memory series for the HUD. Seedable so tests get
/// reproducible series; the dashboard seeds from entropy.
#[derive(Debug)]
pub struct TelemetryGenerator {
    rng: StdRng,
    cpu: Walk,
    memory: Walk,
    history: VecDeque<TelemetrySample>,
}

impl TelemetryGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::seeded(rand::rng().random())
    }

    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            cpu: Walk::new(CPU_BASELINE, CPU_STEP),
            memory: Walk::new(MEM_BASELINE, MEM_STEP),
            history: VecDeque::with_capacity(TELEMETRY_WINDOW),
        }
    }

    /// Produce the next sample. A CPU spike pins the walk into the 95..100
    /// band until the flag is cleared; memory is unaffected by chaos.
    pub fn tick(&mut self, chaos: ChaosState) -> TelemetrySample {
        let cpu = if chaos.cpu_spike {
            let spiked = self.rng.random_range(95.0..100.0);
            self.cpu.value = spiked;
            spiked
        } else {
            self.cpu.advance(&mut self.rng)
        };

        let sample = TelemetrySample {
            cpu,
            memory: self.memory.advance(&mut self.rng),
        };

        if self.history.len() == TELEMETRY_WINDOW {
            self.history.pop_front();
        }
        self.history.push_back(sample);
        sample
    }

    #[must_use]
    pub fn latest(&self) -> Option<TelemetrySample> {
        self.history.back().copied()
    }

    /// CPU history as integers for a sparkline, oldest first.
    #[must_use]
    pub fn cpu_series(&self) -> Vec<u64> {
        self.history.iter().map(|s| s.cpu.round() as u64).collect()
    }

    #[must_use]
    pub fn memory_series(&self) -> Vec<u64> {
        self.history
            .iter()
            .map(|s| s.memory.round() as u64)
            .collect()
    }

    /// Drop accumulated history, keeping the walk positions.
    pub fn clear(&mut self) {
        self.history.clear();
    }
}

impl Default for TelemetryGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_stay_in_bounds() {
        let mut telemetry = TelemetryGenerator::seeded(7);
        for _ in 0..500 {
            let sample = telemetry.tick(ChaosState::default());
            assert!((0.0..=100.0).contains(&sample.cpu));
            assert!((0.0..=100.0).contains(&sample.memory));
        }
    }

    #[test]
    fn test_window_is_bounded() {
        let mut telemetry = TelemetryGenerator::seeded(7);
        for _ in 0..100 {
            telemetry.tick(ChaosState::default());
        }
        assert_eq!(telemetry.cpu_series().len(), TELEMETRY_WINDOW);
        assert_eq!(telemetry.memory_series().len(), TELEMETRY_WINDOW);
    }

    #[test]
    fn test_cpu_spike_pins_high_band() {
        let mut telemetry = TelemetryGenerator::seeded(7);
        let chaos = ChaosState {
            cpu_spike: true,
            ..ChaosState::default()
        };
        for _ in 0..50 {
            let sample = telemetry.tick(chaos);
            assert!(sample.cpu >= 95.0, "cpu {} below spike band", sample.cpu);
        }
    }

    #[test]
    fn test_seeded_series_are_reproducible() {
        let mut a = TelemetryGenerator::seeded(42);
        let mut b = TelemetryGenerator::seeded(42);
        for _ in 0..20 {
            assert_eq!(a.tick(ChaosState::default()), b.tick(ChaosState::default()));
        }
    }
}
