use crate::{CoreError, LogStep, StepSpec, StepStatus};
use std::time::{Duration, Instant};

/// Pause between the final step completing and `Finished` firing, matching
/// the beat the original boot animation leaves before switching screens.
pub const TRAILING_DELAY: Duration = Duration::from_millis(800);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    Idle,
    Running { step: usize },
    Trailing,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerEvent {
    StepStarted(usize),
    StepCompleted(usize),
    Finished,
}

/// Plays an ordered list of timed steps: strictly sequential, at most one
/// step running, completion signalled exactly once. The caller supplies the
/// clock through `start`/`advance`, so tests drive it with synthetic
/// instants and teardown is dropping the value.
#[derive(Debug)]
pub struct Sequencer {
    steps: Vec<LogStep>,
    state: SequencerState,
    deadline: Option<Instant>,
}

impl Sequencer {
    /// Build a sequencer from step templates.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidProfile` if any step has a zero duration.
    pub fn new(specs: &[StepSpec]) -> Result<Self, CoreError> {
        for spec in specs {
            if spec.duration_ms == 0 {
                return Err(CoreError::InvalidProfile(format!(
                    "step '{}' has zero duration",
                    spec.id
                )));
            }
        }
        Ok(Self {
            steps: specs.iter().map(LogStep::from_spec).collect(),
            state: SequencerState::Idle,
            deadline: None,
        })
    }

    /// Begin playback. An empty sequence completes immediately, emitting
    /// `Finished` and no step events. Calling `start` twice is a no-op.
    pub fn start(&mut self, now: Instant) -> Vec<SequencerEvent> {
        if self.state != SequencerState::Idle {
            return Vec::new();
        }

        if self.steps.is_empty() {
            self.state = SequencerState::Done;
            return vec![SequencerEvent::Finished];
        }

        self.steps[0].status = StepStatus::Running;
        self.state = SequencerState::Running { step: 0 };
        self.deadline = Some(now + self.steps[0].duration());
        vec![SequencerEvent::StepStarted(0)]
    }

    /// Advance past every deadline that `now` has reached. A slow caller
    /// still observes the events in order; deadlines accumulate from the
    /// previous deadline rather than `now`, so the schedule never drifts.
    pub fn advance(&mut self, now: Instant) -> Vec<SequencerEvent> {
        let mut events = Vec::new();

        while let Some(deadline) = self.deadline {
            if now < deadline {
                break;
            }

            match self.state {
                SequencerState::Running { step } => {
                    self.steps[step].status = StepStatus::Completed;
                    events.push(SequencerEvent::StepCompleted(step));

                    let next = step + 1;
                    if next < self.steps.len() {
                        self.steps[next].status = StepStatus::Running;
                        self.state = SequencerState::Running { step: next };
                        self.deadline = Some(deadline + self.steps[next].duration());
                        events.push(SequencerEvent::StepStarted(next));
                    } else {
                        self.state = SequencerState::Trailing;
                        self.deadline = Some(deadline + TRAILING_DELAY);
                    }
                }
                SequencerState::Trailing => {
                    self.state = SequencerState::Done;
                    self.deadline = None;
                    events.push(SequencerEvent::Finished);
                }
                SequencerState::Idle | SequencerState::Done => {
                    self.deadline = None;
                }
            }
        }

        events
    }

    /// Return to `Idle` with every step back at `Pending`, dropping any
    /// pending deadline. Used when the session cycles back to offline.
    pub fn reset(&mut self) {
        for step in &mut self.steps {
            step.status = StepStatus::Pending;
        }
        self.state = SequencerState::Idle;
        self.deadline = None;
    }

    #[must_use]
    pub fn steps(&self) -> &[LogStep] {
        &self.steps
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.state == SequencerState::Done
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.status == StepStatus::Completed)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specs(durations_ms: &[u64]) -> Vec<StepSpec> {
        durations_ms
            .iter()
            .enumerate()
            .map(|(i, d)| StepSpec {
                id: format!("{}", i + 1),
                message: format!("step {}", i + 1),
                duration_ms: *d,
            })
            .collect()
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_two_step_timing() {
        let mut seq = Sequencer::new(&specs(&[100, 100])).unwrap();
        let t0 = Instant::now();

        assert_eq!(seq.start(t0), vec![SequencerEvent::StepStarted(0)]);
        assert_eq!(seq.steps()[0].status, StepStatus::Running);
        assert_eq!(seq.steps()[1].status, StepStatus::Pending);

        assert_eq!(seq.advance(t0 + ms(50)), vec![]);

        let events = seq.advance(t0 + ms(100));
        assert_eq!(
            events,
            vec![
                SequencerEvent::StepCompleted(0),
                SequencerEvent::StepStarted(1)
            ]
        );
        assert_eq!(seq.steps()[0].status, StepStatus::Completed);
        assert_eq!(seq.steps()[1].status, StepStatus::Running);

        assert_eq!(
            seq.advance(t0 + ms(200)),
            vec![SequencerEvent::StepCompleted(1)]
        );
        assert!(!seq.is_done());

        assert_eq!(
            seq.advance(t0 + ms(200) + TRAILING_DELAY),
            vec![SequencerEvent::Finished]
        );
        assert!(seq.is_done());

        // Nothing fires twice.
        assert_eq!(seq.advance(t0 + ms(10_000)), vec![]);
    }

    #[test]
    fn test_at_most_one_running() {
        let mut seq = Sequencer::new(&specs(&[50, 50, 50])).unwrap();
        let t0 = Instant::now();
        seq.start(t0);

        for tick in 0..40 {
            seq.advance(t0 + ms(tick * 10));
            let running = seq
                .steps()
                .iter()
                .filter(|s| s.status == StepStatus::Running)
                .count();
            assert!(running <= 1, "more than one step running");
        }
    }

    #[test]
    fn test_slow_caller_sees_ordered_events() {
        let mut seq = Sequencer::new(&specs(&[10, 10, 10])).unwrap();
        let t0 = Instant::now();
        seq.start(t0);

        // One late poll catches every deadline at once, still in order.
        let events = seq.advance(t0 + ms(10_000));
        assert_eq!(
            events,
            vec![
                SequencerEvent::StepCompleted(0),
                SequencerEvent::StepStarted(1),
                SequencerEvent::StepCompleted(1),
                SequencerEvent::StepStarted(2),
                SequencerEvent::StepCompleted(2),
                SequencerEvent::Finished,
            ]
        );
        assert_eq!(seq.completed_count(), 3);
    }

    #[test]
    fn test_empty_sequence_completes_immediately() {
        let mut seq = Sequencer::new(&[]).unwrap();
        let t0 = Instant::now();
        assert_eq!(seq.start(t0), vec![SequencerEvent::Finished]);
        assert!(seq.is_done());
        assert_eq!(seq.advance(t0 + ms(5000)), vec![]);
    }

    #[test]
    fn test_zero_duration_rejected() {
        let err = Sequencer::new(&specs(&[100, 0])).unwrap_err();
        assert!(matches!(err, CoreError::InvalidProfile(_)));
    }

    #[test]
    fn test_double_start_is_noop() {
        let mut seq = Sequencer::new(&specs(&[100])).unwrap();
        let t0 = Instant::now();
        seq.start(t0);
        assert_eq!(seq.start(t0 + ms(50)), vec![]);
        assert_eq!(seq.steps()[0].status, StepStatus::Running);
    }
}
