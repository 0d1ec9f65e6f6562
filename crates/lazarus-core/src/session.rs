use crate::{
    CoreError, EnvironmentState, LogStep, READY_COUNTDOWN, RECOVERY_DELAY, SLEEP_DELAY,
    Sequencer, SequencerEvent, SimulationProfile, Trigger,
};
use std::time::{Duration, Instant};

/// Actions the dashboard exposes to the user. Everything else that moves
/// the machine (sequencer completions, countdowns) is internal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    Initialize,
    Stop,
    SimulateCrash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionUpdate {
    Entered(EnvironmentState),
    Step(SequencerEvent),
}

/// One simulated environment session: the lifecycle machine plus the build
/// and boot sequencers and the auto-advance timers between them. All timing
/// comes from the `Instant`s passed to `handle` and `tick`, so the whole
/// aggregate runs under a fake clock in tests.
pub struct Session {
    profile: SimulationProfile,
    state: EnvironmentState,
    build: Sequencer,
    boot: Sequencer,
    timer: Option<Instant>,
}

impl Session {
    /// Create an offline session for a profile.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidProfile` if either sequence carries a
    /// zero-duration step.
    pub fn new(profile: SimulationProfile) -> Result<Self, CoreError> {
        let build = Sequencer::new(&profile.build_sequence)?;
        let boot = Sequencer::new(&profile.boot_sequence)?;
        Ok(Self {
            profile,
            state: EnvironmentState::Offline,
            build,
            boot,
            timer: None,
        })
    }

    #[must_use]
    pub fn state(&self) -> EnvironmentState {
        self.state
    }

    #[must_use]
    pub fn profile(&self) -> &SimulationProfile {
        &self.profile
    }

    /// Steps of the sequence currently playing, if any.
    #[must_use]
    pub fn current_steps(&self) -> &[LogStep] {
        match self.state {
            EnvironmentState::Deploying => self.build.steps(),
            EnvironmentState::BootLogs | EnvironmentState::Ready => self.boot.steps(),
            _ => &[],
        }
    }

    /// Time left on the Ready/Recovering/Sleeping countdown.
    #[must_use]
    pub fn timer_remaining(&self, now: Instant) -> Option<Duration> {
        self.timer.map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Apply a user action. Actions invalid in the current state are no-ops
    /// and return no updates.
    pub fn handle(&mut self, action: UserAction, now: Instant) -> Vec<SessionUpdate> {
        let trigger = match action {
            UserAction::Initialize => Trigger::Initialize,
            UserAction::Stop => Trigger::Stop,
            UserAction::SimulateCrash => Trigger::SimulateCrash,
        };

        let mut updates = Vec::new();
        self.fire(trigger, now, &mut updates);
        updates
    }

    /// Advance timers and the active sequencer to `now`.
    pub fn tick(&mut self, now: Instant) -> Vec<SessionUpdate> {
        let mut updates = Vec::new();

        match self.state {
            EnvironmentState::Deploying => {
                let events = self.build.advance(now);
                self.absorb(events, now, &mut updates);
            }
            EnvironmentState::BootLogs => {
                let events = self.boot.advance(now);
                self.absorb(events, now, &mut updates);
            }
            EnvironmentState::Ready => self.tick_timer(Trigger::ReadyElapsed, now, &mut updates),
            EnvironmentState::Recovering => {
                self.tick_timer(Trigger::RecoveryElapsed, now, &mut updates);
            }
            EnvironmentState::Sleeping => self.tick_timer(Trigger::SleepElapsed, now, &mut updates),
            EnvironmentState::Offline | EnvironmentState::Active => {}
        }

        updates
    }

    fn tick_timer(&mut self, trigger: Trigger, now: Instant, updates: &mut Vec<SessionUpdate>) {
        if let Some(deadline) = self.timer
            && now >= deadline
        {
            self.timer = None;
            self.fire(trigger, now, updates);
        }
    }

    /// Fold sequencer events into updates, chaining lifecycle transitions
    /// on `Finished`.
    fn absorb(
        &mut self,
        events: Vec<SequencerEvent>,
        now: Instant,
        updates: &mut Vec<SessionUpdate>,
    ) {
        for event in events {
            if event == SequencerEvent::Finished {
                let trigger = match self.state {
                    EnvironmentState::Deploying => Trigger::BuildComplete,
                    _ => Trigger::BootComplete,
                };
                self.fire(trigger, now, updates);
            } else {
                updates.push(SessionUpdate::Step(event));
            }
        }
    }

    fn fire(&mut self, trigger: Trigger, now: Instant, updates: &mut Vec<SessionUpdate>) {
        let next = self.state.next(trigger);
        if next == self.state {
            return;
        }

        self.state = next;
        updates.push(SessionUpdate::Entered(next));

        match next {
            EnvironmentState::Deploying => {
                self.build.reset();
                let events = self.build.start(now);
                self.absorb(events, now, updates);
            }
            EnvironmentState::BootLogs => {
                self.boot.reset();
                let events = self.boot.start(now);
                self.absorb(events, now, updates);
            }
            EnvironmentState::Ready => self.timer = Some(now + READY_COUNTDOWN),
            EnvironmentState::Recovering => self.timer = Some(now + RECOVERY_DELAY),
            EnvironmentState::Sleeping => self.timer = Some(now + SLEEP_DELAY),
            EnvironmentState::Offline => {
                // Session data does not survive a shutdown.
                self.build.reset();
                self.boot.reset();
                self.timer = None;
            }
            EnvironmentState::Active => self.timer = None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ProfileCatalog, StepSpec, TRAILING_DELAY};

    fn quick_profile(build_ms: &[u64], boot_ms: &[u64]) -> SimulationProfile {
        let mut profile = ProfileCatalog::builtin().profiles[0].clone();
        profile.build_sequence = seq("b", build_ms);
        profile.boot_sequence = seq("s", boot_ms);
        profile
    }

    fn seq(prefix: &str, durations_ms: &[u64]) -> Vec<StepSpec> {
        durations_ms
            .iter()
            .enumerate()
            .map(|(i, d)| StepSpec {
                id: format!("{prefix}{i}"),
                message: format!("{prefix} step {i}"),
                duration_ms: *d,
            })
            .collect()
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_full_cycle() {
        let mut session = Session::new(quick_profile(&[10], &[10, 10])).unwrap();
        let t0 = Instant::now();

        assert_eq!(session.state(), EnvironmentState::Offline);
        session.handle(UserAction::Initialize, t0);
        assert_eq!(session.state(), EnvironmentState::Deploying);
        assert_eq!(session.current_steps().len(), 1);

        // Build: 10ms + trailing delay.
        session.tick(t0 + ms(10) + TRAILING_DELAY);
        assert_eq!(session.state(), EnvironmentState::BootLogs);
        assert_eq!(session.current_steps().len(), 2);

        // Boot starts at the instant the build finished.
        let boot_start = t0 + ms(10) + TRAILING_DELAY;
        session.tick(boot_start + ms(20) + TRAILING_DELAY);
        assert_eq!(session.state(), EnvironmentState::Ready);

        let ready_at = boot_start + ms(20) + TRAILING_DELAY;
        assert_eq!(
            session.timer_remaining(ready_at),
            Some(READY_COUNTDOWN)
        );
        session.tick(ready_at + READY_COUNTDOWN);
        assert_eq!(session.state(), EnvironmentState::Active);

        session.handle(UserAction::Stop, ready_at + READY_COUNTDOWN);
        assert_eq!(session.state(), EnvironmentState::Sleeping);
        session.tick(ready_at + READY_COUNTDOWN + SLEEP_DELAY);
        assert_eq!(session.state(), EnvironmentState::Offline);

        // Log state was discarded on shutdown.
        assert_eq!(session.current_steps().len(), 0);
    }

    #[test]
    fn test_stop_while_offline_is_noop() {
        let mut session = Session::new(quick_profile(&[10], &[10])).unwrap();
        let updates = session.handle(UserAction::Stop, Instant::now());
        assert!(updates.is_empty());
        assert_eq!(session.state(), EnvironmentState::Offline);
    }

    #[test]
    fn test_crash_auto_recovers() {
        let mut session = Session::new(quick_profile(&[], &[])).unwrap();
        let t0 = Instant::now();

        session.handle(UserAction::Initialize, t0);
        // Both sequences are empty: deploy and boot complete instantly.
        assert_eq!(session.state(), EnvironmentState::Ready);
        session.tick(t0 + READY_COUNTDOWN);
        assert_eq!(session.state(), EnvironmentState::Active);

        let t1 = t0 + READY_COUNTDOWN;
        session.handle(UserAction::SimulateCrash, t1);
        assert_eq!(session.state(), EnvironmentState::Recovering);

        // Not yet.
        session.tick(t1 + RECOVERY_DELAY - ms(1));
        assert_eq!(session.state(), EnvironmentState::Recovering);

        session.tick(t1 + RECOVERY_DELAY);
        assert_eq!(session.state(), EnvironmentState::Active);
    }

    #[test]
    fn test_stop_during_recovery() {
        let mut session = Session::new(quick_profile(&[], &[])).unwrap();
        let t0 = Instant::now();
        session.handle(UserAction::Initialize, t0);
        session.tick(t0 + READY_COUNTDOWN);
        session.handle(UserAction::SimulateCrash, t0 + READY_COUNTDOWN);

        session.handle(UserAction::Stop, t0 + READY_COUNTDOWN);
        assert_eq!(session.state(), EnvironmentState::Sleeping);
    }

    #[test]
    fn test_repeated_initialize_is_idempotent() {
        let mut session = Session::new(quick_profile(&[50], &[50])).unwrap();
        let t0 = Instant::now();
        session.handle(UserAction::Initialize, t0);
        let updates = session.handle(UserAction::Initialize, t0 + ms(5));
        assert!(updates.is_empty());
        assert_eq!(session.state(), EnvironmentState::Deploying);
    }

    #[test]
    fn test_update_stream_reports_transitions() {
        let mut session = Session::new(quick_profile(&[10], &[])).unwrap();
        let t0 = Instant::now();

        let updates = session.handle(UserAction::Initialize, t0);
        assert_eq!(
            updates[0],
            SessionUpdate::Entered(EnvironmentState::Deploying)
        );
        assert_eq!(
            updates[1],
            SessionUpdate::Step(SequencerEvent::StepStarted(0))
        );

        let updates = session.tick(t0 + ms(10) + TRAILING_DELAY);
        assert!(updates.contains(&SessionUpdate::Entered(EnvironmentState::BootLogs)));
        // Empty boot sequence finishes in the same tick.
        assert!(updates.contains(&SessionUpdate::Entered(EnvironmentState::Ready)));
    }
}
