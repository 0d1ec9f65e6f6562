use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How long the Ready interstitial counts down before the HUD takes over.
pub const READY_COUNTDOWN: Duration = Duration::from_secs(3);

/// How long the Sleeping interstitial lingers before returning to Offline.
pub const SLEEP_DELAY: Duration = Duration::from_secs(2);

/// How long a simulated preemption stays in Recovering before the session
/// auto-recovers back to Active.
pub const RECOVERY_DELAY: Duration = Duration::from_secs(10);

/// Coarse session state. Exactly one value at a time; every screen is a
/// pure function of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnvironmentState {
    Offline,
    Deploying,
    BootLogs,
    Ready,
    Active,
    Recovering,
    Sleeping,
}

/// Everything that can move the lifecycle machine: user actions and the
/// timer/sequencer completions the session feeds back in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Initialize,
    Stop,
    SimulateCrash,
    BuildComplete,
    BootComplete,
    ReadyElapsed,
    RecoveryElapsed,
    SleepElapsed,
}

impl EnvironmentState {
    /// Total transition function. Combinations not listed are no-ops: the
    /// current state is returned unchanged, never an error.
    #[must_use]
    pub fn next(self, trigger: Trigger) -> Self {
        use EnvironmentState::{
            Active, BootLogs, Deploying, Offline, Ready, Recovering, Sleeping,
        };
        use Trigger::{
            BootComplete, BuildComplete, Initialize, ReadyElapsed, RecoveryElapsed, SimulateCrash,
            SleepElapsed, Stop,
        };

        match (self, trigger) {
            (Offline, Initialize) => Deploying,
            (Deploying, BuildComplete) => BootLogs,
            (BootLogs, BootComplete) => Ready,
            (Ready, ReadyElapsed) => Active,
            (Active, SimulateCrash) => Recovering,
            (Recovering, RecoveryElapsed) => Active,
            (Active | Recovering, Stop) => Sleeping,
            (Sleeping, SleepElapsed) => Offline,
            (state, _) => state,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            EnvironmentState::Offline => "OFFLINE",
            EnvironmentState::Deploying => "DEPLOYING",
            EnvironmentState::BootLogs => "BOOTING",
            EnvironmentState::Ready => "READY",
            EnvironmentState::Active => "ACTIVE",
            EnvironmentState::Recovering => "RECOVERING",
            EnvironmentState::Sleeping => "SLEEPING",
        }
    }

    /// States in which the environment is billed as running.
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(
            self,
            EnvironmentState::Active | EnvironmentState::Recovering
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let mut state = EnvironmentState::Offline;
        for (trigger, expected) in [
            (Trigger::Initialize, EnvironmentState::Deploying),
            (Trigger::BuildComplete, EnvironmentState::BootLogs),
            (Trigger::BootComplete, EnvironmentState::Ready),
            (Trigger::ReadyElapsed, EnvironmentState::Active),
            (Trigger::Stop, EnvironmentState::Sleeping),
            (Trigger::SleepElapsed, EnvironmentState::Offline),
        ] {
            state = state.next(trigger);
            assert_eq!(state, expected);
        }
    }

    #[test]
    fn test_crash_and_recovery() {
        let state = EnvironmentState::Active.next(Trigger::SimulateCrash);
        assert_eq!(state, EnvironmentState::Recovering);
        assert_eq!(
            state.next(Trigger::RecoveryElapsed),
            EnvironmentState::Active
        );
        // Stop is honored mid-recovery.
        assert_eq!(state.next(Trigger::Stop), EnvironmentState::Sleeping);
    }

    #[test]
    fn test_invalid_transitions_are_noops() {
        assert_eq!(
            EnvironmentState::Offline.next(Trigger::Stop),
            EnvironmentState::Offline
        );
        assert_eq!(
            EnvironmentState::Offline.next(Trigger::SimulateCrash),
            EnvironmentState::Offline
        );
        assert_eq!(
            EnvironmentState::Deploying.next(Trigger::Initialize),
            EnvironmentState::Deploying
        );
        assert_eq!(
            EnvironmentState::BootLogs.next(Trigger::BuildComplete),
            EnvironmentState::BootLogs
        );
    }

    #[test]
    fn test_deterministic_in_history() {
        let history = [
            Trigger::Initialize,
            Trigger::BuildComplete,
            Trigger::BootComplete,
            Trigger::ReadyElapsed,
            Trigger::SimulateCrash,
            Trigger::RecoveryElapsed,
        ];
        let run = |triggers: &[Trigger]| {
            triggers
                .iter()
                .fold(EnvironmentState::Offline, |s, t| s.next(*t))
        };
        assert_eq!(run(&history), run(&history));
        assert_eq!(run(&history), EnvironmentState::Active);
    }
}
