/// The three fault toggles exposed by the chaos panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChaosFlag {
    CpuSpike,
    NetworkLoss,
    DbOutage,
}

impl ChaosFlag {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            ChaosFlag::CpuSpike => "CPU Spike",
            ChaosFlag::NetworkLoss => "Network Loss",
            ChaosFlag::DbOutage => "DB Outage",
        }
    }
}

/// Current fault injection state. Purely local; the generators read these
/// flags each tick and bend their output accordingly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChaosState {
    pub cpu_spike: bool,
    pub network_loss: bool,
    pub db_outage: bool,
}

impl ChaosState {
    pub fn toggle(&mut self, flag: ChaosFlag) {
        match flag {
            ChaosFlag::CpuSpike => self.cpu_spike = !self.cpu_spike,
            ChaosFlag::NetworkLoss => self.network_loss = !self.network_loss,
            ChaosFlag::DbOutage => self.db_outage = !self.db_outage,
        }
    }

    #[must_use]
    pub fn is_set(self, flag: ChaosFlag) -> bool {
        match flag {
            ChaosFlag::CpuSpike => self.cpu_spike,
            ChaosFlag::NetworkLoss => self.network_loss,
            ChaosFlag::DbOutage => self.db_outage,
        }
    }

    #[must_use]
    pub fn any_active(self) -> bool {
        self.cpu_spike || self.network_loss || self.db_outage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_round_trip() {
        let mut chaos = ChaosState::default();
        assert!(!chaos.any_active());

        chaos.toggle(ChaosFlag::NetworkLoss);
        assert!(chaos.network_loss);
        assert!(chaos.is_set(ChaosFlag::NetworkLoss));
        assert!(chaos.any_active());

        chaos.toggle(ChaosFlag::NetworkLoss);
        assert_eq!(chaos, ChaosState::default());
    }
}
