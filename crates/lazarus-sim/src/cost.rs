use lazarus_core::CostModel;

pub const MIN_FORECAST_DAYS: u32 = 1;
pub const MAX_FORECAST_DAYS: u32 = 30;
pub const DEFAULT_FORECAST_DAYS: u32 = 7;

const HOURS_PER_DAY: f64 = 24.0;

/// Projected spend over a horizon, assuming the instance runs continuously.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostForecast {
    pub days: u32,
    pub on_demand_total: f64,
    pub spot_total: f64,
}

impl CostForecast {
    /// Dollars saved over the horizon by running on spot.
    #[must_use]
    pub fn savings(&self) -> f64 {
        self.on_demand_total - self.spot_total
    }

    /// Horizon label shown over the chart, e.g. `+7d`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("+{}d", self.days)
    }
}

/// Project cost over `days`, clamped to the slider range.
#[must_use]
pub fn forecast(model: &CostModel, days: u32) -> CostForecast {
    let days = days.clamp(MIN_FORECAST_DAYS, MAX_FORECAST_DAYS);
    let hours = f64::from(days) * HOURS_PER_DAY;

    CostForecast {
        days,
        on_demand_total: model.on_demand_rate * hours,
        spot_total: model.spot_rate * hours,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rates_over_a_week() {
        let projection = forecast(&CostModel::default(), 7);
        assert!((projection.on_demand_total - 0.084 * 24.0 * 7.0).abs() < 1e-9);
        assert!((projection.spot_total - 0.024 * 24.0 * 7.0).abs() < 1e-9);
        assert!(projection.savings() > 0.0);
        assert_eq!(projection.label(), "+7d");
    }

    #[test]
    fn test_horizon_is_clamped() {
        let model = CostModel::default();
        assert_eq!(forecast(&model, 0).days, MIN_FORECAST_DAYS);
        assert_eq!(forecast(&model, 365).days, MAX_FORECAST_DAYS);
    }

}
