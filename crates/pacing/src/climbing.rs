//! Gradient-aware climbing and descent model.
//!
//! Climbing is additive: the time to gain height at an effective vertical
//! speed is added to the horizontal running time. Descents are a speed
//! multiplier on the horizontal time, limited by what the terrain allows.

use crate::{
    config::EngineConfig,
    models::{ClimbingAbility, TerrainType},
};

/// Climbing efficiency for a gradient given in percent (absolute value).
///
/// Piecewise linear and continuous: poor on runnable grades where running
/// is cheaper than hiking, best between 8% and 12%, then decaying on steep
/// ground.
pub fn climbing_efficiency(gradient_pct: f64) -> f64 {
    let g = gradient_pct.abs();
    if g < 5.0 {
        0.60
    } else if g < 8.0 {
        0.60 + (g - 5.0) / 3.0 * 0.40
    } else if g <= 12.0 {
        1.00
    } else if g <= 15.0 {
        1.00 - (g - 12.0) / 3.0 * 0.15
    } else if g <= 20.0 {
        0.85 - (g - 15.0) / 5.0 * 0.20
    } else {
        0.65
    }
}

/// Climbing and descent behaviour for one athlete under one engine config.
#[derive(Debug, Clone, Copy)]
pub struct ClimbingModel<'a> {
    config: &'a EngineConfig,
    base_vertical_speed_m_per_h: f64,
}

impl<'a> ClimbingModel<'a> {
    pub fn new(config: &'a EngineConfig, ability: ClimbingAbility) -> Self {
        Self {
            config,
            base_vertical_speed_m_per_h: config.vertical_speed_m_per_h[ability],
        }
    }

    pub fn base_vertical_speed(&self) -> f64 {
        self.base_vertical_speed_m_per_h
    }

    /// Effective vertical speed in m/h for a gradient fraction (0.12 = 12%).
    pub fn effective_vertical_speed(&self, gradient: f64) -> f64 {
        self.base_vertical_speed_m_per_h * climbing_efficiency(gradient.abs() * 100.0)
    }

    /// Minutes needed to climb `elev_gain_m` on a segment with this gradient.
    pub fn climb_time_min(&self, elev_gain_m: f64, gradient: f64) -> f64 {
        if elev_gain_m <= 0.0 {
            return 0.0;
        }
        elev_gain_m / self.effective_vertical_speed(gradient) * 60.0
    }

    /// Speed multiplier (>= 1.0) for a net-descending segment.
    ///
    /// Returns 1.0 unless the segment loses more height than it gains.
    pub fn downhill_multiplier(
        &self,
        gradient: f64,
        terrain: TerrainType,
        elev_gain_m: f64,
        elev_loss_m: f64,
    ) -> f64 {
        if elev_loss_m <= elev_gain_m {
            return 1.0;
        }
        let base = downhill_base_multiplier(gradient);
        let cap = self.config.downhill_caps[terrain];
        1.0 + (base - 1.0) * cap
    }

    /// Minutes saved from `horizontal_time_min` by running downhill.
    pub fn descent_savings_min(
        &self,
        horizontal_time_min: f64,
        gradient: f64,
        terrain: TerrainType,
        elev_gain_m: f64,
        elev_loss_m: f64,
    ) -> f64 {
        let multiplier = self.downhill_multiplier(gradient, terrain, elev_gain_m, elev_loss_m);
        horizontal_time_min * (1.0 - 1.0 / multiplier)
    }
}

/// Uncapped downhill speed multiplier by gradient bucket.
fn downhill_base_multiplier(gradient: f64) -> f64 {
    let g = gradient.abs();
    if g <= 0.05 {
        1.05
    } else if g <= 0.10 {
        1.15
    } else if g <= 0.15 {
        1.20
    } else {
        // too steep to let go
        1.10
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_efficiency_is_continuous_at_breakpoints() {
        for bp in [5.0, 8.0, 12.0, 15.0, 20.0] {
            let below = climbing_efficiency(bp - 1e-9);
            let at = climbing_efficiency(bp);
            let above = climbing_efficiency(bp + 1e-9);
            assert!(
                (below - at).abs() < 1e-6,
                "jump below {bp}%: {below} vs {at}"
            );
            assert!(
                (above - at).abs() < 1e-6,
                "jump above {bp}%: {above} vs {at}"
            );
        }
    }

    #[test]
    fn test_efficiency_shape() {
        assert_eq!(climbing_efficiency(0.0), 0.60);
        assert_eq!(climbing_efficiency(4.9), 0.60);
        assert!((climbing_efficiency(6.5) - 0.80).abs() < EPS);
        assert_eq!(climbing_efficiency(10.0), 1.00);
        assert!((climbing_efficiency(15.0) - 0.85).abs() < EPS);
        assert!((climbing_efficiency(17.5) - 0.75).abs() < EPS);
        assert!((climbing_efficiency(20.0) - 0.65).abs() < EPS);
        assert_eq!(climbing_efficiency(35.0), 0.65);
        assert_eq!(climbing_efficiency(-10.0), 1.00);
    }

    #[test]
    fn test_plateau_keeps_base_speed() {
        let config = EngineConfig::default();
        let model = ClimbingModel::new(&config, ClimbingAbility::Moderate);
        assert_eq!(model.effective_vertical_speed(0.10), 700.0);
    }

    #[test]
    fn test_climb_time() {
        let config = EngineConfig::default();
        let model = ClimbingModel::new(&config, ClimbingAbility::Moderate);
        let minutes = model.climb_time_min(500.0, 0.10);
        assert!((minutes - 500.0 / 700.0 * 60.0).abs() < EPS);
        assert_eq!(model.climb_time_min(0.0, 0.10), 0.0);
    }

    #[test]
    fn test_downhill_multiplier_only_on_net_descent() {
        let config = EngineConfig::default();
        let model = ClimbingModel::new(&config, ClimbingAbility::Moderate);
        assert_eq!(
            model.downhill_multiplier(0.0, TerrainType::Road, 200.0, 200.0),
            1.0
        );
        let road = model.downhill_multiplier(-0.12, TerrainType::Road, 0.0, 600.0);
        assert!((road - 1.20).abs() < EPS);
        let technical = model.downhill_multiplier(-0.12, TerrainType::Technical, 0.0, 600.0);
        assert!((technical - 1.14).abs() < EPS);
        let steep = model.downhill_multiplier(-0.25, TerrainType::Road, 0.0, 1250.0);
        assert!((steep - 1.10).abs() < EPS);
    }

    #[test]
    fn test_descent_savings() {
        let config = EngineConfig::default();
        let model = ClimbingModel::new(&config, ClimbingAbility::Moderate);
        let saved = model.descent_savings_min(60.0, -0.08, TerrainType::Road, 0.0, 400.0);
        assert!((saved - 60.0 * (1.0 - 1.0 / 1.15)).abs() < EPS);
    }
}
