//! Cumulative fatigue for base-pace mode.
//!
//! Work done so far is tracked in km-effort (distance plus weighted ascent and
//! descent). Past the fitness level's onset point the slowdown grows as
//! `1 + alpha * ((E - onset) / onset)^beta`.

use crate::{
    config::{EngineConfig, FatigueParams},
    models::{FitnessLevel, SegmentSpan},
};

#[derive(Debug, Clone)]
pub struct FatigueModel {
    params: FatigueParams,
    enabled: bool,
    cumulative_km_effort: f64,
}

impl FatigueModel {
    pub fn new(config: &EngineConfig, fitness: FitnessLevel, enabled: bool) -> Self {
        Self {
            params: config.fatigue[fitness],
            enabled,
            cumulative_km_effort: 0.0,
        }
    }

    pub fn cumulative_km_effort(&self) -> f64 {
        self.cumulative_km_effort
    }

    /// Multiplier for a given amount of accumulated work.
    pub fn multiplier_at(&self, km_effort: f64) -> f64 {
        if !self.enabled {
            return 1.0;
        }
        let FatigueParams {
            onset_km_effort,
            alpha,
            beta,
        } = self.params;
        if onset_km_effort <= 0.0 || km_effort <= onset_km_effort {
            return 1.0;
        }
        1.0 + alpha * ((km_effort - onset_km_effort) / onset_km_effort).powf(beta)
    }

    /// Adds a segment's work and returns the multiplier including it.
    pub fn next_segment(&mut self, span: &SegmentSpan) -> f64 {
        self.cumulative_km_effort += span.km_effort().max(0.0);
        self.multiplier_at(self.cumulative_km_effort)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TerrainType;

    fn span(distance_km: f64, gain: f64, loss: f64) -> SegmentSpan {
        SegmentSpan {
            from: "A".to_string(),
            to: "B".to_string(),
            start_km: 0.0,
            end_km: distance_km,
            distance_km,
            elev_gain_m: gain,
            elev_loss_m: loss,
            terrain_type: TerrainType::SmoothTrail,
            has_dropbag: false,
        }
    }

    #[test]
    fn test_no_fatigue_before_onset() {
        let config = EngineConfig::default();
        let model = FatigueModel::new(&config, FitnessLevel::Recreational, true);
        assert_eq!(model.multiplier_at(0.0), 1.0);
        assert_eq!(model.multiplier_at(37.5), 1.0);
        assert!(model.multiplier_at(40.0) > 1.0);
    }

    #[test]
    fn test_recreational_growth() {
        let config = EngineConfig::default();
        let model = FatigueModel::new(&config, FitnessLevel::Recreational, true);
        // one full onset beyond the threshold adds alpha
        assert!((model.multiplier_at(75.0) - 1.10).abs() < 1e-9);
    }

    #[test]
    fn test_disabled_is_flat() {
        let config = EngineConfig::default();
        let mut model = FatigueModel::new(&config, FitnessLevel::Untrained, false);
        for _ in 0..20 {
            assert_eq!(model.next_segment(&span(10.0, 500.0, 500.0)), 1.0);
        }
    }

    #[test]
    fn test_multiplier_non_decreasing_along_route() {
        let config = EngineConfig::default();
        for fitness in [
            FitnessLevel::Untrained,
            FitnessLevel::Recreational,
            FitnessLevel::Trained,
            FitnessLevel::Elite,
        ] {
            let mut model = FatigueModel::new(&config, fitness, true);
            let mut last = 1.0;
            for i in 0..40 {
                let segment = span(2.0 + (i % 3) as f64, (i * 37 % 300) as f64, 50.0);
                let m = model.next_segment(&segment);
                assert!(m >= last, "{fitness:?} decreased at segment {i}");
                assert!(m >= 1.0);
                last = m;
            }
        }
    }

    #[test]
    fn test_cumulative_effort_counts_elevation() {
        let config = EngineConfig::default();
        let mut model = FatigueModel::new(&config, FitnessLevel::Elite, true);
        model.next_segment(&span(10.0, 500.0, 400.0));
        assert!((model.cumulative_km_effort() - 17.0).abs() < 1e-9);
    }
}
