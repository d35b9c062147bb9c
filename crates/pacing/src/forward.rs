//! Base-pace mode: simulate the race forward from the athlete's flat pace.
//!
//! For each segment, in order:
//! `time = (horizontal + climb - descent savings) * terrain * fatigue`.
//! Extreme paces are flagged, never corrected.

use tracing::{debug, warn};

use crate::{
    climbing::ClimbingModel,
    config::EngineConfig,
    fatigue::FatigueModel,
    models::{ClimbingAbility, FitnessLevel, SegmentSpan, SegmentTiming},
    terrain::TerrainModel,
};

#[derive(Debug, Clone)]
pub struct ForwardPacingCalculator<'a> {
    config: &'a EngineConfig,
    base_pace_min_per_km: f64,
    climbing_ability: ClimbingAbility,
    fitness_level: FitnessLevel,
    fatigue_enabled: bool,
    skill_level: f64,
}

impl<'a> ForwardPacingCalculator<'a> {
    /// Calculator with moderate climbing, recreational fitness, fatigue on and mid skill.
    pub fn new(config: &'a EngineConfig, base_pace_min_per_km: f64) -> Self {
        Self {
            config,
            base_pace_min_per_km,
            climbing_ability: ClimbingAbility::default(),
            fitness_level: FitnessLevel::default(),
            fatigue_enabled: true,
            skill_level: 0.5,
        }
    }

    pub fn with_climbing_ability(mut self, ability: ClimbingAbility) -> Self {
        self.climbing_ability = ability;
        self
    }

    pub fn with_fatigue(mut self, fitness_level: FitnessLevel, enabled: bool) -> Self {
        self.fitness_level = fitness_level;
        self.fatigue_enabled = enabled;
        self
    }

    pub fn with_skill_level(mut self, skill_level: f64) -> Self {
        self.skill_level = skill_level;
        self
    }

    /// Single forward pass over the segments.
    pub fn calculate(&self, spans: &[SegmentSpan]) -> Vec<SegmentTiming> {
        let climbing = ClimbingModel::new(self.config, self.climbing_ability);
        let terrain = TerrainModel::new(self.config);
        let mut fatigue = FatigueModel::new(self.config, self.fitness_level, self.fatigue_enabled);

        spans
            .iter()
            .map(|span| self.segment_timing(span, &climbing, &terrain, &mut fatigue))
            .collect()
    }

    fn segment_timing(
        &self,
        span: &SegmentSpan,
        climbing: &ClimbingModel<'_>,
        terrain: &TerrainModel<'_>,
        fatigue: &mut FatigueModel,
    ) -> SegmentTiming {
        let base_pace = self.base_pace_min_per_km;
        let terrain_factor = terrain.skill_adjusted_factor(span.terrain_type, self.skill_level);
        let fatigue_multiplier = fatigue.next_segment(span);

        if span.distance_km <= 0.0 {
            return SegmentTiming {
                terrain_factor,
                pace_min_per_km: base_pace,
                segment_time_min: 0.0,
                elev_pace_min_per_km: base_pace,
                fatigue_seconds_per_km: 0.0,
                pace_capped: false,
                pace_aggressive: false,
            };
        }

        let gradient = span.gradient();
        let horizontal_time = span.distance_km * base_pace;
        let climb_time = climbing.climb_time_min(span.elev_gain_m, gradient);
        let descent_savings = climbing.descent_savings_min(
            horizontal_time,
            gradient,
            span.terrain_type,
            span.elev_gain_m,
            span.elev_loss_m,
        );

        let raw_time = horizontal_time + climb_time - descent_savings;
        let elev_pace = raw_time / span.distance_km;
        let segment_time = raw_time * terrain_factor * fatigue_multiplier;
        let pace = segment_time / span.distance_km;

        let bounds = self.config.pace_bounds;
        let pace_capped = pace > bounds.max || pace > base_pace * self.config.slow_pace_ratio;
        let expected = base_pace * terrain_factor;
        let pace_aggressive = pace < bounds.min || pace < expected * self.config.aggressive_ratio;

        debug!(
            from = %span.from,
            to = %span.to,
            horizontal_time,
            climb_time,
            descent_savings,
            terrain_factor,
            fatigue_multiplier,
            pace,
            "forward segment"
        );
        if pace_capped {
            warn!(
                "Pace capped: {} -> {} at {pace:.2} min/km",
                span.from, span.to
            );
        }
        if pace_aggressive {
            warn!(
                "Aggressive pace: {} -> {} at {pace:.2} min/km",
                span.from, span.to
            );
        }

        SegmentTiming {
            terrain_factor,
            pace_min_per_km: pace,
            segment_time_min: segment_time,
            elev_pace_min_per_km: elev_pace,
            fatigue_seconds_per_km: (elev_pace * fatigue_multiplier - elev_pace) * 60.0,
            pace_capped,
            pace_aggressive,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TerrainType;

    fn span(distance_km: f64, gain: f64, loss: f64, terrain_type: TerrainType) -> SegmentSpan {
        SegmentSpan {
            from: "Start".to_string(),
            to: "Finish".to_string(),
            start_km: 0.0,
            end_km: distance_km,
            distance_km,
            elev_gain_m: gain,
            elev_loss_m: loss,
            terrain_type,
            has_dropbag: false,
        }
    }

    #[test]
    fn test_climb_scenario() {
        let config = EngineConfig::default();
        let calc = ForwardPacingCalculator::new(&config, 6.5)
            .with_climbing_ability(ClimbingAbility::Moderate)
            .with_fatigue(FitnessLevel::Recreational, false);
        let timing = calc.calculate(&[span(5.0, 500.0, 0.0, TerrainType::SmoothTrail)]);

        let expected_time = 32.5 + 500.0 / 700.0 * 60.0;
        assert!((timing[0].segment_time_min - expected_time).abs() < 1e-9);
        assert!((timing[0].segment_time_min - 75.36).abs() < 0.01);
        assert!((timing[0].pace_min_per_km - 15.07).abs() < 0.01);
        // beyond the band but left as-is
        assert!(timing[0].pace_capped);
        assert!(!timing[0].pace_aggressive);
    }

    #[test]
    fn test_flat_smooth_trail_runs_at_base_pace() {
        let config = EngineConfig::default();
        let calc = ForwardPacingCalculator::new(&config, 6.0)
            .with_fatigue(FitnessLevel::Elite, false);
        let timing = calc.calculate(&[span(10.0, 0.0, 0.0, TerrainType::SmoothTrail)]);
        assert!((timing[0].segment_time_min - 60.0).abs() < 1e-9);
        assert!((timing[0].pace_min_per_km - 6.0).abs() < 1e-9);
        assert_eq!(timing[0].fatigue_seconds_per_km, 0.0);
    }

    #[test]
    fn test_descent_is_faster_than_flat() {
        let config = EngineConfig::default();
        let calc = ForwardPacingCalculator::new(&config, 6.0)
            .with_fatigue(FitnessLevel::Elite, false);
        let timing = calc.calculate(&[
            span(10.0, 0.0, 0.0, TerrainType::Road),
            span(10.0, 0.0, 800.0, TerrainType::Road),
        ]);
        assert!(timing[1].segment_time_min < timing[0].segment_time_min);
    }

    #[test]
    fn test_terrain_slows_segment() {
        let config = EngineConfig::default();
        let calc = ForwardPacingCalculator::new(&config, 6.0)
            .with_fatigue(FitnessLevel::Elite, false)
            .with_skill_level(0.0);
        let timing = calc.calculate(&[span(10.0, 0.0, 0.0, TerrainType::Technical)]);
        assert!((timing[0].terrain_factor - 1.75).abs() < 1e-9);
        assert!((timing[0].segment_time_min - 105.0).abs() < 1e-9);
    }

    #[test]
    fn test_fatigue_accumulates() {
        let config = EngineConfig::default();
        let calc = ForwardPacingCalculator::new(&config, 6.0)
            .with_fatigue(FitnessLevel::Untrained, true);
        let spans: Vec<SegmentSpan> = (0..6)
            .map(|_| span(10.0, 0.0, 0.0, TerrainType::SmoothTrail))
            .collect();
        let timing = calc.calculate(&spans);
        assert_eq!(timing[0].segment_time_min, 60.0);
        assert!(timing[5].segment_time_min > timing[2].segment_time_min);
        assert!(timing[5].fatigue_seconds_per_km > 0.0);
        for w in timing.windows(2) {
            assert!(w[1].pace_min_per_km >= w[0].pace_min_per_km);
        }
    }

    #[test]
    fn test_fast_base_pace_is_flagged_aggressive() {
        let config = EngineConfig::default();
        let calc = ForwardPacingCalculator::new(&config, 2.5)
            .with_fatigue(FitnessLevel::Elite, false);
        let timing = calc.calculate(&[span(10.0, 0.0, 0.0, TerrainType::Road)]);
        assert!(timing[0].pace_aggressive);
        assert!(timing[0].pace_min_per_km < 2.85);
    }

    #[test]
    fn test_repeatable() {
        let config = EngineConfig::default();
        let calc = ForwardPacingCalculator::new(&config, 5.5);
        let spans = vec![
            span(12.0, 800.0, 100.0, TerrainType::RockyRunnable),
            span(8.0, 50.0, 700.0, TerrainType::Technical),
            span(20.0, 300.0, 300.0, TerrainType::DirtRoad),
        ];
        assert_eq!(calc.calculate(&spans), calc.calculate(&spans));
    }
}
