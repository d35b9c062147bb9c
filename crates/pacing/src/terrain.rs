//! Terrain difficulty multipliers.

use crate::{config::EngineConfig, models::TerrainType};

/// Gradient class used by the target-time terrain adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientClass {
    Descent,
    Flat,
    Climb,
}

#[derive(Debug, Clone, Copy)]
pub struct TerrainModel<'a> {
    config: &'a EngineConfig,
}

impl<'a> TerrainModel<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    /// Table value for a terrain, ignoring gradient and skill.
    pub fn base_factor(&self, terrain: TerrainType) -> f64 {
        self.floor(self.config.terrain_factors[terrain])
    }

    /// Base-pace mode factor: the table value pulled toward 1.0 by skill.
    pub fn skill_adjusted_factor(&self, terrain: TerrainType, skill_level: f64) -> f64 {
        let skill = skill_level.clamp(0.0, 1.0);
        let base = self.config.terrain_factors[terrain];
        self.floor(1.0 + (base - 1.0) * (1.0 - skill))
    }

    pub fn classify(&self, gradient: f64) -> GradientClass {
        let threshold = self.config.gradient_class.threshold;
        if gradient < -threshold {
            GradientClass::Descent
        } else if gradient > threshold {
            GradientClass::Climb
        } else {
            GradientClass::Flat
        }
    }

    /// Target-time mode factor: terrain bites harder downhill and softer uphill.
    pub fn gradient_adjusted_factor(&self, terrain: TerrainType, gradient: f64) -> f64 {
        let base = self.config.terrain_factors[terrain];
        let class = &self.config.gradient_class;
        let adjusted = match self.classify(gradient) {
            GradientClass::Descent => 1.0 + (base - 1.0) * class.descent_amplification,
            GradientClass::Climb => 1.0 + (base - 1.0) * class.climb_damping,
            GradientClass::Flat => base,
        };
        self.floor(adjusted)
    }

    fn floor(&self, factor: f64) -> f64 {
        factor.max(self.config.terrain_floor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_base_factors() {
        let config = EngineConfig::default();
        let model = TerrainModel::new(&config);
        assert_eq!(model.base_factor(TerrainType::SmoothTrail), 1.0);
        assert_eq!(model.base_factor(TerrainType::Road), 0.90);
        assert_eq!(model.base_factor(TerrainType::Technical), 1.75);
    }

    #[test]
    fn test_skill_pulls_toward_one() {
        let config = EngineConfig::default();
        let model = TerrainModel::new(&config);
        let novice = model.skill_adjusted_factor(TerrainType::Technical, 0.0);
        let mid = model.skill_adjusted_factor(TerrainType::Technical, 0.5);
        let expert = model.skill_adjusted_factor(TerrainType::Technical, 1.0);
        assert!((novice - 1.75).abs() < EPS);
        assert!((mid - 1.375).abs() < EPS);
        assert!((expert - 1.0).abs() < EPS);
        let road = model.skill_adjusted_factor(TerrainType::Road, 0.5);
        assert!((road - 0.95).abs() < EPS);
    }

    #[test]
    fn test_gradient_classes() {
        let config = EngineConfig::default();
        let model = TerrainModel::new(&config);
        let t = TerrainType::Technical;
        assert!((model.gradient_adjusted_factor(t, -0.05) - (1.0 + 0.75 * 1.3)).abs() < EPS);
        assert!((model.gradient_adjusted_factor(t, 0.05) - (1.0 + 0.75 * 0.6)).abs() < EPS);
        assert!((model.gradient_adjusted_factor(t, 0.02) - 1.75).abs() < EPS);
        assert!((model.gradient_adjusted_factor(t, -0.03) - 1.75).abs() < EPS);
    }

    #[test]
    fn test_factor_never_below_floor() {
        let mut config = EngineConfig::default();
        config.terrain_factors[TerrainType::Road] = 0.1;
        let model = TerrainModel::new(&config);
        assert_eq!(model.gradient_adjusted_factor(TerrainType::Road, -0.2), 0.5);
        assert_eq!(model.base_factor(TerrainType::Road), 0.5);
    }
}
