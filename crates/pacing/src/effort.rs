//! Effort labels from gradient and terrain, independent of assigned pace.

use crate::{
    config::EngineConfig,
    models::{EffortLevel, TerrainType},
};

/// Gradient contribution (0..=3) for a signed gradient fraction.
pub fn gradient_score(gradient: f64) -> u8 {
    if gradient > 0.12 {
        3
    } else if gradient > 0.08 {
        2
    } else if gradient > 0.04 {
        1
    } else {
        0
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EffortClassifier<'a> {
    config: &'a EngineConfig,
}

impl<'a> EffortClassifier<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    pub fn difficulty_score(&self, gradient: f64, terrain: TerrainType) -> i32 {
        let terrain_score = i32::from(self.config.terrain_effort_scores[terrain]);
        i32::from(gradient_score(gradient)) + (terrain_score - 1)
    }

    pub fn classify(&self, gradient: f64, terrain: TerrainType) -> EffortLevel {
        match self.difficulty_score(gradient, terrain) {
            i32::MIN..=0 => EffortLevel::Easy,
            1..=2 => EffortLevel::Medium,
            3..=4 => EffortLevel::Hard,
            _ => EffortLevel::VeryHard,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_scores() {
        assert_eq!(gradient_score(0.0), 0);
        assert_eq!(gradient_score(0.04), 0);
        assert_eq!(gradient_score(0.05), 1);
        assert_eq!(gradient_score(0.09), 2);
        assert_eq!(gradient_score(0.13), 3);
        // descents never score
        assert_eq!(gradient_score(-0.20), 0);
    }

    #[test]
    fn test_labels() {
        let config = EngineConfig::default();
        let classifier = EffortClassifier::new(&config);
        let cases = [
            (0.0, TerrainType::Road, EffortLevel::Easy),
            (0.05, TerrainType::SmoothTrail, EffortLevel::Medium),
            (0.0, TerrainType::RockyRunnable, EffortLevel::Medium),
            (0.10, TerrainType::RockyRunnable, EffortLevel::Hard),
            (0.0, TerrainType::VeryTechnical, EffortLevel::Hard),
            (0.15, TerrainType::Technical, EffortLevel::VeryHard),
            (0.0, TerrainType::Scrambling, EffortLevel::VeryHard),
        ];
        for (gradient, terrain, expected) in cases {
            assert_eq!(
                classifier.classify(gradient, terrain),
                expected,
                "{gradient} on {terrain:?}"
            );
        }
    }

    #[test]
    fn test_same_inputs_same_label() {
        let config = EngineConfig::default();
        let classifier = EffortClassifier::new(&config);
        let first = classifier.classify(0.07, TerrainType::DirtRoad);
        for _ in 0..10 {
            assert_eq!(classifier.classify(0.07, TerrainType::DirtRoad), first);
        }
    }
}
