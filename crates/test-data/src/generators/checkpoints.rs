//! Checkpoint placement.

use pacing::CheckpointSpec;
use rand::Rng;

use crate::config::CourseConfig;

/// Spreads checkpoints roughly evenly, each nudged by a random offset.
#[derive(Debug, Clone)]
pub struct CheckpointGenerator {
    count: usize,
    min_segment_km: f64,
    dropbag_probability: f64,
    /// Offset as a fraction of the even spacing, below 0.5 so order is preserved.
    jitter: f64,
}

impl CheckpointGenerator {
    pub fn new(config: &CourseConfig) -> Self {
        Self {
            count: config.checkpoint_count,
            min_segment_km: config.min_segment_km,
            dropbag_probability: config.dropbag_probability.clamp(0.0, 1.0),
            jitter: 0.25,
        }
    }

    /// Checkpoints strictly inside `(0, total_km)`, strictly increasing.
    ///
    /// The count drops when the course is too short for the minimum spacing.
    pub fn generate(&self, total_km: f64, rng: &mut impl Rng) -> Vec<CheckpointSpec> {
        let fit = if self.min_segment_km > 0.0 {
            ((total_km / self.min_segment_km).floor() as usize).saturating_sub(1)
        } else {
            self.count
        };
        let count = self.count.min(fit);
        if count == 0 {
            return Vec::new();
        }

        let spacing = total_km / (count + 1) as f64;
        (1..=count)
            .map(|i| {
                let offset = if self.jitter > 0.0 {
                    rng.gen_range(-self.jitter..self.jitter) * spacing
                } else {
                    0.0
                };
                CheckpointSpec {
                    distance_km: ((i as f64 * spacing + offset) * 1000.0).round() / 1000.0,
                    has_dropbag: rng.gen_bool(self.dropbag_probability),
                }
            })
            .collect()
    }
}
