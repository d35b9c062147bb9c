//! Gradient-aware terrain type selection.

use pacing::TerrainType;
use rand::{Rng, distributions::WeightedIndex};
use rand_distr::Distribution;

const SURFACES: [TerrainType; 7] = [
    TerrainType::Road,
    TerrainType::SmoothTrail,
    TerrainType::DirtRoad,
    TerrainType::RockyRunnable,
    TerrainType::Technical,
    TerrainType::VeryTechnical,
    TerrainType::Scrambling,
];

/// Draws a plausible surface for a segment.
///
/// Weights follow the order of [`TerrainType`]; steeper segments shift
/// weight toward technical ground.
#[derive(Debug, Clone)]
pub struct SurfaceSampler {
    gentle: WeightedIndex<u32>,
    rolling: WeightedIndex<u32>,
    steep: WeightedIndex<u32>,
}

impl Default for SurfaceSampler {
    fn default() -> Self {
        Self::new([20, 40, 20, 15, 5, 0, 0], [5, 30, 15, 30, 15, 5, 0], [0, 10, 5, 25, 30, 20, 10])
            .expect("default surface weights are valid")
    }
}

impl SurfaceSampler {
    /// Returns `None` when any weight table sums to zero.
    pub fn new(gentle: [u32; 7], rolling: [u32; 7], steep: [u32; 7]) -> Option<Self> {
        Some(Self {
            gentle: WeightedIndex::new(gentle).ok()?,
            rolling: WeightedIndex::new(rolling).ok()?,
            steep: WeightedIndex::new(steep).ok()?,
        })
    }

    /// Surface for a segment with the given signed gradient fraction.
    pub fn sample(&self, gradient: f64, rng: &mut impl Rng) -> TerrainType {
        let table = match gradient.abs() {
            g if g < 0.03 => &self.gentle,
            g if g < 0.08 => &self.rolling,
            _ => &self.steep,
        };
        SURFACES[table.sample(rng)]
    }
}
