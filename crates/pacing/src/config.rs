//! Engine configuration: the fixed lookup tables and tuning constants.
//!
//! Every calculator borrows an [`EngineConfig`]; a plan depends only on the
//! request and the config.

use enum_map::{EnumMap, enum_map};
use serde::{Deserialize, Serialize};

use crate::models::{ClimbingAbility, FitnessLevel, TerrainType};

/// Fastest pace the inverse solver will assign, in min/km.
pub const MIN_PACE: f64 = 2.85;
/// Slowest pace the inverse solver will assign, in min/km.
pub const MAX_PACE: f64 = 15.0;

/// Feasible pace band in min/km.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaceBounds {
    pub min: f64,
    pub max: f64,
}

impl Default for PaceBounds {
    fn default() -> Self {
        Self {
            min: MIN_PACE,
            max: MAX_PACE,
        }
    }
}

impl PaceBounds {
    pub fn contains(&self, pace: f64, tolerance: f64) -> bool {
        pace >= self.min - tolerance && pace <= self.max + tolerance
    }
}

/// Fatigue onset point and growth parameters for one fitness level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FatigueParams {
    /// Fatigue onset point in km-effort.
    pub onset_km_effort: f64,
    pub alpha: f64,
    pub beta: f64,
}

impl FatigueParams {
    pub const fn new(onset_km_effort: f64, alpha: f64, beta: f64) -> Self {
        Self {
            onset_km_effort,
            alpha,
            beta,
        }
    }
}

/// How terrain impact is scaled by gradient class in target-time mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientClassConfig {
    /// Absolute gradient beyond which a segment counts as a climb or descent.
    pub threshold: f64,
    pub descent_amplification: f64,
    pub climb_damping: f64,
}

impl Default for GradientClassConfig {
    fn default() -> Self {
        Self {
            threshold: 0.03,
            descent_amplification: 1.3,
            climb_damping: 0.6,
        }
    }
}

/// Tuning for the clamp-and-redistribute solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    pub max_iterations: usize,
    /// Minutes below which a surplus or deficit is ignored.
    pub epsilon_min: f64,
    /// Athlete-independent vertical speed used for climb penalties, m/h.
    pub reference_vertical_speed_m_per_h: f64,
    pub descent_bonus_cap: f64,
    pub descent_bonus_per_gradient: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            epsilon_min: 1e-3,
            reference_vertical_speed_m_per_h: 600.0,
            descent_bonus_cap: 0.20,
            descent_bonus_per_gradient: 2.0,
        }
    }
}

/// Immutable tables and constants owned by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Base vertical speed per climbing ability, m/h.
    pub vertical_speed_m_per_h: EnumMap<ClimbingAbility, f64>,
    /// Horizontal cost multiplier per terrain, 1.0 = smooth trail.
    pub terrain_factors: EnumMap<TerrainType, f64>,
    /// Fraction of the downhill speed gain each terrain allows.
    pub downhill_caps: EnumMap<TerrainType, f64>,
    /// Terrain difficulty score (1..=6) used by effort classification.
    pub terrain_effort_scores: EnumMap<TerrainType, u8>,
    pub fatigue: EnumMap<FitnessLevel, FatigueParams>,
    pub pace_bounds: PaceBounds,
    pub gradient_class: GradientClassConfig,
    pub solver: SolverConfig,
    /// Lowest terrain factor any adjustment may produce.
    pub terrain_floor: f64,
    /// Forward-mode pace above `base pace × ratio` is flagged as capped.
    pub slow_pace_ratio: f64,
    /// Pace below `expected × ratio` is flagged as aggressive.
    pub aggressive_ratio: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            vertical_speed_m_per_h: enum_map! {
                ClimbingAbility::Conservative => 500.0,
                ClimbingAbility::Moderate => 700.0,
                ClimbingAbility::Strong => 900.0,
                ClimbingAbility::VeryStrong => 1100.0,
                ClimbingAbility::Elite => 1300.0,
            },
            terrain_factors: enum_map! {
                TerrainType::Road => 0.90,
                TerrainType::SmoothTrail => 1.00,
                TerrainType::DirtRoad => 1.05,
                TerrainType::RockyRunnable => 1.30,
                TerrainType::Technical => 1.75,
                TerrainType::VeryTechnical => 2.20,
                TerrainType::Scrambling => 2.75,
            },
            downhill_caps: enum_map! {
                TerrainType::Road => 1.00,
                TerrainType::SmoothTrail => 0.95,
                TerrainType::DirtRoad => 0.90,
                TerrainType::RockyRunnable => 0.80,
                TerrainType::Technical => 0.70,
                TerrainType::VeryTechnical => 0.60,
                TerrainType::Scrambling => 0.50,
            },
            terrain_effort_scores: enum_map! {
                TerrainType::Road => 1,
                TerrainType::SmoothTrail => 1,
                TerrainType::DirtRoad => 2,
                TerrainType::RockyRunnable => 3,
                TerrainType::Technical => 4,
                TerrainType::VeryTechnical => 5,
                TerrainType::Scrambling => 6,
            },
            fatigue: enum_map! {
                FitnessLevel::Untrained => FatigueParams::new(25.0, 0.12, 1.0),
                FitnessLevel::Recreational => FatigueParams::new(37.5, 0.10, 1.0),
                FitnessLevel::Trained => FatigueParams::new(55.0, 0.08, 0.95),
                FitnessLevel::Elite => FatigueParams::new(75.0, 0.06, 0.90),
            },
            pace_bounds: PaceBounds::default(),
            gradient_class: GradientClassConfig::default(),
            solver: SolverConfig::default(),
            terrain_floor: 0.5,
            slow_pace_ratio: 2.5,
            aggressive_ratio: 0.75,
        }
    }
}

impl EngineConfig {
    /// Loads a config from JSON, e.g. to try alternate tables.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
