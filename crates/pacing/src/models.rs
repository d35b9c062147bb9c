//! Domain types shared by the pacing engine and its callers.

use enum_map::Enum;
use serde::{Deserialize, Serialize};

/// Surface classification assigned to each segment by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Enum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainType {
    Road,
    #[default]
    SmoothTrail,
    DirtRoad,
    RockyRunnable,
    Technical,
    VeryTechnical,
    Scrambling,
}

/// Climbing ability, mapped to a sustainable vertical speed by [`crate::config::EngineConfig`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Enum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClimbingAbility {
    Conservative,
    #[default]
    Moderate,
    Strong,
    VeryStrong,
    Elite,
}

/// Fitness level, controls when fatigue sets in and how fast it grows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Enum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessLevel {
    Untrained,
    #[default]
    Recreational,
    Trained,
    Elite,
}

/// Qualitative difficulty of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffortLevel {
    Easy,
    Medium,
    Hard,
    VeryHard,
}

/// One point of the route's distance/elevation profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteSample {
    /// Cumulative distance from the start in kilometers.
    pub distance_km: f64,
    /// Elevation in meters.
    pub elevation_m: f64,
}

impl RouteSample {
    pub const fn new(distance_km: f64, elevation_m: f64) -> Self {
        Self {
            distance_km,
            elevation_m,
        }
    }
}

/// A checkpoint cut point supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CheckpointSpec {
    pub distance_km: f64,
    #[serde(default)]
    pub has_dropbag: bool,
}

/// Route portion between two consecutive cut points, as sliced from the profile.
///
/// Spans carry geometry only; the calculators turn them into [`SegmentTiming`]s.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentSpan {
    pub from: String,
    pub to: String,
    pub start_km: f64,
    pub end_km: f64,
    pub distance_km: f64,
    pub elev_gain_m: f64,
    pub elev_loss_m: f64,
    pub terrain_type: TerrainType,
    /// Whether the checkpoint at the start of this span holds a drop bag.
    pub has_dropbag: bool,
}

impl SegmentSpan {
    /// Signed net gradient as a fraction (0.10 = 10% up).
    pub fn gradient(&self) -> f64 {
        if self.distance_km <= 0.0 {
            return 0.0;
        }
        (self.elev_gain_m - self.elev_loss_m) / (self.distance_km * 1000.0)
    }

    /// Effort contribution in km-effort: distance plus weighted ascent and descent.
    pub fn km_effort(&self) -> f64 {
        self.distance_km + self.elev_gain_m / 100.0 + self.elev_loss_m / 200.0
    }
}

/// Per-segment output of a pacing calculator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SegmentTiming {
    pub terrain_factor: f64,
    pub pace_min_per_km: f64,
    pub segment_time_min: f64,
    /// Pace with climbing and descent applied, before terrain and fatigue.
    pub elev_pace_min_per_km: f64,
    pub fatigue_seconds_per_km: f64,
    pub pace_capped: bool,
    pub pace_aggressive: bool,
}
