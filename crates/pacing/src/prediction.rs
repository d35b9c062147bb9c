//! Base pace from a recent race performance.
//!
//! Riegel's endurance formula projects the reference time to the target
//! distance. Beyond the marathon an extra intensity downshift accounts for
//! the lower sustainable intensity of ultra distances.

use serde::{Deserialize, Serialize};

use crate::errors::PlanError;

const RIEGEL_EXPONENT: f64 = 1.06;
const MARATHON_KM: f64 = 42.195;
/// Targets up to here count as a marathon, so a rounded 42.2 km is not an ultra.
const MARATHON_ROUNDED_KM: f64 = 42.2;
const DOWNSHIFT_BASE: f64 = 0.10;
const DOWNSHIFT_PER_KM: f64 = 0.0011;
const DOWNSHIFT_MAX: f64 = 0.35;

/// A result the athlete has actually run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferencePerformance {
    pub distance_km: f64,
    pub time_min: f64,
    #[serde(default = "default_true")]
    pub ultra_downshift: bool,
}

fn default_true() -> bool {
    true
}

fn check_positive(value: f64, what: &str) -> Result<(), PlanError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PlanError::InvalidPerformance(format!(
            "{what} must be positive, got {value}"
        )))
    }
}

/// Predicted finish time in minutes for `target_km`.
pub fn predict_race_time_riegel(
    ref_distance_km: f64,
    ref_time_min: f64,
    target_km: f64,
) -> Result<f64, PlanError> {
    check_positive(ref_distance_km, "Reference distance")?;
    check_positive(ref_time_min, "Reference time")?;
    check_positive(target_km, "Target distance")?;
    Ok(ref_time_min * (target_km / ref_distance_km).powf(RIEGEL_EXPONENT))
}

/// Slows a prediction for targets longer than a marathon.
pub fn apply_intensity_downshift(predicted_min: f64, target_km: f64) -> f64 {
    if target_km <= MARATHON_ROUNDED_KM {
        return predicted_min;
    }
    let raw = DOWNSHIFT_BASE + DOWNSHIFT_PER_KM * (target_km - MARATHON_KM);
    let downshift = raw.min(DOWNSHIFT_MAX);
    predicted_min * (1.0 + downshift)
}

/// Flat base pace in min/km for the target distance.
pub fn base_pace_from_performance(
    performance: &ReferencePerformance,
    target_km: f64,
) -> Result<f64, PlanError> {
    let predicted =
        predict_race_time_riegel(performance.distance_km, performance.time_min, target_km)?;
    let adjusted = if performance.ultra_downshift {
        apply_intensity_downshift(predicted, target_km)
    } else {
        predicted
    };
    Ok(adjusted / target_km)
}
