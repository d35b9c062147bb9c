//! Athlete profiles.
//!
//! Profiles supply the ability inputs of a forward-mode plan: a flat pace,
//! a climbing ability and a fitness level, plus day-to-day variance.

mod runner;

use pacing::{ClimbingAbility, FitnessLevel};
use rand_distr::{Distribution, Normal};

pub use runner::RunnerProfile;

/// Ability inputs for a pacing plan.
pub trait AthleteProfile: Send + Sync {
    /// Flat pace in minutes per kilometer.
    fn base_pace_min_per_km(&self) -> f64;

    fn climbing_ability(&self) -> ClimbingAbility;

    fn fitness_level(&self) -> FitnessLevel;

    /// Day-to-day performance variance as a coefficient of variation (0.0 - 1.0).
    fn variance(&self) -> f64;
}

/// Samples a race-day flat pace around the profile's base pace.
pub fn sample_base_pace(profile: &dyn AthleteProfile, rng: &mut impl rand::Rng) -> f64 {
    let base = profile.base_pace_min_per_km();
    let std_dev = profile.variance();
    if std_dev <= 0.0 {
        return base;
    }
    match Normal::new(1.0, std_dev) {
        Ok(normal) => {
            let factor: f64 = normal.sample(rng);
            base * factor.clamp(0.8, 1.25)
        }
        Err(_) => base,
    }
}
