//! Trail runner profile.

use pacing::{ClimbingAbility, FitnessLevel};

use super::AthleteProfile;

#[derive(Debug, Clone)]
pub struct RunnerProfile {
    /// Flat pace in min/km.
    base_pace: f64,
    climbing_ability: ClimbingAbility,
    fitness_level: FitnessLevel,
    /// Performance variance (coefficient of variation).
    variance: f64,
}

impl Default for RunnerProfile {
    fn default() -> Self {
        Self {
            base_pace: 6.0,
            climbing_ability: ClimbingAbility::Moderate,
            fitness_level: FitnessLevel::Recreational,
            variance: 0.08,
        }
    }
}

impl RunnerProfile {
    /// Creates a runner with the given flat pace, e.g. 5.0 for 5:00/km.
    pub fn with_pace(pace_min_per_km: f64) -> Self {
        Self {
            base_pace: pace_min_per_km,
            ..Default::default()
        }
    }

    pub fn with_climbing(mut self, ability: ClimbingAbility) -> Self {
        self.climbing_ability = ability;
        self
    }

    pub fn with_fitness(mut self, fitness: FitnessLevel) -> Self {
        self.fitness_level = fitness;
        self
    }

    /// Front-of-the-pack mountain runner (~4:00/km).
    pub fn elite() -> Self {
        Self::with_pace(4.0)
            .with_climbing(ClimbingAbility::Elite)
            .with_fitness(FitnessLevel::Elite)
    }

    /// Regular ultra finisher (~5:30/km).
    pub fn trained() -> Self {
        Self::with_pace(5.5)
            .with_climbing(ClimbingAbility::Strong)
            .with_fitness(FitnessLevel::Trained)
    }

    /// Weekend trail runner (~6:00/km).
    pub fn recreational() -> Self {
        Self::default()
    }

    /// First ultra (~7:30/km).
    pub fn beginner() -> Self {
        Self::with_pace(7.5)
            .with_climbing(ClimbingAbility::Conservative)
            .with_fitness(FitnessLevel::Untrained)
    }
}

impl AthleteProfile for RunnerProfile {
    fn base_pace_min_per_km(&self) -> f64 {
        self.base_pace
    }

    fn climbing_ability(&self) -> ClimbingAbility {
        self.climbing_ability
    }

    fn fitness_level(&self) -> FitnessLevel {
        self.fitness_level
    }

    fn variance(&self) -> f64 {
        self.variance
    }
}
