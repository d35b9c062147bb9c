//! Complete plan requests on generated courses.

use pacing::{
    PacingConfig, PlanError, PlanRequest, RouteProfile,
    nutrition::NutritionRates,
    plan::{BasePace, ForwardParams, InverseParams},
};
use rand::Rng;
use time::Time;

use crate::config::CourseConfig;
use crate::generators::CheckpointGenerator;
use crate::profiles::{AthleteProfile, RunnerProfile, sample_base_pace};
use crate::sources::CourseGenerator;
use crate::terrain::SurfaceSampler;

/// Builds plan requests: course, checkpoints, surfaces and athlete inputs.
pub struct RequestGenerator {
    courses: CourseGenerator,
    surfaces: SurfaceSampler,
    profile: RunnerProfile,
    nutrition: NutritionRates,
    checkpoint_time_min: f64,
    race_start_time: Option<Time>,
}

impl RequestGenerator {
    pub fn new(seed: u32) -> Self {
        Self {
            courses: CourseGenerator::new(seed),
            surfaces: SurfaceSampler::default(),
            profile: RunnerProfile::default(),
            nutrition: NutritionRates::default(),
            checkpoint_time_min: 0.0,
            race_start_time: None,
        }
    }

    pub fn with_course(mut self, config: CourseConfig, seed: u32) -> Self {
        self.courses = CourseGenerator::from_config(config, seed);
        self
    }

    pub fn with_profile(mut self, profile: RunnerProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_nutrition(mut self, nutrition: NutritionRates) -> Self {
        self.nutrition = nutrition;
        self
    }

    pub fn with_checkpoint_time(mut self, minutes: f64) -> Self {
        self.checkpoint_time_min = minutes;
        self
    }

    pub fn with_start_time(mut self, start: Time) -> Self {
        self.race_start_time = Some(start);
        self
    }

    /// Base-pace request with a race-day pace sampled from the profile.
    pub fn forward(&self, rng: &mut impl Rng) -> Result<PlanRequest, PlanError> {
        let base_pace = sample_base_pace(&self.profile, rng);
        let pacing = PacingConfig::Forward(ForwardParams {
            base_pace: BasePace::MinPerKm(base_pace),
            climbing_ability: self.profile.climbing_ability(),
            fatigue_enabled: true,
            fitness_level: self.profile.fitness_level(),
        });
        self.build(pacing, rng)
    }

    /// Target-time request.
    pub fn inverse(&self, target_time_min: f64, rng: &mut impl Rng) -> Result<PlanRequest, PlanError> {
        self.build(PacingConfig::Inverse(InverseParams { target_time_min }), rng)
    }

    fn build(&self, pacing: PacingConfig, rng: &mut impl Rng) -> Result<PlanRequest, PlanError> {
        let route = self.courses.generate(rng);
        let profile = RouteProfile::new(route.clone())?;
        let checkpoints = CheckpointGenerator::new(self.courses.config())
            .generate(profile.total_distance_km(), rng);

        let terrain_types = profile
            .segments(&checkpoints, &[])?
            .iter()
            .map(|span| self.surfaces.sample(span.gradient(), rng))
            .collect();

        Ok(PlanRequest {
            route,
            checkpoints,
            terrain_types,
            pacing,
            skill_level: rng.gen_range(0.2..0.9),
            nutrition: self.nutrition,
            checkpoint_time_min: self.checkpoint_time_min,
            race_start_time: self.race_start_time,
        })
    }
}
