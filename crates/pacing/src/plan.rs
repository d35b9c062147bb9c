//! Request/response types and the end-to-end planning pipeline.
//!
//! A [`PlanRequest`] is validated, the route is sliced at the checkpoints,
//! one of the two calculators fills in times, and the result is annotated
//! with effort labels, nutrition targets and clock times.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use time::Time;
use tracing::{info, warn};
use validator::Validate;

use crate::{
    config::EngineConfig,
    effort::EffortClassifier,
    errors::PlanError,
    format::{format_duration, format_pace, format_time_of_day, time_of_day},
    forward::ForwardPacingCalculator,
    inverse::{InverseTimeSolver, SolverReport},
    models::{
        CheckpointSpec, ClimbingAbility, EffortLevel, FitnessLevel, RouteSample, SegmentSpan,
        SegmentTiming, TerrainType,
    },
    nutrition::{DropBag, NutritionAllocator, NutritionRates, SegmentNutrition},
    prediction::{ReferencePerformance, base_pace_from_performance},
    route::RouteProfile,
};

time::serde::format_description!(hh_mm, Time, "[hour]:[minute]");

const ELEVATION_PROFILE_POINTS: usize = 500;

fn default_skill_level() -> f64 {
    0.5
}

fn default_true() -> bool {
    true
}

/// Flat pace, given directly or derived from a recent race.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BasePace {
    MinPerKm(f64),
    FromPerformance(ReferencePerformance),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardParams {
    pub base_pace: BasePace,
    #[serde(default)]
    pub climbing_ability: ClimbingAbility,
    #[serde(default = "default_true")]
    pub fatigue_enabled: bool,
    #[serde(default)]
    pub fitness_level: FitnessLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct InverseParams {
    #[validate(range(exclusive_min = 0.0, message = "Target time must be positive"))]
    pub target_time_min: f64,
}

/// Pacing mode and its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PacingConfig {
    Forward(ForwardParams),
    Inverse(InverseParams),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PacingMode {
    Forward,
    Inverse,
}

impl PacingConfig {
    pub fn mode(&self) -> PacingMode {
        match self {
            PacingConfig::Forward(_) => PacingMode::Forward,
            PacingConfig::Inverse(_) => PacingMode::Inverse,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PlanRequest {
    pub route: Vec<RouteSample>,
    #[serde(default)]
    pub checkpoints: Vec<CheckpointSpec>,
    /// One per segment, or empty for all smooth trail.
    #[serde(default)]
    pub terrain_types: Vec<TerrainType>,
    pub pacing: PacingConfig,
    #[serde(default = "default_skill_level")]
    #[validate(range(min = 0.0, max = 1.0, message = "Skill level must be between 0 and 1"))]
    pub skill_level: f64,
    #[serde(default)]
    pub nutrition: NutritionRates,
    /// Dwell time at every intermediate checkpoint.
    #[serde(default)]
    #[validate(range(
        min = 0.0,
        max = 720.0,
        message = "Checkpoint time must be between 0 and 720 minutes"
    ))]
    pub checkpoint_time_min: f64,
    #[serde(default, with = "hh_mm::option", skip_serializing_if = "Option::is_none")]
    pub race_start_time: Option<Time>,
}

impl PlanRequest {
    pub fn from_json(json: &str) -> Result<Self, PlanError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// One scheduled segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentPlan {
    #[serde(flatten)]
    pub span: SegmentSpan,
    pub gradient: f64,
    #[serde(flatten)]
    pub timing: SegmentTiming,
    /// `m:ss` per km.
    pub pace: String,
    pub segment_time: String,
    pub cumulative_time_min: f64,
    /// Elapsed race time at the end of the segment, checkpoint stops included.
    pub arrival_time_min: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<String>,
    pub effort_level: EffortLevel,
    pub nutrition: SegmentNutrition,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanSummary {
    pub mode: PacingMode,
    pub total_distance_km: f64,
    pub total_elev_gain_m: f64,
    pub total_elev_loss_m: f64,
    pub moving_time_min: f64,
    pub checkpoint_time_min: f64,
    pub race_time_min: f64,
    pub race_time: String,
    pub total_carbs_g: f64,
    pub total_water_l: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_gels: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_pace_min_per_km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_time_of_day: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solver: Option<SolverReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanResult {
    pub segments: Vec<SegmentPlan>,
    pub summary: PlanSummary,
    pub dropbags: Vec<DropBag>,
    pub elevation_profile: Vec<RouteSample>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

fn resolve_base_pace(base_pace: &BasePace, total_distance_km: f64) -> Result<f64, PlanError> {
    let pace = match base_pace {
        BasePace::MinPerKm(pace) => *pace,
        BasePace::FromPerformance(performance) => {
            base_pace_from_performance(performance, total_distance_km)?
        }
    };
    if !pace.is_finite() || pace <= 0.0 {
        return Err(PlanError::InvalidInput(format!(
            "Base pace must be positive, got {pace}"
        )));
    }
    Ok(pace)
}

/// Validates the request and builds the full plan.
pub fn plan_race(config: &EngineConfig, request: &PlanRequest) -> Result<PlanResult, PlanError> {
    request.validate()?;
    request.nutrition.validate()?;
    if let PacingConfig::Inverse(params) = &request.pacing {
        params.validate()?;
    }

    let profile = RouteProfile::new(request.route.clone())?;
    let spans = profile.segments(&request.checkpoints, &request.terrain_types)?;
    let checkpoint_count = request.checkpoints.len();
    let total_stop_min = checkpoint_count as f64 * request.checkpoint_time_min;

    info!(
        mode = ?request.pacing.mode(),
        segments = spans.len(),
        distance_km = profile.total_distance_km(),
        "Planning race"
    );

    let (timings, base_pace, solver) = match &request.pacing {
        PacingConfig::Forward(params) => {
            let base_pace = resolve_base_pace(&params.base_pace, profile.total_distance_km())?;
            let timings = ForwardPacingCalculator::new(config, base_pace)
                .with_climbing_ability(params.climbing_ability)
                .with_fatigue(params.fitness_level, params.fatigue_enabled)
                .with_skill_level(request.skill_level)
                .calculate(&spans);
            (timings, Some(base_pace), None)
        }
        PacingConfig::Inverse(params) => {
            let moving_target = params.target_time_min - total_stop_min;
            if moving_target <= 0.0 {
                return Err(PlanError::InvalidInput(format!(
                    "Target time {} min leaves no moving time after {} min at checkpoints",
                    params.target_time_min, total_stop_min
                )));
            }
            let solution = InverseTimeSolver::new(config).solve(&spans, moving_target);
            (solution.timings, None, Some(solution.report))
        }
    };

    let classifier = EffortClassifier::new(config);
    let allocator = NutritionAllocator::new(request.nutrition);
    let targets: Vec<SegmentNutrition> = timings
        .iter()
        .map(|t| allocator.allocate(t.segment_time_min))
        .collect();
    let dropbags = allocator.plan_dropbags(&spans, &targets);

    let mut cumulative = 0.0;
    let mut arrival = 0.0;
    let last_index = spans.len().saturating_sub(1);
    let segments: Vec<SegmentPlan> = spans
        .into_iter()
        .zip(timings)
        .zip(targets)
        .enumerate()
        .map(|(i, ((span, timing), nutrition))| {
            cumulative += timing.segment_time_min;
            arrival += timing.segment_time_min;
            let gradient = span.gradient();
            let plan = SegmentPlan {
                effort_level: classifier.classify(gradient, span.terrain_type),
                gradient,
                pace: format_pace(timing.pace_min_per_km),
                segment_time: format_duration(timing.segment_time_min),
                cumulative_time_min: cumulative,
                arrival_time_min: arrival,
                time_of_day: request
                    .race_start_time
                    .map(|start| format_time_of_day(time_of_day(start, arrival))),
                span,
                timing,
                nutrition,
            };
            // stop at the checkpoint that ends this segment
            if i < last_index {
                arrival += request.checkpoint_time_min;
            }
            plan
        })
        .collect();

    let moving_time_min: f64 = segments.iter().map(|s| s.timing.segment_time_min).sum();
    let race_time_min = moving_time_min + total_stop_min;
    let elevation = profile.elevation_change();
    let total_gels = segments
        .iter()
        .map(|s| s.nutrition.gels)
        .sum::<Option<u32>>();

    let summary = PlanSummary {
        mode: request.pacing.mode(),
        total_distance_km: profile.total_distance_km(),
        total_elev_gain_m: elevation.gain_m,
        total_elev_loss_m: elevation.loss_m,
        moving_time_min,
        checkpoint_time_min: total_stop_min,
        race_time_min,
        race_time: format_duration(race_time_min),
        total_carbs_g: segments.iter().map(|s| s.nutrition.carbs_g).sum(),
        total_water_l: segments.iter().map(|s| s.nutrition.water_l).sum(),
        total_gels,
        base_pace_min_per_km: base_pace,
        finish_time_of_day: request
            .race_start_time
            .map(|start| format_time_of_day(time_of_day(start, race_time_min))),
        solver,
    };

    let warning = summary.solver.as_ref().and_then(|r| r.warning.clone());
    let capped = segments.iter().filter(|s| s.timing.pace_capped).count();
    if capped > 0 && summary.mode == PacingMode::Forward {
        warn!(capped, "Forward plan has segments outside the pace band");
    }
    info!(
        race_time = %summary.race_time,
        moving_time_min,
        "Plan ready"
    );

    Ok(PlanResult {
        segments,
        summary,
        dropbags,
        elevation_profile: profile.downsample(ELEVATION_PROFILE_POINTS),
        warning,
    })
}

/// Plans independent requests in parallel. Results keep request order.
pub fn plan_batch(
    config: &EngineConfig,
    requests: &[PlanRequest],
) -> Vec<Result<PlanResult, PlanError>> {
    requests
        .par_iter()
        .map(|request| plan_race(config, request))
        .collect()
}
