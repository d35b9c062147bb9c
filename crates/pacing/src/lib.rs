pub mod climbing;
pub mod config;
pub mod effort;
pub mod errors;
pub mod fatigue;
pub mod format;
pub mod forward;
pub mod inverse;
pub mod models;
pub mod nutrition;
pub mod plan;
pub mod prediction;
pub mod route;
pub mod terrain;

pub use crate::{
    config::{EngineConfig, MAX_PACE, MIN_PACE},
    errors::PlanError,
    forward::ForwardPacingCalculator,
    inverse::{InverseSolution, InverseTimeSolver, SolverReport},
    models::{
        CheckpointSpec, ClimbingAbility, EffortLevel, FitnessLevel, RouteSample, SegmentSpan,
        SegmentTiming, TerrainType,
    },
    plan::{PacingConfig, PlanRequest, PlanResult, plan_batch, plan_race},
    route::RouteProfile,
};
