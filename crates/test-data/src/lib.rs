//! Synthetic race data for the pacing engine.
//!
//! Generates realistic mountain courses (Perlin-noise elevation along a
//! random-walk path), checkpoint layouts, surface types and athlete inputs,
//! and assembles them into [`pacing::PlanRequest`]s for integration tests
//! and manual runs of the planner.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use test_data::prelude::*;
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let request = RequestGenerator::new(7)
//!     .with_course(CourseConfig::hundred_miler(), 7)
//!     .with_profile(RunnerProfile::trained())
//!     .forward(&mut rng)?;
//! ```

pub mod config;
pub mod generators;
pub mod profiles;
pub mod sources;
pub mod terrain;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::config::{BoundingBox, CourseConfig, Region};
    pub use crate::generators::{CheckpointGenerator, RequestGenerator};
    pub use crate::profiles::{AthleteProfile, RunnerProfile, sample_base_pace};
    pub use crate::sources::CourseGenerator;
    pub use crate::terrain::{ElevationGenerator, SurfaceSampler};
    pub use rand::{SeedableRng, rngs::StdRng};
}
