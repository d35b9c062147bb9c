//! Plan request generators.
//!
//! - [`CheckpointGenerator`]: interior cut points with drop-bag flags
//! - [`RequestGenerator`]: complete forward or target-time requests on a generated course

pub mod checkpoints;
pub mod request;

pub use checkpoints::CheckpointGenerator;
pub use request::RequestGenerator;
