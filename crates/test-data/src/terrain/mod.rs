//! Terrain generation utilities.
//!
//! Elevation comes from Perlin noise; surface types are drawn from the
//! local gradient so steep ground tends to be rougher.

mod elevation;
mod surface;

pub use elevation::{ElevationGenerator, add_elevation_jitter};
pub use surface::SurfaceSampler;
