//! Configuration types for course generation.

use serde::{Deserialize, Serialize};

/// Geographic bounding box defined by southwest and northeast corners.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Minimum latitude (south)
    pub min_lat: f64,
    /// Minimum longitude (west)
    pub min_lon: f64,
    /// Maximum latitude (north)
    pub max_lat: f64,
    /// Maximum longitude (east)
    pub max_lon: f64,
}

impl BoundingBox {
    pub const fn new(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        }
    }

    /// Returns a random point within the bounding box.
    pub fn random_point(&self, rng: &mut impl rand::Rng) -> (f64, f64) {
        let lat = rng.gen_range(self.min_lat..self.max_lat);
        let lon = rng.gen_range(self.min_lon..self.max_lon);
        (lat, lon)
    }
}

/// Pre-defined regions to lay courses in.
#[derive(Debug, Clone, Copy)]
pub struct Region;

impl Region {
    /// Chamonix valley and the surrounding massifs.
    pub const CHAMONIX: BoundingBox = BoundingBox::new(45.7, 6.7, 46.1, 7.2);

    /// Western States country, Sierra foothills.
    pub const SIERRA_FOOTHILLS: BoundingBox = BoundingBox::new(38.8, -121.2, 39.3, -120.2);
}

/// Shape of a generated race.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseConfig {
    /// Course length in kilometers.
    pub distance_km: f64,

    /// Number of intermediate checkpoints.
    pub checkpoint_count: usize,

    /// Probability that a checkpoint holds a drop bag.
    pub dropbag_probability: f64,

    /// Minimum distance between cut points, km.
    pub min_segment_km: f64,

    /// Approximate distance between route samples in meters.
    pub point_spacing_m: f64,

    /// Target region for the course.
    pub region: BoundingBox,
}

impl Default for CourseConfig {
    fn default() -> Self {
        Self {
            distance_km: 50.0,
            checkpoint_count: 5,
            dropbag_probability: 0.3,
            min_segment_km: 2.0,
            point_spacing_m: 100.0,
            region: Region::CHAMONIX,
        }
    }
}

impl CourseConfig {
    pub fn marathon() -> Self {
        Self {
            distance_km: 42.195,
            checkpoint_count: 4,
            dropbag_probability: 0.0,
            ..Default::default()
        }
    }

    pub fn hundred_miler() -> Self {
        Self {
            distance_km: 160.9,
            checkpoint_count: 14,
            dropbag_probability: 0.25,
            point_spacing_m: 200.0,
            region: Region::SIERRA_FOOTHILLS,
            ..Default::default()
        }
    }
}
