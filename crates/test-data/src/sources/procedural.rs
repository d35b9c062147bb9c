//! Procedural course generation.

use geo::{Distance as _, Haversine, Point};
use pacing::RouteSample;
use rand::Rng;

use crate::config::{BoundingBox, CourseConfig};
use crate::terrain::{ElevationGenerator, add_elevation_jitter};

/// Generates synthetic race courses as distance/elevation profiles.
pub struct CourseGenerator {
    config: CourseConfig,
    start_point: Option<(f64, f64)>,
    elevation: ElevationGenerator,
    elevation_jitter_m: f64,
}

impl CourseGenerator {
    pub fn new(seed: u32) -> Self {
        Self {
            config: CourseConfig::default(),
            start_point: None,
            elevation: ElevationGenerator::alpine(seed),
            elevation_jitter_m: 2.0,
        }
    }

    pub fn from_config(config: CourseConfig, seed: u32) -> Self {
        Self {
            config,
            ..Self::new(seed)
        }
    }

    /// Sets the course length.
    pub fn with_distance(mut self, km: f64) -> Self {
        self.config.distance_km = km;
        self
    }

    pub fn with_start(mut self, lat: f64, lon: f64) -> Self {
        self.start_point = Some((lat, lon));
        self
    }

    pub fn with_elevation(mut self, elevation: ElevationGenerator) -> Self {
        self.elevation = elevation;
        self
    }

    pub fn with_elevation_jitter(mut self, meters: f64) -> Self {
        self.elevation_jitter_m = meters;
        self
    }

    pub fn with_point_spacing(mut self, meters: f64) -> Self {
        self.config.point_spacing_m = meters;
        self
    }

    pub fn config(&self) -> &CourseConfig {
        &self.config
    }

    /// Generates the course profile.
    ///
    /// Distances are measured along the generated path, so the last sample
    /// lands at or slightly beyond the configured length.
    pub fn generate(&self, rng: &mut impl Rng) -> Vec<RouteSample> {
        let start = self
            .start_point
            .unwrap_or_else(|| self.config.region.random_point(rng));
        let path = self.generate_path(start, rng);
        self.profile(&path, rng)
    }

    /// Random walk with momentum, coordinates only.
    pub fn generate_path(&self, start: (f64, f64), rng: &mut impl Rng) -> Vec<(f64, f64)> {
        let target_m = self.config.distance_km * 1000.0;
        let mut path = vec![start];
        let mut current = start;
        let mut total_distance = 0.0;
        let mut heading = rng.gen_range(0.0..std::f64::consts::TAU);

        while total_distance < target_m {
            heading += rng.gen_range(-0.3..0.3);
            let step = self.config.point_spacing_m * rng.gen_range(0.8..1.2);

            // 1 degree of latitude is ~111 km, longitude shrinks with latitude
            let lat_delta = (step * heading.cos()) / 111_000.0;
            let lon_delta = (step * heading.sin()) / (111_000.0 * current.0.to_radians().cos());

            let (next_lat, next_lon, bounced_heading) =
                bounce(&self.config.region, current.0 + lat_delta, current.1 + lon_delta, heading);
            heading = bounced_heading;

            let next = (next_lat, next_lon);
            total_distance += haversine_distance(current, next);
            current = next;
            path.push(current);
        }

        path
    }

    fn profile(&self, path: &[(f64, f64)], rng: &mut impl Rng) -> Vec<RouteSample> {
        let mut samples = Vec::with_capacity(path.len());
        let mut distance_m = 0.0;
        let mut previous: Option<(f64, f64)> = None;

        for &(lat, lon) in path {
            distance_m += previous.map_or(0.0, |prev| haversine_distance(prev, (lat, lon)));
            previous = Some((lat, lon));
            let elevation = add_elevation_jitter(
                self.elevation.elevation_at(lat, lon),
                rng,
                self.elevation_jitter_m,
            );
            samples.push(RouteSample::new(distance_m / 1000.0, elevation));
        }

        samples
    }
}

/// Keeps a step inside the bounds, reversing the heading on the crossed edge.
fn bounce(b: &BoundingBox, lat: f64, lon: f64, heading: f64) -> (f64, f64, f64) {
    let mut new_heading = heading;

    let lat = if lat < b.min_lat {
        new_heading = std::f64::consts::PI - heading;
        b.min_lat + (b.min_lat - lat).min(0.001)
    } else if lat > b.max_lat {
        new_heading = std::f64::consts::PI - heading;
        b.max_lat - (lat - b.max_lat).min(0.001)
    } else {
        lat
    };

    let lon = if lon < b.min_lon {
        new_heading = -new_heading;
        b.min_lon + (b.min_lon - lon).min(0.001)
    } else if lon > b.max_lon {
        new_heading = -new_heading;
        b.max_lon - (lon - b.max_lon).min(0.001)
    } else {
        lon
    };

    (lat, lon, new_heading)
}

/// Great-circle distance in meters between two (lat, lon) pairs.
fn haversine_distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    Haversine.distance(Point::new(a.1, a.0), Point::new(b.1, b.0))
}
