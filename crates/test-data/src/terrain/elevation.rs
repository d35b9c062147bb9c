//! Perlin noise-based elevation generation.

use noise::{NoiseFn, Perlin};
use rand::Rng;
use rand_distr::{Distribution, Normal};

const METERS_PER_DEGREE: f64 = 111_000.0;

/// Generates mountain elevation using fractal Perlin noise.
///
/// Coordinates are projected to meters before sampling so `frequency`
/// reads as cycles per meter and the terrain looks the same at any latitude.
#[derive(Debug, Clone)]
pub struct ElevationGenerator {
    perlin: Perlin,
    /// Base elevation in meters (e.g., valley floor).
    base_elevation: f64,
    /// Amplitude of the terrain variation in meters.
    height_scale: f64,
    /// Spatial frequency in cycles per meter.
    frequency: f64,
    /// Number of noise octaves for detail.
    octaves: u32,
}

impl ElevationGenerator {
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            base_elevation: 1200.0,
            height_scale: 600.0,
            frequency: 1.0 / 10_000.0,
            octaves: 4,
        }
    }

    /// High mountains: big cols, long climbs.
    pub fn alpine(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            base_elevation: 1800.0,
            height_scale: 900.0,
            frequency: 1.0 / 8_000.0,
            octaves: 5,
        }
    }

    /// Rolling foothills.
    pub fn foothills(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            base_elevation: 700.0,
            height_scale: 300.0,
            frequency: 1.0 / 6_000.0,
            octaves: 4,
        }
    }

    /// Nearly flat terrain.
    pub fn flat(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            base_elevation: 100.0,
            height_scale: 10.0,
            frequency: 1.0 / 20_000.0,
            octaves: 2,
        }
    }

    pub fn with_height_scale(mut self, scale: f64) -> Self {
        self.height_scale = scale;
        self
    }

    pub fn base_elevation(&self) -> f64 {
        self.base_elevation
    }

    pub fn height_scale(&self) -> f64 {
        self.height_scale
    }

    /// Elevation at a lat/lon coordinate, fractal Brownian motion over the octaves.
    pub fn elevation_at(&self, lat: f64, lon: f64) -> f64 {
        let y = lat * METERS_PER_DEGREE;
        let x = lon * METERS_PER_DEGREE * lat.to_radians().cos();

        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = self.frequency;
        let mut max_amplitude = 0.0;

        for _ in 0..self.octaves {
            total += self.perlin.get([x * frequency, y * frequency]) * amplitude;
            max_amplitude += amplitude;
            amplitude *= 0.5;
            frequency *= 2.0;
        }

        self.base_elevation + (total / max_amplitude) * self.height_scale
    }

    /// Elevation for each coordinate of a path.
    pub fn elevation_profile(&self, coords: &[(f64, f64)]) -> Vec<f64> {
        coords
            .iter()
            .map(|(lat, lon)| self.elevation_at(*lat, *lon))
            .collect()
    }
}

/// Barometric/GPS noise on an elevation reading. A zero deviation leaves it unchanged.
pub fn add_elevation_jitter(elevation: f64, rng: &mut impl Rng, std_dev: f64) -> f64 {
    match Normal::new(0.0, std_dev) {
        Ok(normal) if std_dev > 0.0 => elevation + normal.sample(rng),
        _ => elevation,
    }
}
