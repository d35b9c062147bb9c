//! Route profile: ordered distance/elevation samples and slicing into segments.

use crate::{
    errors::PlanError,
    models::{CheckpointSpec, RouteSample, SegmentSpan, TerrainType},
};

/// Incremental metric over consecutive route samples.
pub trait ProfileMetric {
    type Score;
    fn next_sample(&mut self, sample: &RouteSample);
    fn finish(&mut self) -> Self::Score;
}

/// Accumulated ascent and descent in meters.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ElevationChange {
    pub gain_m: f64,
    pub loss_m: f64,
}

#[derive(Debug, Clone, Default)]
struct ElevationChangeMetric {
    change: ElevationChange,
    last_elevation: Option<f64>,
}

impl ProfileMetric for ElevationChangeMetric {
    type Score = ElevationChange;

    fn next_sample(&mut self, sample: &RouteSample) {
        if let Some(last) = self.last_elevation {
            let diff = sample.elevation_m - last;
            if diff > 0.0 {
                self.change.gain_m += diff;
            } else {
                self.change.loss_m += -diff;
            }
        }
        self.last_elevation = Some(sample.elevation_m);
    }

    fn finish(&mut self) -> ElevationChange {
        self.change
    }
}

/// Validated, immutable route profile.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteProfile {
    samples: Vec<RouteSample>,
}

impl RouteProfile {
    /// Builds a profile, rejecting empty, non-finite, negative or non-monotonic input.
    pub fn new(samples: Vec<RouteSample>) -> Result<Self, PlanError> {
        let Some(first) = samples.first() else {
            return Err(PlanError::EmptyRoute);
        };
        if first.distance_km < 0.0 {
            return Err(PlanError::InvalidInput(
                "Route distances must be non-negative".to_string(),
            ));
        }
        if let Some(bad) = samples
            .iter()
            .position(|s| !s.distance_km.is_finite() || !s.elevation_m.is_finite())
        {
            return Err(PlanError::InvalidInput(format!(
                "Route sample {bad} is not finite"
            )));
        }
        if let Some(i) = samples
            .windows(2)
            .position(|w| w[1].distance_km < w[0].distance_km)
        {
            return Err(PlanError::InvalidInput(format!(
                "Route distance decreases at sample {}",
                i + 1
            )));
        }

        let profile = Self { samples };
        if profile.total_distance_km() <= 0.0 {
            return Err(PlanError::ZeroDistance);
        }
        Ok(profile)
    }

    fn start_km(&self) -> f64 {
        self.samples[0].distance_km
    }

    fn end_km(&self) -> f64 {
        self.samples[self.samples.len() - 1].distance_km
    }

    pub fn total_distance_km(&self) -> f64 {
        self.end_km() - self.start_km()
    }

    pub fn elevation_change(&self) -> ElevationChange {
        let mut metric = ElevationChangeMetric::default();
        for sample in &self.samples {
            metric.next_sample(sample);
        }
        metric.finish()
    }

    /// Elevation at a distance, linearly interpolated between samples.
    pub fn elevation_at(&self, distance_km: f64) -> f64 {
        let idx = self
            .samples
            .partition_point(|s| s.distance_km < distance_km);

        if idx == 0 {
            return self.samples[0].elevation_m;
        }
        if idx == self.samples.len() {
            return self.samples[idx - 1].elevation_m;
        }

        let lower = self.samples[idx - 1];
        let upper = self.samples[idx];
        let span = upper.distance_km - lower.distance_km;
        if span <= f64::EPSILON {
            return upper.elevation_m;
        }
        let t = (distance_km - lower.distance_km) / span;
        lower.elevation_m + (upper.elevation_m - lower.elevation_m) * t
    }

    /// Elevation change between two distances, including interpolated end points.
    pub fn elevation_change_between(&self, from_km: f64, to_km: f64) -> ElevationChange {
        let mut metric = ElevationChangeMetric::default();
        metric.next_sample(&RouteSample::new(from_km, self.elevation_at(from_km)));

        let lo = self.samples.partition_point(|s| s.distance_km <= from_km);
        let hi = self.samples.partition_point(|s| s.distance_km < to_km);
        if lo < hi {
            for sample in &self.samples[lo..hi] {
                metric.next_sample(sample);
            }
        }

        metric.next_sample(&RouteSample::new(to_km, self.elevation_at(to_km)));
        metric.finish()
    }

    /// Slices the route at the checkpoint distances.
    ///
    /// `terrain_types` is either empty (every segment is smooth trail) or holds
    /// exactly one entry per segment.
    pub fn segments(
        &self,
        checkpoints: &[CheckpointSpec],
        terrain_types: &[TerrainType],
    ) -> Result<Vec<SegmentSpan>, PlanError> {
        self.validate_checkpoints(checkpoints)?;

        let segment_count = checkpoints.len() + 1;
        if !terrain_types.is_empty() && terrain_types.len() != segment_count {
            return Err(PlanError::TerrainCountMismatch {
                expected: segment_count,
                got: terrain_types.len(),
            });
        }

        let mut cuts = Vec::with_capacity(segment_count + 1);
        cuts.push(self.start_km());
        cuts.extend(checkpoints.iter().map(|c| c.distance_km));
        cuts.push(self.end_km());

        let spans = cuts
            .windows(2)
            .enumerate()
            .map(|(i, w)| {
                let change = self.elevation_change_between(w[0], w[1]);
                SegmentSpan {
                    from: checkpoint_label(i, segment_count),
                    to: checkpoint_label(i + 1, segment_count),
                    start_km: w[0],
                    end_km: w[1],
                    distance_km: w[1] - w[0],
                    elev_gain_m: change.gain_m,
                    elev_loss_m: change.loss_m,
                    terrain_type: terrain_types.get(i).copied().unwrap_or_default(),
                    has_dropbag: i > 0 && checkpoints[i - 1].has_dropbag,
                }
            })
            .collect();

        Ok(spans)
    }

    fn validate_checkpoints(&self, checkpoints: &[CheckpointSpec]) -> Result<(), PlanError> {
        let (start, end) = (self.start_km(), self.end_km());
        for (i, cp) in checkpoints.iter().enumerate() {
            if !cp.distance_km.is_finite() || cp.distance_km <= start || cp.distance_km >= end {
                return Err(PlanError::InvalidCheckpoints(format!(
                    "CP{} at {} km is outside the route ({start} km, {end} km)",
                    i + 1,
                    cp.distance_km
                )));
            }
        }
        if let Some(i) = checkpoints
            .windows(2)
            .position(|w| w[1].distance_km <= w[0].distance_km)
        {
            return Err(PlanError::InvalidCheckpoints(format!(
                "CP{} must lie beyond CP{}",
                i + 2,
                i + 1
            )));
        }
        Ok(())
    }

    /// Stride-sampled copy of the profile for charting, always keeping the last sample.
    pub fn downsample(&self, max_points: usize) -> Vec<RouteSample> {
        if max_points == 0 {
            return Vec::new();
        }
        if self.samples.len() <= max_points {
            return self.samples.clone();
        }

        let step = self.samples.len().div_ceil(max_points);
        let mut out: Vec<RouteSample> = self.samples.iter().step_by(step).copied().collect();
        let last = self.samples[self.samples.len() - 1];
        if out.last() != Some(&last) {
            if out.len() == max_points {
                out.pop();
            }
            out.push(last);
        }
        out
    }
}

/// `Start`, `CP1`..`CPn`, `Finish` for cut index `i` of a route with `segment_count` segments.
pub fn checkpoint_label(i: usize, segment_count: usize) -> String {
    if i == 0 {
        "Start".to_string()
    } else if i == segment_count {
        "Finish".to_string()
    } else {
        format!("CP{i}")
    }
}
