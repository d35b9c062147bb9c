//! Target-time mode: distribute a fixed total time across segments.
//!
//! The solver works in five stages:
//!
//! 1. Neutral cost: `distance * terrain factor`, ignoring gradient.
//! 2. Reference pace: target time over neutral cost. Internal only.
//! 3. Elevation-adjusted weights: gradient-class terrain factor, a climb
//!    penalty at a fixed reference vertical speed, a capped descent bonus.
//! 4. Proportional distribution of the target over the weights.
//! 5. Clamp-and-redistribute: paces outside the feasible band are pinned to
//!    the nearest bound and the freed or missing time is shared among the
//!    free segments, for at most `max_iterations` passes. Whatever residual
//!    remains is put on the last segment so the total is exact.
//!
//! Nothing here depends on athlete ability.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    config::EngineConfig,
    models::{SegmentSpan, SegmentTiming},
    terrain::TerrainModel,
};

/// Diagnostics from one solver run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolverReport {
    pub target_time_min: f64,
    pub neutral_cost: f64,
    pub reference_pace_min_per_km: f64,
    pub iterations: usize,
    pub converged: bool,
    /// Minutes added to (or removed from) the last segment to hit the target exactly.
    pub residual_min: f64,
    pub clamped_segments: usize,
    /// Set when the result could not be kept entirely inside the pace band.
    pub warning: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InverseSolution {
    pub timings: Vec<SegmentTiming>,
    pub neutral_weights: Vec<f64>,
    pub weights: Vec<f64>,
    pub report: SolverReport,
}

#[derive(Debug, Clone, Copy)]
pub struct InverseTimeSolver<'a> {
    config: &'a EngineConfig,
}

impl<'a> InverseTimeSolver<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    /// Neutral weight per segment: distance times the plain terrain factor.
    pub fn neutral_weights(&self, spans: &[SegmentSpan]) -> Vec<f64> {
        let terrain = TerrainModel::new(self.config);
        spans
            .iter()
            .map(|s| s.distance_km * terrain.base_factor(s.terrain_type))
            .collect()
    }

    /// Elevation-adjusted weight and the terrain factor it was built from.
    fn elevation_weight(&self, span: &SegmentSpan, reference_pace: f64) -> (f64, f64) {
        let terrain = TerrainModel::new(self.config);
        let solver = &self.config.solver;
        let gradient = span.gradient();
        let terrain_factor = terrain.gradient_adjusted_factor(span.terrain_type, gradient);
        let base_weight = span.distance_km * terrain_factor;

        let elev_factor = if gradient > 0.0 && span.elev_gain_m > 0.0 {
            let climb_penalty =
                span.elev_gain_m / solver.reference_vertical_speed_m_per_h * 60.0;
            let flat_time = base_weight * reference_pace;
            if flat_time > 0.0 {
                1.0 + climb_penalty / flat_time
            } else {
                1.0
            }
        } else if gradient < 0.0 {
            let bonus = gradient.abs() * solver.descent_bonus_per_gradient;
            1.0 - bonus.min(solver.descent_bonus_cap)
        } else {
            1.0
        };

        (base_weight * elev_factor, terrain_factor)
    }

    pub fn solve(&self, spans: &[SegmentSpan], target_time_min: f64) -> InverseSolution {
        let n = spans.len();
        let bounds = self.config.pace_bounds;

        // 1-2. neutral cost and reference pace
        let neutral_weights = self.neutral_weights(spans);
        let neutral_cost: f64 = neutral_weights.iter().sum();
        let reference_pace = if neutral_cost > 0.0 {
            target_time_min / neutral_cost
        } else {
            0.0
        };

        // 3. elevation-adjusted weights
        let (mut weights, terrain_factors): (Vec<f64>, Vec<f64>) = spans
            .iter()
            .map(|s| self.elevation_weight(s, reference_pace))
            .unzip();

        let mut warnings: Vec<String> = Vec::new();
        let mut total_weight: f64 = weights.iter().sum();
        if !(total_weight > 0.0 && total_weight.is_finite()) {
            warnings.push(
                "Route has no weight to distribute; falling back to distance".to_string(),
            );
            weights = spans.iter().map(|s| s.distance_km.max(0.0)).collect();
            total_weight = weights.iter().sum();
        }

        // 4. proportional distribution
        let mut times: Vec<f64> = if total_weight > 0.0 {
            weights
                .iter()
                .map(|w| target_time_min * w / total_weight)
                .collect()
        } else {
            vec![0.0; n]
        };

        // 5. clamp and redistribute
        let mut locked = vec![false; n];
        let mut converged = false;
        let mut iterations = 0;
        for iteration in 0..self.config.solver.max_iterations {
            iterations = iteration + 1;
            let mut net_excess = 0.0;
            let mut clamped_now = 0;

            for (i, span) in spans.iter().enumerate() {
                if span.distance_km <= 0.0 {
                    continue;
                }
                let lo = bounds.min * span.distance_km;
                let hi = bounds.max * span.distance_km;
                let t = times[i];
                let clamped = if t < lo {
                    lo
                } else if t > hi {
                    hi
                } else {
                    continue;
                };
                net_excess += t - clamped;
                times[i] = clamped;
                locked[i] = true;
                clamped_now += 1;
            }

            debug!(iteration, clamped_now, net_excess, "clamp pass");

            if clamped_now == 0 {
                converged = true;
                break;
            }

            let adjustable: f64 = weights
                .iter()
                .zip(&locked)
                .filter(|(_, locked)| !**locked)
                .map(|(w, _)| *w)
                .sum();

            if net_excess.abs() <= self.config.solver.epsilon_min {
                converged = true;
                break;
            }
            if adjustable <= 0.0 {
                break;
            }

            for i in 0..n {
                if !locked[i] {
                    times[i] += net_excess * weights[i] / adjustable;
                }
            }
        }

        // force the exact total onto the last segment
        let mut residual_min = 0.0;
        if let Some(last) = times.len().checked_sub(1) {
            let assigned: f64 = times.iter().sum();
            residual_min = target_time_min - assigned;
            times[last] += residual_min;
        }

        let tolerance = 1e-9;
        if !converged {
            warnings.push(format!(
                "Pace solver did not converge within {} iterations",
                self.config.solver.max_iterations
            ));
        }
        if let (Some(span), Some(time)) = (spans.last(), times.last())
            && span.distance_km > 0.0
        {
            // a converged solve may still leave up to epsilon_min on the last segment
            let band_tolerance = self.config.solver.epsilon_min / span.distance_km + tolerance;
            let pace = time / span.distance_km;
            if !bounds.contains(pace, band_tolerance) {
                warnings.push(format!(
                    "Target time is not reachable within {:.2}-{:.2} min/km; \
                     {} -> {} absorbs {:.1} min at {:.2} min/km",
                    bounds.min, bounds.max, span.from, span.to, residual_min, pace
                ));
            }
        }

        let timings: Vec<SegmentTiming> = spans
            .iter()
            .enumerate()
            .map(|(i, span)| {
                let pace = if span.distance_km > 0.0 {
                    times[i] / span.distance_km
                } else {
                    0.0
                };
                let expected =
                    reference_pace * TerrainModel::new(self.config).base_factor(span.terrain_type);
                SegmentTiming {
                    terrain_factor: terrain_factors[i],
                    pace_min_per_km: pace,
                    segment_time_min: times[i],
                    elev_pace_min_per_km: pace,
                    fatigue_seconds_per_km: 0.0,
                    pace_capped: locked[i] || !bounds.contains(pace, tolerance),
                    pace_aggressive: pace < bounds.min - tolerance
                        || pace < expected * self.config.aggressive_ratio,
                }
            })
            .collect();

        let warning = if warnings.is_empty() {
            None
        } else {
            Some(warnings.join("; "))
        };
        if let Some(w) = &warning {
            warn!("{w}");
        }

        let report = SolverReport {
            target_time_min,
            neutral_cost,
            reference_pace_min_per_km: reference_pace,
            iterations,
            converged,
            residual_min,
            clamped_segments: locked.iter().filter(|l| **l).count(),
            warning,
        };
        info!(
            segments = n,
            iterations,
            converged,
            reference_pace,
            residual_min,
            "target-time plan solved"
        );

        InverseSolution {
            timings,
            neutral_weights,
            weights,
            report,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MAX_PACE, MIN_PACE};
    use crate::models::TerrainType;

    fn span(distance_km: f64, gain: f64, loss: f64, terrain_type: TerrainType) -> SegmentSpan {
        SegmentSpan {
            from: "A".to_string(),
            to: "B".to_string(),
            start_km: 0.0,
            end_km: distance_km,
            distance_km,
            elev_gain_m: gain,
            elev_loss_m: loss,
            terrain_type,
            has_dropbag: false,
        }
    }

    fn total(solution: &InverseSolution) -> f64 {
        solution.timings.iter().map(|t| t.segment_time_min).sum()
    }

    #[test]
    fn test_flat_terrain_scenario() {
        let config = EngineConfig::default();
        let solver = InverseTimeSolver::new(&config);
        let spans = vec![
            span(10.0, 0.0, 0.0, TerrainType::SmoothTrail),
            span(10.0, 0.0, 0.0, TerrainType::Technical),
            span(10.0, 0.0, 0.0, TerrainType::Road),
        ];
        let solution = solver.solve(&spans, 240.0);

        let expected = [10.0, 17.5, 9.0];
        for (w, e) in solution.neutral_weights.iter().zip(expected) {
            assert!((w - e).abs() < 1e-9);
        }
        assert!((solution.report.neutral_cost - 36.5).abs() < 1e-9);
        assert!((solution.report.reference_pace_min_per_km - 6.575).abs() < 1e-3);
        for (t, e) in solution.timings.iter().zip(expected) {
            assert!((t.segment_time_min - 240.0 * e / 36.5).abs() < 1e-9);
        }
        assert!((total(&solution) - 240.0).abs() < 1e-6);
        assert!(solution.report.converged);
        assert_eq!(solution.report.iterations, 1);
        assert!(solution.report.warning.is_none());
    }

    #[test]
    fn test_climbs_get_more_time_than_descents() {
        let config = EngineConfig::default();
        let solver = InverseTimeSolver::new(&config);
        let spans = vec![
            span(10.0, 600.0, 0.0, TerrainType::SmoothTrail),
            span(10.0, 0.0, 0.0, TerrainType::SmoothTrail),
            span(10.0, 0.0, 600.0, TerrainType::SmoothTrail),
        ];
        let solution = solver.solve(&spans, 240.0);
        let t: Vec<f64> = solution.timings.iter().map(|t| t.segment_time_min).collect();
        assert!(t[0] > t[1]);
        assert!(t[1] > t[2]);
        assert!((total(&solution) - 240.0).abs() < 1e-6);
    }

    #[test]
    fn test_descent_bonus_is_capped() {
        let config = EngineConfig::default();
        let solver = InverseTimeSolver::new(&config);
        let steep = span(5.0, 0.0, 1000.0, TerrainType::Road);
        let (weight, _) = solver.elevation_weight(&steep, 6.0);
        let factor = 1.0 + (0.90 - 1.0) * 1.3;
        assert!((weight - 5.0 * factor * 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_clamps_and_redistributes() {
        let config = EngineConfig::default();
        let solver = InverseTimeSolver::new(&config);
        // the scrambling leg wants far more than 15 min/km
        let spans = vec![
            span(2.0, 0.0, 0.0, TerrainType::Scrambling),
            span(20.0, 0.0, 0.0, TerrainType::Road),
            span(20.0, 0.0, 0.0, TerrainType::SmoothTrail),
        ];
        let solution = solver.solve(&spans, 40.0 * 7.0 + 2.0 * 40.0);
        for t in &solution.timings {
            assert!(t.pace_min_per_km >= MIN_PACE - 1e-9);
            assert!(t.pace_min_per_km <= MAX_PACE + 1e-9);
        }
        assert!(solution.timings[0].pace_capped);
        assert!((solution.timings[0].pace_min_per_km - MAX_PACE).abs() < 1e-9);
        assert!((total(&solution) - 360.0).abs() < 1e-6);
        assert!(solution.report.converged);
        assert!(solution.report.warning.is_none());
    }

    #[test]
    fn test_sub_epsilon_leftover_on_locked_last_segment_is_not_a_warning() {
        let config = EngineConfig::default();
        let solver = InverseTimeSolver::new(&config);
        // every leg ends up pinned at the slow bound with 5e-4 min left over
        let spans = vec![
            span(10.0, 0.0, 0.0, TerrainType::SmoothTrail),
            span(10.0, 0.0, 0.0, TerrainType::SmoothTrail),
            span(2.0, 0.0, 0.0, TerrainType::Scrambling),
        ];
        let target = 22.0 * MAX_PACE + 5e-4;
        let solution = solver.solve(&spans, target);

        assert!(solution.report.converged);
        assert!(solution.report.warning.is_none());
        assert!((total(&solution) - target).abs() < 1e-6);
        assert!((solution.report.residual_min - 5e-4).abs() < 1e-6);
        let last = solution.timings[2].pace_min_per_km;
        assert!(last > MAX_PACE && last <= MAX_PACE + 5e-4);
    }

    #[test]
    fn test_impossible_target_terminates_with_warning() {
        let config = EngineConfig::default();
        let solver = InverseTimeSolver::new(&config);
        let spans = vec![
            span(10.0, 0.0, 0.0, TerrainType::SmoothTrail),
            span(10.0, 500.0, 0.0, TerrainType::Technical),
        ];

        let fast = solver.solve(&spans, 10.0);
        assert!((total(&fast) - 10.0).abs() < 1e-6);
        assert!(fast.report.warning.is_some());
        assert!(fast.report.iterations <= config.solver.max_iterations);
        assert!((fast.timings[0].pace_min_per_km - MIN_PACE).abs() < 1e-9);

        let slow = solver.solve(&spans, 10_000.0);
        assert!((total(&slow) - 10_000.0).abs() < 1e-6);
        assert!(slow.report.warning.is_some());
        assert!(slow.timings[1].pace_min_per_km > MAX_PACE);
    }

    #[test]
    fn test_single_segment_takes_whole_target() {
        let config = EngineConfig::default();
        let solver = InverseTimeSolver::new(&config);
        let solution = solver.solve(&[span(42.195, 400.0, 400.0, TerrainType::Road)], 210.0);
        assert!((solution.timings[0].segment_time_min - 210.0).abs() < 1e-9);
        assert!(solution.report.warning.is_none());
    }

    #[test]
    fn test_solver_is_repeatable() {
        let config = EngineConfig::default();
        let solver = InverseTimeSolver::new(&config);
        let spans = vec![
            span(7.0, 450.0, 20.0, TerrainType::RockyRunnable),
            span(3.0, 10.0, 300.0, TerrainType::VeryTechnical),
            span(11.0, 120.0, 140.0, TerrainType::DirtRoad),
        ];
        assert_eq!(solver.solve(&spans, 200.0), solver.solve(&spans, 200.0));
    }
}
