//! Carbohydrate and fluid targets, allocated in proportion to segment time.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::SegmentSpan;

fn default_carbs_per_hour() -> f64 {
    60.0
}

fn default_water_per_hour_ml() -> f64 {
    500.0
}

/// Hourly intake targets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct NutritionRates {
    #[serde(default = "default_carbs_per_hour")]
    #[validate(range(
        min = 0.0,
        max = 200.0,
        message = "Carbs per hour must be between 0 and 200 g"
    ))]
    pub carbs_per_hour: f64,
    #[serde(default = "default_water_per_hour_ml")]
    #[validate(range(
        min = 0.0,
        max = 2000.0,
        message = "Water per hour must be between 0 and 2000 ml"
    ))]
    pub water_per_hour_ml: f64,
    /// Carbohydrate per gel or sachet, used to express targets as whole units.
    #[serde(default)]
    #[validate(range(exclusive_min = 0.0, message = "Carbs per gel must be positive"))]
    pub carbs_per_gel: Option<f64>,
}

impl Default for NutritionRates {
    fn default() -> Self {
        Self {
            carbs_per_hour: default_carbs_per_hour(),
            water_per_hour_ml: default_water_per_hour_ml(),
            carbs_per_gel: None,
        }
    }
}

/// Intake target for one segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SegmentNutrition {
    pub carbs_g: f64,
    pub water_l: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gels: Option<u32>,
}

#[derive(Debug, Clone, Copy)]
pub struct NutritionAllocator {
    rates: NutritionRates,
}

impl NutritionAllocator {
    pub fn new(rates: NutritionRates) -> Self {
        Self { rates }
    }

    pub fn allocate(&self, segment_time_min: f64) -> SegmentNutrition {
        let hours = segment_time_min.max(0.0) / 60.0;
        let carbs_g = self.rates.carbs_per_hour * hours;
        SegmentNutrition {
            carbs_g,
            water_l: self.rates.water_per_hour_ml * hours / 1000.0,
            gels: gel_count(carbs_g, self.rates.carbs_per_gel),
        }
    }

    /// Packs segment targets into the start bag and the flagged checkpoint bags.
    ///
    /// A bag carries every segment until the next checkpoint holding a bag.
    /// Segments before the first flagged checkpoint go in the start bag, so
    /// every segment is packed exactly once.
    pub fn plan_dropbags(
        &self,
        spans: &[SegmentSpan],
        targets: &[SegmentNutrition],
    ) -> Vec<DropBag> {
        if targets.is_empty() {
            return Vec::new();
        }

        let mut bags = vec![(0usize, 0.0, 0.0)];
        for (k, span) in spans.iter().enumerate().skip(1) {
            if span.has_dropbag {
                bags.push((k, 0.0, 0.0));
            }
        }

        for (i, target) in targets.iter().enumerate() {
            // latest bag at or before this segment's start
            if let Some(bag) = bags.iter_mut().rev().find(|(k, _, _)| *k <= i) {
                bag.1 += target.carbs_g;
                bag.2 += target.water_l;
            }
        }

        bags.into_iter()
            .map(|(k, carbs, water)| {
                let carbs_g = carbs.round();
                let num_gels = gel_count(carbs_g, self.rates.carbs_per_gel);
                let checkpoint = spans
                    .get(k)
                    .map_or_else(|| "Start".to_string(), |s| s.from.clone());
                DropBag {
                    checkpoint,
                    carbs_g,
                    hydration_l: (water * 10.0).round() / 10.0,
                    num_gels,
                    actual_carbs_g: num_gels
                        .zip(self.rates.carbs_per_gel)
                        .map(|(n, per_gel)| (f64::from(n) * per_gel * 100.0).round() / 100.0),
                }
            })
            .collect()
    }
}

fn gel_count(carbs_g: f64, carbs_per_gel: Option<f64>) -> Option<u32> {
    carbs_per_gel
        .filter(|g| *g > 0.0)
        .map(|g| (carbs_g / g).round().max(0.0) as u32)
}

/// Supplies packed for one bag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropBag {
    pub checkpoint: String,
    pub carbs_g: f64,
    pub hydration_l: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_gels: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_carbs_g: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TerrainType;

    fn span(from: &str, has_dropbag: bool) -> SegmentSpan {
        SegmentSpan {
            from: from.to_string(),
            to: String::new(),
            start_km: 0.0,
            end_km: 1.0,
            distance_km: 1.0,
            elev_gain_m: 0.0,
            elev_loss_m: 0.0,
            terrain_type: TerrainType::SmoothTrail,
            has_dropbag,
        }
    }

    #[test]
    fn test_proportional_allocation() {
        let allocator = NutritionAllocator::new(NutritionRates::default());
        let n = allocator.allocate(90.0);
        assert!((n.carbs_g - 90.0).abs() < 1e-9);
        assert!((n.water_l - 0.75).abs() < 1e-9);
        assert_eq!(n.gels, None);
    }

    #[test]
    fn test_gel_rounding() {
        let allocator = NutritionAllocator::new(NutritionRates {
            carbs_per_gel: Some(25.0),
            ..Default::default()
        });
        assert_eq!(allocator.allocate(90.0).gels, Some(4));
        assert_eq!(allocator.allocate(0.0).gels, Some(0));
    }

    #[test]
    fn test_dropbags_roll_back_to_last_flagged_checkpoint() {
        let allocator = NutritionAllocator::new(NutritionRates {
            carbs_per_gel: Some(30.0),
            ..Default::default()
        });
        let spans = vec![
            span("Start", false),
            span("CP1", true),
            span("CP2", false),
            span("CP3", true),
        ];
        let targets: Vec<SegmentNutrition> = [60.0, 60.0, 30.0, 120.0]
            .iter()
            .map(|t| allocator.allocate(*t))
            .collect();

        let bags = allocator.plan_dropbags(&spans, &targets);
        assert_eq!(bags.len(), 3);
        assert_eq!(bags[0].checkpoint, "Start");
        assert_eq!(bags[0].carbs_g, 60.0);
        assert_eq!(bags[1].checkpoint, "CP1");
        assert_eq!(bags[1].carbs_g, 90.0);
        assert_eq!(bags[1].num_gels, Some(3));
        assert_eq!(bags[1].actual_carbs_g, Some(90.0));
        assert!((bags[1].hydration_l - 0.8).abs() < 1e-9);
        assert_eq!(bags[2].checkpoint, "CP3");
        assert_eq!(bags[2].carbs_g, 120.0);
    }

    #[test]
    fn test_no_flagged_checkpoints_only_start_bag() {
        let allocator = NutritionAllocator::new(NutritionRates::default());
        let spans = vec![span("Start", false), span("CP1", false)];
        let targets = vec![allocator.allocate(60.0), allocator.allocate(60.0)];
        let bags = allocator.plan_dropbags(&spans, &targets);
        assert_eq!(bags.len(), 1);
        assert_eq!(bags[0].checkpoint, "Start");
        assert_eq!(bags[0].carbs_g, 120.0);
        assert!((bags[0].hydration_l - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_segments_before_first_flag_go_in_start_bag() {
        let allocator = NutritionAllocator::new(NutritionRates::default());
        let spans = vec![
            span("Start", false),
            span("CP1", false),
            span("CP2", true),
            span("CP3", false),
        ];
        let targets: Vec<SegmentNutrition> = [30.0, 45.0, 60.0, 15.0]
            .iter()
            .map(|t| allocator.allocate(*t))
            .collect();

        let bags = allocator.plan_dropbags(&spans, &targets);
        assert_eq!(bags.len(), 2);
        assert_eq!(bags[0].checkpoint, "Start");
        assert_eq!(bags[0].carbs_g, 75.0);
        assert_eq!(bags[1].checkpoint, "CP2");
        assert_eq!(bags[1].carbs_g, 75.0);

        let packed: f64 = bags.iter().map(|b| b.carbs_g).sum();
        let planned: f64 = targets.iter().map(|t| t.carbs_g).sum();
        assert!((packed - planned).abs() < 1e-9);
    }

    #[test]
    fn test_no_segments_no_bags() {
        let allocator = NutritionAllocator::new(NutritionRates::default());
        assert!(allocator.plan_dropbags(&[], &[]).is_empty());
    }
}
