//! Writes a synthetic plan request as JSON.
//!
//! Run with:
//! ```
//! cargo run -p test-data --bin generate > request.json
//! ```
//!
//! `SEED`, `MODE` (`forward` or `inverse`), `COURSE` (`marathon`, `50k`,
//! `100mi`) and `TARGET_MIN` select what is generated.

use std::env;

use pacing::nutrition::NutritionRates;
use test_data::prelude::*;
use time::macros::time;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let seed = env::var("SEED")
        .ok()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(12345);
    let course = match env::var("COURSE").as_deref() {
        Ok("marathon") => CourseConfig::marathon(),
        Ok("100mi") => CourseConfig::hundred_miler(),
        _ => CourseConfig::default(),
    };

    let mut rng = StdRng::seed_from_u64(u64::from(seed));
    let generator = RequestGenerator::new(seed)
        .with_course(course, seed)
        .with_profile(RunnerProfile::trained())
        .with_nutrition(NutritionRates {
            carbs_per_hour: 70.0,
            water_per_hour_ml: 600.0,
            carbs_per_gel: Some(25.0),
        })
        .with_checkpoint_time(2.0)
        .with_start_time(time!(06:00));

    let request = match env::var("MODE").as_deref() {
        Ok("inverse") => {
            let target = env::var("TARGET_MIN")
                .ok()
                .and_then(|s| s.parse::<f64>().ok())
                .unwrap_or(600.0);
            generator.inverse(target, &mut rng)?
        }
        _ => generator.forward(&mut rng)?,
    };

    tracing::info!(
        seed,
        samples = request.route.len(),
        checkpoints = request.checkpoints.len(),
        "Generated request"
    );
    println!("{}", serde_json::to_string_pretty(&request)?);

    Ok(())
}
