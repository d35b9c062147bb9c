use std::{
    env, fs,
    io::{self, Read},
};

use pacing::{EngineConfig, PlanRequest, plan_race};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn load_config() -> anyhow::Result<EngineConfig> {
    match env::var("PACING_CONFIG") {
        Ok(path) => {
            tracing::info!("Loading engine config from {}", path);
            Ok(EngineConfig::from_json(&fs::read_to_string(path)?)?)
        }
        Err(_) => Ok(EngineConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let config = load_config()?;

    let input = match env::args().nth(1) {
        Some(path) if path != "-" => fs::read_to_string(path)?,
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let request = PlanRequest::from_json(&input)?;
    let result = plan_race(&config, &request)?;
    if let Some(warning) = &result.warning {
        tracing::warn!("{}", warning);
    }

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
