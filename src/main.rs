use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use log::{info, warn};
use medifact::synthetic::seed_corpus;
use medifact::{DemographicCondition, SignalConfig, SignalEngine};

/// Number of synthetic reports seeded into the demo corpus
const DEMO_REPORTS: usize = 1000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Optional JSON configuration path as the first argument
    let config = match std::env::args().nth(1) {
        Some(path) => SignalConfig::from_json_file(Path::new(&path))
            .with_context(|| format!("Failed to load configuration from {path}"))?,
        None => SignalConfig::default(),
    };
    info!("{config}");

    let engine = SignalEngine::in_memory(config).context("Failed to build signal engine")?;

    let start = Instant::now();
    let stored = seed_corpus(&engine, DEMO_REPORTS, engine.config().random_seed)
        .await
        .context("Failed to seed synthetic corpus")?;
    info!("Seeded {stored} reports in {:?}", start.elapsed());

    let everyone = DemographicCondition::any();
    let entries = engine.survey(&everyone).await.context("Survey failed")?;
    if entries.is_empty() {
        warn!("No combination exceeded the threshold");
    }
    println!("{}", serde_json::to_string_pretty(&entries)?);

    // Inspect the strongest signal in detail
    if let Some(strongest) = entries.last() {
        let result = engine
            .lookup(strongest.drugs.as_slice(), &everyone)
            .await
            .with_context(|| format!("Lookup of {} failed", strongest.combination_label))?;
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    Ok(())
}
