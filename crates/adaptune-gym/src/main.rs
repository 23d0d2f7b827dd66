//! Adaptune - online PID/node controller tuning on the point-mass task

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use adaptune_gym::{AdaptuneConfig, PointMass, TrackingPolicy, Trainer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AdaptuneConfig::load()?;
    let report_path = config.report_path.clone();
    tracing::info!(
        episodes = config.episode_cap,
        learn_every = config.episode_learn,
        "Starting Adaptune..."
    );

    let policy = TrackingPolicy::new();
    let manager = TrackingPolicy::manager(config.rotate_every);
    let mut trainer = Trainer::new(config, PointMass::new(), policy, manager)?;

    let stop = Arc::new(AtomicBool::new(false));
    let worker_stop = Arc::clone(&stop);
    let mut training = tokio::task::spawn_blocking(move || trainer.run(&worker_stop));

    let report = tokio::select! {
        joined = &mut training => joined??,
        signal = tokio::signal::ctrl_c() => {
            signal?;
            tracing::info!("Shutting down after the current episode...");
            stop.store(true, Ordering::Relaxed);
            training.await??
        }
    };

    for controller in &report.controllers {
        tracing::info!(
            controller = %controller.name,
            parameters = %controller.parameters,
            "Final parameters"
        );
    }
    tracing::info!(
        episodes = report.episodes,
        interrupted = report.interrupted,
        "Training finished"
    );

    if let Some(path) = report_path {
        std::fs::write(&path, serde_json::to_string_pretty(&report)?)?;
        tracing::info!(path = %path.display(), "Wrote training report");
    }

    Ok(())
}
