// Delta surface of the call option.
//
// Usage:
//     cargo run --bin delta_surface -- [config.toml]
//
// The preset samples t over [0.01, 0.99]; a config whose time axis touches
// 0 or T is rejected before anything is evaluated.

use anyhow::Result;
use option_surface::{default_configs, run, SurfaceConfig, SurfaceKind};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => SurfaceConfig::from_toml_file(path)?,
        None => default_configs::delta(),
    };
    if config.kind != SurfaceKind::Delta {
        tracing::warn!(kind = %config.kind, "config does not describe a delta surface");
    }

    let surface = run(&config)?;
    if let Some((lo, hi)) = surface.finite_range() {
        tracing::info!(min = lo, max = hi, "delta range");
    }
    Ok(())
}
