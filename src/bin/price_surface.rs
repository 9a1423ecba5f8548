// Price surface of the call option.
//
// Usage:
//     cargo run --bin price_surface -- [config.toml]
//
// Without a config file the price preset is used (E=100, r=6%, σ=0.3,
// T=1, 20x20 grid) and the figure is written to price_surface.svg.

use anyhow::Result;
use option_surface::{default_configs, run, SurfaceConfig};
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
        None => default_configs::price(),
    };

    let surface = run(&config)?;
    if let Some((lo, hi)) = surface.finite_range() {
        tracing::info!(min = lo, max = hi, "price range");
    }
    Ok(())
}
