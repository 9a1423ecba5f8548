//! # Option-Surface: Closed-Form Call Price and Delta Surfaces
//!
//! `option-surface` evaluates a closed-form call option model over a grid of
//! underlying prices `S` and times `t`, and renders the result as a 3D surface
//! plot. Two quantities are available: the theoretical price and its Delta
//! (`∂C/∂S`).
//!
//! ## Core Features
//!
//! - **Pure evaluators**: [`CallPrice`] and [`CallDelta`] take an explicit, immutable
//!   [`ModelParams`] value; no module-level state
//! - **Grid sampling**: Cartesian `(S, t)` mesh, optionally evaluated in parallel with rayon
//! - **Rendering**: 3D SVG surface with a Viridis colour legend via plotters
//! - **Configuration**: presets for both surfaces, overridable from TOML
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use option_surface::{compute_surface, default_configs, render_to_file};
//!
//! let config = default_configs::price();
//! let surface = compute_surface(&config)?;
//! assert_eq!(surface.shape(), (20, 20));
//!
//! render_to_file(&surface, &config.render)?;
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## The Model
//!
//! With `τ = T - t`, `k = 2r/σ²` and
//!
//! ```text
//! d1 = ln(S/E)/(σ√τ) - (k+1)·σ√τ
//! d2 = ln(S/E)/(σ√τ) - (k-1)·σ√τ
//! ```
//!
//! the price is `C = (S/E)·N(d1) - (e^(-rτ)/2)·N(d2)` for `τ > 0` and
//! `max(S - E, 0)` at and after maturity. Delta is its exact derivative in `S`
//! and is only defined for `0 < t < T`.

// ================================================================================================
// MODULES
// ================================================================================================

pub mod config;
pub mod grid;
pub mod model_params;
pub mod models;
pub mod render;

// ================================================================================================
// IMPORTS
// ================================================================================================

use anyhow::Result;
use tracing::info;

// ================================================================================================
// PUBLIC RE-EXPORTS
// ================================================================================================

pub use config::{RenderConfig, SurfaceConfig};
pub use grid::{linspace, sample, sample_grid, AxisSpec, GridSpec, Surface};
pub use model_params::ModelParams;
pub use models::call::{CallDelta, CallPrice};
pub use models::traits::SurfaceModel;
pub use models::SurfaceKind;
pub use render::{render_svg, render_to_file};

// ================================================================================================
// DEFAULT CONFIGURATIONS
// ================================================================================================

/// Pre-configured price and Delta runs.
///
/// Both use strike 100, rate 6%, volatility 0.3, maturity 1 year and a
/// 20x20 grid over `S ∈ [0, 200]`.
pub mod default_configs {
    use crate::config::SurfaceConfig;

    /// Price surface over `t ∈ [0, 0.99]`, camera at 30° / -130°.
    ///
    /// # Example
    ///
    /// ```rust
    /// use option_surface::default_configs;
    ///
    /// let config = default_configs::price();
    /// assert_eq!(config.grid.time.max, 0.99);
    /// ```
    pub fn price() -> SurfaceConfig {
        SurfaceConfig::price()
    }

    /// Delta surface over `t ∈ [0.01, 0.99]`, camera at 30° / -45°.
    ///
    /// Both time endpoints are excluded because Delta divides by `σ√τ`.
    pub fn delta() -> SurfaceConfig {
        SurfaceConfig::delta()
    }
}

/// Validate `config`, build the evaluator for `config.kind` and sample it over
/// the configured grid.
///
/// # Errors
///
/// * invalid model parameters, axes or render settings
/// * a time value outside the evaluator's domain (Delta at `t = 0` or `t = T`)
pub fn compute_surface(config: &SurfaceConfig) -> Result<Surface> {
    config.validate()?;
    let model = config.kind.model(config.model)?;
    sample_grid(model.as_ref(), &config.grid, config.parallel_eval)
}

/// Compute the configured surface and write its SVG to `config.render.output_path`.
pub fn run(config: &SurfaceConfig) -> Result<Surface> {
    info!(
        kind = %config.kind,
        strike = config.model.strike,
        rate = config.model.rate,
        volatility = config.model.volatility,
        maturity = config.model.maturity,
        "computing surface"
    );
    let surface = compute_surface(config)?;
    render_to_file(&surface, &config.render)?;
    Ok(surface)
}
