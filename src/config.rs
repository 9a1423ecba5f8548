//! Run configuration: which surface to compute, over which grid, and how to
//! draw it.
//!
//! Two presets cover the standard runs: a price surface
//! ([`SurfaceConfig::price`]) and a Delta surface ([`SurfaceConfig::delta`]). A TOML file only needs the fields it changes;
//! everything else is filled from the preset for its `kind`.

use std::path::PathBuf;

use anyhow::{anyhow, Result};

use crate::grid::{AxisSpec, GridSpec};
use crate::model_params::ModelParams;
use crate::models::SurfaceKind;

/// Cosmetic settings for the rendered figure
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderConfig {
    /// Where the SVG is written
    pub output_path: PathBuf,
    /// Figure width in pixels
    pub width: u32,
    /// Figure height in pixels
    pub height: u32,
    /// Caption drawn above the surface
    pub title: String,
    /// Underlying-price axis
    pub x_label: String,
    /// Time axis
    pub y_label: String,
    /// Value axis
    pub z_label: String,
    /// Colour legend caption
    pub legend_label: String,
    /// Camera elevation in degrees
    pub elevation_deg: f64,
    /// Camera azimuth in degrees
    pub azimuth_deg: f64,
    /// Surface opacity in [0, 1]
    pub alpha: f64,
}

impl RenderConfig {
    fn for_kind(kind: SurfaceKind, params: &ModelParams) -> Self {
        let rate_pct = (params.rate * 10_000.0).round() / 100.0;
        let subtitle = format!(
            "(E={}, r={}%, σ={})",
            params.strike, rate_pct, params.volatility
        );
        match kind {
            SurfaceKind::Price => Self {
                output_path: PathBuf::from("price_surface.svg"),
                width: default_width(),
                height: default_height(),
                title: format!("Call option price as a function of S and t {}", subtitle),
                x_label: "S".to_string(),
                y_label: "t/T".to_string(),
                z_label: "C".to_string(),
                legend_label: "Option price".to_string(),
                elevation_deg: default_elevation(),
                azimuth_deg: -130.0,
                alpha: default_alpha(),
            },
            SurfaceKind::Delta => Self {
                output_path: PathBuf::from("delta_surface.svg"),
                width: default_width(),
                height: default_height(),
                title: format!("Call option Delta (δ) as a function of S and t {}", subtitle),
                x_label: "S".to_string(),
                y_label: "t/T".to_string(),
                z_label: "δ".to_string(),
                legend_label: "Delta value (δ)".to_string(),
                elevation_deg: default_elevation(),
                azimuth_deg: -45.0,
                alpha: default_alpha(),
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(anyhow!(
                "Figure size must be non-zero, got {}x{}",
                self.width,
                self.height
            ));
        }
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(anyhow!("Alpha must lie in [0, 1], got {}", self.alpha));
        }
        if !self.elevation_deg.is_finite() || !self.azimuth_deg.is_finite() {
            return Err(anyhow!(
                "Camera angles must be finite, got elevation={} azimuth={}",
                self.elevation_deg,
                self.azimuth_deg
            ));
        }
        Ok(())
    }
}

/// Complete configuration for one surface run
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SurfaceConfig {
    pub kind: SurfaceKind,
    /// Evaluate grid rows on the rayon pool
    pub parallel_eval: bool,
    pub model: ModelParams,
    pub grid: GridSpec,
    pub render: RenderConfig,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self::price()
    }
}

impl SurfaceConfig {
    /// Call price over S ∈ [0, 200], t ∈ [0, 0.99], 20x20 points.
    pub fn price() -> Self {
        Self::preset(SurfaceKind::Price)
    }

    /// Call Delta over S ∈ [0, 200], t ∈ [0.01, 0.99], 20x20 points.
    pub fn delta() -> Self {
        Self::preset(SurfaceKind::Delta)
    }

    pub fn preset(kind: SurfaceKind) -> Self {
        let model = ModelParams::default();
        let time = match kind {
            SurfaceKind::Price => AxisSpec::new(0.0, 0.99, default_points()),
            SurfaceKind::Delta => AxisSpec::new(0.01, 0.99, default_points()),
        };
        Self {
            kind,
            parallel_eval: default_parallel_eval(),
            model,
            grid: GridSpec {
                underlying: AxisSpec::new(0.0, 200.0, default_points()),
                time,
            },
            render: RenderConfig::for_kind(kind, &model),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.model.validate()?;
        self.grid.validate()?;
        self.render.validate()
    }
}

#[cfg(feature = "serde")]
mod file {
    use std::path::{Path, PathBuf};

    use anyhow::{Context, Result};
    use serde::Deserialize;

    use super::SurfaceConfig;
    use crate::grid::AxisSpec;
    use crate::model_params::ModelParams;
    use crate::models::SurfaceKind;

    #[derive(Debug, Default, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct PartialConfig {
        #[serde(default)]
        kind: SurfaceKind,
        parallel_eval: Option<bool>,
        model: Option<ModelParams>,
        #[serde(default)]
        grid: PartialGrid,
        #[serde(default)]
        render: PartialRender,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct PartialGrid {
        underlying: Option<AxisSpec>,
        time: Option<AxisSpec>,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct PartialRender {
        output_path: Option<PathBuf>,
        width: Option<u32>,
        height: Option<u32>,
        title: Option<String>,
        x_label: Option<String>,
        y_label: Option<String>,
        z_label: Option<String>,
        legend_label: Option<String>,
        elevation_deg: Option<f64>,
        azimuth_deg: Option<f64>,
        alpha: Option<f64>,
    }

    impl PartialConfig {
        fn resolve(self) -> SurfaceConfig {
            let mut config = SurfaceConfig::preset(self.kind);
            if let Some(model) = self.model {
                config.model = model;
                // Keep the default title in step with the parameters it quotes
                config.render.title =
                    super::RenderConfig::for_kind(self.kind, &model).title;
            }
            if let Some(parallel) = self.parallel_eval {
                config.parallel_eval = parallel;
            }
            if let Some(axis) = self.grid.underlying {
                config.grid.underlying = axis;
            }
            if let Some(axis) = self.grid.time {
                config.grid.time = axis;
            }

            let r = self.render;
            let target = &mut config.render;
            if let Some(v) = r.output_path {
                target.output_path = v;
            }
            if let Some(v) = r.width {
                target.width = v;
            }
            if let Some(v) = r.height {
                target.height = v;
            }
            if let Some(v) = r.title {
                target.title = v;
            }
            if let Some(v) = r.x_label {
                target.x_label = v;
            }
            if let Some(v) = r.y_label {
                target.y_label = v;
            }
            if let Some(v) = r.z_label {
                target.z_label = v;
            }
            if let Some(v) = r.legend_label {
                target.legend_label = v;
            }
            if let Some(v) = r.elevation_deg {
                target.elevation_deg = v;
            }
            if let Some(v) = r.azimuth_deg {
                target.azimuth_deg = v;
            }
            if let Some(v) = r.alpha {
                target.alpha = v;
            }
            config
        }
    }

    impl SurfaceConfig {
        /// Parse a TOML document, filling missing fields from the preset for
        /// its `kind`, and validate the result.
        pub fn from_toml_str(s: &str) -> Result<Self> {
            let partial: PartialConfig =
                toml::from_str(s).context("failed to parse surface config")?;
            let config = partial.resolve();
            config.validate()?;
            Ok(config)
        }

        pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
            let path = path.as_ref();
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            Self::from_toml_str(&text)
                .with_context(|| format!("invalid config {}", path.display()))
        }

        pub fn to_toml_string(&self) -> Result<String> {
            toml::to_string(self).context("failed to serialise surface config")
        }
    }
}

fn default_points() -> usize {
    20
}

fn default_parallel_eval() -> bool {
    true
}

fn default_width() -> u32 {
    1200
}

fn default_height() -> u32 {
    1000
}

fn default_elevation() -> f64 {
    30.0
}

fn default_alpha() -> f64 {
    0.8
}
