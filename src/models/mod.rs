pub mod call;

use anyhow::Result;

use crate::model_params::ModelParams;
use call::{CallDelta, CallPrice};

/// Which quantity a surface holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SurfaceKind {
    /// Theoretical call price
    #[default]
    Price,
    /// Sensitivity of the price to the underlying
    Delta,
}

impl SurfaceKind {
    /// Build the evaluator for this kind.
    pub fn model(self, params: ModelParams) -> Result<Box<dyn traits::SurfaceModel>> {
        Ok(match self {
            SurfaceKind::Price => Box::new(CallPrice::new(params)?),
            SurfaceKind::Delta => Box::new(CallDelta::new(params)?),
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SurfaceKind::Price => "price",
            SurfaceKind::Delta => "delta",
        }
    }
}

impl std::fmt::Display for SurfaceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common traits used by all surface models
pub mod traits {
    use super::SurfaceKind;
    use crate::model_params::ModelParams;
    use anyhow::{anyhow, Result};

    /// A pure scalar function of underlying price and current time.
    pub trait SurfaceModel: Send + Sync {
        fn name(&self) -> &str;
        fn kind(&self) -> SurfaceKind;
        fn params(&self) -> &ModelParams;

        /// Evaluate the model at underlying price `s` and time `t`.
        fn evaluate(&self, s: f64, t: f64) -> f64;

        /// Reject time values at which the model is singular.
        fn validate_time(&self, t: f64) -> Result<()> {
            if t.is_finite() {
                Ok(())
            } else {
                Err(anyhow!("{}: time value must be finite, got {}", self.name(), t))
            }
        }
    }
}

/// Numeric helpers shared by the evaluators
pub mod utils {
    use anyhow::{anyhow, Result};
    use statrs::distribution::{Continuous, ContinuousCDF, Normal};

    /// Standard normal N(0, 1) distribution backed by statrs.
    #[derive(Debug, Clone)]
    pub struct StandardNormal {
        inner: Normal,
    }

    impl StandardNormal {
        pub fn new() -> Result<Self> {
            let inner = Normal::new(0.0, 1.0)
                .map_err(|e| anyhow!("Failed to build standard normal: {}", e))?;
            Ok(Self { inner })
        }

        /// Cumulative distribution function N(x)
        pub fn cdf(&self, x: f64) -> f64 {
            self.inner.cdf(x)
        }

        /// Density function n(x)
        pub fn pdf(&self, x: f64) -> f64 {
            self.inner.pdf(x)
        }
    }

}
