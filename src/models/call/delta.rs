use anyhow::{anyhow, Result};

use super::standardized_args;
use crate::model_params::ModelParams;
use crate::models::traits::SurfaceModel;
use crate::models::utils::StandardNormal;
use crate::models::SurfaceKind;

/// Delta of [`CallPrice`](super::CallPrice), `∂C/∂S`.
///
/// ```text
/// δ = N(d1)/E + n(d1)/(E·σ√τ) - e^(-rτ)·n(d2)/(2·S·σ√τ)
/// ```
///
/// Only defined for `0 < t < T`; both endpoints put a zero in a denominator.
#[derive(Debug, Clone)]
pub struct CallDelta {
    params: ModelParams,
    normal: StandardNormal,
}

impl CallDelta {
    pub fn new(params: ModelParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            normal: StandardNormal::new()?,
        })
    }
}

impl SurfaceModel for CallDelta {
    fn name(&self) -> &str {
        "call_delta"
    }

    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Delta
    }

    fn params(&self) -> &ModelParams {
        &self.params
    }

    fn evaluate(&self, s: f64, t: f64) -> f64 {
        // Limit as S -> 0+: n(d2) decays faster than 1/S grows
        if s <= 0.0 {
            return 0.0;
        }

        let strike = self.params.strike;
        let args = standardized_args(&self.params, s, t);

        let term1 = self.normal.cdf(args.d1) / strike;
        let term2 = self.normal.pdf(args.d1) / (strike * args.vol_sqrt_tau);
        // For subnormal S the denominator underflows to zero while n(d2) is
        // already zero; the product's limit is zero
        let density = self.normal.pdf(args.d2);
        let term3 = if density == 0.0 {
            0.0
        } else {
            (-self.params.rate * args.tau).exp() / (2.0 * s * args.vol_sqrt_tau) * density
        };

        term1 + term2 - term3
    }

    fn validate_time(&self, t: f64) -> Result<()> {
        if !t.is_finite() || t <= 0.0 || t >= self.params.maturity {
            return Err(anyhow!(
                "{}: time value t={} outside open interval (0, {})",
                self.name(),
                t,
                self.params.maturity
            ));
        }
        Ok(())
    }
}
