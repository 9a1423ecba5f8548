use anyhow::Result;

use super::standardized_args;
use crate::model_params::ModelParams;
use crate::models::traits::SurfaceModel;
use crate::models::utils::StandardNormal;
use crate::models::SurfaceKind;

/// Theoretical call price
///
/// ```text
/// C(S, t) = (S/E)·N(d1) - (e^(-rτ)/2)·N(d2)      τ = T - t > 0
/// C(S, t) = max(S - E, 0)                         τ ≤ 0
/// ```
///
/// This is not the textbook Black-Scholes price; the weighting and argument
/// structure above are evaluated as written.
#[derive(Debug, Clone)]
pub struct CallPrice {
    params: ModelParams,
    normal: StandardNormal,
}

impl CallPrice {
    pub fn new(params: ModelParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            normal: StandardNormal::new()?,
        })
    }

    /// Payoff at expiry: `max(S - E, 0)`.
    pub fn intrinsic(&self, s: f64) -> f64 {
        (s - self.params.strike).max(0.0)
    }
}

impl SurfaceModel for CallPrice {
    fn name(&self) -> &str {
        "call_price"
    }

    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Price
    }

    fn params(&self) -> &ModelParams {
        &self.params
    }

    fn evaluate(&self, s: f64, t: f64) -> f64 {
        if self.params.time_to_maturity(t) <= 0.0 {
            return self.intrinsic(s);
        }
        // ln(0) would send both arguments to -inf where N vanishes
        if s <= 0.0 {
            return 0.0;
        }

        let args = standardized_args(&self.params, s, t);
        let term1 = (s / self.params.strike) * self.normal.cdf(args.d1);
        let term2 = ((-self.params.rate * args.tau).exp() / 2.0) * self.normal.cdf(args.d2);

        term1 - term2
    }
}
