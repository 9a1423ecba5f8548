// Closed-form call evaluators. Price and Delta share the auxiliary ratio
// k = 2r/σ² and the two standardized arguments d1, d2 built from ln(S/E),
// σ√τ and k.

pub mod delta;
pub mod price;

pub use delta::CallDelta;
pub use price::CallPrice;

use crate::model_params::ModelParams;

/// Intermediate quantities for one `(S, t)` evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardizedArgs {
    /// Remaining time to maturity
    pub tau: f64,
    /// σ·√τ
    pub vol_sqrt_tau: f64,
    pub d1: f64,
    pub d2: f64,
}

/// Compute `d1 = ln(S/E)/(σ√τ) - (k+1)σ√τ` and `d2 = ln(S/E)/(σ√τ) - (k-1)σ√τ`.
///
/// Callers must ensure `τ > 0`; `S = 0` yields `d1 = d2 = -inf`.
#[allow(non_snake_case)]
pub fn standardized_args(params: &ModelParams, S: f64, t: f64) -> StandardizedArgs {
    let tau = params.time_to_maturity(t);
    let k = params.k();
    let vol_sqrt_tau = params.volatility * tau.sqrt();
    let scaled_log = (S / params.strike).ln() / vol_sqrt_tau;

    StandardizedArgs {
        tau,
        vol_sqrt_tau,
        d1: scaled_log - (k + 1.0) * vol_sqrt_tau,
        d2: scaled_log - (k - 1.0) * vol_sqrt_tau,
    }
}
