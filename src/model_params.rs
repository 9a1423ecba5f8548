//! Fixed model parameters shared by every evaluator.
//!
//! The parameters are an immutable value passed explicitly into each model,
//! so evaluators stay pure and can be constructed side by side with
//! different inputs.

use anyhow::{anyhow, Result};

/// Strike, risk-free rate, volatility and maturity of the call option.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ModelParams {
    /// Strike (exercise) price
    pub strike: f64,
    /// Annualised risk-free rate (decimal, e.g. 0.06 for 6%)
    pub rate: f64,
    /// Annualised volatility of the underlying (decimal)
    pub volatility: f64,
    /// Maturity in years
    pub maturity: f64,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            strike: 100.0,
            rate: 0.06,
            volatility: 0.3,
            maturity: 1.0,
        }
    }
}

impl ModelParams {
    /// Create validated model parameters.
    ///
    /// # Errors
    /// Returns an error if any value is non-finite, or if strike, volatility or
    /// maturity is not strictly positive. Each of these would otherwise put a
    /// zero in a denominator or inside a logarithm.
    pub fn new(strike: f64, rate: f64, volatility: f64, maturity: f64) -> Result<Self> {
        let params = Self {
            strike,
            rate,
            volatility,
            maturity,
        };
        params.validate()?;
        Ok(params)
    }

    /// Check the parameter set without constructing a new value.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("strike", self.strike),
            ("rate", self.rate),
            ("volatility", self.volatility),
            ("maturity", self.maturity),
        ] {
            if !value.is_finite() {
                return Err(anyhow!("Parameter '{}' must be finite, got {}", name, value));
            }
        }
        if self.strike <= 0.0 {
            return Err(anyhow!("Strike must be positive, got {}", self.strike));
        }
        if self.volatility <= 0.0 {
            return Err(anyhow!(
                "Volatility must be positive, got {}",
                self.volatility
            ));
        }
        if self.maturity <= 0.0 {
            return Err(anyhow!("Maturity must be positive, got {}", self.maturity));
        }
        Ok(())
    }

    /// Auxiliary ratio `k = 2r / σ²`.
    pub fn k(&self) -> f64 {
        2.0 * self.rate / (self.volatility * self.volatility)
    }

    /// Remaining time `T - t`; zero or negative at and past maturity.
    pub fn time_to_maturity(&self, t: f64) -> f64 {
        self.maturity - t
    }
}
