// Copyright 2025 Neuromesh Project Developers
// SPDX-License-Identifier: Apache-2.0

//! # Sigmoidal Update Rule
//!
//! Squashes the accumulated input into `(lower_bound, upper_bound)` with a
//! selectable squashing family. All families are normalized so the slope of
//! the curve at the inflection point equals the configured `slope`.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::{RuleContext, RuleOutcome};
use crate::types::{NeuralError, Result};

/// The family of squashing functions available to sigmoidal neurons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SquashingFamily {
    #[default]
    Logistic,
    Tanh,
    Arctan,
}

/// Sigmoidal neuron with a configurable squashing family, slope, bias, and
/// output range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SigmoidalRule {
    pub family: SquashingFamily,
    pub slope: f64,
    pub bias: f64,
    pub upper_bound: f64,
    pub lower_bound: f64,
}

impl Default for SigmoidalRule {
    fn default() -> Self {
        Self {
            family: SquashingFamily::Logistic,
            slope: 1.0,
            bias: 0.0,
            upper_bound: 1.0,
            lower_bound: 0.0,
        }
    }
}

impl SigmoidalRule {
    fn range(&self) -> f64 {
        self.upper_bound - self.lower_bound
    }

    pub fn apply(&self, ctx: &RuleContext<'_>) -> RuleOutcome {
        let x = ctx.input + self.bias;
        let diff = self.range();
        let activation = match self.family {
            SquashingFamily::Logistic => {
                let k = 4.0 * self.slope / diff;
                self.lower_bound + diff / (1.0 + (-k * x).exp())
            }
            SquashingFamily::Tanh => {
                let k = 2.0 * self.slope / diff;
                self.lower_bound + diff * ((k * x).tanh() + 1.0) / 2.0
            }
            SquashingFamily::Arctan => {
                let k = PI * self.slope / diff;
                self.lower_bound + diff * ((k * x).atan() / PI + 0.5)
            }
        };
        RuleOutcome::activation(activation)
    }

    /// Derivative expressed as a function of the current activation. All
    /// three families vanish as the activation approaches either bound.
    pub fn derivative(&self, activation: f64) -> f64 {
        if activation <= self.lower_bound || activation >= self.upper_bound {
            return 0.0;
        }
        let diff = self.range();
        // Normalized position in (0, 1).
        let s = (activation - self.lower_bound) / diff;
        match self.family {
            SquashingFamily::Logistic => 4.0 * self.slope * s * (1.0 - s),
            SquashingFamily::Tanh => {
                // tanh'(y) = 1 - tanh(y)^2 with tanh(y) = 2s - 1
                let t = 2.0 * s - 1.0;
                self.slope * (1.0 - t * t)
            }
            SquashingFamily::Arctan => {
                // atan'(y) = 1/(1+y^2) with y = tan(pi*(s - 1/2))
                let y = (PI * (s - 0.5)).tan();
                self.slope / (1.0 + y * y)
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.lower_bound >= self.upper_bound {
            return Err(NeuralError::InvertedBounds {
                lower: self.lower_bound,
                upper: self.upper_bound,
            });
        }
        if self.slope <= 0.0 {
            return Err(NeuralError::InvalidParameter {
                rule: "Sigmoidal",
                message: format!("slope must be positive, got {}", self.slope),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn activation_at(rule: &SigmoidalRule, input: f64) -> f64 {
        let mut rng = StdRng::seed_from_u64(0);
        rule.apply(&RuleContext {
            input,
            activation: 0.0,
            time: 0.0,
            dt: 1.0,
            rng: &mut rng,
        })
        .activation
    }

    #[test]
    fn test_sigmoidal_midpoint_and_saturation() {
        for family in [
            SquashingFamily::Logistic,
            SquashingFamily::Tanh,
            SquashingFamily::Arctan,
        ] {
            let rule = SigmoidalRule {
                family,
                ..SigmoidalRule::default()
            };
            // Zero input sits exactly at the midpoint of the range.
            assert!((activation_at(&rule, 0.0) - 0.5).abs() < 1e-9, "{:?}", family);
            // Large inputs approach the bounds without crossing them.
            let hi = activation_at(&rule, 1e4);
            let lo = activation_at(&rule, -1e4);
            assert!(hi <= 1.0 && hi > 0.9, "{:?} hi={}", family, hi);
            assert!(lo >= 0.0 && lo < 0.1, "{:?} lo={}", family, lo);
        }
    }

    #[test]
    fn test_sigmoidal_derivative_peaks_at_slope() {
        for family in [
            SquashingFamily::Logistic,
            SquashingFamily::Tanh,
            SquashingFamily::Arctan,
        ] {
            let rule = SigmoidalRule {
                family,
                slope: 2.5,
                ..SigmoidalRule::default()
            };
            // Midpoint derivative equals the configured slope.
            assert!((rule.derivative(0.5) - 2.5).abs() < 1e-9, "{:?}", family);
            // Saturated derivative is exactly zero.
            assert_eq!(rule.derivative(1.0), 0.0);
            assert_eq!(rule.derivative(0.0), 0.0);
        }
    }

    #[test]
    fn test_sigmoidal_custom_range() {
        let rule = SigmoidalRule {
            lower_bound: -1.0,
            upper_bound: 1.0,
            ..SigmoidalRule::default()
        };
        assert!(activation_at(&rule, 0.0).abs() < 1e-9);
    }
}
