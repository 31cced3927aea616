// Copyright 2025 Neuromesh Project Developers
// SPDX-License-Identifier: Apache-2.0

//! # Linear Update Rule
//!
//! The default rule. Activation is a linear function of the accumulated
//! input, with one of three clipping modes applied as the final step:
//!
//! ```text
//! a = slope * (input + bias)
//!
//! NoClipping:  activation = a
//! Clip:        activation = clamp(a, lower_bound, upper_bound)
//! Relu:        activation = max(a, 0)
//! ```

use serde::{Deserialize, Serialize};

use super::{RuleContext, RuleOutcome};
use crate::types::{NeuralError, Result};

/// How a linear neuron bounds its output. Bounds apply to the computed
/// activation, never to the input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClippingMode {
    NoClipping,
    /// Hard clip to `[lower_bound, upper_bound]`.
    #[default]
    Clip,
    /// Rectified linear: negative output becomes zero.
    Relu,
}

/// Linear neuron: `slope * (input + bias)` with a selectable clipping mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearRule {
    pub slope: f64,
    pub bias: f64,
    pub clipping: ClippingMode,
    pub upper_bound: f64,
    pub lower_bound: f64,
}

impl Default for LinearRule {
    fn default() -> Self {
        Self {
            slope: 1.0,
            bias: 0.0,
            clipping: ClippingMode::Clip,
            upper_bound: 1.0,
            lower_bound: -1.0,
        }
    }
}

impl LinearRule {
    pub fn apply(&self, ctx: &RuleContext<'_>) -> RuleOutcome {
        let raw = self.slope * (ctx.input + self.bias);
        let activation = match self.clipping {
            ClippingMode::NoClipping => raw,
            ClippingMode::Clip => raw.clamp(self.lower_bound, self.upper_bound),
            ClippingMode::Relu => raw.max(0.0),
        };
        RuleOutcome::activation(activation)
    }

    /// Slope inside the operating range, zero in a saturated region.
    pub fn derivative(&self, activation: f64) -> f64 {
        match self.clipping {
            ClippingMode::NoClipping => self.slope,
            ClippingMode::Clip => {
                if activation >= self.upper_bound || activation <= self.lower_bound {
                    0.0
                } else {
                    self.slope
                }
            }
            ClippingMode::Relu => {
                if activation > 0.0 {
                    self.slope
                } else {
                    0.0
                }
            }
        }
    }

    pub fn bounds(&self) -> Option<(f64, f64)> {
        match self.clipping {
            ClippingMode::Clip => Some((self.lower_bound, self.upper_bound)),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.clipping == ClippingMode::Clip && self.lower_bound >= self.upper_bound {
            return Err(NeuralError::InvertedBounds {
                lower: self.lower_bound,
                upper: self.upper_bound,
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

    fn ctx(input: f64, rng: &mut StdRng) -> RuleContext<'_> {
        RuleContext {
            input,
            activation: 0.0,
            time: 0.0,
            dt: 1.0,
            rng,
        }
    }

    #[test]
    fn test_linear_no_clipping() {
        let mut rng = StdRng::seed_from_u64(0);
        let rule = LinearRule {
            slope: 2.0,
            bias: 0.5,
            clipping: ClippingMode::NoClipping,
            ..LinearRule::default()
        };
        let out = rule.apply(&ctx(3.0, &mut rng));
        assert!((out.activation - 7.0).abs() < 1e-12);
        assert!(!out.spiked);
    }

    #[test]
    fn test_linear_clips_last() {
        let mut rng = StdRng::seed_from_u64(0);
        let rule = LinearRule::default();
        // Input well past the bound: the output is the bound itself, meaning
        // the bound applied to the result, not to the input.
        let out = rule.apply(&ctx(100.0, &mut rng));
        assert_eq!(out.activation, 1.0);
        let out = rule.apply(&ctx(-100.0, &mut rng));
        assert_eq!(out.activation, -1.0);
    }

    #[test]
    fn test_linear_relu() {
        let mut rng = StdRng::seed_from_u64(0);
        let rule = LinearRule {
            clipping: ClippingMode::Relu,
            ..LinearRule::default()
        };
        assert_eq!(rule.apply(&ctx(-3.0, &mut rng)).activation, 0.0);
        assert_eq!(rule.apply(&ctx(3.0, &mut rng)).activation, 3.0);
    }

    #[test]
    fn test_linear_derivative_zero_when_saturated() {
        let rule = LinearRule {
            slope: 1.5,
            ..LinearRule::default()
        };
        assert_eq!(rule.derivative(0.2), 1.5);
        assert_eq!(rule.derivative(1.0), 0.0);
        assert_eq!(rule.derivative(-1.0), 0.0);
    }

    #[test]
    fn test_linear_validate_inverted_bounds() {
        let rule = LinearRule {
            lower_bound: 2.0,
            upper_bound: 1.0,
            ..LinearRule::default()
        };
        assert!(rule.validate().is_err());
    }
}
