// Copyright 2025 Neuromesh Project Developers
// SPDX-License-Identifier: Apache-2.0

//! # Decay Update Rule
//!
//! A continuous-valued rule: the sum of the prior activation and the new
//! input relaxes toward a baseline by a fixed amount (absolute mode) or by a
//! fraction of its distance from the baseline (relative mode). Output is
//! clipped to the configured bounds as the final step.

use serde::{Deserialize, Serialize};

use super::{RuleContext, RuleOutcome};
use crate::types::{NeuralError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecayRule {
    /// Fraction of the distance to baseline lost per step (relative mode).
    pub decay_fraction: f64,
    /// Absolute amount lost per step (absolute mode).
    pub decay_amount: f64,
    /// Use `decay_fraction` when true, `decay_amount` otherwise.
    pub relative: bool,
    pub baseline: f64,
    pub upper_bound: f64,
    pub lower_bound: f64,
}

impl Default for DecayRule {
    fn default() -> Self {
        Self {
            decay_fraction: 0.1,
            decay_amount: 0.1,
            relative: false,
            baseline: 0.0,
            upper_bound: 1.0,
            lower_bound: -1.0,
        }
    }
}

impl DecayRule {
    pub fn apply(&self, ctx: &RuleContext<'_>) -> RuleOutcome {
        let mut val = ctx.activation + ctx.input;
        let decay = if self.relative {
            self.decay_fraction * (val - self.baseline).abs()
        } else {
            self.decay_amount
        };
        if val < self.baseline {
            val += decay;
            if val > self.baseline {
                val = self.baseline;
            }
        } else if val > self.baseline {
            val -= decay;
            if val < self.baseline {
                val = self.baseline;
            }
        }
        RuleOutcome::activation(val.clamp(self.lower_bound, self.upper_bound))
    }

    pub fn derivative(&self, activation: f64) -> f64 {
        if activation >= self.upper_bound || activation <= self.lower_bound {
            0.0
        } else {
            1.0
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.lower_bound >= self.upper_bound {
            return Err(NeuralError::InvertedBounds {
                lower: self.lower_bound,
                upper: self.upper_bound,
            });
        }
        if !(0.0..=1.0).contains(&self.decay_fraction) {
            return Err(NeuralError::InvalidParameter {
                rule: "Decay",
                message: format!("decay_fraction must be in [0, 1], got {}", self.decay_fraction),
            });
        }
        Ok(())
    }
}
