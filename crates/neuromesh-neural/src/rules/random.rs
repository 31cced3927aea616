// Copyright 2025 Neuromesh Project Developers
// SPDX-License-Identifier: Apache-2.0

//! # Random Rule
//!
//! A stochastic generator: each step draws a uniform activation from
//! `[lower_bound, upper_bound]`. The draw comes from the simulation-owned
//! generator, so seeded networks replay identically.

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::RuleOutcome;
use crate::types::{NeuralError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RandomRule {
    pub upper_bound: f64,
    pub lower_bound: f64,
}

impl Default for RandomRule {
    fn default() -> Self {
        Self {
            upper_bound: 1.0,
            lower_bound: -1.0,
        }
    }
}

impl RandomRule {
    pub fn apply(&self, rng: &mut StdRng) -> RuleOutcome {
        RuleOutcome::activation(rng.gen_range(self.lower_bound..=self.upper_bound))
    }

    pub fn validate(&self) -> Result<()> {
        if self.lower_bound >= self.upper_bound {
            return Err(NeuralError::InvertedBounds {
                lower: self.lower_bound,
                upper: self.upper_bound,
            });
        }
        Ok(())
    }
}
