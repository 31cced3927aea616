// Copyright 2025 Neuromesh Project Developers
// SPDX-License-Identifier: Apache-2.0

//! # Oscillator Rule
//!
//! A phase/frequency generator: the phase accumulator advances by
//! `2π · frequency · dt` each step and the activation is
//! `amplitude · sin(phase)`. Input is ignored; oscillators are generator
//! nodes used to drive other parts of a network.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use super::{RuleContext, RuleOutcome, RuleState};
use crate::types::{NeuralError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OscillatorRule {
    /// Cycles per time unit.
    pub frequency: f64,
    pub amplitude: f64,
}

impl Default for OscillatorRule {
    fn default() -> Self {
        Self {
            frequency: 0.1,
            amplitude: 1.0,
        }
    }
}

impl OscillatorRule {
    pub fn apply(&self, ctx: &RuleContext<'_>, state: &mut RuleState) -> RuleOutcome {
        let phase = match state {
            RuleState::Oscillator { phase } => phase,
            other => {
                *other = RuleState::Oscillator { phase: 0.0 };
                match other {
                    RuleState::Oscillator { phase } => phase,
                    _ => unreachable!(),
                }
            }
        };
        *phase = (*phase + TAU * self.frequency * ctx.dt) % TAU;
        RuleOutcome::activation(self.amplitude * phase.sin())
    }

    pub fn validate(&self) -> Result<()> {
        if self.frequency < 0.0 {
            return Err(NeuralError::InvalidParameter {
                rule: "Oscillator",
                message: format!("frequency must be non-negative, got {}", self.frequency),
            });
        }
        Ok(())
    }
}
