// Copyright 2025 Neuromesh Project Developers
// SPDX-License-Identifier: Apache-2.0

//! # Izhikevich Spiking Model
//!
//! Two-variable continuous spiking model (Izhikevich 2003):
//!
//! ```text
//! v' = 0.04 v^2 + 5 v + 140 - u + I
//! u' = a (b v - u)
//! if v >= 30 mV:  v <- c,  u <- u + d,  spike
//! ```
//!
//! The membrane potential `v` is the activation; the recovery variable `u`
//! lives in the rule's data holder.

use serde::{Deserialize, Serialize};

use super::{RuleContext, RuleOutcome, RuleState};
use crate::types::{NeuralError, Result};

const PEAK_MV: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IzhikevichRule {
    /// Recovery time scale.
    pub a: f64,
    /// Recovery sensitivity to subthreshold fluctuations.
    pub b: f64,
    /// Post-spike reset value of the membrane potential.
    pub c: f64,
    /// Post-spike recovery increment.
    pub d: f64,
    /// Constant background current.
    pub background_current: f64,
}

impl Default for IzhikevichRule {
    /// Regular-spiking cortical parameters.
    fn default() -> Self {
        Self {
            a: 0.02,
            b: 0.2,
            c: -65.0,
            d: 8.0,
            background_current: 14.0,
        }
    }
}

impl IzhikevichRule {
    pub fn apply(&self, ctx: &RuleContext<'_>, state: &mut RuleState) -> RuleOutcome {
        let recovery = match state {
            RuleState::Izhikevich { recovery, .. } => recovery,
            // A freshly assigned rule whose holder has not caught up yet.
            other => {
                *other = RuleState::Izhikevich {
                    recovery: 0.0,
                    spiking: Default::default(),
                };
                match other {
                    RuleState::Izhikevich { recovery, .. } => recovery,
                    _ => unreachable!(),
                }
            }
        };

        let v = ctx.activation;
        let u = *recovery;
        let current = ctx.input + self.background_current;

        let dv = 0.04 * v * v + 5.0 * v + 140.0 - u + current;
        let du = self.a * (self.b * v - u);
        let v_next = v + ctx.dt * dv;
        let u_next = u + ctx.dt * du;

        if v_next >= PEAK_MV {
            *recovery = u_next + self.d;
            RuleOutcome::spike(self.c)
        } else {
            *recovery = u_next;
            RuleOutcome::activation(v_next)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.a <= 0.0 {
            return Err(NeuralError::InvalidParameter {
                rule: "Izhikevich",
                message: format!("time scale a must be positive, got {}", self.a),
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

    #[test]
    fn test_izhikevich_spikes_under_sustained_current() {
        let rule = IzhikevichRule::default();
        let mut state = RuleState::Izhikevich {
            recovery: 0.0,
            spiking: Default::default(),
        };
        let mut rng = StdRng::seed_from_u64(0);
        let mut v = rule.c;
        let mut spiked = false;
        for step in 0..2000 {
            let out = rule.apply(
                &RuleContext {
                    input: 10.0,
                    activation: v,
                    time: step as f64 * 0.1,
                    dt: 0.1,
                    rng: &mut rng,
                },
                &mut state,
            );
            v = out.activation;
            if out.spiked {
                spiked = true;
                // Reset lands on c.
                assert_eq!(v, rule.c);
                break;
            }
        }
        assert!(spiked, "regular-spiking cell never fired under 10 units of current");
    }

    #[test]
    fn test_izhikevich_recovery_jump_on_spike() {
        let rule = IzhikevichRule::default();
        let mut state = RuleState::Izhikevich {
            recovery: 0.0,
            spiking: Default::default(),
        };
        let mut rng = StdRng::seed_from_u64(0);
        // Force an immediate spike from just below peak.
        let out = rule.apply(
            &RuleContext {
                input: 200.0,
                activation: 29.0,
                time: 0.0,
                dt: 1.0,
                rng: &mut rng,
            },
            &mut state,
        );
        assert!(out.spiked);
        match state {
            RuleState::Izhikevich { recovery, .. } => assert!(recovery >= rule.d),
            _ => panic!("holder variant changed"),
        }
    }
}
