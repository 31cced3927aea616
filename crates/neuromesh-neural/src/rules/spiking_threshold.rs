// Copyright 2025 Neuromesh Project Developers
// SPDX-License-Identifier: Apache-2.0

//! # Spiking Threshold Rule
//!
//! The simplest spiking model: fire whenever the accumulated input exceeds
//! the threshold. Activation is 1 on a spike step and 0 otherwise.

use serde::{Deserialize, Serialize};

use super::{RuleContext, RuleOutcome};
use crate::types::Result;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpikingThresholdRule {
    pub threshold: f64,
}

impl Default for SpikingThresholdRule {
    fn default() -> Self {
        Self { threshold: 0.5 }
    }
}

impl SpikingThresholdRule {
    pub fn apply(&self, ctx: &RuleContext<'_>) -> RuleOutcome {
        if ctx.input > self.threshold {
            RuleOutcome::spike(1.0)
        } else {
            RuleOutcome::activation(0.0)
        }
    }

    pub fn validate(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_threshold_fires_above_only() {
        let rule = SpikingThresholdRule::default();
        let mut rng = StdRng::seed_from_u64(0);
        let below = rule.apply(&RuleContext {
            input: 0.5,
            activation: 0.0,
            time: 0.0,
            dt: 1.0,
            rng: &mut rng,
        });
        assert!(!below.spiked);
        assert_eq!(below.activation, 0.0);

        let above = rule.apply(&RuleContext {
            input: 0.6,
            activation: 0.0,
            time: 0.0,
            dt: 1.0,
            rng: &mut rng,
        });
        assert!(above.spiked);
        assert_eq!(above.activation, 1.0);
    }
}
