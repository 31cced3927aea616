// Copyright 2025 Neuromesh Project Developers
// SPDX-License-Identifier: Apache-2.0

//! Neuron polarity.

use core::fmt;
use serde::{Deserialize, Serialize};

/// Polarity of a neuron: excitatory neurons only source positive weights,
/// inhibitory neurons only negative ones. `Both` is the unpolarized default.
/// Topology generators use polarity when assigning strengths and when
/// selecting radial candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    Excitatory,
    Inhibitory,
    #[default]
    Both,
}

impl Polarity {
    /// Force `strength` to the sign this polarity allows. Unpolarized
    /// neurons pass the value through unchanged.
    pub fn clip(&self, strength: f64) -> f64 {
        match self {
            Polarity::Excitatory => strength.abs(),
            Polarity::Inhibitory => -strength.abs(),
            Polarity::Both => strength,
        }
    }

    /// Sign multiplier: +1 excitatory, -1 inhibitory, +1 unpolarized.
    pub fn sign(&self) -> f64 {
        match self {
            Polarity::Inhibitory => -1.0,
            _ => 1.0,
        }
    }

    pub fn is_polarized(&self) -> bool {
        !matches!(self, Polarity::Both)
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Polarity::Excitatory => write!(f, "Excitatory"),
            Polarity::Inhibitory => write!(f, "Inhibitory"),
            Polarity::Both => write!(f, "None"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polarity_clip() {
        assert_eq!(Polarity::Excitatory.clip(-2.0), 2.0);
        assert_eq!(Polarity::Inhibitory.clip(2.0), -2.0);
        assert_eq!(Polarity::Both.clip(-2.0), -2.0);
    }
}
