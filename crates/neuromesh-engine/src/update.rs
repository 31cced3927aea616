// Copyright 2025 Neuromesh Project Developers
// SPDX-License-Identifier: Apache-2.0

//! The update manager: the ordered list of actions a network invokes on
//! every step, and the discipline each one runs under.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use neuromesh_graph::GroupId;

use crate::error::Result;
use crate::network::Network;

/// How a set of neurons is updated within one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateDiscipline {
    /// Each neuron recomputes from the current state of its inputs as they
    /// are updated; evaluation order matters.
    Immediate,
    /// All inputs are computed from a pre-pass snapshot, then all
    /// activations commit together; order-independent.
    #[default]
    Buffered,
}

impl FromStr for UpdateDiscipline {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "immediate" => Ok(UpdateDiscipline::Immediate),
            "buffered" => Ok(UpdateDiscipline::Buffered),
            other => Err(format!("unknown update discipline '{other}'")),
        }
    }
}

impl fmt::Display for UpdateDiscipline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateDiscipline::Immediate => write!(f, "immediate"),
            UpdateDiscipline::Buffered => write!(f, "buffered"),
        }
    }
}

/// A user-registered update hook with a human-readable description.
pub struct CustomAction {
    pub description: String,
    pub(crate) run: Box<dyn FnMut(&mut Network) -> Result<()> + Send>,
}

impl fmt::Debug for CustomAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CustomAction({})", self.description)
    }
}

/// One entry in the network's update sequence. Within a step, actions run
/// in registration order with no overlap.
#[derive(Debug)]
pub enum UpdateAction {
    /// Whole-graph snapshot-then-commit update.
    Buffered,
    /// Whole-graph sequential update in insertion order.
    Immediate,
    /// Sequential update in ascending neuron priority order.
    Priority,
    /// Buffered update with the snapshot phase partitioned across workers.
    /// Falls back to the sequential buffered path when the `parallel`
    /// feature is off.
    ConcurrentBuffered,
    /// Update one group's members under an explicit discipline.
    Group {
        group: GroupId,
        discipline: UpdateDiscipline,
    },
    /// Forward-propagate all weight matrices and apply array rules.
    PropagateMatrices,
    /// Apply synapse learning rules (Hebbian and friends).
    UpdateSynapses,
    /// Run every registered coupling once.
    ApplyCouplings,
    Custom(CustomAction),
}

impl UpdateAction {
    /// Wrap a closure as an update action.
    pub fn custom(
        description: impl Into<String>,
        run: impl FnMut(&mut Network) -> Result<()> + Send + 'static,
    ) -> Self {
        UpdateAction::Custom(CustomAction {
            description: description.into(),
            run: Box::new(run),
        })
    }

    pub fn description(&self) -> String {
        match self {
            UpdateAction::Buffered => "Buffered update".into(),
            UpdateAction::Immediate => "Immediate update".into(),
            UpdateAction::Priority => "Priority update".into(),
            UpdateAction::ConcurrentBuffered => "Concurrent buffered update".into(),
            UpdateAction::Group { group, discipline } => {
                format!("Update group {group} ({discipline})")
            }
            UpdateAction::PropagateMatrices => "Propagate weight matrices".into(),
            UpdateAction::UpdateSynapses => "Update synapses".into(),
            UpdateAction::ApplyCouplings => "Apply couplings".into(),
            UpdateAction::Custom(custom) => custom.description.clone(),
        }
    }

    /// The persistable form of this action.
    pub fn descriptor(&self) -> ActionDescriptor {
        match self {
            UpdateAction::Buffered => ActionDescriptor::Buffered,
            UpdateAction::Immediate => ActionDescriptor::Immediate,
            UpdateAction::Priority => ActionDescriptor::Priority,
            UpdateAction::ConcurrentBuffered => ActionDescriptor::ConcurrentBuffered,
            UpdateAction::Group { group, discipline } => ActionDescriptor::Group {
                group: *group,
                discipline: *discipline,
            },
            UpdateAction::PropagateMatrices => ActionDescriptor::PropagateMatrices,
            UpdateAction::UpdateSynapses => ActionDescriptor::UpdateSynapses,
            UpdateAction::ApplyCouplings => ActionDescriptor::ApplyCouplings,
            UpdateAction::Custom(custom) => ActionDescriptor::Custom {
                description: custom.description.clone(),
            },
        }
    }

    /// Reconstruct an action from its persisted form. Custom actions are
    /// closures and cannot round-trip; they yield `None`.
    pub fn from_descriptor(descriptor: &ActionDescriptor) -> Option<UpdateAction> {
        match descriptor {
            ActionDescriptor::Buffered => Some(UpdateAction::Buffered),
            ActionDescriptor::Immediate => Some(UpdateAction::Immediate),
            ActionDescriptor::Priority => Some(UpdateAction::Priority),
            ActionDescriptor::ConcurrentBuffered => Some(UpdateAction::ConcurrentBuffered),
            ActionDescriptor::Group { group, discipline } => Some(UpdateAction::Group {
                group: *group,
                discipline: *discipline,
            }),
            ActionDescriptor::PropagateMatrices => Some(UpdateAction::PropagateMatrices),
            ActionDescriptor::UpdateSynapses => Some(UpdateAction::UpdateSynapses),
            ActionDescriptor::ApplyCouplings => Some(UpdateAction::ApplyCouplings),
            ActionDescriptor::Custom { .. } => None,
        }
    }
}

/// Serializable identity of an update action, used by the persistence
/// layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionDescriptor {
    Buffered,
    Immediate,
    Priority,
    ConcurrentBuffered,
    Group {
        group: GroupId,
        discipline: UpdateDiscipline,
    },
    PropagateMatrices,
    UpdateSynapses,
    ApplyCouplings,
    Custom {
        description: String,
    },
}

/// The ordered action list a network steps through.
#[derive(Debug, Default)]
pub struct UpdateManager {
    pub(crate) actions: Vec<UpdateAction>,
}

impl UpdateManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_action(&mut self, action: UpdateAction) {
        self.actions.push(action);
    }

    pub fn insert_action(&mut self, index: usize, action: UpdateAction) {
        let index = index.min(self.actions.len());
        self.actions.insert(index, action);
    }

    pub fn remove_action(&mut self, index: usize) -> Option<UpdateAction> {
        if index < self.actions.len() {
            Some(self.actions.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.actions.clear();
    }

    pub fn actions(&self) -> &[UpdateAction] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn descriptors(&self) -> Vec<ActionDescriptor> {
        self.actions.iter().map(UpdateAction::descriptor).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discipline_parsing() {
        assert_eq!(
            "buffered".parse::<UpdateDiscipline>().unwrap(),
            UpdateDiscipline::Buffered
        );
        assert_eq!(
            "Immediate".parse::<UpdateDiscipline>().unwrap(),
            UpdateDiscipline::Immediate
        );
        assert!("eventual".parse::<UpdateDiscipline>().is_err());
    }

    #[test]
    fn test_descriptor_round_trip_for_builtins() {
        let actions = [
            UpdateAction::Buffered,
            UpdateAction::Immediate,
            UpdateAction::Priority,
            UpdateAction::PropagateMatrices,
        ];
        for action in actions {
            let descriptor = action.descriptor();
            let rebuilt = UpdateAction::from_descriptor(&descriptor).unwrap();
            assert_eq!(rebuilt.descriptor(), descriptor);
        }
    }

    #[test]
    fn test_custom_actions_do_not_round_trip() {
        let action = UpdateAction::custom("poke", |_net| Ok(()));
        let descriptor = action.descriptor();
        assert!(UpdateAction::from_descriptor(&descriptor).is_none());
    }
}
