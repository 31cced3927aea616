// Copyright 2025 Neuromesh Project Developers
// SPDX-License-Identifier: Apache-2.0

//! Aggregations of neurons and synapses.
//!
//! A [`NeuronGroup`] owns its members for deletion purposes: deleting the
//! group deletes the member neurons. A [`NeuronCollection`] is a loose,
//! non-owning aggregation. A [`SynapseGroup`] names the set of synapses
//! between a source and a target group together with the strategy that
//! produced it.

use serde::{Deserialize, Serialize};

use neuromesh_neural::types::{GroupId, NeuronId, SynapseId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineOrientation {
    Horizontal,
    Vertical,
}

/// Shared layout policy for a group's neurons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Layout {
    Line {
        spacing: f64,
        orientation: LineOrientation,
    },
    Grid {
        h_spacing: f64,
        v_spacing: f64,
        columns: usize,
    },
}

impl Default for Layout {
    fn default() -> Self {
        Layout::Line {
            spacing: 50.0,
            orientation: LineOrientation::Horizontal,
        }
    }
}

impl Layout {
    /// Position of the i-th member relative to the group origin.
    pub fn position(&self, index: usize) -> (f64, f64) {
        match self {
            Layout::Line {
                spacing,
                orientation,
            } => match orientation {
                LineOrientation::Horizontal => (index as f64 * spacing, 0.0),
                LineOrientation::Vertical => (0.0, index as f64 * spacing),
            },
            Layout::Grid {
                h_spacing,
                v_spacing,
                columns,
            } => {
                let columns = (*columns).max(1);
                let row = index / columns;
                let col = index % columns;
                (col as f64 * h_spacing, row as f64 * v_spacing)
            }
        }
    }
}

/// An ordered, named aggregation of neurons with a shared layout policy.
/// The group is a cascading-delete boundary, not an id namespace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeuronGroup {
    id: GroupId,
    pub label: String,
    pub(crate) neurons: Vec<NeuronId>,
    pub layout: Layout,
}

impl NeuronGroup {
    pub fn new(id: GroupId, neurons: Vec<NeuronId>) -> Self {
        Self {
            id,
            label: String::new(),
            neurons,
            layout: Layout::default(),
        }
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn neurons(&self) -> &[NeuronId] {
        &self.neurons
    }

    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }

    pub fn contains(&self, neuron: NeuronId) -> bool {
        self.neurons.contains(&neuron)
    }
}

/// A loose aggregation of neurons. Deleting the collection leaves its
/// members alone; deleting a member removes it from the collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeuronCollection {
    id: GroupId,
    pub label: String,
    pub(crate) neurons: Vec<NeuronId>,
}

impl NeuronCollection {
    pub fn new(id: GroupId, neurons: Vec<NeuronId>) -> Self {
        Self {
            id,
            label: String::new(),
            neurons,
        }
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn neurons(&self) -> &[NeuronId] {
        &self.neurons
    }

    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }
}

/// The synapses between a source and a target group, tagged with the name
/// of the connection strategy that produced them. Lives and dies with its
/// endpoint groups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynapseGroup {
    id: GroupId,
    pub label: String,
    pub source_group: GroupId,
    pub target_group: GroupId,
    pub(crate) synapses: Vec<SynapseId>,
    /// Name of the strategy that generated this group's synapses.
    pub strategy_name: String,
}

impl SynapseGroup {
    pub fn new(
        id: GroupId,
        source_group: GroupId,
        target_group: GroupId,
        synapses: Vec<SynapseId>,
        strategy_name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            label: String::new(),
            source_group,
            target_group,
            synapses,
            strategy_name: strategy_name.into(),
        }
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn synapses(&self) -> &[SynapseId] {
        &self.synapses
    }

    pub fn len(&self) -> usize {
        self.synapses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.synapses.is_empty()
    }

    /// Whether the source and target groups are the same group.
    pub fn is_recurrent(&self) -> bool {
        self.source_group == self.target_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_layout_positions() {
        let layout = Layout::Line {
            spacing: 10.0,
            orientation: LineOrientation::Horizontal,
        };
        assert_eq!(layout.position(0), (0.0, 0.0));
        assert_eq!(layout.position(3), (30.0, 0.0));
    }

    #[test]
    fn test_grid_layout_wraps_rows() {
        let layout = Layout::Grid {
            h_spacing: 10.0,
            v_spacing: 20.0,
            columns: 3,
        };
        assert_eq!(layout.position(2), (20.0, 0.0));
        assert_eq!(layout.position(3), (0.0, 20.0));
        assert_eq!(layout.position(4), (10.0, 20.0));
    }
}
