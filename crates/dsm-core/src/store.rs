//! Read-only view over the solver's result store.
//!
//! The dispatch model reports its results per node: every flow entering or
//! leaving the node, plus any internal variables the node defines, each as
//! one sequence over the shared [`TimeIndex`]. Sequences are keyed by the
//! component pair they connect and the variable name, e.g.
//! `(("wind", "bus_elec"), "flow")`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{DsmError, DsmResult, TimeIndex};

/// Identifies one sequence inside a node result block.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SequenceKey {
    pub from: String,
    /// `None` for node-internal variables that are not attached to an edge.
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default = "default_variable")]
    pub variable: String,
}

fn default_variable() -> String {
    "flow".to_string()
}

impl SequenceKey {
    pub fn flow(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: Some(to.into()),
            variable: default_variable(),
        }
    }

    pub fn variable(node: impl Into<String>, variable: impl Into<String>) -> Self {
        Self {
            from: node.into(),
            to: None,
            variable: variable.into(),
        }
    }

    fn is_flow(&self, from: &str, to: &str) -> bool {
        self.variable == "flow" && self.from == from && self.to.as_deref() == Some(to)
    }
}

impl fmt::Display for SequenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.to {
            Some(to) => write!(f, "(('{}', '{}'), '{}')", self.from, to, self.variable),
            None => write!(f, "(('{}', None), '{}')", self.from, self.variable),
        }
    }
}

/// One named sequence of a node result block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sequence {
    #[serde(flatten)]
    pub key: SequenceKey,
    pub values: Vec<f64>,
}

/// All sequences reported for a single node, in the solver's column order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeSequences {
    label: String,
    columns: Vec<Sequence>,
}

impl NodeSequences {
    pub fn new(label: impl Into<String>, columns: Vec<Sequence>) -> Self {
        Self {
            label: label.into(),
            columns,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn columns(&self) -> &[Sequence] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn push(&mut self, sequence: Sequence) {
        self.columns.push(sequence);
    }

    /// Values of the `(from, to)` flow, or [`DsmError::MissingSeries`] naming it.
    pub fn flow(&self, from: &str, to: &str) -> DsmResult<&[f64]> {
        self.columns
            .iter()
            .find(|seq| seq.key.is_flow(from, to))
            .map(|seq| seq.values.as_slice())
            .ok_or_else(|| DsmError::missing_flow(&self.label, from, to))
    }
}

/// Source of solved sequences, queried by node label.
pub trait ResultStore {
    /// Index shared by every sequence in the store.
    fn index(&self) -> &TimeIndex;

    /// Result block of `label`, or [`DsmError::MissingSeries`] when the node is unknown.
    fn node(&self, label: &str) -> DsmResult<&NodeSequences>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bus() -> NodeSequences {
        NodeSequences::new(
            "bus_elec",
            vec![
                Sequence {
                    key: SequenceKey::flow("wind", "bus_elec"),
                    values: vec![1.0, 2.0],
                },
                Sequence {
                    key: SequenceKey::flow("bus_elec", "excess_el"),
                    values: vec![0.0, 0.5],
                },
            ],
        )
    }

    #[test]
    fn flow_lookup_respects_direction() {
        let bus = bus();
        assert_eq!(bus.flow("wind", "bus_elec").unwrap(), &[1.0, 2.0]);
        assert!(bus.flow("bus_elec", "wind").is_err());
    }

    #[test]
    fn missing_flow_names_the_pair() {
        let err = bus().flow("pv", "bus_elec").unwrap_err();
        match err {
            DsmError::MissingSeries(name) => {
                assert!(name.contains("pv"));
                assert!(name.contains("bus_elec"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn key_display_matches_solver_notation() {
        assert_eq!(
            SequenceKey::flow("pv", "bus_elec").to_string(),
            "(('pv', 'bus_elec'), 'flow')"
        );
        assert_eq!(
            SequenceKey::variable("demand_dsm", "dsm_up").to_string(),
            "(('demand_dsm', None), 'dsm_up')"
        );
    }

    #[test]
    fn sequence_deserializes_with_default_variable() {
        let seq: Sequence =
            serde_json::from_str(r#"{"from": "pv", "to": "bus_elec", "values": [0.0, 1.5]}"#)
                .unwrap();
        assert_eq!(seq.key, SequenceKey::flow("pv", "bus_elec"));
        assert_eq!(seq.values, vec![0.0, 1.5]);
    }
}
