//! In-memory solved model: result blocks plus the node declarations that fed the solver.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{DsmError, DsmResult, NodeSequences, ResultStore, Sequence, SequenceKey, TimeIndex};

/// Declared input series of a demand node with demand-side management.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandDeclaration {
    pub label: String,
    /// Original demand profile before any shifting.
    pub demand: Vec<f64>,
    /// Upper bound on upward load shifts per timestep.
    pub capacity_up: Vec<f64>,
    /// Upper bound on downward load shifts per timestep.
    pub capacity_down: Vec<f64>,
}

impl DemandDeclaration {
    /// Named attribute lookup (`demand`, `capacity_up`, `capacity_down`).
    pub fn attribute(&self, name: &str) -> DsmResult<&[f64]> {
        match name {
            "demand" => Ok(&self.demand),
            "capacity_up" => Ok(&self.capacity_up),
            "capacity_down" => Ok(&self.capacity_down),
            other => Err(DsmError::MissingSeries(format!(
                "attribute '{other}' of node '{}'",
                self.label
            ))),
        }
    }
}

/// Lookup of declared node inputs by label.
pub trait NodeDeclarations {
    fn declaration(&self, label: &str) -> DsmResult<&DemandDeclaration>;
}

/// A solved model run held in memory.
#[derive(Debug, Clone)]
pub struct SolvedModel {
    index: TimeIndex,
    nodes: BTreeMap<String, NodeSequences>,
    declarations: Vec<DemandDeclaration>,
}

impl SolvedModel {
    pub fn new(index: TimeIndex) -> Self {
        Self {
            index,
            nodes: BTreeMap::new(),
            declarations: Vec::new(),
        }
    }

    /// Appends a sequence to the result block of `node`, creating the block if needed.
    ///
    /// Column order within a block is insertion order.
    pub fn add_sequence(
        &mut self,
        node: &str,
        key: SequenceKey,
        values: Vec<f64>,
    ) -> DsmResult<&mut Self> {
        self.index.check_len(&format!("{key} on node '{node}'"), values.len())?;
        self.nodes
            .entry(node.to_string())
            .or_insert_with(|| NodeSequences::new(node, Vec::new()))
            .push(Sequence { key, values });
        Ok(self)
    }

    pub fn add_declaration(&mut self, declaration: DemandDeclaration) -> DsmResult<&mut Self> {
        for attribute in ["demand", "capacity_up", "capacity_down"] {
            let values = declaration.attribute(attribute)?;
            self.index.check_len(
                &format!("{attribute} of node '{}'", declaration.label),
                values.len(),
            )?;
        }
        self.declarations.push(declaration);
        Ok(self)
    }

    pub fn node_labels(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }
}

impl ResultStore for SolvedModel {
    fn index(&self) -> &TimeIndex {
        &self.index
    }

    fn node(&self, label: &str) -> DsmResult<&NodeSequences> {
        self.nodes
            .get(label)
            .ok_or_else(|| DsmError::MissingSeries(format!("node '{label}'")))
    }
}

impl NodeDeclarations for SolvedModel {
    fn declaration(&self, label: &str) -> DsmResult<&DemandDeclaration> {
        self.declarations
            .iter()
            .find(|decl| decl.label == label)
            .ok_or_else(|| DsmError::MissingSeries(format!("declaration of node '{label}'")))
    }
}
