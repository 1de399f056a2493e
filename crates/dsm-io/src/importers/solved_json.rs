//! Solved-model JSON importer
//!
//! The solver side dumps its result blocks and the DSM node declarations as
//! one JSON document:
//!
//! ```json
//! {
//!   "index": {"start": "2020-01-01T00:00:00", "step_minutes": 60, "len": 48},
//!   "nodes": {
//!     "bus_elec": [{"from": "wind", "to": "bus_elec", "values": [...]}, ...],
//!     "demand_dsm": [{"from": "bus_elec", "to": "demand_dsm", "values": [...]}, ...]
//!   },
//!   "declarations": [
//!     {"label": "demand_dsm", "demand": [...], "capacity_up": [...], "capacity_down": [...]}
//!   ]
//! }
//! ```
//!
//! `index` may also be an explicit list of timestamps. Sequences within a node
//! keep their document order, which the DSM block layout depends on.

use std::{collections::BTreeMap, fs, path::Path};

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDateTime};
use dsm_core::{DemandDeclaration, DsmError, Sequence, SolvedModel, TimeIndex};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct SolvedModelJson {
    index: IndexJson,
    nodes: BTreeMap<String, Vec<Sequence>>,
    #[serde(default)]
    declarations: Vec<DemandDeclaration>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IndexJson {
    Regular {
        start: NaiveDateTime,
        #[serde(default = "default_step_minutes")]
        step_minutes: i64,
        len: usize,
    },
    Explicit(Vec<NaiveDateTime>),
}

fn default_step_minutes() -> i64 {
    60
}

impl IndexJson {
    fn into_index(self) -> Result<TimeIndex> {
        let index = match self {
            IndexJson::Regular {
                start,
                step_minutes,
                len,
            } => {
                let step = Duration::try_minutes(step_minutes).ok_or_else(|| {
                    DsmError::Validation(format!("step_minutes {step_minutes} is out of range"))
                })?;
                TimeIndex::regular(start, step, len)?
            }
            IndexJson::Explicit(stamps) => TimeIndex::new(stamps)?,
        };
        Ok(index)
    }
}

/// Parse a solved model from its JSON text.
pub fn parse_solved_model(text: &str) -> Result<SolvedModel> {
    let raw: SolvedModelJson =
        serde_json::from_str(text).context("parsing solved model JSON")?;
    let index = raw.index.into_index().context("building time index")?;
    let mut model = SolvedModel::new(index);

    for (node, sequences) in raw.nodes {
        debug!(node = %node, columns = sequences.len(), "importing result block");
        for sequence in sequences {
            model
                .add_sequence(&node, sequence.key, sequence.values)
                .with_context(|| format!("importing result block of node '{node}'"))?;
        }
    }

    for declaration in raw.declarations {
        let label = declaration.label.clone();
        model
            .add_declaration(declaration)
            .with_context(|| format!("importing declaration of node '{label}'"))?;
    }

    Ok(model)
}

/// Read and parse a solved model JSON file.
pub fn load_solved_model(path: impl AsRef<Path>) -> Result<SolvedModel> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).with_context(|| format!("opening {}", path.display()))?;
    parse_solved_model(&text).with_context(|| format!("loading {}", path.display()))
}
