//! Result extraction: solver result blocks into one [`ResultTable`].

use dsm_core::{DsmError, DsmResult, NodeDeclarations, NodeSequences, ResultStore};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::table::{columns, ResultTable};

/// Node and component labels the extractor looks up in the result store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionLabels {
    /// Electricity bus all generators and demands connect to.
    pub bus: String,
    pub coal: String,
    pub wind: String,
    pub pv: String,
    /// Slack source covering unmet demand.
    pub shortage: String,
    /// Slack sink absorbing unused supply.
    pub excess: String,
    /// Demand node with load shifting.
    pub dsm_demand: String,
}

impl Default for ExtractionLabels {
    fn default() -> Self {
        Self {
            bus: "bus_elec".to_string(),
            coal: "pp_coal_1".to_string(),
            wind: "wind".to_string(),
            pv: "pv".to_string(),
            shortage: "shortage_el".to_string(),
            excess: "excess_el".to_string(),
            dsm_demand: "demand_dsm".to_string(),
        }
    }
}

/// Decomposed result block of the DSM demand node.
///
/// The solver reports the block in a fixed column order:
///
/// | column      | content                               |
/// |-------------|---------------------------------------|
/// | `0`         | inbound flow from the demand bus      |
/// | `1..=n-2`   | down-shift flow, one per mechanism    |
/// | `n-1`       | aggregate up-shift flow               |
#[derive(Debug, Clone, PartialEq)]
pub struct DsmBlock {
    pub inbound: Vec<f64>,
    /// Row sums over all down-shift columns.
    pub down: Vec<f64>,
    pub up: Vec<f64>,
}

impl DsmBlock {
    /// Split a DSM node block by column position. Fewer than two columns is a layout error.
    pub fn from_sequences(block: &NodeSequences) -> DsmResult<Self> {
        let columns = block.columns();
        let (first, rest) = columns.split_first().ok_or_else(|| too_few_columns(block))?;
        let (last, middle) = rest.split_last().ok_or_else(|| too_few_columns(block))?;

        let mut down = vec![0.0; first.values.len()];
        for sequence in middle {
            debug!(key = %sequence.key, "summing DSM down-shift column");
            for (total, value) in down.iter_mut().zip(&sequence.values) {
                *total += value;
            }
        }

        Ok(Self {
            inbound: first.values.clone(),
            down,
            up: last.values.clone(),
        })
    }
}

fn too_few_columns(block: &NodeSequences) -> DsmError {
    DsmError::InvalidLayout(format!(
        "DSM node '{}' reports {} column(s); expected inbound flow, down-shift columns and an up-shift column",
        block.label(),
        block.column_count()
    ))
}

/// Per-step DSM imbalance, `down - up`.
pub fn net_shift(down: &[f64], up: &[f64]) -> Vec<f64> {
    down.iter().zip(up).map(|(d, u)| d - u).collect()
}

/// Running sum from the first element.
pub fn cumulative(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .scan(0.0, |acc, v| {
            *acc += v;
            Some(*acc)
        })
        .collect()
}

/// Pull generation, slack, DSM and demand series out of a solved model and merge them.
///
/// Any label absent from `store` or `declarations` fails with [`DsmError::MissingSeries`].
pub fn extract_results(
    store: &impl ResultStore,
    declarations: &impl NodeDeclarations,
    labels: &ExtractionLabels,
) -> DsmResult<ResultTable> {
    let bus = store.node(&labels.bus)?;
    let coal = bus.flow(&labels.coal, &labels.bus)?.to_vec();
    let wind = bus.flow(&labels.wind, &labels.bus)?.to_vec();
    let pv = bus.flow(&labels.pv, &labels.bus)?.to_vec();
    let shortage = bus.flow(&labels.shortage, &labels.bus)?.to_vec();
    let excess = bus.flow(&labels.bus, &labels.excess)?.to_vec();
    let demand_dsm = bus.flow(&labels.bus, &labels.dsm_demand)?.to_vec();

    let block = DsmBlock::from_sequences(store.node(&labels.dsm_demand)?)?;
    let dsm_net = net_shift(&block.down, &block.up);
    let dsm_cumulative = cumulative(&dsm_net);

    let declaration = declarations.declaration(&labels.dsm_demand)?;
    let demand = declaration.attribute("demand")?.to_vec();
    let cap_up = declaration.attribute("capacity_up")?.to_vec();
    let cap_down = declaration.attribute("capacity_down")?.to_vec();

    let extracted = vec![
        (columns::COAL, coal),
        (columns::WIND, wind),
        (columns::PV, pv),
        (columns::EXCESS, excess),
        (columns::SHORTAGE, shortage),
        (columns::DEMAND_DSM, demand_dsm),
        (columns::DSM_DOWN, block.down),
        (columns::DSM_UP, block.up),
        (columns::DSM_NET, dsm_net),
        (columns::DSM_CUMULATIVE, dsm_cumulative),
        (columns::DEMAND, demand),
        (columns::CAP_UP, cap_up),
        (columns::CAP_DOWN, cap_down),
    ];
    for (name, values) in &extracted {
        debug!(column = *name, rows = values.len(), "extracted column");
    }
    let table = ResultTable::from_columns(store.index(), extracted)?;

    info!(
        rows = table.height(),
        columns = table.column_names().len(),
        "extracted result table"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use dsm_core::{DemandDeclaration, SequenceKey, SolvedModel, TimeIndex};

    const HOURS: usize = 6;

    fn model() -> SolvedModel {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mut model = SolvedModel::new(TimeIndex::hourly(start, HOURS));
        let bus = "bus_elec";
        for (from, to, value) in [
            ("pp_coal_1", bus, 50.0),
            ("wind", bus, 30.0),
            ("pv", bus, 10.0),
            ("shortage_el", bus, 0.0),
            (bus, "excess_el", 5.0),
            (bus, "demand_dsm", 85.0),
        ] {
            model
                .add_sequence(bus, SequenceKey::flow(from, to), vec![value; HOURS])
                .unwrap();
        }

        let dsm = "demand_dsm";
        model
            .add_sequence(dsm, SequenceKey::flow(bus, dsm), vec![85.0; HOURS])
            .unwrap()
            .add_sequence(
                dsm,
                SequenceKey::variable(dsm, "dsm_do_shift_1"),
                vec![1.0, 0.0, 2.0, 0.0, 0.0, 0.0],
            )
            .unwrap()
            .add_sequence(
                dsm,
                SequenceKey::variable(dsm, "dsm_do_shift_2"),
                vec![0.5, 0.0, 0.0, 0.0, 0.0, 0.0],
            )
            .unwrap()
            .add_sequence(
                dsm,
                SequenceKey::variable(dsm, "dsm_up"),
                vec![0.0, 1.5, 0.0, 1.0, 1.0, 0.0],
            )
            .unwrap();
        model
            .add_declaration(DemandDeclaration {
                label: dsm.into(),
                demand: vec![85.0; HOURS],
                capacity_up: vec![10.0; HOURS],
                capacity_down: vec![8.0; HOURS],
            })
            .unwrap();
        model
    }

    #[test]
    fn merges_all_columns_in_order() {
        let model = model();
        let table = extract_results(&model, &model, &ExtractionLabels::default()).unwrap();
        assert_eq!(table.height(), HOURS);
        assert_eq!(table.column_names(), columns::ALL.to_vec());
        assert_eq!(table.values(columns::COAL).unwrap(), vec![50.0; HOURS]);
        assert_eq!(table.values(columns::CAP_DOWN).unwrap(), vec![8.0; HOURS]);
    }

    #[test]
    fn dsm_columns_follow_block_layout() {
        let model = model();
        let table = extract_results(&model, &model, &ExtractionLabels::default()).unwrap();
        assert_eq!(
            table.values(columns::DSM_DOWN).unwrap(),
            vec![1.5, 0.0, 2.0, 0.0, 0.0, 0.0]
        );
        assert_eq!(
            table.values(columns::DSM_UP).unwrap(),
            vec![0.0, 1.5, 0.0, 1.0, 1.0, 0.0]
        );
    }

    #[test]
    fn derived_columns_are_net_and_running_sum() {
        let model = model();
        let table = extract_results(&model, &model, &ExtractionLabels::default()).unwrap();
        let down = table.values(columns::DSM_DOWN).unwrap();
        let up = table.values(columns::DSM_UP).unwrap();
        let net = table.values(columns::DSM_NET).unwrap();
        let acc = table.values(columns::DSM_CUMULATIVE).unwrap();

        let mut running = 0.0;
        for row in 0..HOURS {
            assert_eq!(net[row], down[row] - up[row]);
            running += net[row];
            assert_eq!(acc[row], running);
        }
        assert_eq!(acc, vec![1.5, 0.0, 2.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn missing_generator_is_named() {
        let model = model();
        let labels = ExtractionLabels {
            coal: "pp_lignite".into(),
            ..ExtractionLabels::default()
        };
        match extract_results(&model, &model, &labels) {
            Err(DsmError::MissingSeries(name)) => assert!(name.contains("pp_lignite")),
            other => panic!("expected missing series, got {other:?}"),
        }
    }

    #[test]
    fn single_column_dsm_block_fails_loudly() {
        let block = NodeSequences::new(
            "demand_dsm",
            vec![dsm_core::Sequence {
                key: SequenceKey::flow("bus_elec", "demand_dsm"),
                values: vec![1.0],
            }],
        );
        assert!(matches!(
            DsmBlock::from_sequences(&block),
            Err(DsmError::InvalidLayout(_))
        ));
    }

    #[test]
    fn two_column_block_has_no_down_shift() {
        let block = NodeSequences::new(
            "demand_dsm",
            vec![
                dsm_core::Sequence {
                    key: SequenceKey::flow("bus_elec", "demand_dsm"),
                    values: vec![4.0, 4.0],
                },
                dsm_core::Sequence {
                    key: SequenceKey::variable("demand_dsm", "dsm_up"),
                    values: vec![1.0, 2.0],
                },
            ],
        );
        let split = DsmBlock::from_sequences(&block).unwrap();
        assert_eq!(split.down, vec![0.0, 0.0]);
        assert_eq!(split.up, vec![1.0, 2.0]);
        assert_eq!(split.inbound, vec![4.0, 4.0]);
    }

    #[test]
    fn cumulative_of_empty_is_empty() {
        assert!(cumulative(&[]).is_empty());
    }
}
