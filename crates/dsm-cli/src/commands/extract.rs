use std::path::Path;

use anyhow::{Context, Result};
use dsm_io::importers::load_solved_model;
use dsm_ts::{extract_results, ResultTable};
use tracing::info;

use dsm_cli::DsmConfig;

/// Load a solved model and merge its result blocks with the configured labels.
pub fn load_table(results: &Path, config: &DsmConfig) -> Result<ResultTable> {
    let model = load_solved_model(results)?;
    let table = extract_results(&model, &model, &config.labels)
        .with_context(|| format!("extracting results from {}", results.display()))?;
    Ok(table)
}

pub fn handle(results: &Path, out: Option<&Path>, config: &DsmConfig) -> Result<()> {
    let table = load_table(results, config)?;
    match out {
        Some(path) => {
            table.write_csv(path)?;
            println!("Result table written to {}", path.display());
            info!(rows = table.height(), path = %path.display(), "result table exported");
        }
        None => print_summary(&table),
    }
    Ok(())
}

fn print_summary(table: &ResultTable) {
    println!("Result table: {} rows", table.height());
    if let (Some(first), Some(last)) = (table.index().first(), table.index().last()) {
        println!("  From : {first}");
        println!("  To   : {last}");
    }
    println!("  Columns: {}", table.column_names().join(", "));
}
