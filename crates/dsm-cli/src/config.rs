//! Optional TOML configuration for the `dsm` binary.
//!
//! ```toml
//! [labels]
//! bus = "bus_elec"
//! dsm_demand = "demand_dsm"
//!
//! [chart]
//! width = 1200
//! primary_range = [-10.0, 300.0]
//! ```

use anyhow::{Context, Result};
use dsm_ts::ExtractionLabels;
use dsm_viz::ChartOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DsmConfig {
    /// Node and component labels used during extraction
    #[serde(default)]
    pub labels: ExtractionLabels,
    /// Chart size, axis ranges and alignment references
    #[serde(default)]
    pub chart: ChartOptions,
}

/// Load the configuration at `path`, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<DsmConfig> {
    let Some(path) = path else {
        return Ok(DsmConfig::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: DsmConfig =
        toml::from_str(&contents).with_context(|| format!("parsing config {}", path.display()))?;
    Ok(config)
}
