use std::path::Path;

use anyhow::Result;
use dsm_viz::{ChartRenderer, RenderedChart};
use tracing::{debug, info};

use crate::commands::extract::load_table;
use dsm_cli::DsmConfig;

pub struct PlotArgs<'a> {
    pub results: &'a Path,
    pub directory: &'a Path,
    pub project: &'a str,
    pub days: u32,
    pub save: bool,
}

pub fn handle(args: &PlotArgs<'_>, config: &DsmConfig) -> Result<()> {
    let table = load_table(args.results, config)?;

    let mut options = config.chart.clone();
    options.save |= args.save;
    let renderer = ChartRenderer::new(options);

    let mut resident = 0usize;
    let charts = renderer.render(&table, args.directory, args.project, args.days, |chart| {
        if let RenderedChart::Resident(bitmap) = chart {
            debug!(start = %bitmap.start, "discarding in-memory chart");
            resident += 1;
        }
        Ok(())
    })?;
    if resident > 0 {
        println!("Rendered {resident} chart(s) in memory; pass --save to write PNG files.");
    }
    info!(charts, project = args.project, "plotting finished");
    Ok(())
}
