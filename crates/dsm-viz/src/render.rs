//! Drawing window charts with plotters.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDateTime;
use dsm_ts::{ResultTable, Window};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use tracing::{debug, info};

use crate::chart::{
    hatch_strokes, plot_path, step_band, step_post, ChartOptions, WindowChart, GRAPHICS_FOLDER,
    MARGIN_PX, X_LABEL_AREA_PX, Y_LABEL_AREA_PX,
};

const WIND_COLOR: RGBColor = RGBColor(0, 139, 139);
const PV_COLOR: RGBColor = RGBColor(255, 215, 0);
const COAL_COLOR: RGBColor = RGBColor(0, 0, 0);
const SHORTAGE_COLOR: RGBColor = RGBColor(128, 128, 128);
const EXCESS_COLOR: RGBColor = RGBColor(178, 34, 34);
const DEMAND_COLOR: RGBColor = RGBColor(0, 0, 255);
const CAPACITY_COLOR: RGBColor = RGBColor(255, 0, 0);
const DSM_DOWN_COLOR: RGBColor = RGBColor(255, 0, 0);
const DSM_UP_COLOR: RGBColor = RGBColor(0, 128, 0);

const STACK_ALPHA: f64 = 0.5;
const DSM_ALPHA: f64 = 0.3;

/// One rendered window.
#[derive(Debug, Clone)]
pub enum RenderedChart {
    /// Written to disk; the drawing surface has been released.
    Saved { start: NaiveDateTime, path: PathBuf },
    /// Kept in memory for inspection by the caller.
    Resident(ResidentChart),
}

/// RGB bitmap of a chart that was not saved.
#[derive(Debug, Clone)]
pub struct ResidentChart {
    pub start: NaiveDateTime,
    pub width: u32,
    pub height: u32,
    /// Row-major RGB bytes, `width * height * 3` long.
    pub pixels: Vec<u8>,
}

/// Renders result-table windows as dual-axis dispatch charts.
///
/// All settings live on the renderer; nothing is configured process-wide.
#[derive(Debug, Clone, Default)]
pub struct ChartRenderer {
    options: ChartOptions,
}

impl ChartRenderer {
    pub fn new(options: ChartOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    /// Draw one chart per `days`-day window, in index order, handing each to `sink`
    /// before the next window is drawn. Returns the number of charts drawn.
    ///
    /// With `save` set, charts go to `<directory>/graphics/`, which must exist.
    /// An error from `sink` stops the run.
    pub fn render<F>(
        &self,
        table: &ResultTable,
        directory: &Path,
        project: &str,
        days: u32,
        mut sink: F,
    ) -> Result<usize>
    where
        F: FnMut(RenderedChart) -> Result<()>,
    {
        let windows = table.windows(days)?;
        info!(windows = windows.len(), days, project, "rendering charts");
        for window in &windows {
            let chart = self.render_window(window, directory, project)?;
            sink(chart)?;
        }
        Ok(windows.len())
    }

    pub fn render_window(
        &self,
        window: &Window<'_>,
        directory: &Path,
        project: &str,
    ) -> Result<RenderedChart> {
        let plan = WindowChart::plan(window, &self.options)
            .with_context(|| format!("planning chart for window {}", window.start()))?;
        let size = (self.options.width, self.options.height);

        if self.options.save {
            let graphics = directory.join(GRAPHICS_FOLDER);
            if !graphics.is_dir() {
                bail!("output folder {} does not exist", graphics.display());
            }
            let path = plot_path(directory, project, plan.start_date());
            {
                let root = BitMapBackend::new(&path, size).into_drawing_area();
                draw_chart(&root, &plan)?;
                root.present()
                    .with_context(|| format!("writing {}", path.display()))?;
            }
            println!("{} saved.", plan.file_name(project));
            info!(path = %path.display(), "chart saved");
            Ok(RenderedChart::Saved {
                start: plan.start,
                path,
            })
        } else {
            let mut pixels = vec![0u8; size.0 as usize * size.1 as usize * 3];
            {
                let root = BitMapBackend::with_buffer(&mut pixels, size).into_drawing_area();
                draw_chart(&root, &plan)?;
                root.present().context("finishing in-memory chart")?;
            }
            debug!(start = %plan.start, "chart kept in memory");
            Ok(RenderedChart::Resident(ResidentChart {
                start: plan.start,
                width: size.0,
                height: size.1,
                pixels,
            }))
        }
    }
}

fn line_legend(color: RGBColor) -> impl Fn((i32, i32)) -> PathElement<(i32, i32)> {
    move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
}

fn band_legend(color: RGBColor, alpha: f64) -> impl Fn((i32, i32)) -> Rectangle<(i32, i32)> {
    move |(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], color.mix(alpha).filled())
}

fn draw_chart(root: &DrawingArea<BitMapBackend<'_>, Shift>, plan: &WindowChart) -> Result<()> {
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(root)
        .margin(MARGIN_PX)
        .x_label_area_size(X_LABEL_AREA_PX)
        .y_label_area_size(Y_LABEL_AREA_PX)
        .right_y_label_area_size(Y_LABEL_AREA_PX)
        .build_cartesian_2d(plan.x_range.clone(), plan.primary.as_range())?
        .set_secondary_coord(plan.x_range.clone(), plan.secondary.as_range());

    let tick_label = |hours: &f64| plan.tick_label(*hours);
    chart
        .configure_mesh()
        .x_labels(plan.tick_count())
        .x_label_formatter(&tick_label)
        .x_label_style(
            ("sans-serif", 12)
                .into_font()
                .transform(FontTransform::Rotate90),
        )
        .x_desc("Time t in h")
        .y_desc("MW")
        .draw()?;
    chart.configure_secondary_axes().y_desc("MW").draw()?;

    let xs = &plan.hours;
    let end = plan.end;

    // demand lines
    chart
        .draw_series(DashedLineSeries::new(
            step_post(xs, &plan.demand, end),
            8,
            4,
            DEMAND_COLOR.stroke_width(2),
        ))?
        .label("Demand")
        .legend(line_legend(DEMAND_COLOR));
    chart
        .draw_series(LineSeries::new(
            step_post(xs, &plan.demand_dsm, end),
            BLACK.stroke_width(2),
        ))?
        .label("Demand after DSM")
        .legend(line_legend(BLACK));

    // DSM capacity envelope
    let envelope = |values: &[f64]| -> Vec<(f64, f64)> {
        xs.iter().copied().zip(values.iter().copied()).collect()
    };
    chart
        .draw_series(DashedLineSeries::new(
            envelope(&plan.capacity_upper),
            8,
            4,
            CAPACITY_COLOR.stroke_width(1),
        ))?
        .label("DSM Capacity")
        .legend(line_legend(CAPACITY_COLOR));
    chart.draw_series(DashedLineSeries::new(
        envelope(&plan.capacity_lower),
        8,
        4,
        CAPACITY_COLOR.stroke_width(1),
    ))?;

    // generation stack
    let colors = [WIND_COLOR, PV_COLOR, COAL_COLOR, SHORTAGE_COLOR];
    for ((label, lower, upper), color) in plan.stack.bands().into_iter().zip(colors) {
        chart
            .draw_series(std::iter::once(Polygon::new(
                step_band(xs, lower, upper, end),
                color.mix(STACK_ALPHA).filled(),
            )))?
            .label(label)
            .legend(band_legend(color, STACK_ALPHA));
    }

    chart
        .draw_series(std::iter::once(Polygon::new(
            step_band(xs, &plan.demand_dsm, &plan.stack.top, end),
            EXCESS_COLOR.mix(STACK_ALPHA).filled(),
        )))?
        .label("Excess")
        .legend(band_legend(EXCESS_COLOR, STACK_ALPHA));
    chart.draw_series(
        hatch_strokes(xs, &plan.demand_dsm, &plan.stack.top, end)
            .into_iter()
            .map(|stroke| PathElement::new(stroke.to_vec(), EXCESS_COLOR.stroke_width(1))),
    )?;

    // secondary axis: DSM shifts
    chart
        .draw_secondary_series(std::iter::once(Polygon::new(
            step_band(xs, &[], &plan.dsm_down, end),
            DSM_DOWN_COLOR.mix(DSM_ALPHA).filled(),
        )))?
        .label("DSM down")
        .legend(band_legend(DSM_DOWN_COLOR, DSM_ALPHA));
    chart
        .draw_secondary_series(std::iter::once(Polygon::new(
            step_band(xs, &[], &plan.dsm_up, end),
            DSM_UP_COLOR.mix(DSM_ALPHA).filled(),
        )))?
        .label("DSM up")
        .legend(band_legend(DSM_UP_COLOR, DSM_ALPHA));
    // cumulative shift: invisible layer, legend entry only
    chart
        .draw_secondary_series(std::iter::once(Polygon::new(
            step_band(xs, &[], &plan.dsm_cumulative, end),
            BLACK.mix(0.0).filled(),
        )))?
        .label("DSM acum")
        .legend(band_legend(BLACK, 0.0));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    Ok(())
}
