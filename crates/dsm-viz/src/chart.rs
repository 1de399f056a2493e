//! Per-window chart plan: everything needed to draw one chart, computed without a drawing surface.

use std::{
    ops::Range,
    path::{Path, PathBuf},
};

use chrono::{Duration, NaiveDate, NaiveDateTime};
use dsm_core::{DsmError, DsmResult};
use dsm_ts::{columns, Window};
use serde::{Deserialize, Serialize};

use crate::align::{align_axes, AxisRange};
use crate::stack::GenerationStack;

/// Subfolder of the output directory that receives the chart images.
pub const GRAPHICS_FOLDER: &str = "graphics";

pub(crate) const MARGIN_PX: u32 = 20;
pub(crate) const X_LABEL_AREA_PX: u32 = 120;
pub(crate) const Y_LABEL_AREA_PX: u32 = 70;

const TICK_FORMAT: &str = "%d.%m - %H h";

/// Chart rendering options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartOptions {
    /// Write each chart to `<directory>/graphics/` instead of keeping it in memory.
    pub save: bool,
    pub width: u32,
    pub height: u32,
    /// Nominal primary y-range in MW, before alignment.
    pub primary_range: (f64, f64),
    /// Nominal secondary y-range in MW, before alignment.
    pub secondary_range: (f64, f64),
    /// Primary-axis value that lines up with [`Self::secondary_reference`].
    pub primary_reference: f64,
    pub secondary_reference: f64,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            save: false,
            width: 1000,
            height: 1000,
            primary_range: (-10.0, 250.0),
            secondary_range: (-110.0, 150.0),
            primary_reference: 100.0,
            secondary_reference: 0.0,
        }
    }
}

impl ChartOptions {
    /// Pixel height of the plotting box inside the figure.
    pub fn plot_height_px(&self) -> f64 {
        f64::from(self.height) - f64::from(2 * MARGIN_PX + X_LABEL_AREA_PX)
    }

    /// Both y-ranges after aligning the reference values.
    pub fn aligned_ranges(&self) -> DsmResult<(AxisRange, AxisRange)> {
        let primary = AxisRange::new(self.primary_range.0, self.primary_range.1)?;
        let secondary = AxisRange::new(self.secondary_range.0, self.secondary_range.1)?;
        align_axes(
            primary,
            self.primary_reference,
            secondary,
            self.secondary_reference,
            self.plot_height_px(),
        )
    }
}

/// `Plot_<project>_<YYYY-MM-DD>.png`
pub fn plot_file_name(project: &str, date: NaiveDate) -> String {
    format!("Plot_{project}_{}.png", date.format("%Y-%m-%d"))
}

/// `<directory>/graphics/Plot_<project>_<YYYY-MM-DD>.png`
pub fn plot_path(directory: &Path, project: &str, date: NaiveDate) -> PathBuf {
    directory
        .join(GRAPHICS_FOLDER)
        .join(plot_file_name(project, date))
}

/// Step outline of `ys` over `xs`: each value holds until the next x, the last until `end`.
pub fn step_post(xs: &[f64], ys: &[f64], end: f64) -> Vec<(f64, f64)> {
    let mut points = Vec::with_capacity(xs.len() * 2);
    for (i, (&x, &y)) in xs.iter().zip(ys).enumerate() {
        let next = xs.get(i + 1).copied().unwrap_or(end);
        points.push((x, y));
        points.push((next, y));
    }
    points
}

/// Closed outline of the area between two step curves; an empty `lower` is the zero line.
pub fn step_band(xs: &[f64], lower: &[f64], upper: &[f64], end: f64) -> Vec<(f64, f64)> {
    let zeros;
    let lower = if lower.is_empty() {
        zeros = vec![0.0; upper.len()];
        zeros.as_slice()
    } else {
        lower
    };
    let mut outline = step_post(xs, upper, end);
    outline.extend(step_post(xs, lower, end).into_iter().rev());
    outline
}

/// Diagonal hatch strokes, one per step where the band has height.
pub fn hatch_strokes(xs: &[f64], lower: &[f64], upper: &[f64], end: f64) -> Vec<[(f64, f64); 2]> {
    xs.iter()
        .zip(lower.iter().zip(upper))
        .enumerate()
        .filter(|(_, (_, (lo, hi)))| lo != hi)
        .map(|(i, (&x, (&lo, &hi)))| {
            let next = xs.get(i + 1).copied().unwrap_or(end);
            [(x, lo.min(hi)), (next, lo.max(hi))]
        })
        .collect()
}

/// Everything drawn for one window, in data coordinates.
///
/// X positions are hours after the window start.
#[derive(Debug, Clone)]
pub struct WindowChart {
    pub start: NaiveDateTime,
    pub days: u32,
    pub hours: Vec<f64>,
    /// Where the last step ends.
    pub end: f64,
    pub demand: Vec<f64>,
    pub demand_dsm: Vec<f64>,
    /// `demand + cap_up`
    pub capacity_upper: Vec<f64>,
    /// `demand - cap_down`
    pub capacity_lower: Vec<f64>,
    pub stack: GenerationStack,
    /// `-dsm_down`, drawn below zero on the secondary axis.
    pub dsm_down: Vec<f64>,
    pub dsm_up: Vec<f64>,
    pub dsm_cumulative: Vec<f64>,
    pub x_range: Range<f64>,
    pub primary: AxisRange,
    pub secondary: AxisRange,
}

impl WindowChart {
    pub fn plan(window: &Window<'_>, options: &ChartOptions) -> DsmResult<Self> {
        if window.is_empty() {
            return Err(DsmError::Validation(format!(
                "window starting {} has no rows",
                window.start()
            )));
        }
        let start = window.start();
        let hours: Vec<f64> = window
            .index()
            .iter()
            .map(|ts| hours_between(start, *ts))
            .collect();
        let step = match window.index() {
            [first, second, ..] => hours_between(*first, *second),
            _ => 1.0,
        };
        let end = hours.last().copied().unwrap_or_default() + step;

        let demand = window.values(columns::DEMAND)?;
        let cap_up = window.values(columns::CAP_UP)?;
        let cap_down = window.values(columns::CAP_DOWN)?;
        let capacity_upper = demand.iter().zip(&cap_up).map(|(d, c)| d + c).collect();
        let capacity_lower = demand.iter().zip(&cap_down).map(|(d, c)| d - c).collect();

        let total_hours = f64::from(window.days()) * 24.0;
        let (primary, secondary) = options.aligned_ranges()?;

        Ok(Self {
            start,
            days: window.days(),
            hours,
            end,
            demand,
            demand_dsm: window.values(columns::DEMAND_DSM)?,
            capacity_upper,
            capacity_lower,
            stack: GenerationStack::from_window(window)?,
            dsm_down: window
                .values(columns::DSM_DOWN)?
                .into_iter()
                .map(|v| -v)
                .collect(),
            dsm_up: window.values(columns::DSM_UP)?,
            dsm_cumulative: window.values(columns::DSM_CUMULATIVE)?,
            x_range: -1.0..total_hours + 1.0,
            primary,
            secondary,
        })
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn file_name(&self, project: &str) -> String {
        plot_file_name(project, self.start_date())
    }

    /// Requested x tick count, enough for one tick per hour across the x-range.
    pub fn tick_count(&self) -> usize {
        self.days as usize * 24 + 3
    }

    /// `%d.%m - %H h` for whole hours inside the window, blank elsewhere.
    pub fn tick_label(&self, hours: f64) -> String {
        let total = f64::from(self.days) * 24.0;
        if hours.fract() != 0.0 || hours < 0.0 || hours >= total {
            return String::new();
        }
        (self.start + Duration::hours(hours as i64))
            .format(TICK_FORMAT)
            .to_string()
    }
}

fn hours_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_seconds() as f64 / 3600.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsm_core::TimeIndex;
    use dsm_ts::ResultTable;

    fn jan_first() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn table(hours: usize) -> ResultTable {
        let index = TimeIndex::hourly(jan_first(), hours);
        let mut cols: Vec<(&str, Vec<f64>)> = columns::ALL
            .iter()
            .map(|name| (*name, vec![0.0; hours]))
            .collect();
        for (name, values) in cols.iter_mut() {
            match *name {
                columns::WIND => *values = vec![10.0; hours],
                columns::DEMAND => *values = vec![80.0; hours],
                columns::CAP_UP => *values = vec![15.0; hours],
                columns::CAP_DOWN => *values = vec![5.0; hours],
                columns::DSM_DOWN => *values = vec![2.0; hours],
                _ => {}
            }
        }
        ResultTable::from_columns(&index, cols).unwrap()
    }

    #[test]
    fn file_name_uses_project_and_window_date() {
        assert_eq!(
            plot_file_name("baseA", NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()),
            "Plot_baseA_2020-01-01.png"
        );
        let path = plot_path(
            Path::new("/tmp/run"),
            "baseA",
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        );
        assert_eq!(path, PathBuf::from("/tmp/run/graphics/Plot_baseA_2020-01-01.png"));
    }

    #[test]
    fn plan_covers_window_with_padding() {
        let table = table(48);
        let windows = table.windows(2).unwrap();
        let plan = WindowChart::plan(&windows[0], &ChartOptions::default()).unwrap();

        assert_eq!(plan.x_range, -1.0..49.0);
        assert_eq!(plan.hours.len(), 48);
        assert_eq!(plan.hours[47], 47.0);
        assert_eq!(plan.end, 48.0);
        assert_eq!(plan.capacity_upper[0], 95.0);
        assert_eq!(plan.capacity_lower[0], 75.0);
        assert_eq!(plan.dsm_down[0], -2.0);
        assert_eq!(plan.stack.top, vec![10.0; 48]);
        assert_eq!(plan.file_name("baseA"), "Plot_baseA_2020-01-01.png");
    }

    #[test]
    fn plan_uses_aligned_default_ranges() {
        let table = table(24);
        let windows = table.windows(1).unwrap();
        let plan = WindowChart::plan(&windows[0], &ChartOptions::default()).unwrap();
        let height = ChartOptions::default().plot_height_px();
        let y1 = plan.primary.to_pixel(100.0, height);
        let y2 = plan.secondary.to_pixel(0.0, height);
        assert!((y1 - y2).abs() < 1e-9);
        assert!((plan.primary.span() - 260.0).abs() < 1e-9);
        assert!((plan.secondary.span() - 260.0).abs() < 1e-9);
    }

    #[test]
    fn tick_labels_cover_window_hours_only() {
        let table = table(24);
        let windows = table.windows(1).unwrap();
        let plan = WindowChart::plan(&windows[0], &ChartOptions::default()).unwrap();
        assert_eq!(plan.tick_label(0.0), "01.01 - 00 h");
        assert_eq!(plan.tick_label(13.0), "01.01 - 13 h");
        assert_eq!(plan.tick_label(-1.0), "");
        assert_eq!(plan.tick_label(24.0), "");
        assert_eq!(plan.tick_label(2.5), "");
    }

    #[test]
    fn step_outline_holds_values() {
        let points = step_post(&[0.0, 1.0, 2.0], &[5.0, 7.0, 6.0], 3.0);
        assert_eq!(
            points,
            vec![
                (0.0, 5.0),
                (1.0, 5.0),
                (1.0, 7.0),
                (2.0, 7.0),
                (2.0, 6.0),
                (3.0, 6.0)
            ]
        );
    }

    #[test]
    fn band_over_zero_line_closes_on_axis() {
        let outline = step_band(&[0.0, 1.0], &[], &[4.0, 2.0], 2.0);
        assert_eq!(outline.first(), Some(&(0.0, 4.0)));
        assert_eq!(outline.last(), Some(&(0.0, 0.0)));
        assert_eq!(outline.len(), 8);
    }

    #[test]
    fn hatch_skips_flat_steps() {
        let strokes = hatch_strokes(&[0.0, 1.0, 2.0], &[1.0, 3.0, 2.0], &[4.0, 3.0, 1.0], 3.0);
        assert_eq!(strokes, vec![[(0.0, 1.0), (1.0, 4.0)], [(2.0, 1.0), (3.0, 2.0)]]);
    }

    #[test]
    fn missing_columns_fail_planning() {
        let index = TimeIndex::hourly(jan_first(), 24);
        let table =
            ResultTable::from_columns(&index, vec![(columns::WIND, vec![1.0; 24])]).unwrap();
        let windows = table.windows(1).unwrap();
        assert!(matches!(
            WindowChart::plan(&windows[0], &ChartOptions::default()),
            Err(DsmError::MissingSeries(_))
        ));
    }
}
