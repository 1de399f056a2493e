use std::{
    fs::{self, File},
    ops::Range,
    path::Path,
};

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use dsm_core::{DsmError, DsmResult, TimeIndex};
use polars::prelude::*;

/// Column names of the merged result table.
pub mod columns {
    pub const COAL: &str = "coal";
    pub const WIND: &str = "wind";
    pub const PV: &str = "pv";
    pub const EXCESS: &str = "excess";
    pub const SHORTAGE: &str = "shortage";
    /// Demand after load shifting (flow from the bus into the DSM node).
    pub const DEMAND_DSM: &str = "demand_dsm";
    pub const DSM_DOWN: &str = "dsm_down";
    pub const DSM_UP: &str = "dsm_up";
    /// `dsm_down - dsm_up`
    pub const DSM_NET: &str = "dsm_net";
    /// Running sum of [`DSM_NET`] from the first timestep.
    pub const DSM_CUMULATIVE: &str = "dsm_cumulative";
    /// Original demand profile.
    pub const DEMAND: &str = "demand";
    pub const CAP_UP: &str = "cap_up";
    pub const CAP_DOWN: &str = "cap_down";

    pub const ALL: [&str; 13] = [
        COAL,
        WIND,
        PV,
        EXCESS,
        SHORTAGE,
        DEMAND_DSM,
        DSM_DOWN,
        DSM_UP,
        DSM_NET,
        DSM_CUMULATIVE,
        DEMAND,
        CAP_UP,
        CAP_DOWN,
    ];
}

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn polars_err(err: PolarsError) -> DsmError {
    DsmError::Other(err.to_string())
}

fn column_values(frame: &DataFrame, name: &str) -> DsmResult<Vec<f64>> {
    let series = frame
        .column(name)
        .map_err(|_| DsmError::MissingSeries(format!("column '{name}'")))?;
    series
        .f64()
        .map_err(polars_err)?
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            value.ok_or_else(|| {
                DsmError::Validation(format!("column '{name}' has no value at row {row}"))
            })
        })
        .collect()
}

/// Timestamp × quantity table covering the full model horizon.
///
/// Every column is `f64`, has one value per index entry, and holds no nulls.
#[derive(Debug, Clone)]
pub struct ResultTable {
    index: Vec<NaiveDateTime>,
    frame: DataFrame,
}

impl ResultTable {
    /// Concatenate named series column-wise over `index`.
    pub fn from_columns(index: &TimeIndex, columns: Vec<(&str, Vec<f64>)>) -> DsmResult<Self> {
        let mut series = Vec::with_capacity(columns.len());
        for (name, values) in columns {
            index.check_len(name, values.len())?;
            if let Some(row) = values.iter().position(|v| v.is_nan()) {
                return Err(DsmError::Validation(format!(
                    "column '{name}' has no value at row {row}"
                )));
            }
            series.push(Series::new(name, values));
        }
        let frame = DataFrame::new(series).map_err(polars_err)?;
        Ok(Self {
            index: index.as_slice().to_vec(),
            frame,
        })
    }

    pub fn index(&self) -> &[NaiveDateTime] {
        &self.index
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn height(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.frame.get_column_names()
    }

    /// Values of column `name`; unknown columns are [`DsmError::MissingSeries`].
    pub fn values(&self, name: &str) -> DsmResult<Vec<f64>> {
        column_values(&self.frame, name)
    }

    /// Split into consecutive `days`-day windows, calendar-aligned to midnight of the first timestamp.
    pub fn windows(&self, days: u32) -> DsmResult<Vec<Window<'_>>> {
        let bounds = window_bounds(&self.index, days)?;
        Ok(bounds
            .into_iter()
            .map(|(start, rows)| Window {
                start,
                days,
                index: &self.index[rows.clone()],
                frame: self.frame.slice(rows.start as i64, rows.len()),
            })
            .collect())
    }

    /// Write the table as CSV with a leading `timestamp` column.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let stamps: Vec<String> = self
            .index
            .iter()
            .map(|ts| ts.format(TIMESTAMP_FORMAT).to_string())
            .collect();
        let mut columns = vec![Series::new("timestamp", stamps)];
        columns.extend(self.frame.get_columns().iter().cloned());
        let mut out = DataFrame::new(columns).context("assembling CSV frame")?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let mut file =
            File::create(path).with_context(|| format!("creating {}", path.display()))?;
        CsvWriter::new(&mut file)
            .finish(&mut out)
            .context("writing CSV file")?;
        Ok(())
    }
}

/// Row ranges of consecutive `days`-day bins over `index`.
///
/// Bins start at midnight of the first timestamp and are `days` days long;
/// each returned range is paired with its bin start. Bins with no rows are
/// skipped, so the ranges are contiguous and cover every row exactly once.
pub fn window_bounds(
    index: &[NaiveDateTime],
    days: u32,
) -> DsmResult<Vec<(NaiveDateTime, Range<usize>)>> {
    if days == 0 {
        return Err(DsmError::Validation("window length must be at least one day".into()));
    }
    let Some(first) = index.first() else {
        return Ok(Vec::new());
    };
    let origin = first.date().and_time(NaiveTime::MIN);
    let bin = Duration::days(i64::from(days));
    let bin_seconds = bin.num_seconds();

    let mut bounds: Vec<(NaiveDateTime, Range<usize>)> = Vec::new();
    for (row, ts) in index.iter().enumerate() {
        let bucket = (*ts - origin).num_seconds().div_euclid(bin_seconds);
        let start = origin + Duration::seconds(bucket * bin_seconds);
        if let Some((current, rows)) = bounds.last_mut() {
            if *current == start {
                rows.end = row + 1;
                continue;
            }
            if *current > start {
                return Err(DsmError::Validation(format!(
                    "time index is not increasing at {ts}"
                )));
            }
        }
        bounds.push((start, row..row + 1));
    }
    Ok(bounds)
}

/// A `days`-day slice of a [`ResultTable`], the unit of one chart.
#[derive(Debug, Clone)]
pub struct Window<'a> {
    start: NaiveDateTime,
    days: u32,
    index: &'a [NaiveDateTime],
    frame: DataFrame,
}

impl Window<'_> {
    /// Bin start (midnight), which may precede the first row.
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    pub fn index(&self) -> &[NaiveDateTime] {
        self.index
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn values(&self, name: &str) -> DsmResult<Vec<f64>> {
        column_values(&self.frame, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn ramp_table(hours: usize) -> ResultTable {
        let index = TimeIndex::hourly(start(), hours);
        let ramp: Vec<f64> = (0..hours).map(|h| h as f64).collect();
        ResultTable::from_columns(&index, vec![(columns::WIND, ramp)]).unwrap()
    }

    #[test]
    fn windows_partition_the_table() {
        let table = ramp_table(24 * 7);
        let windows = table.windows(3).unwrap();
        let sizes: Vec<_> = windows.iter().map(Window::len).collect();
        assert_eq!(sizes, vec![72, 72, 24]);

        let rebuilt: Vec<NaiveDateTime> = windows
            .iter()
            .flat_map(|w| w.index().iter().copied())
            .collect();
        assert_eq!(rebuilt, table.index());

        let second = &windows[1];
        assert_eq!(second.start(), start() + Duration::days(3));
        assert_eq!(second.values(columns::WIND).unwrap()[0], 72.0);
    }

    #[test]
    fn windows_align_to_midnight() {
        let index = TimeIndex::hourly(start() + Duration::hours(18), 12);
        let table =
            ResultTable::from_columns(&index, vec![(columns::WIND, vec![1.0; 12])]).unwrap();
        let windows = table.windows(1).unwrap();
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].start(), start());
        assert_eq!(windows[0].len(), 6);
        assert_eq!(windows[1].start_date(), NaiveDate::from_ymd_opt(2020, 1, 2).unwrap());
        assert_eq!(windows[1].len(), 6);
    }

    #[test]
    fn zero_day_window_is_rejected() {
        let table = ramp_table(24);
        assert!(matches!(table.windows(0), Err(DsmError::Validation(_))));
    }

    #[test]
    fn empty_index_has_no_windows() {
        assert!(window_bounds(&[], 2).unwrap().is_empty());
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let index = TimeIndex::hourly(start(), 3);
        let err = ResultTable::from_columns(&index, vec![(columns::PV, vec![0.0; 2])]);
        assert!(matches!(err, Err(DsmError::Validation(_))));
    }

    #[test]
    fn nan_is_rejected() {
        let index = TimeIndex::hourly(start(), 2);
        let err = ResultTable::from_columns(&index, vec![(columns::PV, vec![0.0, f64::NAN])]);
        assert!(matches!(err, Err(DsmError::Validation(_))));
    }

    #[test]
    fn unknown_column_is_missing_series() {
        let table = ramp_table(2);
        assert!(matches!(
            table.values(columns::COAL),
            Err(DsmError::MissingSeries(_))
        ));
    }

    #[test]
    fn csv_has_timestamp_column() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("table.csv");
        ramp_table(2).write_csv(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("timestamp,wind"));
        assert!(lines.next().unwrap().starts_with("2020-01-01 00:00:00,"));
    }
}
