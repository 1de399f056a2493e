//! Result extraction and the merged result table.
//!
//! [`extract_results`] reads a solved model through the `dsm-core` traits and
//! produces a [`ResultTable`]: one polars `DataFrame` of `f64` columns over the
//! model's hourly index, including the derived `dsm_net` and
//! `dsm_cumulative` columns. [`ResultTable::windows`] cuts it into
//! calendar-aligned multi-day [`Window`]s for charting.

pub mod extract;
pub mod table;

pub use extract::{cumulative, extract_results, net_shift, DsmBlock, ExtractionLabels};
pub use table::{columns, window_bounds, ResultTable, Window};
