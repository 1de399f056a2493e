//! Dispatch charts for DSM result tables.
//!
//! Each `days`-day window of a [`dsm_ts::ResultTable`] becomes one chart:
//! the generation stack and demand curves on the primary axis, DSM shifts on a
//! secondary axis whose zero line is aligned with a reference level of the
//! primary one (see [`align`]). [`WindowChart`] holds the pure geometry;
//! [`ChartRenderer`] draws it with plotters.

pub mod align;
pub mod chart;
pub mod render;
pub mod stack;

pub use align::{align_axes, shift_axis, AxisRange};
pub use chart::{plot_file_name, plot_path, ChartOptions, WindowChart, GRAPHICS_FOLDER};
pub use render::{ChartRenderer, RenderedChart, ResidentChart};
pub use stack::GenerationStack;
