//! Generation stack boundaries.

use dsm_core::DsmResult;
use dsm_ts::{columns, Window};

/// Upper edges of the stacked generation bands, bottom to top:
/// wind, pv, coal, shortage.
///
/// Renewables sit at the bottom of the stack so their share reads first.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationStack {
    pub wind: Vec<f64>,
    pub wind_pv: Vec<f64>,
    pub wind_pv_coal: Vec<f64>,
    /// Top of the stack, including shortage.
    pub top: Vec<f64>,
}

impl GenerationStack {
    pub fn new(wind: &[f64], pv: &[f64], coal: &[f64], shortage: &[f64]) -> Self {
        let wind_pv = add(wind, pv);
        let wind_pv_coal = add(&wind_pv, coal);
        let top = add(&wind_pv_coal, shortage);
        Self {
            wind: wind.to_vec(),
            wind_pv,
            wind_pv_coal,
            top,
        }
    }

    pub fn from_window(window: &Window<'_>) -> DsmResult<Self> {
        Ok(Self::new(
            &window.values(columns::WIND)?,
            &window.values(columns::PV)?,
            &window.values(columns::COAL)?,
            &window.values(columns::SHORTAGE)?,
        ))
    }

    /// Band edges as `(label, lower, upper)`, bottom band first.
    ///
    /// An empty lower edge stands for the zero line.
    pub fn bands(&self) -> [(&'static str, &[f64], &[f64]); 4] {
        [
            ("Wind", &[][..], self.wind.as_slice()),
            ("PV", self.wind.as_slice(), self.wind_pv.as_slice()),
            ("Coal", self.wind_pv.as_slice(), self.wind_pv_coal.as_slice()),
            ("Shortage", self.wind_pv_coal.as_slice(), self.top.as_slice()),
        ]
    }
}

fn add(a: &[f64], b: &[f64]) -> Vec<f64> {
    a.iter().zip(b).map(|(x, y)| x + y).collect()
}
