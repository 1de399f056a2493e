//! Twin y-axis alignment.
//!
//! Two y-axes sharing one plotting box map their own data ranges onto the same
//! pixel rows. [`align_axes`] moves both ranges so a chosen value on each axis
//! lands on the same row. Pixel rows are counted upward from the bottom of the
//! box, `0..=height_px`.

use dsm_core::{DsmError, DsmResult};
use serde::{Deserialize, Serialize};

/// Visible `[min, max]` of one y-axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    pub fn new(min: f64, max: f64) -> DsmResult<Self> {
        if !(min.is_finite() && max.is_finite()) || min >= max {
            return Err(DsmError::Validation(format!(
                "axis range [{min}, {max}] must be finite and increasing"
            )));
        }
        Ok(Self { min, max })
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Pixel row of `value` in a box `height_px` tall.
    pub fn to_pixel(&self, value: f64, height_px: f64) -> f64 {
        (value - self.min) / self.span() * height_px
    }

    /// Data value shown at pixel row `pixel`.
    pub fn from_pixel(&self, pixel: f64, height_px: f64) -> f64 {
        self.min + pixel / height_px * self.span()
    }

    pub fn as_range(&self) -> std::ops::Range<f64> {
        self.min..self.max
    }
}

/// Move `reference` on `axis` up by `shift_px` pixel rows.
///
/// The pixel shift is turned into a data shift `dy`, then one bound stays put
/// and the other is rescaled proportionally around `reference`. The lower bound
/// stays when it lies farther from `reference` than the upper bound (or at equal
/// distance with `dy > 0`); otherwise the upper bound stays.
pub fn shift_axis(
    axis: AxisRange,
    shift_px: f64,
    reference: f64,
    height_px: f64,
) -> DsmResult<AxisRange> {
    if height_px <= 0.0 {
        return Err(DsmError::Validation(format!(
            "plot height must be positive, got {height_px}"
        )));
    }
    let dy = axis.from_pixel(0.0, height_px) - axis.from_pixel(shift_px, height_px);
    let lo = axis.min - reference;
    let hi = axis.max - reference;

    let (new_lo, new_hi) = if -lo > hi || (-lo == hi && dy > 0.0) {
        (lo, rescale(lo, hi, dy)?)
    } else {
        (rescale(hi, lo, dy)?, hi)
    };
    AxisRange::new(new_lo + reference, new_hi + reference)
}

/// `pinned * (other + dy) / (pinned + dy)`, the bound opposite `pinned` after the shift.
fn rescale(pinned: f64, other: f64, dy: f64) -> DsmResult<f64> {
    let denominator = pinned + dy;
    if denominator == 0.0 {
        return Err(DsmError::Validation(format!(
            "axis bound {pinned} collapses onto the reference after a shift of {dy}"
        )));
    }
    Ok(pinned * (other + dy) / denominator)
}

/// Align `secondary_ref` on `secondary` with `primary_ref` on `primary`.
///
/// Both axes move by half the pixel offset between the two reference points,
/// in opposite directions, so they meet in the middle. Returns the adjusted
/// `(primary, secondary)` ranges.
pub fn align_axes(
    primary: AxisRange,
    primary_ref: f64,
    secondary: AxisRange,
    secondary_ref: f64,
    height_px: f64,
) -> DsmResult<(AxisRange, AxisRange)> {
    let y1 = primary.to_pixel(primary_ref, height_px);
    let y2 = secondary.to_pixel(secondary_ref, height_px);
    let secondary = shift_axis(secondary, (y1 - y2) / 2.0, secondary_ref, height_px)?;
    let primary = shift_axis(primary, (y2 - y1) / 2.0, primary_ref, height_px)?;
    Ok((primary, secondary))
}
