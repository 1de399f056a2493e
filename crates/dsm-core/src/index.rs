//! Shared time index for all solved sequences.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::{DsmError, DsmResult};

/// Strictly increasing, evenly spaced timestamps shared by every sequence of a model run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<NaiveDateTime>", into = "Vec<NaiveDateTime>")]
pub struct TimeIndex {
    stamps: Vec<NaiveDateTime>,
}

impl TimeIndex {
    /// Builds an index from explicit timestamps, rejecting unordered or unevenly spaced input.
    pub fn new(stamps: Vec<NaiveDateTime>) -> DsmResult<Self> {
        if let [first, second, ..] = stamps.as_slice() {
            let step = *second - *first;
            if step <= Duration::zero() {
                return Err(DsmError::Validation(format!(
                    "time index must be strictly increasing (at {second})"
                )));
            }
            for pair in stamps.windows(2) {
                if pair[1] - pair[0] != step {
                    return Err(DsmError::Validation(format!(
                        "time index must have a fixed resolution: gap of {} at {}",
                        pair[1] - pair[0],
                        pair[1]
                    )));
                }
            }
        }
        Ok(Self { stamps })
    }

    /// `len` timestamps starting at `start`, `step` apart.
    pub fn regular(start: NaiveDateTime, step: Duration, len: usize) -> DsmResult<Self> {
        if step <= Duration::zero() {
            return Err(DsmError::Validation("index step must be positive".into()));
        }
        if let Some(last) = len.checked_sub(1) {
            let end = i32::try_from(last)
                .ok()
                .and_then(|steps| step.checked_mul(steps))
                .and_then(|span| start.checked_add_signed(span));
            if end.is_none() {
                return Err(DsmError::Validation(format!(
                    "index of {len} steps of {step} from {start} leaves the supported date range"
                )));
            }
        }
        // the last stamp is in range, so every earlier offset is too
        let stamps = (0..len)
            .map(|i| start + step * i as i32)
            .collect::<Vec<_>>();
        Ok(Self { stamps })
    }

    /// Hourly index, the resolution produced by the dispatch model.
    pub fn hourly(start: NaiveDateTime, len: usize) -> Self {
        Self {
            stamps: (0..len)
                .map(|i| start + Duration::hours(i as i64))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }

    pub fn first(&self) -> Option<NaiveDateTime> {
        self.stamps.first().copied()
    }

    /// Spacing between consecutive timestamps; `None` for fewer than two entries.
    pub fn step(&self) -> Option<Duration> {
        match self.stamps.as_slice() {
            [first, second, ..] => Some(*second - *first),
            _ => None,
        }
    }

    pub fn as_slice(&self) -> &[NaiveDateTime] {
        &self.stamps
    }

    /// Fails unless a sequence called `name` covers the index exactly.
    pub fn check_len(&self, name: &str, len: usize) -> DsmResult<()> {
        if len != self.len() {
            return Err(DsmError::Validation(format!(
                "series '{name}' has {len} values but the index has {} timesteps",
                self.len()
            )));
        }
        Ok(())
    }
}

impl TryFrom<Vec<NaiveDateTime>> for TimeIndex {
    type Error = DsmError;

    fn try_from(stamps: Vec<NaiveDateTime>) -> DsmResult<Self> {
        Self::new(stamps)
    }
}

impl From<TimeIndex> for Vec<NaiveDateTime> {
    fn from(index: TimeIndex) -> Self {
        index.stamps
    }
}
