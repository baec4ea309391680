//! Grid enumeration.
//!
//! Produces the ordered sequence of (ticker, date) work items from the
//! configured symbol list and date range: tickers outer, dates inner, in the
//! literal order given in configuration.

use chrono::{Days, NaiveDate};

use crate::config::{DatesConfig, RunConfig};
use crate::types::{GridError, WorkItem};

/// Lazy inclusive date range, stepped forward by a fixed number of days.
///
/// `Clone` so the same range can be walked once per ticker.
#[derive(Debug, Clone)]
pub struct DateRange {
    next: Option<NaiveDate>,
    end: NaiveDate,
    stride_days: u64,
}

impl DateRange {
    /// Build a range from ISO-8601 `start`/`end` strings.
    ///
    /// A zero stride is a precondition violation. `start > end` is valid and
    /// yields an empty range.
    pub fn new(start: &str, end: &str, stride_days: u32) -> Result<Self, GridError> {
        if stride_days == 0 {
            return Err(GridError::InvalidStride(stride_days));
        }
        let start = parse_date(start)?;
        let end = parse_date(end)?;
        Ok(Self {
            next: (start <= end).then_some(start),
            end,
            stride_days: u64::from(stride_days),
        })
    }

    pub fn from_config(dates: &DatesConfig) -> Result<Self, GridError> {
        Self::new(&dates.start, &dates.end, dates.stride_days)
    }
}

impl Iterator for DateRange {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current
            .checked_add_days(Days::new(self.stride_days))
            .filter(|d| *d <= self.end);
        Some(current.format("%Y-%m-%d").to_string())
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, GridError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|source| GridError::InvalidDate {
        value: value.to_string(),
        source,
    })
}

/// The full work grid for a run: `tickers × dates`, tickers outer, input
/// ticker order preserved. Lazy; nothing is materialised up front.
pub fn work_items(cfg: &RunConfig) -> Result<impl Iterator<Item = WorkItem> + '_, GridError> {
    let dates = DateRange::from_config(&cfg.dates)?;
    Ok(cfg.tickers.iter().flat_map(move |ticker| {
        dates
            .clone()
            .map(move |date| WorkItem::new(ticker.clone(), date))
    }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
