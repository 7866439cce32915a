//! Timeframe resampling
//!
//! Aggregates a normalized daily bar sequence into weekly and monthly bars.
//! Weekly bars are labelled with the Friday closing the ISO week, monthly
//! bars with the last calendar day of the month. Periods without any
//! constituent bars produce no output row.

use crate::types::{Bar, Timeframe};
use chrono::{Datelike, Duration, NaiveDate};

/// OHLCV + turnover aggregation helper
///
/// open = first bar's open, high = max, low = min, close = last bar's close,
/// volume and turnover_value summed.
#[derive(Debug, Default)]
struct BarAggregator {
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    close: Option<f64>,
    volume: f64,
    turnover_value: f64,
}

impl BarAggregator {
    fn new() -> Self {
        Self::default()
    }

    fn add_bar(&mut self, bar: &Bar) {
        if self.open.is_none() {
            self.open = Some(bar.open);
        }
        self.high = Some(self.high.map_or(bar.high, |h| h.max(bar.high)));
        self.low = Some(self.low.map_or(bar.low, |l| l.min(bar.low)));
        self.close = Some(bar.close);
        self.volume += bar.volume;
        self.turnover_value += bar.turnover_value;
    }

    /// Build the aggregated bar, or `None` when no bars were added
    /// (the period's close is undefined and the period is dropped).
    fn build(&self, date: NaiveDate) -> Option<Bar> {
        Some(Bar {
            date,
            open: self.open?,
            high: self.high?,
            low: self.low?,
            close: self.close?,
            volume: self.volume,
            turnover_value: self.turnover_value,
        })
    }
}

/// Friday closing the ISO week containing `date`.
///
/// Saturday/Sunday dates (absent from trading data, but tolerated) roll
/// forward to the next Friday, matching a Friday-anchored weekly bin.
pub fn week_end(date: NaiveDate) -> NaiveDate {
    let from_monday = date.weekday().num_days_from_monday() as i64;
    let mut offset = 4 - from_monday;
    if offset < 0 {
        offset += 7;
    }
    date + Duration::days(offset)
}

/// Last calendar day of the month containing `date`.
pub fn month_end(date: NaiveDate) -> NaiveDate {
    let (year, month) = (date.year(), date.month());
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    // Month arithmetic on a valid date cannot produce an invalid first-of-month.
    first_of_next.unwrap() - Duration::days(1)
}

fn period_label(date: NaiveDate, timeframe: Timeframe) -> NaiveDate {
    match timeframe {
        Timeframe::Daily => date,
        Timeframe::Weekly => week_end(date),
        Timeframe::Monthly => month_end(date),
    }
}

/// Resample a normalized (ascending, unique-date) daily bar sequence.
///
/// Output dates are strictly increasing and period spans never overlap;
/// `Timeframe::Daily` returns the input unchanged.
pub fn resample(bars: &[Bar], timeframe: Timeframe) -> Vec<Bar> {
    if timeframe == Timeframe::Daily || bars.is_empty() {
        return bars.to_vec();
    }

    let mut out = Vec::new();
    let mut current_label: Option<NaiveDate> = None;
    let mut aggregator = BarAggregator::new();

    for bar in bars {
        let label = period_label(bar.date, timeframe);

        match current_label {
            Some(open_label) if open_label != label => {
                if let Some(built) = aggregator.build(open_label) {
                    out.push(built);
                }
                aggregator = BarAggregator::new();
                current_label = Some(label);
            }
            None => current_label = Some(label),
            _ => {}
        }

        aggregator.add_bar(bar);
    }

    if let Some(open_label) = current_label {
        if let Some(built) = aggregator.build(open_label) {
            out.push(built);
        }
    }

    out
}
