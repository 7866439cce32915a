//! Per-instrument analysis orchestration
//!
//! Wires the two pipelines together: normalize → resample → enrich →
//! extract for the technical side, merge → ratios → valuation for the
//! fundamental side. Recoverable conditions (missing or empty source
//! tables, short history) degrade to empty or partial reports; only
//! structurally invalid input propagates as an error.

use crate::data::{normalize, resample};
use crate::error::Result;
use crate::fundamentals::{
    fundamental_report, CompanyProfile, FundamentalReport, StatementTable,
};
use crate::indicators::{enrich, extract_latest, TechnicalReport};
use crate::types::{Bar, Symbol, Timeframe};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Parsed inputs for one instrument
#[derive(Debug, Clone, Default)]
pub struct InstrumentData {
    pub symbol: Symbol,
    pub daily_bars: Vec<Bar>,
    pub annual_income: StatementTable,
    pub annual_balance: StatementTable,
    pub quarterly_income: StatementTable,
    pub quarterly_balance: StatementTable,
    pub profile: Option<CompanyProfile>,
}

/// Combined analysis output for one instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentReport {
    pub symbol: Symbol,
    pub technical_analysis: TechnicalReport,
    pub fundamental_analysis: FundamentalReport,
}

/// Build the multi-timeframe technical report from raw daily bars.
///
/// Fails with `DataUnavailable` on an empty table and `InvalidData` on
/// duplicate dates; both the weekly and monthly snapshots derive from the
/// same normalized daily series.
pub fn technical_report(bars: &[Bar]) -> Result<TechnicalReport> {
    let daily = normalize(bars.to_vec())?;
    let weekly = resample(&daily, Timeframe::Weekly);
    let monthly = resample(&daily, Timeframe::Monthly);

    Ok(TechnicalReport {
        daily: extract_latest(&enrich(daily)),
        weekly: extract_latest(&enrich(weekly)),
        monthly: extract_latest(&enrich(monthly)),
    })
}

/// Run both pipelines for one instrument.
///
/// A missing bar table yields an all-null technical report; missing
/// statement tables yield empty report lists. Structurally invalid input
/// is the only hard failure.
pub fn analyze(data: &InstrumentData) -> Result<InstrumentReport> {
    log::info!("analyzing {}", data.symbol);

    let technical = match technical_report(&data.daily_bars) {
        Ok(report) => report,
        Err(e) if e.is_recoverable() => {
            log::warn!("{}: no technical data ({})", data.symbol, e);
            TechnicalReport::empty()
        }
        Err(e) => return Err(e),
    };

    let fundamental = fundamental_report(
        &data.annual_income,
        &data.annual_balance,
        &data.quarterly_income,
        &data.quarterly_balance,
        data.profile.as_ref(),
    );

    Ok(InstrumentReport {
        symbol: data.symbol.clone(),
        technical_analysis: technical,
        fundamental_analysis: fundamental,
    })
}

/// Analyze many instruments in parallel.
///
/// The engine is pure and per-instrument, so the fan-out needs no
/// coordination beyond collecting results; output order matches input
/// order.
pub fn analyze_batch(inputs: &[InstrumentData]) -> Vec<Result<InstrumentReport>> {
    inputs.par_iter().map(analyze).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Duration, NaiveDate, Weekday};

    fn make_bars(n: usize) -> Vec<Bar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let mut bars = Vec::new();
        let mut date = start;
        while bars.len() < n {
            if date.weekday() != Weekday::Sat && date.weekday() != Weekday::Sun {
                let i = bars.len() as f64;
                let close = 100.0 + (i * 0.3).sin() * 4.0 + i * 0.05;
                bars.push(Bar::new(
                    date,
                    close - 0.5,
                    close + 1.0,
                    close - 1.0,
                    close,
                    1000.0 + i,
                    close * (1000.0 + i),
                ));
            }
            date += Duration::days(1);
        }
        bars
    }

    fn instrument(n_bars: usize) -> InstrumentData {
        InstrumentData {
            symbol: "0700.HK".to_string(),
            daily_bars: make_bars(n_bars),
            ..Default::default()
        }
    }

    #[test]
    fn test_technical_report_three_timeframes() {
        let report = technical_report(&make_bars(120)).unwrap();

        let daily = report.daily.unwrap();
        let weekly = report.weekly.unwrap();
        let monthly = report.monthly.unwrap();

        assert!(daily.trend.ma20.is_some());
        // 120 trading days is ~24 weeks: weekly indicators computable
        assert!(weekly.momentum.rsi_14.is_some());
        // but only ~6 months: monthly series stays below the indicator floor
        assert!(monthly.trend.ma5.is_none());
        assert!(monthly.volume.is_some());
    }

    #[test]
    fn test_analyze_recovers_missing_bars() {
        let data = InstrumentData {
            symbol: "EMPTY".to_string(),
            ..Default::default()
        };

        let report = analyze(&data).unwrap();
        assert_eq!(report.technical_analysis, TechnicalReport::empty());
        assert!(report.fundamental_analysis.annual_reports.is_empty());
    }

    #[test]
    fn test_analyze_duplicate_dates_hard_failure() {
        let mut data = instrument(30);
        let dup = data.daily_bars[0];
        data.daily_bars.push(dup);

        assert!(analyze(&data).is_err());
    }

    #[test]
    fn test_analyze_batch_order_preserved() {
        let inputs = vec![instrument(60), instrument(0), instrument(25)];
        let results = analyze_batch(&inputs);

        assert_eq!(results.len(), 3);
        let first = results[0].as_ref().unwrap();
        assert!(first.technical_analysis.daily.is_some());
        let second = results[1].as_ref().unwrap();
        assert!(second.technical_analysis.daily.is_none());
    }

    #[test]
    fn test_analyze_idempotent_serialization() {
        let data = instrument(90);
        let a = serde_json::to_string(&analyze(&data).unwrap()).unwrap();
        let b = serde_json::to_string(&analyze(&data).unwrap()).unwrap();
        assert_eq!(a, b);
    }
}
