//! End-to-end tests for the technical pipeline

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use stocklens::analysis::technical_report;
use stocklens::data::{normalize, read_bars, resample, CsvFormat};
use stocklens::indicators::{enrich, extract_latest};
use stocklens::types::{Bar, Timeframe};

/// Weekday-only bar series starting 2024-01-02
fn trading_bars(n: usize) -> Vec<Bar> {
    let mut bars = Vec::new();
    let mut date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    while bars.len() < n {
        if date.weekday() != Weekday::Sat && date.weekday() != Weekday::Sun {
            let i = bars.len() as f64;
            let close = 320.0 + (i * 0.21).sin() * 12.0 + i * 0.08;
            bars.push(Bar::new(
                date,
                close - 1.5,
                close + 2.0,
                close - 2.5,
                close,
                1_500_000.0 + i * 1000.0,
                close * (1_500_000.0 + i * 1000.0),
            ));
        }
        date += Duration::days(1);
    }
    bars
}

#[test]
fn full_year_report_has_all_three_snapshots() {
    let report = technical_report(&trading_bars(260)).unwrap();

    let daily = report.daily.expect("daily snapshot");
    let weekly = report.weekly.expect("weekly snapshot");
    let monthly = report.monthly.expect("monthly snapshot");

    // 260 trading days: the full MA ladder is available daily
    assert!(daily.trend.ma250.is_some());
    assert!(daily.momentum.macd_dif.is_some());
    assert!(daily.volatility.boll_upper.is_some());

    // ~52 weeks: weekly MAs up to 30 computable, 60 not yet
    assert!(weekly.trend.ma30.is_some());
    assert!(weekly.trend.ma60.is_none());

    // ~12 months: below the 20-observation indicator floor, so the whole
    // indicator set (VWAP included) stays null
    assert!(monthly.trend.ma5.is_none());
    assert!(monthly.momentum.rsi_14.is_none());
    assert!(monthly.vwap.is_none());
    // raw aggregates still present
    assert!(monthly.volume.is_some());
}

#[test]
fn snapshot_dates_follow_period_labels() {
    let bars = trading_bars(30);
    let report = technical_report(&bars).unwrap();

    let last = bars.last().unwrap().date;
    let daily = report.daily.unwrap();
    assert_eq!(daily.date, last.format("%Y-%m-%d").to_string());

    // weekly snapshot is labelled with a Friday
    let weekly = report.weekly.unwrap();
    let weekly_date = NaiveDate::parse_from_str(&weekly.date, "%Y-%m-%d").unwrap();
    assert_eq!(weekly_date.weekday(), Weekday::Fri);
    assert!(weekly_date >= last);
}

#[test]
fn unsorted_input_is_normalized() {
    let mut bars = trading_bars(40);
    bars.reverse();

    let report = technical_report(&bars).unwrap();
    let daily = report.daily.unwrap();
    assert_eq!(daily.date, "2024-02-26"); // latest trading day, not first
}

#[test]
fn short_history_keeps_raw_fields_only() {
    let report = technical_report(&trading_bars(10)).unwrap();
    let daily = report.daily.unwrap();

    assert!(daily.volume.is_some());
    assert!(daily.turnover_value.is_some());
    assert!(daily.vwap.is_none());
    assert!(daily.trend.ma5.is_none());
    assert!(daily.momentum.kdj_k.is_none());
}

#[test]
fn empty_input_is_recoverable_error() {
    let err = technical_report(&[]).unwrap_err();
    assert!(err.is_recoverable());
}

#[test]
fn weekly_volume_is_additive_over_a_month() {
    // January 2024 trading days only
    let bars: Vec<Bar> = trading_bars(22)
        .into_iter()
        .filter(|b| b.date.month() == 1)
        .collect();

    let weekly = resample(&bars, Timeframe::Weekly);
    let monthly = resample(&bars, Timeframe::Monthly);

    let weekly_sum: f64 = weekly.iter().map(|b| b.volume).sum();
    assert_eq!(monthly.len(), 1);
    assert_eq!(weekly_sum, monthly[0].volume);

    let daily_sum: f64 = bars.iter().map(|b| b.volume).sum();
    assert_eq!(weekly_sum, daily_sum);
}

#[test]
fn report_serializes_with_explicit_nulls() {
    let report = technical_report(&trading_bars(25)).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    // fixed schema: keys exist even when values are null
    assert!(json["daily"]["trend"].get("ma250").is_some());
    assert!(json["daily"]["trend"]["ma250"].is_null());
    assert!(json["monthly"]["momentum"].get("rsi_14").is_some());
}

#[test]
fn csv_roundtrip_through_pipeline() {
    let mut csv = String::from("Date,Open,High,Low,Close,Volume,Turnover_Value\n");
    for bar in trading_bars(45) {
        csv.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            bar.date, bar.open, bar.high, bar.low, bar.close, bar.volume, bar.turnover_value
        ));
    }

    let bars = read_bars(csv.as_bytes(), &CsvFormat::default()).unwrap();
    let normalized = normalize(bars).unwrap();
    let series = enrich(normalized);
    let snapshot = extract_latest(&series).unwrap();

    assert!(snapshot.trend.ma20.is_some());
    assert!(snapshot.volatility.boll_mid.is_some());
}

#[test]
fn loader_rejects_malformed_rows() {
    let csv = "Date,Open,High,Low,Close,Volume,Turnover_Value\n2024-01-02,abc,2,0,1,10,10\n";
    assert!(read_bars(csv.as_bytes(), &CsvFormat::default()).is_err());
}
