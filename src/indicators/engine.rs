//! Indicator engine
//!
//! Drives the streaming factor structs over one bar series (daily, weekly,
//! or monthly) and attaches the results as named columns running parallel
//! to the bars. Raw OHLCV fields are never mutated.
//!
//! Column names follow the indicator-backend convention downstream feature
//! extraction expects (`SMA_5`, `MACD_12_26_9`, `BBU_20_2.0`, ...). The
//! Bollinger names in particular have drifted across backend versions, which
//! is why extraction resolves them by prefix.

use crate::error::{Result, StockLensError};
use crate::indicators::factors::{BollingerBands, Kdj, Macd, Rsi, Sma};
use crate::types::Bar;

/// Minimum series length before any indicator is attached
pub const MIN_BARS_FOR_INDICATORS: usize = 20;

/// Fixed moving-average lookback windows
pub const MA_WINDOWS: [usize; 7] = [5, 10, 20, 30, 60, 120, 250];

/// A bar series with indicator columns attached in parallel
#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    bars: Vec<Bar>,
    columns: Vec<(String, Vec<Option<f64>>)>,
}

impl IndicatorSeries {
    /// Wrap a bar series with no indicator columns
    pub fn bare(bars: Vec<Bar>) -> Self {
        Self {
            bars,
            columns: Vec::new(),
        }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// True once indicator columns have been attached
    pub fn has_indicators(&self) -> bool {
        !self.columns.is_empty()
    }

    /// Look up a column by exact name
    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
    }

    /// Look up the first column whose name starts with `prefix`
    ///
    /// Tolerates naming-scheme drift in generated column names; a missing
    /// prefix is an absent value, not an error.
    pub fn column_by_prefix(&self, prefix: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|(n, _)| n.starts_with(prefix))
            .map(|(_, values)| values.as_slice())
    }

    /// Names of all attached columns, in attachment order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    fn push_column(&mut self, name: impl Into<String>, values: Vec<Option<f64>>) {
        debug_assert_eq!(values.len(), self.bars.len());
        self.columns.push((name.into(), values));
    }
}

fn check_history(len: usize) -> Result<()> {
    if len < MIN_BARS_FOR_INDICATORS {
        return Err(StockLensError::InsufficientHistory {
            required: MIN_BARS_FOR_INDICATORS,
            actual: len,
        });
    }
    Ok(())
}

/// Attach the full indicator set to a bar series.
///
/// Series shorter than [`MIN_BARS_FOR_INDICATORS`] come back unchanged:
/// the short-history condition is recovered here, not propagated.
pub fn enrich(bars: Vec<Bar>) -> IndicatorSeries {
    if let Err(e) = check_history(bars.len()) {
        log::debug!("skipping indicators: {}", e);
        return IndicatorSeries::bare(bars);
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let mut series = IndicatorSeries::bare(bars);

    // Moving averages; windows longer than the series stay all-None.
    for window in MA_WINDOWS {
        series.push_column(format!("SMA_{}", window), Sma::compute(window, &closes));
    }

    // MACD (12, 26, 9)
    let mut macd = Macd::new();
    let mut dif_col = Vec::with_capacity(closes.len());
    let mut signal_col = Vec::with_capacity(closes.len());
    let mut hist_col = Vec::with_capacity(closes.len());
    for &close in &closes {
        let (dif, signal, hist) = macd.update(close);
        dif_col.push(Some(dif));
        signal_col.push(Some(signal));
        hist_col.push(Some(hist));
    }
    series.push_column("MACD_12_26_9", dif_col);
    series.push_column("MACDs_12_26_9", signal_col);
    series.push_column("MACDh_12_26_9", hist_col);

    // RSI (14)
    let mut rsi = Rsi::new(14);
    let rsi_col: Vec<Option<f64>> = closes.iter().map(|&c| rsi.update(c)).collect();
    series.push_column("RSI_14", rsi_col);

    // KDJ (9, 3, 3)
    let mut kdj = Kdj::new(9, 3);
    let mut k_col = Vec::with_capacity(series.len());
    let mut d_col = Vec::with_capacity(series.len());
    let mut j_col = Vec::with_capacity(series.len());
    for bar in series.bars() {
        match kdj.update(bar.high, bar.low, bar.close) {
            Some((k, d, j)) => {
                k_col.push(Some(k));
                d_col.push(Some(d));
                j_col.push(Some(j));
            }
            None => {
                k_col.push(None);
                d_col.push(None);
                j_col.push(None);
            }
        }
    }
    series.push_column("K_9_3", k_col);
    series.push_column("D_9_3", d_col);
    series.push_column("J_9_3", j_col);

    // Bollinger (20, 2)
    let mut bands = BollingerBands::new(20, 2.0);
    let mut upper_col = Vec::with_capacity(closes.len());
    let mut mid_col = Vec::with_capacity(closes.len());
    let mut lower_col = Vec::with_capacity(closes.len());
    for &close in &closes {
        match bands.update(close) {
            Some((upper, mid, lower)) => {
                upper_col.push(Some(upper));
                mid_col.push(Some(mid));
                lower_col.push(Some(lower));
            }
            None => {
                upper_col.push(None);
                mid_col.push(None);
                lower_col.push(None);
            }
        }
    }
    series.push_column("BBU_20_2.0", upper_col);
    series.push_column("BBM_20_2.0", mid_col);
    series.push_column("BBL_20_2.0", lower_col);

    // Per-period VWAP
    let vwap_col: Vec<Option<f64>> = series.bars().iter().map(|b| Some(b.vwap())).collect();
    series.push_column("VWAP", vwap_col);

    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn make_bars(n: usize) -> Vec<Bar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        (0..n)
            .map(|i| {
                let close = 100.0 + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.1;
                Bar::new(
                    start + Duration::days(i as i64),
                    close - 0.5,
                    close + 1.0,
                    close - 1.0,
                    close,
                    1000.0 + i as f64,
                    close * (1000.0 + i as f64),
                )
            })
            .collect()
    }

    #[test]
    fn test_short_series_unchanged() {
        let bars = make_bars(19);
        let series = enrich(bars.clone());

        assert!(!series.has_indicators());
        assert_eq!(series.bars(), bars.as_slice());
    }

    #[test]
    fn test_enriched_series_has_all_columns() {
        let series = enrich(make_bars(60));
        assert!(series.has_indicators());

        for name in [
            "SMA_5",
            "SMA_250",
            "MACD_12_26_9",
            "MACDs_12_26_9",
            "MACDh_12_26_9",
            "RSI_14",
            "K_9_3",
            "D_9_3",
            "J_9_3",
            "BBU_20_2.0",
            "BBM_20_2.0",
            "BBL_20_2.0",
            "VWAP",
        ] {
            assert!(series.column(name).is_some(), "missing column {}", name);
        }
    }

    #[test]
    fn test_raw_bars_untouched() {
        let bars = make_bars(40);
        let series = enrich(bars.clone());
        assert_eq!(series.bars(), bars.as_slice());
    }

    #[test]
    fn test_sma_warmup_nulls() {
        let series = enrich(make_bars(30));
        let sma5 = series.column("SMA_5").unwrap();

        assert!(sma5[3].is_none());
        assert!(sma5[4].is_some());

        // window longer than the series: all None, not a failure
        let sma250 = series.column("SMA_250").unwrap();
        assert!(sma250.iter().all(|v| v.is_none()));
    }

    #[test]
    fn test_prefix_resolution() {
        let series = enrich(make_bars(40));
        assert!(series.column_by_prefix("BBU_").is_some());
        assert!(series.column_by_prefix("XYZ_").is_none());
    }

    #[test]
    fn test_rsi_bounds() {
        let series = enrich(make_bars(80));
        let rsi = series.column("RSI_14").unwrap();
        for value in rsi.iter().flatten() {
            assert!((0.0..=100.0).contains(value));
        }
    }

    #[test]
    fn test_bollinger_band_ordering() {
        let series = enrich(make_bars(80));
        let upper = series.column_by_prefix("BBU_").unwrap();
        let mid = series.column_by_prefix("BBM_").unwrap();
        let lower = series.column_by_prefix("BBL_").unwrap();

        for i in 0..series.len() {
            if let (Some(u), Some(m), Some(l)) = (upper[i], mid[i], lower[i]) {
                assert!(u >= m && m >= l);
            }
        }
    }

    #[test]
    fn test_vwap_column_matches_bar_vwap() {
        let series = enrich(make_bars(25));
        let vwap = series.column("VWAP").unwrap();
        for (bar, value) in series.bars().iter().zip(vwap) {
            assert_eq!(*value, Some(bar.vwap()));
        }
    }
}
