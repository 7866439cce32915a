//! Feature extraction
//!
//! Reduces an indicator-augmented bar series to the latest period's
//! null-safe snapshot. Every value passes through a guard: absent or NaN
//! becomes `None` (serialized as an explicit `null`), everything else is
//! rounded to 2 decimals, with volume and turnover cast to integers.

use crate::indicators::engine::IndicatorSeries;
use crate::types::round2;
use serde::{Deserialize, Serialize};

/// Moving-average group of the snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendGroup {
    pub ma5: Option<f64>,
    pub ma10: Option<f64>,
    pub ma20: Option<f64>,
    pub ma30: Option<f64>,
    pub ma60: Option<f64>,
    pub ma120: Option<f64>,
    pub ma250: Option<f64>,
}

/// MACD / RSI / KDJ group of the snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MomentumGroup {
    pub macd_dif: Option<f64>,
    pub macd_dea: Option<f64>,
    pub macd_hist: Option<f64>,
    pub rsi_14: Option<f64>,
    pub kdj_k: Option<f64>,
    pub kdj_d: Option<f64>,
    pub kdj_j: Option<f64>,
}

/// Bollinger group of the snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VolatilityGroup {
    pub boll_upper: Option<f64>,
    pub boll_mid: Option<f64>,
    pub boll_lower: Option<f64>,
}

/// Latest-period projection of one timeframe's indicator series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSnapshot {
    pub date: String,
    pub volume: Option<i64>,
    pub turnover_value: Option<i64>,
    pub vwap: Option<f64>,
    pub trend: TrendGroup,
    pub momentum: MomentumGroup,
    pub volatility: VolatilityGroup,
}

/// Per-timeframe snapshots for one instrument
///
/// A timeframe with no underlying data stays `null` rather than dropping
/// the key, so the output schema is fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalReport {
    pub daily: Option<FeatureSnapshot>,
    pub weekly: Option<FeatureSnapshot>,
    pub monthly: Option<FeatureSnapshot>,
}

impl TechnicalReport {
    /// Report with every timeframe null (missing source data)
    pub fn empty() -> Self {
        Self {
            daily: None,
            weekly: None,
            monthly: None,
        }
    }
}

fn guard(value: f64) -> Option<f64> {
    if value.is_nan() {
        None
    } else {
        Some(round2(value))
    }
}

fn cell(series: &IndicatorSeries, name: &str, row: usize) -> Option<f64> {
    series.column(name).and_then(|col| col[row]).and_then(guard)
}

fn cell_by_prefix(series: &IndicatorSeries, prefix: &str, row: usize) -> Option<f64> {
    series
        .column_by_prefix(prefix)
        .and_then(|col| col[row])
        .and_then(guard)
}

fn as_int(value: f64) -> Option<i64> {
    if value.is_nan() {
        None
    } else {
        Some(value as i64)
    }
}

/// Project the most recent period into a [`FeatureSnapshot`].
///
/// Returns `None` for an empty series. A series without indicator columns
/// (short history) still yields a snapshot; every indicator field is null.
pub fn extract_latest(series: &IndicatorSeries) -> Option<FeatureSnapshot> {
    if series.is_empty() {
        return None;
    }

    let row = series.len() - 1;
    let bar = &series.bars()[row];

    Some(FeatureSnapshot {
        date: bar.date.format("%Y-%m-%d").to_string(),
        volume: as_int(bar.volume),
        turnover_value: as_int(bar.turnover_value),
        vwap: cell(series, "VWAP", row),
        trend: TrendGroup {
            ma5: cell(series, "SMA_5", row),
            ma10: cell(series, "SMA_10", row),
            ma20: cell(series, "SMA_20", row),
            ma30: cell(series, "SMA_30", row),
            ma60: cell(series, "SMA_60", row),
            ma120: cell(series, "SMA_120", row),
            ma250: cell(series, "SMA_250", row),
        },
        momentum: MomentumGroup {
            macd_dif: cell(series, "MACD_12_26_9", row),
            macd_dea: cell(series, "MACDs_12_26_9", row),
            macd_hist: cell(series, "MACDh_12_26_9", row),
            rsi_14: cell(series, "RSI_14", row),
            kdj_k: cell(series, "K_9_3", row),
            kdj_d: cell(series, "D_9_3", row),
            kdj_j: cell(series, "J_9_3", row),
        },
        volatility: VolatilityGroup {
            boll_upper: cell_by_prefix(series, "BBU_", row),
            boll_mid: cell_by_prefix(series, "BBM_", row),
            boll_lower: cell_by_prefix(series, "BBL_", row),
        },
    })
}
