//! Per-period ratio computation
//!
//! Margins, efficiency, leverage, and the Altman Z-Score over a merged
//! statement period. Every formula is a pure function over optional inputs:
//! a missing operand, NaN, or zero denominator yields `None`, which
//! serializes as an explicit `null` downstream. A ratio that computes to
//! 0.0 is 0.0, not null.

use crate::fundamentals::statements::{fields, MergedRow};
use crate::fundamentals::valuation::ValuationSnapshot;
use crate::types::round2;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Reporting cadence of a statement pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    Annual,
    Quarterly,
}

/// Division guard shared by every ratio.
///
/// `None` operands, NaN, and zero denominators all collapse to `None`;
/// the result is always finite or absent, never NaN/Infinity.
pub fn safe_div(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if n.is_finite() && d.is_finite() && d != 0.0 => {
            let quotient = n / d;
            quotient.is_finite().then_some(quotient)
        }
        _ => None,
    }
}

/// Altman Z-Score, non-manufacturing four-factor variant.
///
/// Z = 6.56·X1 + 3.26·X2 + 6.72·X3 + 1.05·X4 with X1 = working capital /
/// total assets (working capital falling back to current assets − current
/// liabilities, each defaulting to 0 when absent), X2 = retained earnings /
/// total assets, X3 = EBIT / total assets, X4 = market cap / total
/// liabilities. `None` unless all four factors and market cap resolve.
pub fn altman_z_score(row: &MergedRow, market_cap: Option<f64>) -> Option<f64> {
    let total_assets = row.resolve(fields::TOTAL_ASSETS);

    let working_capital = row.resolve(fields::WORKING_CAPITAL).or_else(|| {
        let ca = row.resolve(fields::CURRENT_ASSETS).unwrap_or(0.0);
        let cl = row.resolve(fields::CURRENT_LIABILITIES).unwrap_or(0.0);
        Some(ca - cl)
    });

    let x1 = safe_div(working_capital, total_assets)?;
    let x2 = safe_div(row.resolve(fields::RETAINED_EARNINGS), total_assets)?;
    let x3 = safe_div(row.resolve(fields::EBIT), total_assets)?;
    let x4 = safe_div(market_cap, row.resolve(fields::TOTAL_LIABILITIES))?;

    Some(round2(6.56 * x1 + 3.26 * x2 + 6.72 * x3 + 1.05 * x4))
}

/// Margin and profitability percentages
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profitability {
    pub gross_margin_pct: Option<f64>,
    pub operating_margin_pct: Option<f64>,
    pub net_margin_pct: Option<f64>,
}

/// Capital-efficiency percentages
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Efficiency {
    pub roe_pct: Option<f64>,
}

/// Leverage, liquidity, and solvency figures
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskAndCashflow {
    pub debt_to_equity: Option<f64>,
    pub current_ratio: Option<f64>,
    pub altman_z_score: Option<f64>,
}

/// One reporting period's computed ratios
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodReport {
    pub report_period: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fiscal_year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fiscal_quarter: Option<String>,
    pub profitability: Profitability,
    pub efficiency: Efficiency,
    pub risk_and_cashflow: RiskAndCashflow,
    /// Attached to the most recent annual period only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valuation: Option<ValuationSnapshot>,
}

fn quarter_label(date: NaiveDate) -> String {
    format!("{}-Q{}", date.year(), (date.month() - 1) / 3 + 1)
}

fn as_pct(ratio: Option<f64>) -> Option<f64> {
    ratio.map(|r| round2(r * 100.0))
}

/// Compute the full ratio set for one merged period.
pub fn period_report(row: &MergedRow, market_cap: Option<f64>, cadence: Cadence) -> PeriodReport {
    let revenue = row.resolve(fields::REVENUE);
    let gross_profit = row.resolve(fields::GROSS_PROFIT);
    let operating_income = row.resolve(fields::OPERATING_INCOME);
    let net_income = row.resolve(fields::NET_INCOME);
    let total_equity = row.resolve(fields::TOTAL_EQUITY);
    let current_assets = row.resolve(fields::CURRENT_ASSETS);
    let current_liabilities = row.resolve(fields::CURRENT_LIABILITIES);
    let total_liabilities = row.resolve(fields::TOTAL_LIABILITIES);

    let (fiscal_year, fiscal_quarter) = match cadence {
        Cadence::Annual => (Some(row.date.year().to_string()), None),
        Cadence::Quarterly => (None, Some(quarter_label(row.date))),
    };

    PeriodReport {
        report_period: row.date.format("%Y-%m-%d").to_string(),
        fiscal_year,
        fiscal_quarter,
        profitability: Profitability {
            gross_margin_pct: as_pct(safe_div(gross_profit, revenue)),
            operating_margin_pct: as_pct(safe_div(operating_income, revenue)),
            net_margin_pct: as_pct(safe_div(net_income, revenue)),
        },
        efficiency: Efficiency {
            roe_pct: as_pct(safe_div(net_income, total_equity)),
        },
        risk_and_cashflow: RiskAndCashflow {
            debt_to_equity: safe_div(total_liabilities, total_equity).map(round2),
            current_ratio: safe_div(current_assets, current_liabilities).map(round2),
            altman_z_score: altman_z_score(row, market_cap),
        },
        valuation: None,
    }
}
