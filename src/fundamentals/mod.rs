//! Fundamental-statement merge, ratio computation, and valuation

pub mod ratios;
pub mod statements;
pub mod valuation;

pub use ratios::{
    altman_z_score, period_report, safe_div, Cadence, Efficiency, PeriodReport, Profitability,
    RiskAndCashflow,
};
pub use statements::{merge, MergedRow, StatementTable};
pub use valuation::{
    adjusted_pr, intrinsic_value_proxy, price_to_dream, valuation_snapshot, CompanyProfile,
    ValuationSnapshot,
};

use serde::{Deserialize, Serialize};

/// Fundamental analysis output for one instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundamentalReport {
    pub currency: String,
    pub annual_reports: Vec<PeriodReport>,
    pub quarterly_reports: Vec<PeriodReport>,
}

impl FundamentalReport {
    /// Report with no periods (missing source data)
    pub fn empty() -> Self {
        Self {
            currency: "Unknown".to_string(),
            annual_reports: Vec::new(),
            quarterly_reports: Vec::new(),
        }
    }
}

fn cadence_reports(
    income: &StatementTable,
    balance: &StatementTable,
    market_cap: Option<f64>,
    cadence: Cadence,
) -> Vec<PeriodReport> {
    merge(income, balance)
        .iter()
        .map(|row| period_report(row, market_cap, cadence))
        .collect()
}

/// Assemble the full fundamental report.
///
/// Outer-joins each cadence's statement pair, computes per-period ratios,
/// and injects the valuation snapshot into the most recent annual period.
/// Empty statement tables simply produce empty report lists.
pub fn fundamental_report(
    annual_income: &StatementTable,
    annual_balance: &StatementTable,
    quarterly_income: &StatementTable,
    quarterly_balance: &StatementTable,
    profile: Option<&CompanyProfile>,
) -> FundamentalReport {
    let market_cap = profile.and_then(|p| p.market_cap);

    let mut report = FundamentalReport {
        currency: profile.map_or_else(|| "Unknown".to_string(), |p| p.currency().to_string()),
        annual_reports: cadence_reports(annual_income, annual_balance, market_cap, Cadence::Annual),
        quarterly_reports: cadence_reports(
            quarterly_income,
            quarterly_balance,
            market_cap,
            Cadence::Quarterly,
        ),
    };

    if let (Some(profile), Some(latest)) = (profile, report.annual_reports.first_mut()) {
        latest.valuation = Some(valuation_snapshot(profile, latest.efficiency.roe_pct));
    }

    log::debug!(
        "fundamental report assembled: {} annual, {} quarterly periods",
        report.annual_reports.len(),
        report.quarterly_reports.len()
    );

    report
}
