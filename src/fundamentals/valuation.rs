//! Company-profile valuation metrics
//!
//! Standard multiples pass through from the profile metadata; on top of
//! those sit three derived metrics: an adjusted P/E-to-ROE ratio, a
//! Graham-style conservative intrinsic-value proxy, and a price-to-dream
//! ratio (price-to-sales over revenue growth). Each is `None` unless its
//! preconditions hold.

use crate::types::round2;
use serde::{Deserialize, Serialize};

/// Static company metadata, as exposed by profile feeds.
///
/// Field names mirror the upstream JSON; unknown keys are ignored and
/// missing keys become `None`. Never mutated by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    #[serde(rename = "marketCap")]
    pub market_cap: Option<f64>,
    #[serde(rename = "trailingPE")]
    pub trailing_pe: Option<f64>,
    #[serde(rename = "forwardPE")]
    pub forward_pe: Option<f64>,
    #[serde(rename = "priceToBook")]
    pub price_to_book: Option<f64>,
    #[serde(rename = "priceToSalesTrailing12Months")]
    pub price_to_sales: Option<f64>,
    #[serde(rename = "trailingEps")]
    pub trailing_eps: Option<f64>,
    #[serde(rename = "bookValue")]
    pub book_value: Option<f64>,
    #[serde(rename = "payoutRatio")]
    pub payout_ratio: Option<f64>,
    #[serde(rename = "revenueGrowth")]
    pub revenue_growth: Option<f64>,
    #[serde(rename = "trailingPegRatio")]
    pub trailing_peg_ratio: Option<f64>,
    #[serde(rename = "pegRatio")]
    pub peg_ratio: Option<f64>,
    #[serde(rename = "financialCurrency")]
    pub financial_currency: Option<String>,
}

impl CompanyProfile {
    /// PEG with the trailing variant preferred over the generic one
    pub fn peg(&self) -> Option<f64> {
        self.trailing_peg_ratio.or(self.peg_ratio)
    }

    /// Reporting currency, defaulting to "Unknown"
    pub fn currency(&self) -> &str {
        self.financial_currency.as_deref().unwrap_or("Unknown")
    }
}

/// Adjusted P/E-to-ROE ratio ("PR").
///
/// The payout ratio picks a multiplier N: payout ≥ 0.50 → 1.0, payout
/// ≤ 0.25 → 2.0, otherwise 0.50 / payout (an absent payout counts as 0,
/// i.e. the non-paying double). PR = N × PE / (ROE·100); undefined when
/// PE or ROE is missing or ROE ≤ 0.
pub fn adjusted_pr(
    pe: Option<f64>,
    roe_decimal: Option<f64>,
    payout_ratio: Option<f64>,
) -> Option<f64> {
    let pe = pe.filter(|v| v.is_finite())?;
    let roe = roe_decimal.filter(|v| v.is_finite())?;
    if roe <= 0.0 {
        return None;
    }

    let payout = payout_ratio.filter(|v| v.is_finite()).unwrap_or(0.0);
    let n = if payout >= 0.50 {
        1.0
    } else if payout <= 0.25 {
        2.0
    } else {
        0.50 / payout
    };

    Some(round2(n * pe / (roe * 100.0)))
}

/// Conservative intrinsic-value proxy: sqrt(22.5 × EPS × BVPS).
///
/// 22.5 = 15 (fair P/E) × 1.5 (fair P/B). Defined only for strictly
/// positive EPS and book value.
pub fn intrinsic_value_proxy(eps: Option<f64>, bvps: Option<f64>) -> Option<f64> {
    let eps = eps.filter(|v| v.is_finite())?;
    let bvps = bvps.filter(|v| v.is_finite())?;
    if eps <= 0.0 || bvps <= 0.0 {
        return None;
    }
    Some(round2((22.5 * eps * bvps).sqrt()))
}

/// Price-to-dream ratio: price-to-sales over revenue growth percentage.
///
/// PEG with sales in place of earnings; lower means the growth story has
/// more support. Defined only for strictly positive growth.
pub fn price_to_dream(ps_ratio: Option<f64>, revenue_growth_pct: Option<f64>) -> Option<f64> {
    let ps = ps_ratio.filter(|v| v.is_finite())?;
    let growth = revenue_growth_pct.filter(|v| v.is_finite())?;
    if growth <= 0.0 {
        return None;
    }
    Some(round2(ps / growth))
}

/// Standard multiples plus the derived metrics, attached to the most
/// recent annual period
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValuationSnapshot {
    pub pe_ttm: Option<f64>,
    pub pe_fwd: Option<f64>,
    pub peg: Option<f64>,
    pub pb: Option<f64>,
    pub ps: Option<f64>,
    pub dcf_intrinsic_value_proxy: Option<f64>,
    pub price_to_earnings_to_roe_pr: Option<f64>,
    pub price_to_dream_ps_adjusted: Option<f64>,
}

/// Build the valuation snapshot from profile metadata and the latest
/// annual ROE (as a percentage, the way period reports carry it).
pub fn valuation_snapshot(profile: &CompanyProfile, roe_pct: Option<f64>) -> ValuationSnapshot {
    let roe_decimal = roe_pct.map(|p| p / 100.0);
    let growth_pct = profile.revenue_growth.map(|g| g * 100.0);

    ValuationSnapshot {
        pe_ttm: profile.trailing_pe,
        pe_fwd: profile.forward_pe,
        peg: profile.peg(),
        pb: profile.price_to_book,
        ps: profile.price_to_sales,
        dcf_intrinsic_value_proxy: intrinsic_value_proxy(profile.trailing_eps, profile.book_value),
        price_to_earnings_to_roe_pr: adjusted_pr(
            profile.trailing_pe,
            roe_decimal,
            profile.payout_ratio,
        ),
        price_to_dream_ps_adjusted: price_to_dream(profile.price_to_sales, growth_pct),
    }
}
