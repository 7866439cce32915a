//! Statement tables and the income/balance merge
//!
//! Upstream statement sources disagree on line-item names between vintages
//! ("Total Revenue" vs "Operating Revenue", "Total Liabilities Net Minority
//! Interest" vs "Total Liabilities"). Logical fields are therefore resolved
//! through ordered alias lists rather than a fixed schema.

use chrono::NaiveDate;
use hashbrown::HashMap;
use std::collections::BTreeMap;

/// Line-item values for one reporting period
pub type LineItems = HashMap<String, f64>;

/// One statement (income or balance) as periods keyed by report date
#[derive(Debug, Clone, Default)]
pub struct StatementTable {
    rows: BTreeMap<NaiveDate, LineItems>,
}

impl StatementTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one line item for a period, creating the period if needed
    pub fn set(&mut self, date: NaiveDate, name: &str, value: f64) {
        self.rows.entry(date).or_default().insert(name.to_string(), value);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Direct lookup of one line item (NaN treated as absent)
    pub fn get(&self, date: NaiveDate, name: &str) -> Option<f64> {
        self.rows
            .get(&date)
            .and_then(|items| items.get(name))
            .copied()
            .filter(|v| !v.is_nan())
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.rows.keys().copied()
    }

    fn row(&self, date: NaiveDate) -> Option<&LineItems> {
        self.rows.get(&date)
    }
}

/// One merged income + balance period
#[derive(Debug, Clone)]
pub struct MergedRow {
    pub date: NaiveDate,
    fields: LineItems,
}

impl MergedRow {
    /// Exact-name lookup; NaN is absent
    pub fn get(&self, name: &str) -> Option<f64> {
        self.fields.get(name).copied().filter(|v| !v.is_nan())
    }

    /// Resolve a logical field through an ordered alias list.
    ///
    /// Takes the first alias present with a usable value; exhausting the
    /// list yields `None`, never an error.
    pub fn resolve(&self, aliases: &[&str]) -> Option<f64> {
        aliases.iter().find_map(|name| self.get(name))
    }
}

/// Alias lists for the logical fields the ratio engine consumes,
/// in resolution priority order.
pub mod fields {
    pub const REVENUE: &[&str] = &["Total Revenue", "Operating Revenue"];
    pub const GROSS_PROFIT: &[&str] = &["Gross Profit"];
    pub const OPERATING_INCOME: &[&str] = &["Operating Income", "EBIT"];
    pub const NET_INCOME: &[&str] = &["Net Income", "Net Income Common Stockholders"];
    pub const TOTAL_EQUITY: &[&str] = &["Stockholders Equity", "Total Equity Gross Minority Interest"];
    pub const CURRENT_ASSETS: &[&str] = &["Current Assets", "Total Current Assets"];
    pub const CURRENT_LIABILITIES: &[&str] = &["Current Liabilities", "Total Current Liabilities"];
    pub const TOTAL_LIABILITIES: &[&str] = &["Total Liabilities Net Minority Interest", "Total Liabilities"];
    pub const TOTAL_ASSETS: &[&str] = &["Total Assets"];
    pub const RETAINED_EARNINGS: &[&str] = &["Retained Earnings"];
    pub const EBIT: &[&str] = &["EBIT", "Operating Income"];
    pub const WORKING_CAPITAL: &[&str] = &["Working Capital"];
}

/// Outer-join income and balance statements on report date.
///
/// The result covers the union of dates, most recent first; periods present
/// in only one statement keep the other side's fields absent. Where both
/// statements carry the same column name the income value wins.
pub fn merge(income: &StatementTable, balance: &StatementTable) -> Vec<MergedRow> {
    let mut dates: Vec<NaiveDate> = income.dates().chain(balance.dates()).collect();
    dates.sort_unstable();
    dates.dedup();

    dates
        .into_iter()
        .rev()
        .map(|date| {
            let mut fields = LineItems::new();
            if let Some(items) = balance.row(date) {
                fields.extend(items.iter().map(|(k, v)| (k.clone(), *v)));
            }
            if let Some(items) = income.row(date) {
                fields.extend(items.iter().map(|(k, v)| (k.clone(), *v)));
            }
            MergedRow { date, fields }
        })
        .collect()
}
