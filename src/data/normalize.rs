//! Daily bar normalization
//!
//! Raw bar tables arrive in vendor order, which is not always chronological.
//! Normalization sorts ascending by date and enforces date uniqueness before
//! anything downstream touches the series.

use crate::error::{Result, StockLensError};
use crate::types::Bar;

/// Sort bars ascending by date and validate the sequence.
///
/// Idempotent on already-sorted input. An empty table is `DataUnavailable`
/// (recovered upstream as an empty report); duplicate dates are structurally
/// invalid and a hard failure.
pub fn normalize(mut bars: Vec<Bar>) -> Result<Vec<Bar>> {
    if bars.is_empty() {
        return Err(StockLensError::DataUnavailable(
            "daily bar table is empty".to_string(),
        ));
    }

    bars.sort_by_key(|b| b.date);

    for pair in bars.windows(2) {
        if pair[0].date == pair[1].date {
            return Err(StockLensError::InvalidData(format!(
                "duplicate bar date: {}",
                pair[0].date
            )));
        }
    }

    log::debug!(
        "normalized {} daily bars ({} to {})",
        bars.len(),
        bars[0].date,
        bars[bars.len() - 1].date
    );

    Ok(bars)
}
