//! Streaming technical indicator primitives
//!
//! Each indicator is a small state machine: feed values in order via
//! `update`, get `Some` once the warm-up window is full. Early periods are
//! `None`, never an error.

use statrs::statistics::{Data, Distribution};
use std::collections::VecDeque;

/// Simple Moving Average
#[derive(Debug, Clone)]
pub struct Sma {
    window: usize,
    values: VecDeque<f64>,
}

impl Sma {
    /// Create new SMA with given window size
    pub fn new(window: usize) -> Self {
        assert!(window > 0, "window size must be greater than 0");
        Self {
            window,
            values: VecDeque::with_capacity(window),
        }
    }

    /// Add a value and compute the current average
    pub fn update(&mut self, value: f64) -> Option<f64> {
        self.values.push_back(value);

        if self.values.len() > self.window {
            self.values.pop_front();
        }

        if self.values.len() == self.window {
            Some(self.values.iter().sum::<f64>() / self.window as f64)
        } else {
            None
        }
    }

    /// Compute the SMA for a slice of values
    pub fn compute(window: usize, values: &[f64]) -> Vec<Option<f64>> {
        let mut sma = Self::new(window);
        values.iter().map(|&v| sma.update(v)).collect()
    }
}

/// Exponential Moving Average
#[derive(Debug, Clone)]
pub struct Ema {
    alpha: f64,
    current: Option<f64>,
}

impl Ema {
    /// Create new EMA with given span
    pub fn new(span: usize) -> Self {
        assert!(span > 0, "span must be greater than 0");
        Self {
            alpha: 2.0 / (span as f64 + 1.0),
            current: None,
        }
    }

    /// Update with a new value
    pub fn update(&mut self, value: f64) -> f64 {
        let ema = match self.current {
            None => value,
            Some(prev) => self.alpha * value + (1.0 - self.alpha) * prev,
        };
        self.current = Some(ema);
        ema
    }
}

/// Relative Strength Index
///
/// Mean gain over mean loss across the lookback, mapped onto 0-100. A zero
/// average loss maps to 100.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    gains: VecDeque<f64>,
    losses: VecDeque<f64>,
    prev_value: Option<f64>,
}

impl Rsi {
    /// Create new RSI with given period
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "period must be greater than 0");
        Self {
            period,
            gains: VecDeque::with_capacity(period),
            losses: VecDeque::with_capacity(period),
            prev_value: None,
        }
    }

    /// Update with a new close and compute RSI
    pub fn update(&mut self, value: f64) -> Option<f64> {
        let result = if let Some(prev) = self.prev_value {
            let change = value - prev;
            self.gains.push_back(change.max(0.0));
            self.losses.push_back((-change).max(0.0));

            if self.gains.len() > self.period {
                self.gains.pop_front();
                self.losses.pop_front();
            }

            if self.gains.len() == self.period {
                let avg_gain = self.gains.iter().sum::<f64>() / self.period as f64;
                let avg_loss = self.losses.iter().sum::<f64>() / self.period as f64;

                if avg_loss == 0.0 {
                    Some(100.0)
                } else {
                    let rs = avg_gain / avg_loss;
                    Some(100.0 - (100.0 / (1.0 + rs)))
                }
            } else {
                None
            }
        } else {
            None
        };

        self.prev_value = Some(value);
        result
    }
}

/// Moving Average Convergence-Divergence
#[derive(Debug, Clone)]
pub struct Macd {
    fast_ema: Ema,
    slow_ema: Ema,
    signal_ema: Ema,
}

impl Macd {
    /// Create new MACD with standard parameters (12, 26, 9)
    pub fn new() -> Self {
        Self::with_params(12, 26, 9)
    }

    /// Create MACD with custom parameters
    pub fn with_params(fast: usize, slow: usize, signal: usize) -> Self {
        Self {
            fast_ema: Ema::new(fast),
            slow_ema: Ema::new(slow),
            signal_ema: Ema::new(signal),
        }
    }

    /// Update with a new close, returns (difference line, signal line, histogram)
    pub fn update(&mut self, value: f64) -> (f64, f64, f64) {
        let fast = self.fast_ema.update(value);
        let slow = self.slow_ema.update(value);
        let dif = fast - slow;
        let signal = self.signal_ema.update(dif);
        (dif, signal, dif - signal)
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new()
    }
}

/// Bollinger Bands
#[derive(Debug, Clone)]
pub struct BollingerBands {
    window: usize,
    num_std_dev: f64,
    values: VecDeque<f64>,
}

impl BollingerBands {
    /// Create new bands with window and number of standard deviations
    pub fn new(window: usize, num_std_dev: f64) -> Self {
        assert!(window > 0, "window must be greater than 0");
        Self {
            window,
            num_std_dev,
            values: VecDeque::with_capacity(window),
        }
    }

    /// Update with a new close, returns (upper, mid, lower)
    pub fn update(&mut self, value: f64) -> Option<(f64, f64, f64)> {
        self.values.push_back(value);

        if self.values.len() > self.window {
            self.values.pop_front();
        }

        if self.values.len() == self.window {
            let values_vec: Vec<f64> = self.values.iter().copied().collect();
            let data = Data::new(values_vec);

            let mid = data.mean()?;
            let std_dev = data.std_dev()?;

            let upper = mid + self.num_std_dev * std_dev;
            let lower = mid - self.num_std_dev * std_dev;
            Some((upper, mid, lower))
        } else {
            None
        }
    }
}

/// KDJ stochastic oscillator
///
/// Raw %K over a high/low channel (flat channel maps to 50), %D as a
/// short SMA of %K, %J = 3K - 2D.
#[derive(Debug, Clone)]
pub struct Kdj {
    window: usize,
    d_period: usize,
    highs: VecDeque<f64>,
    lows: VecDeque<f64>,
    k_values: VecDeque<f64>,
}

impl Kdj {
    /// Create new KDJ; standard parameters are (9, 3)
    pub fn new(window: usize, d_period: usize) -> Self {
        assert!(window > 0 && d_period > 0, "periods must be greater than 0");
        Self {
            window,
            d_period,
            highs: VecDeque::with_capacity(window),
            lows: VecDeque::with_capacity(window),
            k_values: VecDeque::with_capacity(d_period),
        }
    }

    /// Update with new HLC values, returns (%K, %D, %J)
    pub fn update(&mut self, high: f64, low: f64, close: f64) -> Option<(f64, f64, f64)> {
        self.highs.push_back(high);
        self.lows.push_back(low);

        if self.highs.len() > self.window {
            self.highs.pop_front();
            self.lows.pop_front();
        }

        if self.highs.len() < self.window {
            return None;
        }

        let highest = self.highs.iter().fold(f64::MIN, |a, &b| a.max(b));
        let lowest = self.lows.iter().fold(f64::MAX, |a, &b| a.min(b));

        let k = if highest != lowest {
            (close - lowest) / (highest - lowest) * 100.0
        } else {
            50.0
        };

        self.k_values.push_back(k);
        if self.k_values.len() > self.d_period {
            self.k_values.pop_front();
        }

        if self.k_values.len() == self.d_period {
            let d = self.k_values.iter().sum::<f64>() / self.d_period as f64;
            Some((k, d, 3.0 * k - 2.0 * d))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sma() {
        let mut sma = Sma::new(3);

        assert_eq!(sma.update(1.0), None);
        assert_eq!(sma.update(2.0), None);
        assert_eq!(sma.update(3.0), Some(2.0)); // (1+2+3)/3
        assert_eq!(sma.update(4.0), Some(3.0)); // (2+3+4)/3
    }

    #[test]
    fn test_sma_compute() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = Sma::compute(3, &values);

        assert_eq!(result[1], None);
        assert_eq!(result[2], Some(2.0));
        assert_eq!(result[4], Some(4.0));
    }

    #[test]
    fn test_ema() {
        let mut ema = Ema::new(3);

        assert_eq!(ema.update(1.0), 1.0);
        let v2 = ema.update(2.0);
        assert!(v2 > 1.0 && v2 < 2.0);
        let v3 = ema.update(3.0);
        assert!(v3 > v2 && v3 < 3.0);
    }

    #[test]
    fn test_rsi_warmup_and_bounds() {
        let values = vec![
            44.0, 44.34, 44.09, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08, 45.89, 46.03,
            45.61, 46.28, 46.28,
        ];
        let mut rsi = Rsi::new(14);
        let results: Vec<_> = values.iter().map(|&v| rsi.update(v)).collect();

        assert!(results[13].is_none());
        let last = results[14].unwrap();
        assert!((0.0..=100.0).contains(&last));
    }

    #[test]
    fn test_rsi_all_gains_is_100() {
        let mut rsi = Rsi::new(14);
        let mut last = None;
        for i in 0..20 {
            last = rsi.update(100.0 + i as f64);
        }
        assert_eq!(last, Some(100.0));
    }

    #[test]
    fn test_macd_histogram_identity() {
        let mut macd = Macd::new();

        for i in 0..50 {
            let price = 100.0 + (i % 7) as f64;
            let (dif, signal, hist) = macd.update(price);
            assert_relative_eq!(hist, dif - signal, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_bollinger_ordering() {
        let mut bb = BollingerBands::new(20, 2.0);

        for i in 0..19 {
            assert_eq!(bb.update(100.0 + i as f64), None);
        }

        let (upper, mid, lower) = bb.update(119.0).unwrap();
        assert!(upper > mid);
        assert!(lower < mid);
        assert_relative_eq!(mid, 109.5, epsilon = 0.1);
    }

    #[test]
    fn test_kdj_warmup_and_j_identity() {
        let mut kdj = Kdj::new(9, 3);

        let mut result = None;
        for i in 0..15 {
            let base = 100.0 + (i % 5) as f64;
            result = kdj.update(base + 2.0, base - 2.0, base);
        }

        let (k, d, j) = result.unwrap();
        assert!((0.0..=100.0).contains(&k));
        assert!((0.0..=100.0).contains(&d));
        assert_relative_eq!(j, 3.0 * k - 2.0 * d, epsilon = 1e-12);
    }

    #[test]
    fn test_kdj_flat_channel() {
        let mut kdj = Kdj::new(9, 3);

        let mut result = None;
        for _ in 0..12 {
            result = kdj.update(100.0, 100.0, 100.0);
        }

        let (k, d, _) = result.unwrap();
        assert_eq!(k, 50.0);
        assert_eq!(d, 50.0);
    }
}
