//! Technical indicator computation and feature extraction

pub mod engine;
pub mod factors;
pub mod features;

pub use engine::{enrich, IndicatorSeries, MA_WINDOWS, MIN_BARS_FOR_INDICATORS};
pub use factors::{BollingerBands, Ema, Kdj, Macd, Rsi, Sma};
pub use features::{
    extract_latest, FeatureSnapshot, MomentumGroup, TechnicalReport, TrendGroup, VolatilityGroup,
};
