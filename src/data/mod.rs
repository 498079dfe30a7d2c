//! Data module - Validated chart inputs and sample market data

mod sample;
mod table;

pub use sample::{SampleChart, SampleMarket, KEY_MATURITIES, KEY_RATE_DURATIONS, ZERO_YIELDS};
pub use table::{
    check_pair, check_series, CurveSeries, FactorSeries, ModelComparisonTable, YieldTable,
    MODEL_PREDICTION_BEY, TIME_TO_MATURITY, ZERO_COUPON_YIELD,
};
