//! Maturity Table Module
//! Typed, validated views over the caller's maturity/yield data.

use crate::error::{ChartError, ChartResult};
use polars::prelude::*;

pub const TIME_TO_MATURITY: &str = "Time to Maturity";
pub const ZERO_COUPON_YIELD: &str = "Zero-Coupon Yield";
pub const MODEL_PREDICTION_BEY: &str = "Model Prediction (BEY)";

/// Reject empty or non-finite series.
pub fn check_series(name: &str, values: &[f64]) -> ChartResult<()> {
    if values.is_empty() {
        return Err(ChartError::EmptySeries(name.to_string()));
    }
    if let Some(index) = values.iter().position(|v| !v.is_finite()) {
        return Err(ChartError::NonFinite {
            series: name.to_string(),
            index,
        });
    }
    Ok(())
}

/// Check that `y` pairs with `x`: both valid and of equal length.
pub fn check_pair(x_name: &str, x: &[f64], y_name: &str, y: &[f64]) -> ChartResult<()> {
    check_series(x_name, x)?;
    if y.len() != x.len() {
        return Err(ChartError::LengthMismatch {
            series: y_name.to_string(),
            expected: x.len(),
            actual: y.len(),
        });
    }
    check_series(y_name, y)
}

/// Extract a column as `f64` values, casting integer columns.
fn column_values(df: &DataFrame, name: &str) -> ChartResult<Vec<f64>> {
    let column = df
        .column(name)
        .map_err(|_| ChartError::MissingColumn(name.to_string()))?;
    let as_f64 = column.cast(&DataType::Float64)?;
    let ca = as_f64.f64()?;

    ca.into_iter()
        .enumerate()
        .map(|(row, value)| {
            value.ok_or_else(|| ChartError::NullValue {
                column: name.to_string(),
                row,
            })
        })
        .collect()
}

/// Ordered rows of (time to maturity, zero-coupon yield).
#[derive(Debug, Clone, PartialEq)]
pub struct YieldTable {
    maturities: Vec<f64>,
    yields: Vec<f64>,
}

impl YieldTable {
    pub fn new(maturities: Vec<f64>, yields: Vec<f64>) -> ChartResult<Self> {
        check_pair(TIME_TO_MATURITY, &maturities, ZERO_COUPON_YIELD, &yields)?;
        Ok(Self { maturities, yields })
    }

    /// Build from a DataFrame holding the "Time to Maturity" and
    /// "Zero-Coupon Yield" columns. Other columns are ignored.
    pub fn from_dataframe(df: &DataFrame) -> ChartResult<Self> {
        Self::new(
            column_values(df, TIME_TO_MATURITY)?,
            column_values(df, ZERO_COUPON_YIELD)?,
        )
    }

    pub fn maturities(&self) -> &[f64] {
        &self.maturities
    }

    pub fn yields(&self) -> &[f64] {
        &self.yields
    }

    pub fn len(&self) -> usize {
        self.maturities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maturities.is_empty()
    }
}

/// Zero-coupon yields side by side with a dealer model's predictions.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelComparisonTable {
    maturities: Vec<f64>,
    model_predictions: Vec<f64>,
    zero_coupon_yields: Vec<f64>,
}

impl ModelComparisonTable {
    pub fn new(
        maturities: Vec<f64>,
        model_predictions: Vec<f64>,
        zero_coupon_yields: Vec<f64>,
    ) -> ChartResult<Self> {
        check_pair(
            TIME_TO_MATURITY,
            &maturities,
            MODEL_PREDICTION_BEY,
            &model_predictions,
        )?;
        check_pair(
            TIME_TO_MATURITY,
            &maturities,
            ZERO_COUPON_YIELD,
            &zero_coupon_yields,
        )?;
        Ok(Self {
            maturities,
            model_predictions,
            zero_coupon_yields,
        })
    }

    pub fn from_dataframe(df: &DataFrame) -> ChartResult<Self> {
        Self::new(
            column_values(df, TIME_TO_MATURITY)?,
            column_values(df, MODEL_PREDICTION_BEY)?,
            column_values(df, ZERO_COUPON_YIELD)?,
        )
    }

    pub fn maturities(&self) -> &[f64] {
        &self.maturities
    }

    pub fn model_predictions(&self) -> &[f64] {
        &self.model_predictions
    }

    pub fn zero_coupon_yields(&self) -> &[f64] {
        &self.zero_coupon_yields
    }

    pub fn len(&self) -> usize {
        self.maturities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maturities.is_empty()
    }
}

/// A named (maturity, value) series such as a discount function.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveSeries {
    pub name: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl CurveSeries {
    pub fn new(name: impl Into<String>, x: Vec<f64>, y: Vec<f64>) -> ChartResult<Self> {
        let name = name.into();
        check_pair(&format!("{} maturities", name), &x, &name, &y)?;
        Ok(Self { name, x, y })
    }
}

/// The four NSS factor series sampled on a common maturity grid.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorSeries {
    pub level: Vec<f64>,
    pub slope: Vec<f64>,
    pub curvature1: Vec<f64>,
    pub curvature2: Vec<f64>,
}

impl FactorSeries {
    /// Validate every factor against the maturity grid `t`.
    pub fn check_against(&self, t: &[f64]) -> ChartResult<()> {
        for (name, values) in self.named() {
            check_pair("t", t, name, values)?;
        }
        Ok(())
    }

    /// Factors in display order: level, slope, curvature 1, curvature 2.
    pub fn named(&self) -> [(&'static str, &[f64]); 4] {
        [
            ("level", &self.level),
            ("slope", &self.slope),
            ("curvature1", &self.curvature1),
            ("curvature2", &self.curvature2),
        ]
    }
}
