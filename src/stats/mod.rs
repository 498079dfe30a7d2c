//! Stats module - Curve fitting helpers

mod polyfit;

pub use polyfit::{linspace, series_bounds, PolynomialFit};
