//! Sample Market Module
//! A small, fixed market snapshot used by the gallery binary so every chart
//! variant can be shown without external model code.

use crate::charts::{ChartSpec, ShockScenario, ShockedCurveInput, YieldCharts};
use crate::data::{CurveSeries, FactorSeries, ModelComparisonTable, YieldTable};
use crate::error::ChartResult;
use crate::stats::linspace;

pub const KEY_MATURITIES: [f64; 13] = [
    1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 15.0, 20.0, 25.0,
];

/// Zero-coupon yields (decimal) at `KEY_MATURITIES`.
pub const ZERO_YIELDS: [f64; 13] = [
    0.0310, 0.0322, 0.0331, 0.0338, 0.0344, 0.0349, 0.0353, 0.0357, 0.0360, 0.0363, 0.0372,
    0.0377, 0.0380,
];

/// Key-rate durations of the sample portfolio per shocked bucket.
pub const KEY_RATE_DURATIONS: [f64; 13] = [
    0.021, 0.048, 0.087, 0.118, 0.157, 0.186, 0.214, 0.243, 0.268, 1.854, 0.402, 0.311, 0.176,
];

/// Dealer model deviations from the zero-coupon yields, in percent.
const MODEL_DEVIATIONS: [f64; 13] = [
    0.021, -0.012, 0.008, -0.015, 0.004, 0.011, -0.006, 0.009, -0.013, 0.005, 0.017, -0.009,
    0.012,
];

/// NSS parameters β0..β3 and the two decay constants of the sample fit.
const NSS_BETAS: [f64; 4] = [0.040, -0.012, 0.008, -0.006];
const NSS_TAU1: f64 = 1.8;
const NSS_TAU2: f64 = 9.0;

/// Linear interpolation with flat extrapolation.
fn interpolate(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    match xs.iter().position(|&k| k >= x) {
        Some(0) => ys[0],
        Some(i) => {
            let t = (x - xs[i - 1]) / (xs[i] - xs[i - 1]);
            ys[i - 1] + t * (ys[i] - ys[i - 1])
        }
        None => ys[ys.len() - 1],
    }
}

fn nss_loadings(t: f64) -> [f64; 4] {
    let x1 = t / NSS_TAU1;
    let x2 = t / NSS_TAU2;
    let slope = (1.0 - (-x1).exp()) / x1;
    [
        1.0,
        slope,
        slope - (-x1).exp(),
        (1.0 - (-x2).exp()) / x2 - (-x2).exp(),
    ]
}

/// The charts the gallery can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleChart {
    KeyRateDurations,
    YieldDifference,
    ShockedVsOriginal,
    YieldContributions,
    FactorLoadings,
    ZeroCouponCurve,
    EstimationVsZero,
    DiscountCurve,
    DiscountCurves,
}

impl SampleChart {
    pub const ALL: [SampleChart; 9] = [
        SampleChart::KeyRateDurations,
        SampleChart::YieldDifference,
        SampleChart::ShockedVsOriginal,
        SampleChart::YieldContributions,
        SampleChart::FactorLoadings,
        SampleChart::ZeroCouponCurve,
        SampleChart::EstimationVsZero,
        SampleChart::DiscountCurve,
        SampleChart::DiscountCurves,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SampleChart::KeyRateDurations => "Key rate durations",
            SampleChart::YieldDifference => "Yield difference",
            SampleChart::ShockedVsOriginal => "Shocked vs original",
            SampleChart::YieldContributions => "Factor contributions",
            SampleChart::FactorLoadings => "Factor loadings",
            SampleChart::ZeroCouponCurve => "Zero-coupon curve",
            SampleChart::EstimationVsZero => "NSS estimation",
            SampleChart::DiscountCurve => "Discount function",
            SampleChart::DiscountCurves => "Discount comparison",
        }
    }
}

/// Sample curves derived from the key-rate snapshot.
#[derive(Debug, Clone)]
pub struct SampleMarket {
    pub shock: ShockScenario,
    pub shocked_yields: Vec<f64>,
    pub maturity_range: Vec<f64>,
    pub original_interpolated: Vec<f64>,
    pub shocked_interpolated: Vec<f64>,
    pub t_plot: Vec<f64>,
    pub loadings: FactorSeries,
    pub contributions: FactorSeries,
    pub model_yields: Vec<f64>,
}

impl Default for SampleMarket {
    fn default() -> Self {
        Self::new(ShockScenario::default())
    }
}

impl SampleMarket {
    pub fn new(shock: ShockScenario) -> Self {
        let bump = shock.size_bps / 10_000.0;
        let key = shock.maturity_years;
        let lower = KEY_MATURITIES
            .iter()
            .copied()
            .rev()
            .find(|&m| m < key)
            .unwrap_or(0.0);
        let upper = KEY_MATURITIES
            .iter()
            .copied()
            .find(|&m| m > key)
            .unwrap_or(key + 1.0);
        // Tent-shaped bump: full size at the key maturity, zero at its neighbours.
        let tent = |t: f64| {
            if t <= lower || t >= upper {
                0.0
            } else if t <= key {
                (t - lower) / (key - lower)
            } else {
                (upper - t) / (upper - key)
            }
        };

        let shocked_yields: Vec<f64> = KEY_MATURITIES
            .iter()
            .zip(ZERO_YIELDS)
            .map(|(&t, y)| y + bump * tent(t))
            .collect();

        let maturity_range = linspace(0.5, 25.0, 100);
        let original_interpolated: Vec<f64> = maturity_range
            .iter()
            .map(|&t| interpolate(&KEY_MATURITIES, &ZERO_YIELDS, t))
            .collect();
        let shocked_interpolated: Vec<f64> = maturity_range
            .iter()
            .zip(&original_interpolated)
            .map(|(&t, y)| y + bump * tent(t))
            .collect();

        let t_plot = linspace(0.1, 26.0, 120);
        let rows: Vec<[f64; 4]> = t_plot.iter().map(|&t| nss_loadings(t)).collect();
        let column =
            |i: usize, weight: f64| -> Vec<f64> { rows.iter().map(|r| r[i] * weight).collect() };
        let loadings = FactorSeries {
            level: column(0, 1.0),
            slope: column(1, 1.0),
            curvature1: column(2, 1.0),
            curvature2: column(3, 1.0),
        };
        let contributions = FactorSeries {
            level: column(0, NSS_BETAS[0]),
            slope: column(1, NSS_BETAS[1]),
            curvature1: column(2, NSS_BETAS[2]),
            curvature2: column(3, NSS_BETAS[3]),
        };
        let model_yields: Vec<f64> = rows
            .iter()
            .map(|r| r.iter().zip(NSS_BETAS).map(|(l, b)| l * b).sum::<f64>())
            .collect();

        Self {
            shock,
            shocked_yields,
            maturity_range,
            original_interpolated,
            shocked_interpolated,
            t_plot,
            loadings,
            contributions,
            model_yields,
        }
    }

    pub fn yield_difference_bps(&self) -> Vec<f64> {
        self.shocked_interpolated
            .iter()
            .zip(&self.original_interpolated)
            .map(|(s, o)| (s - o) * 10_000.0)
            .collect()
    }

    /// Zero-coupon yields in percent.
    pub fn yield_table(&self) -> ChartResult<YieldTable> {
        YieldTable::new(
            KEY_MATURITIES.to_vec(),
            ZERO_YIELDS.iter().map(|y| y * 100.0).collect(),
        )
    }

    pub fn comparison_table(&self) -> ChartResult<ModelComparisonTable> {
        let yields: Vec<f64> = ZERO_YIELDS.iter().map(|y| y * 100.0).collect();
        let predictions = yields
            .iter()
            .zip(MODEL_DEVIATIONS)
            .map(|(y, d)| y + d)
            .collect();
        ModelComparisonTable::new(KEY_MATURITIES.to_vec(), predictions, yields)
    }

    fn discount(&self, name: &str, yields: &[f64]) -> ChartResult<CurveSeries> {
        let factors = self
            .maturity_range
            .iter()
            .zip(yields)
            .map(|(t, y)| (-y * t).exp())
            .collect();
        CurveSeries::new(name, self.maturity_range.clone(), factors)
    }

    pub fn build(&self, chart: SampleChart) -> ChartResult<ChartSpec> {
        match chart {
            SampleChart::KeyRateDurations => {
                YieldCharts::key_rate_durations(&KEY_MATURITIES, &KEY_RATE_DURATIONS, &self.shock)
            }
            SampleChart::YieldDifference => YieldCharts::yield_difference(
                &self.maturity_range,
                &self.yield_difference_bps(),
                &self.shock,
            ),
            SampleChart::ShockedVsOriginal => YieldCharts::shocked_vs_original(
                ShockedCurveInput {
                    key_maturities: &KEY_MATURITIES,
                    original_yields: &ZERO_YIELDS,
                    shocked_yields: &self.shocked_yields,
                    maturity_range: &self.maturity_range,
                    original_interpolated: &self.original_interpolated,
                    shocked_interpolated: &self.shocked_interpolated,
                },
                &self.shock,
            ),
            SampleChart::YieldContributions => YieldCharts::yield_contributions(
                &self.t_plot,
                &self.contributions,
                &self.model_yields,
            ),
            SampleChart::FactorLoadings => {
                YieldCharts::factor_loadings(&self.t_plot, &self.loadings)
            }
            SampleChart::ZeroCouponCurve => {
                YieldCharts::zero_coupon_curve(&self.yield_table()?, &self.comparison_table()?)
            }
            SampleChart::EstimationVsZero => {
                let yields: Vec<f64> = ZERO_YIELDS.iter().map(|y| y * 100.0).collect();
                let fitted: Vec<f64> = self.model_yields.iter().map(|y| y * 100.0).collect();
                YieldCharts::estimation_vs_zero(
                    &KEY_MATURITIES,
                    &yields,
                    &self.t_plot,
                    &fitted,
                    "NSS Estimation vs Zero-Coupon Yields",
                    "NSS Model",
                )
            }
            SampleChart::DiscountCurve => YieldCharts::discount_curve(
                &self.discount("Discount Function", &self.original_interpolated)?,
                "Discount Function from Zero-Coupon Yields",
            ),
            SampleChart::DiscountCurves => YieldCharts::discount_curves(
                &self.discount("Original", &self.original_interpolated)?,
                &self.discount("Shocked", &self.shocked_interpolated)?,
                "Original vs Shocked Discount Function",
                "Discount Factors",
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_interpolate_is_flat_outside_and_linear_inside() {
        let xs = [1.0, 2.0, 4.0];
        let ys = [10.0, 20.0, 40.0];
        assert_eq!(interpolate(&xs, &ys, 0.5), 10.0);
        assert_eq!(interpolate(&xs, &ys, 3.0), 30.0);
        assert_eq!(interpolate(&xs, &ys, 9.0), 40.0);
    }

    #[test]
    fn test_shock_only_moves_key_bucket() {
        let market = SampleMarket::default();
        for ((t, shocked), original) in KEY_MATURITIES
            .iter()
            .zip(&market.shocked_yields)
            .zip(ZERO_YIELDS)
        {
            let expected = if *t == 10.0 { original + 0.005 } else { original };
            assert_relative_eq!(*shocked, expected, epsilon = 1e-12);
        }
        let peak = market
            .yield_difference_bps()
            .into_iter()
            .fold(f64::NEG_INFINITY, f64::max);
        assert!(peak <= 50.0 + 1e-9 && peak > 45.0);
    }

    #[test]
    fn test_contributions_sum_to_model_yield() {
        let market = SampleMarket::default();
        for i in 0..market.t_plot.len() {
            let sum = market.contributions.level[i]
                + market.contributions.slope[i]
                + market.contributions.curvature1[i]
                + market.contributions.curvature2[i];
            assert_relative_eq!(sum, market.model_yields[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_every_sample_chart_builds() {
        let market = SampleMarket::default();
        for chart in SampleChart::ALL {
            let spec = market.build(chart).unwrap();
            assert!(spec.point_count() > 0, "{} has no points", chart.label());
        }
    }
}
