//! Yield Chart Builders
//! One constructor per chart variant. Each validates its inputs, applies the
//! shared styling and returns a `ChartSpec` ready for display or rendering.

use super::spec::{
    ChartSpec, Dash, Layout, LegendAnchor, LegendSpec, Shape, TablePanel, TickPlacement, Trace,
    TraceKind, ZeroLine,
};
use super::style::{
    self, base_layout, BLACK, FACTOR_COLORS, GREEN, GREY, MATURITY_AXIS_TITLE, NAVY, RED,
    TRANSPARENT, WHITE,
};
use crate::data::{check_pair, CurveSeries, FactorSeries, ModelComparisonTable, YieldTable};
use crate::error::ChartResult;
use crate::stats::{linspace, series_bounds, PolynomialFit};
use tracing::debug;

/// Degree of the smoothing polynomial drawn through zero-coupon yields.
pub const CURVE_FIT_DEGREE: usize = 3;
/// The smoothing polynomial is sampled on this many points over `[0, 26]` years.
pub const CURVE_FIT_SAMPLES: usize = 50;
pub const CURVE_FIT_HORIZON: f64 = 26.0;

const PERCENT: f64 = 100.0;

/// A parallel bump of `size_bps` applied at a single key maturity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShockScenario {
    pub maturity_years: f64,
    pub size_bps: f64,
}

impl Default for ShockScenario {
    fn default() -> Self {
        Self {
            maturity_years: 10.0,
            size_bps: 50.0,
        }
    }
}

impl ShockScenario {
    fn bps_label(&self) -> String {
        format!("{}bps", trim_number(self.size_bps))
    }

    fn maturity_label(&self) -> String {
        format!("{}-Year", trim_number(self.maturity_years))
    }

    fn short_label(&self) -> String {
        format!(
            "+{} at {}Y",
            self.bps_label(),
            trim_number(self.maturity_years)
        )
    }
}

fn trim_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

fn scaled(values: &[f64], factor: f64) -> Vec<f64> {
    values.iter().map(|v| v * factor).collect()
}

/// Inputs for the original-versus-shocked curve comparison. Yields are decimals.
#[derive(Debug, Clone, Copy)]
pub struct ShockedCurveInput<'a> {
    /// Key maturities of the raw zero-coupon points.
    pub key_maturities: &'a [f64],
    pub original_yields: &'a [f64],
    pub shocked_yields: &'a [f64],
    /// Dense grid for the interpolated curves.
    pub maturity_range: &'a [f64],
    pub original_interpolated: &'a [f64],
    pub shocked_interpolated: &'a [f64],
}

/// Builds every yield-curve chart variant.
pub struct YieldCharts;

impl YieldCharts {
    /// Bar chart of key-rate durations per shocked maturity bucket.
    pub fn key_rate_durations(
        maturities: &[f64],
        durations: &[f64],
        shock: &ShockScenario,
    ) -> ChartResult<ChartSpec> {
        check_pair("maturities", maturities, "key rate durations", durations)?;

        let title = format!(
            "Key Rate Durations of the Portfolio for a shock of {} in function of shocked maturity",
            shock.bps_label()
        );
        let mut layout = base_layout(&title, "Shocked Maturity", "Key Rate Duration $");
        layout.x_axis.range = None;
        layout.x_axis.ticks = TickPlacement::Hidden;

        let spec = ChartSpec::new(layout).with_trace(Trace {
            name: Some("Key Rate Duration".to_string()),
            show_in_legend: true,
            kind: TraceKind::Bar {
                fill: NAVY,
                outline: BLACK,
                outline_width: 1.0,
                bar_width: 0.5,
            },
            x: maturities.to_vec(),
            y: durations.to_vec(),
        });

        debug!(title = %spec.title(), points = spec.point_count(), "built key rate duration chart");
        Ok(spec)
    }

    /// Shocked-minus-original yield difference, with a dashed marker at the shocked maturity.
    pub fn yield_difference(
        maturity_range: &[f64],
        yield_difference: &[f64],
        shock: &ShockScenario,
    ) -> ChartResult<ChartSpec> {
        check_pair("maturity range", maturity_range, "yield difference", yield_difference)?;

        let title = format!(
            "Difference in Yield Curve After {} Shock at {} Maturity",
            shock.bps_label(),
            shock.maturity_label()
        );
        let mut layout = base_layout(&title, MATURITY_AXIS_TITLE, "Yield Difference (bps)");
        let (_, max_maturity) = series_bounds(maturity_range);
        layout.x_axis.range = Some((0.0, max_maturity));
        layout.y_axis.range = Some((-10.0, shock.size_bps + 5.0));
        layout.y_axis.zero_line = Some(ZeroLine {
            color: BLACK,
            width: 1.0,
        });
        layout.legend.background = WHITE;

        let (low, high) = series_bounds(yield_difference);
        let spec = ChartSpec::new(layout)
            .with_trace(Trace::line(
                "Yield Difference (Shocked - Original)",
                maturity_range,
                yield_difference,
                GREEN,
            ))
            .with_shape(Shape::VerticalLine {
                x: shock.maturity_years,
                y0: low,
                y1: high,
                color: GREY,
                dash: Dash::Dash,
                name: format!("{} Maturity", shock.maturity_label()),
            });

        debug!(title = %spec.title(), points = spec.point_count(), "built yield difference chart");
        Ok(spec)
    }

    /// Original and shocked curves: interpolated lines plus the raw key-rate points, in percent.
    pub fn shocked_vs_original(
        input: ShockedCurveInput<'_>,
        shock: &ShockScenario,
    ) -> ChartResult<ChartSpec> {
        check_pair(
            "key maturities",
            input.key_maturities,
            "original yields",
            input.original_yields,
        )?;
        check_pair(
            "key maturities",
            input.key_maturities,
            "shocked yields",
            input.shocked_yields,
        )?;
        check_pair(
            "maturity range",
            input.maturity_range,
            "original interpolated yields",
            input.original_interpolated,
        )?;
        check_pair(
            "maturity range",
            input.maturity_range,
            "shocked interpolated yields",
            input.shocked_interpolated,
        )?;

        let title = format!(
            "Impact of {} Shock at {} Maturity on Yield Curve",
            shock.bps_label(),
            shock.maturity_label()
        );
        let mut layout = base_layout(&title, MATURITY_AXIS_TITLE, "Yield (%)");
        layout.x_axis.range = Some((0.0, 22.0));

        let spec = ChartSpec::new(layout)
            .with_trace(Trace::line(
                "Original interpolate Yield Curve",
                input.maturity_range,
                &scaled(input.original_interpolated, PERCENT),
                NAVY,
            ))
            .with_trace(Trace::line(
                format!("Shocked Yield Curve ({})", shock.short_label()),
                input.maturity_range,
                &scaled(input.shocked_interpolated, PERCENT),
                RED,
            ))
            .with_trace(
                Trace::markers(
                    "Original Zero-Coupon Yields",
                    input.key_maturities,
                    &scaled(input.original_yields, PERCENT),
                    NAVY,
                    8.0,
                )
                .hidden_from_legend(),
            )
            .with_trace(
                Trace::markers(
                    "Shocked Zero-Coupon Yields",
                    input.key_maturities,
                    &scaled(input.shocked_yields, PERCENT),
                    RED,
                    8.0,
                )
                .hidden_from_legend(),
            );

        debug!(title = %spec.title(), points = spec.point_count(), "built shocked curve chart");
        Ok(spec)
    }

    /// Additive NSS factor contributions and their dashed total, in percent.
    pub fn yield_contributions(
        t: &[f64],
        contributions: &FactorSeries,
        total: &[f64],
    ) -> ChartResult<ChartSpec> {
        contributions.check_against(t)?;
        check_pair("t", t, "total model yield", total)?;

        let names = [
            "Level Contribution",
            "Slope Contribution",
            "Curvature 1 Contribution",
            "Curvature 2 Contribution",
        ];
        let mut spec = ChartSpec::new(wide_layout(
            "Contributions from Each Factor to the Yield Curve",
            "Yield Contribution (%)",
        ));
        for ((name, color), (_, values)) in names
            .iter()
            .zip(FACTOR_COLORS)
            .zip(contributions.named())
        {
            spec = spec.with_trace(Trace::line(*name, t, &scaled(values, PERCENT), color));
        }
        spec = spec.with_trace(
            Trace::line("Total Model Yield", t, &scaled(total, PERCENT), BLACK).dashed(),
        );

        debug!(title = %spec.title(), points = spec.point_count(), "built factor contribution chart");
        Ok(spec)
    }

    /// NSS factor-loading functions against maturity.
    pub fn factor_loadings(t: &[f64], loadings: &FactorSeries) -> ChartResult<ChartSpec> {
        loadings.check_against(t)?;

        let names = [
            "Level Factor Loading (β0)",
            "Slope Factor Loading (β1)",
            "Curvature Factor 1 Loading (β2)",
            "Curvature Factor 2 Loading (β3)",
        ];
        let mut spec = ChartSpec::new(wide_layout(
            "Factor Loadings in the NSS Model",
            "Factor Loading",
        ));
        for ((name, color), (_, values)) in names.iter().zip(FACTOR_COLORS).zip(loadings.named()) {
            spec = spec.with_trace(Trace::line(*name, t, values, color));
        }

        debug!(title = %spec.title(), points = spec.point_count(), "built factor loading chart");
        Ok(spec)
    }

    /// Zero-coupon yields with a cubic least-squares curve, the dealer model's
    /// predictions and a side table of the raw values.
    pub fn zero_coupon_curve(
        yields: &YieldTable,
        comparison: &ModelComparisonTable,
    ) -> ChartResult<ChartSpec> {
        let fit = PolynomialFit::fit(yields.maturities(), yields.yields(), CURVE_FIT_DEGREE)?;
        let fit_x = linspace(0.0, CURVE_FIT_HORIZON, CURVE_FIT_SAMPLES);
        let fit_y = fit.evaluate_many(&fit_x);

        let mut layout = base_layout(
            "Zero-Coupon Yield Curve over 25 Years",
            MATURITY_AXIS_TITLE,
            "Rate (%)",
        );
        layout.height = 585;
        layout.y_axis.grid_color = Some(WHITE);
        layout.legend.position = Some((0.39, 0.75));
        layout.plot_fraction = 0.7;

        let table = TablePanel {
            column_fraction: 0.3,
            header: vec![
                "Maturity".to_string(),
                "Model DB".to_string(),
                "Yield ZC".to_string(),
            ],
            columns: vec![
                comparison.maturities().to_vec(),
                comparison.model_predictions().to_vec(),
                comparison.zero_coupon_yields().to_vec(),
            ],
            fill: WHITE,
            line_color: NAVY,
            header_line_width: 1.5,
            cell_height: 27.0,
        };

        let spec = ChartSpec::new(layout)
            .with_trace(Trace::markers(
                "Zero-Coupon Yields",
                yields.maturities(),
                yields.yields(),
                NAVY,
                8.0,
            ))
            .with_trace(Trace::markers(
                "Model Prediction by DB",
                comparison.maturities(),
                comparison.model_predictions(),
                RED,
                5.0,
            ))
            .with_trace(Trace::line("Polyfit Zero-Coupon Yield", &fit_x, &fit_y, BLACK))
            .with_table(table);

        debug!(
            title = %spec.title(),
            r_squared = fit.r_squared(),
            "built zero-coupon curve chart"
        );
        Ok(spec)
    }

    /// Raw yields against a fitted model curve; reused for every estimation method.
    pub fn estimation_vs_zero(
        maturities: &[f64],
        yields: &[f64],
        fit_x: &[f64],
        fit_y: &[f64],
        title: &str,
        model_name: &str,
    ) -> ChartResult<ChartSpec> {
        check_pair("maturities", maturities, "yields", yields)?;
        check_pair("fit maturities", fit_x, model_name, fit_y)?;

        let layout = base_layout(title, MATURITY_AXIS_TITLE, "Yield (%)");
        let spec = ChartSpec::new(layout)
            .with_trace(Trace::markers(
                "Zero-Coupon Yields",
                maturities,
                yields,
                NAVY,
                8.0,
            ))
            .with_trace(Trace::line(model_name, fit_x, fit_y, RED));

        debug!(title = %spec.title(), model = model_name, "built estimation chart");
        Ok(spec)
    }

    /// A single discount function against maturity.
    pub fn discount_curve(curve: &CurveSeries, title: &str) -> ChartResult<ChartSpec> {
        check_pair("maturities", &curve.x, &curve.name, &curve.y)?;

        let mut layout = base_layout(title, MATURITY_AXIS_TITLE, "Discount Factors");
        layout.show_legend = Some(true);
        layout.legend = default_legend();

        let spec = ChartSpec::new(layout).with_trace(Trace::line(&curve.name, &curve.x, &curve.y, NAVY));

        debug!(title = %spec.title(), points = spec.point_count(), "built discount curve chart");
        Ok(spec)
    }

    /// Two discount-type curves overlaid on one maturity grid, each with its own label.
    pub fn discount_curves(
        first: &CurveSeries,
        second: &CurveSeries,
        title: &str,
        y_axis_title: &str,
    ) -> ChartResult<ChartSpec> {
        check_pair("maturities", &first.x, &first.name, &first.y)?;
        check_pair("maturities", &second.x, &second.name, &second.y)?;

        let mut layout = base_layout(title, MATURITY_AXIS_TITLE, y_axis_title);
        layout.show_legend = Some(true);
        layout.legend = default_legend();
        layout.plot_background = TRANSPARENT;

        let spec = ChartSpec::new(layout)
            .with_trace(Trace::line(&first.name, &first.x, &first.y, NAVY))
            .with_trace(Trace::line(&second.name, &second.x, &second.y, RED));

        debug!(title = %spec.title(), points = spec.point_count(), "built dual discount chart");
        Ok(spec)
    }
}

fn wide_layout(title: &str, y_title: &str) -> Layout {
    let mut layout = base_layout(title, MATURITY_AXIS_TITLE, y_title);
    layout.width = style::WIDE_WIDTH;
    layout.height = style::WIDE_HEIGHT;
    layout.legend.anchor = LegendAnchor::Top;
    layout
}

fn default_legend() -> LegendSpec {
    LegendSpec {
        anchor: LegendAnchor::Default,
        position: None,
        background: TRANSPARENT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::spec::Rgba;
    use crate::error::ChartError;

    #[test]
    fn test_key_rate_durations_point_count_matches_rows() {
        let spec = YieldCharts::key_rate_durations(
            &[1.0, 2.0, 3.0],
            &[0.1, 0.2, 0.3],
            &ShockScenario::default(),
        )
        .unwrap();
        assert_eq!(spec.traces.len(), 1);
        assert_eq!(spec.point_count(), 3);
        assert!(spec.title().contains("50bps"));
        assert_eq!(spec.layout.x_axis.range, None);
        assert_eq!(spec.layout.x_axis.ticks, TickPlacement::Hidden);
        assert!(matches!(
            spec.traces[0].kind,
            TraceKind::Bar { bar_width, .. } if bar_width == 0.5
        ));
    }

    #[test]
    fn test_key_rate_durations_rejects_mismatch() {
        let err = YieldCharts::key_rate_durations(
            &[1.0, 2.0, 3.0],
            &[0.1, 0.2],
            &ShockScenario::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ChartError::LengthMismatch {
                expected: 3,
                actual: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_yield_difference_marker_spans_series() {
        let spec = YieldCharts::yield_difference(
            &[0.0, 5.0, 10.0, 20.0],
            &[0.0, 10.0, 50.0, 0.0],
            &ShockScenario::default(),
        )
        .unwrap();
        assert_eq!(spec.layout.x_axis.range, Some((0.0, 20.0)));
        assert_eq!(spec.layout.y_axis.range, Some((-10.0, 55.0)));
        assert!(spec.layout.y_axis.zero_line.is_some());
        assert_eq!(
            spec.shapes,
            vec![Shape::VerticalLine {
                x: 10.0,
                y0: 0.0,
                y1: 50.0,
                color: GREY,
                dash: Dash::Dash,
                name: "10-Year Maturity".to_string(),
            }]
        );
    }

    #[test]
    fn test_custom_shock_changes_titles_and_marker() {
        let shock = ShockScenario {
            maturity_years: 5.0,
            size_bps: 25.0,
        };
        let spec = YieldCharts::yield_difference(&[1.0, 5.0], &[0.0, 25.0], &shock).unwrap();
        assert_eq!(
            spec.title(),
            "Difference in Yield Curve After 25bps Shock at 5-Year Maturity"
        );
        assert_eq!(spec.layout.y_axis.range, Some((-10.0, 30.0)));
        assert!(matches!(spec.shapes[0], Shape::VerticalLine { x, .. } if x == 5.0));
    }

    #[test]
    fn test_shocked_vs_original_scales_to_percent_and_hides_points() {
        let input = ShockedCurveInput {
            key_maturities: &[1.0, 10.0],
            original_yields: &[0.03, 0.04],
            shocked_yields: &[0.03, 0.045],
            maturity_range: &[1.0, 5.0, 10.0],
            original_interpolated: &[0.03, 0.035, 0.04],
            shocked_interpolated: &[0.03, 0.0375, 0.045],
        };
        let spec = YieldCharts::shocked_vs_original(input, &ShockScenario::default()).unwrap();

        assert_eq!(spec.traces.len(), 4);
        assert_eq!(spec.point_count(), 10);
        assert!((spec.traces[0].y[2] - 4.0).abs() < 1e-12);
        assert!((spec.traces[3].y[1] - 4.5).abs() < 1e-12);
        assert_eq!(
            spec.trace_names(),
            vec![
                "Original interpolate Yield Curve",
                "Shocked Yield Curve (+50bps at 10Y)"
            ]
        );
        assert_eq!(spec.layout.x_axis.range, Some((0.0, 22.0)));
    }

    fn factors(n: usize) -> FactorSeries {
        FactorSeries {
            level: vec![0.04; n],
            slope: vec![-0.01; n],
            curvature1: vec![0.005; n],
            curvature2: vec![0.002; n],
        }
    }

    #[test]
    fn test_yield_contributions_total_is_dashed_black() {
        let t = [1.0, 2.0, 3.0];
        let spec = YieldCharts::yield_contributions(&t, &factors(3), &[0.037; 3]).unwrap();

        assert_eq!(spec.traces.len(), 5);
        assert_eq!(spec.layout.width, 1000);
        assert_eq!(
            spec.traces[4].kind,
            TraceKind::Line {
                color: BLACK,
                width: 2.0,
                dash: Dash::Dash
            }
        );
        assert!((spec.traces[0].y[0] - 4.0).abs() < 1e-12);
        let colors: Vec<Rgba> = spec.traces[..4].iter().map(|t| t.kind.color()).collect();
        assert_eq!(colors, FACTOR_COLORS.to_vec());
    }

    #[test]
    fn test_factor_loadings_are_unscaled() {
        let t = [1.0, 2.0];
        let spec = YieldCharts::factor_loadings(&t, &factors(2)).unwrap();
        assert_eq!(spec.traces.len(), 4);
        assert_eq!(spec.traces[0].y, vec![0.04, 0.04]);
        assert_eq!(spec.trace_names()[1], "Slope Factor Loading (β1)");
    }

    #[test]
    fn test_factor_loadings_rejects_short_factor() {
        let mut loadings = factors(3);
        loadings.slope.pop();
        assert!(YieldCharts::factor_loadings(&[1.0, 2.0, 3.0], &loadings).is_err());
    }

    #[test]
    fn test_zero_coupon_curve_has_fit_and_table() {
        let maturities = vec![1.0, 2.0, 3.0, 5.0, 7.0, 10.0];
        let yields = vec![3.0, 3.2, 3.35, 3.5, 3.6, 3.7];
        let table = YieldTable::new(maturities.clone(), yields.clone()).unwrap();
        let comparison = ModelComparisonTable::new(
            maturities.clone(),
            vec![3.01, 3.19, 3.36, 3.49, 3.61, 3.69],
            yields,
        )
        .unwrap();

        let spec = YieldCharts::zero_coupon_curve(&table, &comparison).unwrap();
        assert_eq!(spec.traces.len(), 3);
        assert_eq!(spec.traces[2].len(), CURVE_FIT_SAMPLES);
        assert_eq!(spec.traces[2].x[CURVE_FIT_SAMPLES - 1], CURVE_FIT_HORIZON);

        let panel = spec.table.as_ref().unwrap();
        assert_eq!(panel.header, vec!["Maturity", "Model DB", "Yield ZC"]);
        assert_eq!(panel.row_count(), 6);
        assert_eq!(spec.layout.plot_fraction, 0.7);
        assert_eq!(spec.layout.height, 585);
    }

    #[test]
    fn test_zero_coupon_curve_needs_four_points() {
        let table = YieldTable::new(vec![1.0, 2.0, 3.0], vec![3.0, 3.1, 3.2]).unwrap();
        let comparison =
            ModelComparisonTable::new(vec![1.0], vec![3.0], vec![3.0]).unwrap();
        assert!(matches!(
            YieldCharts::zero_coupon_curve(&table, &comparison),
            Err(ChartError::InsufficientPoints { .. })
        ));
    }

    #[test]
    fn test_estimation_vs_zero_uses_model_name() {
        let spec = YieldCharts::estimation_vs_zero(
            &[1.0, 2.0],
            &[3.0, 3.1],
            &[0.0, 1.0, 2.0],
            &[2.9, 3.0, 3.1],
            "Nelson-Siegel vs Zero-Coupon",
            "Nelson-Siegel",
        )
        .unwrap();
        assert_eq!(spec.title(), "Nelson-Siegel vs Zero-Coupon");
        assert_eq!(spec.trace_names(), vec!["Zero-Coupon Yields", "Nelson-Siegel"]);
        assert_eq!(spec.traces[1].kind.color(), RED);
    }

    #[test]
    fn test_discount_curve_always_shows_legend() {
        let curve = CurveSeries::new("DF", vec![1.0, 2.0], vec![0.99, 0.97]).unwrap();
        let spec = YieldCharts::discount_curve(&curve, "Discount Function").unwrap();
        assert!(spec.legend_visible());
        assert_eq!(spec.layout.y_axis.title, "Discount Factors");
    }

    #[test]
    fn test_discount_curves_are_distinguishable() {
        let a = CurveSeries::new("Curve A", vec![1.0, 2.0], vec![0.99, 0.97]).unwrap();
        let b = CurveSeries::new("Curve B", vec![1.0, 2.0], vec![0.98, 0.96]).unwrap();
        let spec = YieldCharts::discount_curves(&a, &b, "Discount", "Discount Factors").unwrap();

        assert_eq!(spec.trace_names(), vec!["Curve A", "Curve B"]);
        assert_ne!(spec.traces[0].kind.color(), spec.traces[1].kind.color());
        assert!(spec.layout.plot_background.is_transparent());
        assert_eq!(spec.point_count(), 4);
    }
}
