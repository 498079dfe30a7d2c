//! Property checks: any valid paired series builds and renders, and any
//! length mismatch is rejected before rendering.

use proptest::prelude::*;
use yieldcurve_charts::data::{CurveSeries, YieldTable};
use yieldcurve_charts::{ChartError, ShockScenario, StaticChartRenderer, YieldCharts};

// Paired finite (x, y) rows
fn rows_strategy() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    prop::collection::vec((0.25f64..40.0, -500.0f64..500.0), 1..40)
        .prop_map(|rows| rows.into_iter().unzip())
}

// Two different lengths, each series non-empty
fn unequal_lengths_strategy() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    (1usize..30, 1usize..30)
        .prop_filter("lengths must differ", |(a, b)| a != b)
        .prop_flat_map(|(a, b)| {
            (
                prop::collection::vec(0.0f64..40.0, a),
                prop::collection::vec(-5.0f64..5.0, b),
            )
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn test_valid_rows_build_and_render((x, y) in rows_strategy()) {
        let n = x.len();
        let shock = ShockScenario::default();

        let bars = YieldCharts::key_rate_durations(&x, &y, &shock).unwrap();
        prop_assert_eq!(bars.point_count(), n);

        let difference = YieldCharts::yield_difference(&x, &y, &shock).unwrap();
        prop_assert_eq!(difference.point_count(), n);

        let curve = CurveSeries::new("Discount", x.clone(), y.clone()).unwrap();
        let discount = YieldCharts::discount_curve(&curve, "Discount Function").unwrap();
        prop_assert_eq!(discount.point_count(), n);

        for spec in [&bars, &difference, &discount] {
            let svg = StaticChartRenderer::render_svg(spec, 1.0).unwrap();
            prop_assert!(svg.contains("</svg>"));
        }
    }

    #[test]
    fn test_unequal_lengths_are_rejected((x, y) in unequal_lengths_strategy()) {
        let shock = ShockScenario::default();
        let is_mismatch = |err: ChartError| matches!(err, ChartError::LengthMismatch { .. });

        prop_assert!(is_mismatch(
            YieldCharts::key_rate_durations(&x, &y, &shock).unwrap_err()
        ));
        prop_assert!(is_mismatch(
            YieldCharts::estimation_vs_zero(&x, &y, &x, &x, "Fit", "Model").unwrap_err()
        ));
        prop_assert!(is_mismatch(
            CurveSeries::new("Discount", x.clone(), y.clone()).unwrap_err()
        ));
        prop_assert!(is_mismatch(YieldTable::new(x, y).unwrap_err()));
    }
}
