//! Property tests for outlier treatments and contingency tables.

use composable_eda::outlier::iqr_bounds;
use composable_eda::prelude::*;
use proptest::collection::vec;
use proptest::option;
use proptest::prelude::*;

fn numeric_table(values: Vec<Option<f64>>) -> Table {
    let ids = (0..values.len()).map(|i| i as f64);
    Table::from_columns(vec![
        ("id", Column::numeric(ids)),
        ("x", Column::Numeric(values)),
    ])
    .unwrap()
}

fn sparse_values() -> impl Strategy<Value = Vec<Option<f64>>> {
    vec(option::weighted(0.85, -1e3f64..1e3), 1..60)
        .prop_filter("needs a present value", |v| v.iter().any(Option::is_some))
}

proptest! {
    #[test]
    fn iqr_bounds_bracket_the_quartiles(values in sparse_values()) {
        let bounds = iqr_bounds("x", &values).unwrap();
        let q1 = quantile(&values, 0.25).unwrap();
        let q2 = median(&values).unwrap();
        let q3 = quantile(&values, 0.75).unwrap();

        prop_assert!(bounds.lower <= q1);
        prop_assert!(q1 <= q2 && q2 <= q3);
        prop_assert!(q3 <= bounds.upper);

        let filtered = remove_outliers_iqr(&numeric_table(values), &["x"]).unwrap();
        for v in filtered.numeric("x").unwrap() {
            let v = v.unwrap();
            prop_assert!(v >= bounds.lower && v <= bounds.upper);
        }
    }

    #[test]
    fn iqr_clip_is_idempotent_on_integral_quartiles(
        values in (1usize..12).prop_flat_map(|k| vec(-1e3f64..1e3, 4 * k + 1))
    ) {
        let table = Table::from_columns(vec![("x", Column::numeric(values))]).unwrap();
        let once = clip_outliers(&table, &["x"], OutlierMethod::Iqr, 0.05, 0.95).unwrap();
        let twice = clip_outliers(&once, &["x"], OutlierMethod::Iqr, 0.05, 0.95).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn clamping_to_fixed_bounds_is_idempotent(values in sparse_values()) {
        let bounds = iqr_bounds("x", &values).unwrap();
        for x in values.iter().flatten() {
            let once = bounds.clamp(*x);
            prop_assert_eq!(bounds.clamp(once), once);
            prop_assert!(bounds.contains(once));
        }
    }

    #[test]
    fn flag_adds_one_value_per_row(values in sparse_values(), percentile in any::<bool>()) {
        let table = numeric_table(values);
        let method = if percentile { OutlierMethod::Percentile } else { OutlierMethod::Iqr };

        let flagged = flag_outliers(&table, &["x"], method, 0.1, 0.9).unwrap();

        prop_assert_eq!(flagged.n_rows(), table.n_rows());
        prop_assert_eq!(flagged.index(), table.index());
        prop_assert_eq!(flagged.numeric("x").unwrap(), table.numeric("x").unwrap());
        prop_assert_eq!(flagged.boolean("x_outlier_flag").unwrap().len(), table.n_rows());
    }

    #[test]
    fn log_transform_is_invertible(values in vec(0f64..1e6, 1..40)) {
        let table = Table::from_columns(vec![("x", Column::numeric(values.clone()))]).unwrap();
        let logged = log_transform(&table, &["x"]).unwrap();

        for (x, y) in values.iter().zip(logged.numeric("x").unwrap()) {
            let back = y.unwrap().exp() - 1.0;
            prop_assert!((back - x).abs() <= 1e-9 * x.max(1.0));
        }
    }

    #[test]
    fn zscore_treatments_stay_aligned(values in sparse_values(), threshold in 0.5f64..4.0) {
        let table = numeric_table(values);
        let gaps: Vec<usize> = table
            .numeric("x")
            .unwrap()
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_none())
            .map(|(i, _)| i)
            .collect();

        let removed = remove_outliers_zscore(&table, &["x"], threshold).unwrap();
        let ids = removed.numeric("id").unwrap();
        for (pos, label) in removed.index().iter().enumerate() {
            prop_assert_eq!(ids[pos], Some(*label as f64));
        }
        for gap in &gaps {
            prop_assert!(removed.index().contains(gap));
        }

        let clipped = clip_outliers_zscore(&table, &["x"], threshold).unwrap();
        prop_assert_eq!(clipped.index(), table.index());
        prop_assert_eq!(clipped.column("x").unwrap().n_missing(), gaps.len());
    }

    #[test]
    fn contingency_margins_add_up(pairs in vec((0usize..3, 0usize..4), 1..80)) {
        let rows: Vec<String> = pairs.iter().map(|(r, _)| format!("r{}", r)).collect();
        let cols: Vec<String> = pairs.iter().map(|(_, c)| format!("c{}", c)).collect();
        let table = Table::from_columns(vec![
            ("row", Column::categorical(rows)),
            ("col", Column::categorical(cols)),
        ])
        .unwrap();

        let ct = ContingencyTable::from_table(&table, "row", "col").unwrap();
        prop_assert_eq!(ct.count(MARGIN_LABEL, MARGIN_LABEL), Some(pairs.len() as u64));
        for r in ct.row_levels() {
            let sum: u64 = ct.column_levels().iter().filter_map(|c| ct.count(r, c)).sum();
            prop_assert_eq!(ct.row_total(r), Some(sum));
        }
        for c in ct.column_levels() {
            let sum: u64 = ct.row_levels().iter().filter_map(|r| ct.count(r, c)).sum();
            prop_assert_eq!(ct.column_total(c), Some(sum));
        }
    }
}
