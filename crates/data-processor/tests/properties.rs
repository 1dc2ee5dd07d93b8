//! Property tests for the cleaning steps.

use data_processor::cleaner::{
    drop_by_threshold, fill_missing, missing_fractions, remove_duplicates,
};
use data_processor::{FillMethod, Table, normalize_column_name, normalize_column_names};
use polars::prelude::*;
use proptest::prelude::*;

type Row = (Option<i64>, Option<String>);

fn table_from_rows(rows: &[Row]) -> Table {
    let ids: Vec<Option<i64>> = rows.iter().map(|(id, _)| *id).collect();
    let tags: Vec<Option<String>> = rows.iter().map(|(_, tag)| tag.clone()).collect();
    let df = DataFrame::new(vec![
        Column::from(Series::new("id".into(), ids)),
        Column::from(Series::new("tag".into(), tags)),
    ])
    .unwrap();
    Table::new(df)
}

fn rows_of(table: &Table) -> Vec<Row> {
    let ids = table.series("id").unwrap().i64().unwrap();
    let tags = table.series("tag").unwrap().str().unwrap();
    ids.into_iter()
        .zip(tags.into_iter())
        .map(|(id, tag)| (id, tag.map(str::to_string)))
        .collect()
}

fn row_strategy() -> impl Strategy<Value = Row> {
    (
        proptest::option::of(0i64..3),
        proptest::option::of("[ab]{1}"),
    )
}

fn column_strategy() -> impl Strategy<Value = Vec<Option<i64>>> {
    proptest::collection::vec(proptest::option::of(0i64..10), 1..12)
}

proptest! {
    #[test]
    fn normalized_name_is_a_fixed_point(name in "\\PC{0,24}") {
        let once = normalize_column_name(&name);
        prop_assert_eq!(normalize_column_name(&once), once);
    }

    #[test]
    fn normalized_header_is_a_fixed_point(names in proptest::collection::vec("[ -~]{0,10}", 0..8)) {
        let once = normalize_column_names(&names);
        let twice = normalize_column_names(&once);
        prop_assert_eq!(&once, &twice);

        let mut unique = once.clone();
        unique.sort();
        unique.dedup();
        prop_assert_eq!(unique.len(), once.len());
    }

    #[test]
    fn row_removed_iff_an_earlier_row_is_identical(rows in proptest::collection::vec(row_strategy(), 0..24)) {
        let mut table = table_from_rows(&rows);
        let columns = table.column_names();
        let removed = remove_duplicates(&mut table, &columns).unwrap();

        let expected: Vec<Row> = rows
            .iter()
            .enumerate()
            .filter(|(i, row)| !rows[..*i].contains(row))
            .map(|(_, row)| row.clone())
            .collect();

        prop_assert_eq!(removed, rows.len() - expected.len());
        prop_assert_eq!(rows_of(&table), expected);
    }

    #[test]
    fn columns_over_threshold_are_dropped(
        columns in proptest::collection::vec(column_strategy(), 1..5),
        threshold in 0.0f64..=1.0,
    ) {
        let height = columns[0].len();
        let series: Vec<Column> = columns
            .iter()
            .enumerate()
            .map(|(i, values)| {
                let mut values = values.clone();
                values.resize(height, None);
                Column::from(Series::new(format!("c{i}").into(), values))
            })
            .collect();
        let mut table = Table::new(DataFrame::new(series).unwrap());

        let before = missing_fractions(&table);
        let dropped = drop_by_threshold(&mut table, threshold).unwrap();

        for (name, fraction) in before {
            prop_assert_eq!(dropped.contains(&name), fraction > threshold);
            prop_assert_eq!(table.has_column(&name), fraction <= threshold);
        }
    }

    #[test]
    fn zero_fill_leaves_nothing_missing(rows in proptest::collection::vec(row_strategy(), 0..24)) {
        let mut table = table_from_rows(&rows);
        fill_missing(&mut table, FillMethod::Zero).unwrap();
        prop_assert_eq!(table.total_missing(), 0);
    }
}
