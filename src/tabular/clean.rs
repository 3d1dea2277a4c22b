use std::collections::HashSet;
use tracing::debug;

use super::cell::Cell;
use super::dataset::Dataset;

/// Drop rows identical to an earlier row, keeping first occurrences in order
///
/// Missing cells compare equal to each other.
pub fn remove_duplicates(dataset: &Dataset) -> Dataset {
    let mut seen = HashSet::with_capacity(dataset.height());
    let rows: Vec<Vec<Cell>> = dataset
        .rows()
        .iter()
        .filter(|row| seen.insert(row.iter().map(Cell::key).collect::<Vec<_>>()))
        .cloned()
        .collect();

    debug!(
        before = dataset.height(),
        after = rows.len(),
        "duplicate rows removed"
    );
    dataset.with_rows(rows)
}

/// Replace missing numeric cells with their column mean
///
/// Means are taken over the non-missing values before any replacement.
/// Columns without a single value, and non-numeric columns, are left alone.
pub fn fill_missing(dataset: &Dataset) -> Dataset {
    let means: Vec<Option<f64>> = dataset
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            if !column.kind.is_numeric() {
                return None;
            }
            let values: Vec<f64> = dataset.column_values(idx).filter_map(Cell::as_f64).collect();
            if values.is_empty() {
                None
            } else {
                Some(values.iter().sum::<f64>() / values.len() as f64)
            }
        })
        .collect();

    let mut filled = 0usize;
    let rows = dataset
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .zip(&means)
                .map(|(cell, mean)| match (cell, mean) {
                    (Cell::Missing, Some(mean)) => {
                        filled += 1;
                        Cell::Float(*mean)
                    }
                    (cell, _) => cell.clone(),
                })
                .collect()
        })
        .collect();

    debug!(filled, "missing values filled");

    dataset.with_rows(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabular::parse_csv;
    use pretty_assertions::assert_eq;

    fn csv(content: &str) -> Dataset {
        parse_csv("test.csv", content.as_bytes()).unwrap()
    }

    #[test]
    fn test_remove_duplicates_keeps_first_occurrence() {
        let ds = csv("A,B\n1,x\n2,y\n1,x\n3,z\n2,y\n");
        let deduped = remove_duplicates(&ds);

        assert_eq!(
            deduped.rows().to_vec(),
            vec![
                vec![Cell::Int(1), Cell::Text("x".into())],
                vec![Cell::Int(2), Cell::Text("y".into())],
                vec![Cell::Int(3), Cell::Text("z".into())],
            ]
        );
        assert_eq!(ds.height(), 5);
    }

    #[test]
    fn test_remove_duplicates_is_idempotent() {
        let ds = csv("A,B\n1,\n2,4\n1,\n2,4\n5,\n");
        let once = remove_duplicates(&ds);
        let twice = remove_duplicates(&once);
        assert_eq!(once, twice);
        assert_eq!(once.height(), 3);
    }

    #[test]
    fn test_fill_missing_uses_column_mean() {
        let ds = csv("A,B,C\n1,,x\n2,4,\n3,8,z\n");
        let filled = fill_missing(&ds);

        assert_eq!(
            filled.column_values(1).cloned().collect::<Vec<_>>(),
            vec![Cell::Float(6.0), Cell::Float(4.0), Cell::Float(8.0)]
        );
        // Text column untouched, missing stays missing
        assert_eq!(
            filled.column_values(2).cloned().collect::<Vec<_>>(),
            ds.column_values(2).cloned().collect::<Vec<_>>()
        );
        assert_eq!(filled.column_values(2).filter(|c| c.is_missing()).count(), 1);
    }

    #[test]
    fn test_fill_missing_leaves_no_numeric_gaps() {
        let ds = csv("A,B,C\n,1.5,\n2,,\n,,\n");
        let filled = fill_missing(&ds);

        for idx in [0, 1] {
            assert!(filled.column_values(idx).all(|c| !c.is_missing()));
        }
        // All-missing column has no mean to fill with
        assert!(filled.column_values(2).all(|c| c.is_missing()));
        assert_eq!(fill_missing(&filled), filled);
    }

    #[test]
    fn test_fill_then_dedupe_scenario() {
        let ds = csv("A,B\n1,\n2,4\n1,\n");
        let result = remove_duplicates(&fill_missing(&ds));

        assert_eq!(
            result.rows().to_vec(),
            vec![
                vec![Cell::Int(1), Cell::Float(4.0)],
                vec![Cell::Int(2), Cell::Float(4.0)],
            ]
        );
    }

    #[test]
    fn test_dedupe_then_fill_scenario() {
        let ds = csv("A,B\n1,\n2,4\n1,\n");
        let result = fill_missing(&remove_duplicates(&ds));
        assert_eq!(result.height(), 2);
        assert_eq!(result.rows()[0], vec![Cell::Int(1), Cell::Float(4.0)]);
    }
}
