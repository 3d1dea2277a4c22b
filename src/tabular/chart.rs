use serde::Serialize;

use crate::constants::MAX_CHART_COLUMNS;

use super::cell::Cell;
use super::dataset::Dataset;

/// One charted column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    /// One value per row; missing cells are gaps
    pub values: Vec<Option<f64>>,
}

/// Bar chart data: rows along the x axis, one series per numeric column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub series: Vec<Series>,
}

impl Chart {
    /// Number of rows (bar groups)
    pub fn row_count(&self) -> usize {
        self.series.first().map(|s| s.values.len()).unwrap_or(0)
    }
}

/// Chart the first two numeric columns; `None` when there is no numeric column
pub fn visualize(dataset: &Dataset) -> Option<Chart> {
    let series: Vec<Series> = dataset
        .numeric_columns()
        .into_iter()
        .take(MAX_CHART_COLUMNS)
        .map(|idx| Series {
            name: dataset.columns()[idx].name.clone(),
            values: dataset.column_values(idx).map(Cell::as_f64).collect(),
        })
        .collect();

    if series.is_empty() {
        None
    } else {
        Some(Chart { series })
    }
}
