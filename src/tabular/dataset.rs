use serde::Serialize;

use super::cell::{Cell, ColumnType};

/// A named, typed column header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    pub kind: ColumnType,
}

/// In-memory table with typed columns
///
/// Every row has exactly one cell per column and every cell matches its
/// column's type (see [`ColumnType::infer`]).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    columns: Vec<Column>,
    rows: Vec<Vec<Cell>>,
}

impl Dataset {
    /// Build a dataset, inferring column types and normalizing cells
    ///
    /// Short rows are padded with missing cells; extra cells are dropped.
    pub fn new(names: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = names.len();
        let mut rows: Vec<Vec<Cell>> = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Missing);
                row
            })
            .collect();

        let columns: Vec<Column> = names
            .into_iter()
            .enumerate()
            .map(|(idx, name)| Column {
                name,
                kind: ColumnType::infer(rows.iter().map(|row| &row[idx])),
            })
            .collect();

        for row in rows.iter_mut() {
            for (cell, column) in row.iter_mut().zip(&columns) {
                *cell = std::mem::replace(cell, Cell::Missing).normalize(column.kind);
            }
        }

        Self { columns, rows }
    }

    /// Same columns, different rows (column types are kept as-is)
    pub(crate) fn with_rows(&self, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            columns: self.columns.clone(),
            rows,
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.height(), self.width())
    }

    pub fn column_type(&self, idx: usize) -> Option<ColumnType> {
        self.columns.get(idx).map(|c| c.kind)
    }

    /// Indices of numeric columns, in column order
    pub fn numeric_columns(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.kind.is_numeric())
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn column_values(&self, idx: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().filter_map(move |row| row.get(idx))
    }

    pub fn missing_count(&self) -> usize {
        self.rows.iter().flatten().filter(|c| c.is_missing()).count()
    }

    /// First `n` rows, read-only preview
    pub fn head(&self, n: usize) -> Dataset {
        self.with_rows(self.rows.iter().take(n).cloned().collect())
    }
}
