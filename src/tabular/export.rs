use clap::ValueEnum;
use rust_xlsxwriter::{Format, Workbook};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::constants::{EXCEL_SHEET_NAME, MIME_CSV, MIME_XLSX};
use crate::files::{replace_extension, OutputBuffer};
use crate::utils::{Result, SweeperError};

use super::cell::Cell;
use super::dataset::Dataset;

/// Formats a dataset can be exported to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TabularTarget {
    #[default]
    Csv,
    Excel,
}

impl TabularTarget {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::Excel => "Excel",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => ".csv",
            Self::Excel => ".xlsx",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Csv => MIME_CSV,
            Self::Excel => MIME_XLSX,
        }
    }
}

/// Serialize a dataset (without an index column) into a downloadable buffer
pub fn convert(dataset: &Dataset, source_name: &str, target: TabularTarget) -> Result<OutputBuffer> {
    let file_name = replace_extension(source_name, target.extension());
    let bytes = match target {
        TabularTarget::Csv => to_csv(dataset, &file_name)?,
        TabularTarget::Excel => to_xlsx(dataset, &file_name)?,
    };

    info!(
        source = source_name,
        output = %file_name,
        format = target.label(),
        bytes = bytes.len(),
        "dataset converted"
    );

    Ok(OutputBuffer {
        bytes,
        file_name,
        mime_type: target.mime_type(),
    })
}

pub fn to_csv(dataset: &Dataset, file_name: &str) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(dataset.column_names())
        .map_err(|e| SweeperError::encode(file_name, e))?;
    for row in dataset.rows() {
        writer
            .write_record(row.iter().map(Cell::to_field))
            .map_err(|e| SweeperError::encode(file_name, e))?;
    }

    writer
        .into_inner()
        .map_err(|e| SweeperError::encode(file_name, e))
}

pub fn to_xlsx(dataset: &Dataset, file_name: &str) -> Result<Vec<u8>> {
    let encode = |e: rust_xlsxwriter::XlsxError| SweeperError::encode(file_name, e);

    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(EXCEL_SHEET_NAME).map_err(encode)?;

    for (col, name) in dataset.column_names().into_iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, name, &header_format)
            .map_err(encode)?;
    }

    for (row_idx, row) in dataset.rows().iter().enumerate() {
        let row_num = u32::try_from(row_idx + 1)
            .map_err(|_| SweeperError::encode(file_name, "too many rows for a worksheet"))?;
        for (col, cell) in row.iter().enumerate() {
            let col = col as u16;
            let written = match cell {
                Cell::Missing => continue,
                Cell::Int(i) => worksheet.write_number(row_num, col, *i as f64),
                Cell::Float(f) => worksheet.write_number(row_num, col, *f),
                Cell::Bool(b) => worksheet.write_boolean(row_num, col, *b),
                Cell::Text(s) => worksheet.write_string(row_num, col, s),
            };
            written.map_err(encode)?;
        }
    }

    workbook.save_to_buffer().map_err(encode)
}
