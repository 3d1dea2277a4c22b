/// Constants module to avoid magic numbers in the codebase

// Session gate
pub const EMAIL_PATTERN: &str = r"^[\w.-]+@[\w.-]+\.\w+$";
pub const MSG_MISSING_FIELDS: &str = "Please fill in all fields";
pub const MSG_INVALID_EMAIL: &str = "Please enter a valid email address";

// Navigation labels
pub const SECTION_UPLOAD_PROCESS: &str = "Upload & Process";
pub const SECTION_IMAGE_CONVERT: &str = "Image Convert";
pub const SECTION_ABOUT: &str = "About";

// Accepted uploads
pub const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".webp"];

// Output formats
pub const MIME_CSV: &str = "text/csv";
pub const MIME_XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const MIME_PNG: &str = "image/png";
pub const MIME_JPEG: &str = "image/jpeg";
pub const MIME_WEBP: &str = "image/webp";
pub const EXCEL_SHEET_NAME: &str = "Sheet1";

// Tabular workflow
pub const DEFAULT_PREVIEW_ROWS: usize = 5;
pub const MAX_CHART_COLUMNS: usize = 2;

// Tokens read as missing values in CSV fields and spreadsheet strings
pub const MISSING_VALUE_TOKENS: &[&str] = &[
    "",
    "#N/A",
    "#N/A N/A",
    "#NA",
    "-1.#IND",
    "-1.#QNAN",
    "-NaN",
    "-nan",
    "1.#IND",
    "1.#QNAN",
    "<NA>",
    "N/A",
    "NA",
    "NULL",
    "NaN",
    "None",
    "n/a",
    "nan",
    "null",
];
pub const TRUE_TOKENS: &[&str] = &["True", "TRUE", "true"];
pub const FALSE_TOKENS: &[&str] = &["False", "FALSE", "false"];

// Terminal rendering
pub const DEFAULT_CHART_HEIGHT: u16 = 12;
pub const DEFAULT_CHART_MAX_ROWS: usize = 20;
pub const DEFAULT_MAX_WIDTH: u16 = 120;
pub const PREVIEW_MAX_COLUMN_WIDTH: u16 = 24;
pub const CHART_BAR_WIDTH: u16 = 3;
// Bar heights are integers; the tallest shown bar gets this height
pub const CHART_BAR_RESOLUTION: f64 = 10_000.0;

pub const ABOUT_TEXT: &str = "This app converts CSV, Excel, and image files to PNG, JPEG, and WEBP formats with built-in data cleaning and transformation

Features:
- File format conversion
- Data cleaning
- Basic visualization
- Image Converter";
