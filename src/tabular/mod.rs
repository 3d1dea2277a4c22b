// Gateway module for tabular - follows the Train Station Pattern
// All external access must go through this gateway

mod cell;
mod chart;
mod clean;
mod dataset;
mod export;
mod parse;
mod workflow;

pub use cell::{Cell, ColumnType};
pub use chart::{visualize, Chart, Series};
pub use clean::{fill_missing, remove_duplicates};
pub use dataset::{Column, Dataset};
pub use export::{convert, to_csv, to_xlsx, TabularTarget};
pub use parse::{parse, parse_csv, parse_xlsx, TabularKind};
pub use workflow::{
    Action, CleaningStep, FileId, FileSession, FileState, Outcome, SkippedFile, Workbench,
};
