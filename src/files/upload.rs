use std::fs;
use std::path::Path;

use crate::utils::Result;

/// A file handed to a workflow: name, lowercase extension and raw bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    /// Lowercase suffix including the dot (".csv"), empty when there is none
    pub extension: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let extension = split_extension(&name).1.to_lowercase();
        Self {
            name,
            extension,
            bytes,
        }
    }

    /// Read a file from disk, keeping only its file name
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, bytes))
    }
}

/// Split "report.xlsx" into ("report", ".xlsx"); leading dots are not extensions
fn split_extension(name: &str) -> (&str, &str) {
    let leading_dots = name.len() - name.trim_start_matches('.').len();
    match name[leading_dots..].rfind('.') {
        Some(idx) => name.split_at(leading_dots + idx),
        None => (name, ""),
    }
}

/// Swap the extension of `name` for `new_extension` (which includes the dot)
pub fn replace_extension(name: &str, new_extension: &str) -> String {
    format!("{}{}", split_extension(name).0, new_extension)
}
