use std::fs;
use std::path::PathBuf;
use tracing::info;

use crate::utils::{Result, SweeperError};

/// A single downloadable conversion result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputBuffer {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime_type: &'static str,
}

impl OutputBuffer {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Where converted buffers are handed to the user
///
/// The buffer is moved in: a download is offered once and not retained.
#[cfg_attr(test, mockall::automock)]
pub trait DownloadSink {
    /// Deliver the buffer and return where it ended up
    fn offer(&mut self, output: OutputBuffer) -> Result<PathBuf>;
}

/// Writes each offered buffer into a directory under its file name
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    overwrite: bool,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>, overwrite: bool) -> Self {
        Self {
            dir: dir.into(),
            overwrite,
        }
    }
}

impl DownloadSink for DirectorySink {
    fn offer(&mut self, output: OutputBuffer) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(&output.file_name);

        if !self.overwrite && path.exists() {
            return Err(SweeperError::IoError(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                format!("{} already exists", path.display()),
            )));
        }

        fs::write(&path, &output.bytes)?;
        info!(
            path = %path.display(),
            mime = output.mime_type,
            bytes = output.bytes.len(),
            "download written"
        );
        Ok(path)
    }
}
