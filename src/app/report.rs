use serde::Serialize;
use std::path::PathBuf;

use crate::imaging::ImageSummary;
use crate::router::Screen;

/// Everything a screen produced for one request
#[derive(Debug, Clone, Serialize)]
pub struct ScreenReport {
    pub user: String,
    pub screen: Screen,
    pub title: String,
    pub intro: String,
    pub files: Vec<FileReport>,
}

impl ScreenReport {
    pub fn new(user: &str, screen: Screen) -> Self {
        Self {
            user: user.to_string(),
            screen,
            title: screen.title().to_string(),
            intro: screen.intro().to_string(),
            files: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        self.files.iter().any(|f| f.error.is_some())
    }

    pub fn succeeded(&self) -> usize {
        self.files.iter().filter(|f| f.error.is_none()).count()
    }
}

/// Per-file result shown to the user
#[derive(Debug, Clone, Default, Serialize)]
pub struct FileReport {
    pub name: String,
    /// Success messages, in the order the actions ran
    pub messages: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<String>,
    pub outputs: Vec<SavedOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileReport {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn failed(name: &str, error: impl std::fmt::Display) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::new(name)
        }
    }
}

/// A download that was handed to the sink
#[derive(Debug, Clone, Serialize)]
pub struct SavedOutput {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: usize,
    pub path: PathBuf,
}
