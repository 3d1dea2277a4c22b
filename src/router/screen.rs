use serde::Serialize;

use crate::constants::{ABOUT_TEXT, SECTION_ABOUT, SECTION_IMAGE_CONVERT, SECTION_UPLOAD_PROCESS};

/// The three independent screens behind the session gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Screen {
    /// Tabular upload, cleaning and conversion
    #[default]
    UploadProcess,
    /// Image re-encoding
    ImageConvert,
    /// Informational text
    About,
}

impl Screen {
    /// Navigation order as shown to the user
    pub const ALL: [Screen; 3] = [Screen::UploadProcess, Screen::ImageConvert, Screen::About];

    /// Section label used for navigation
    pub fn label(&self) -> &'static str {
        match self {
            Self::UploadProcess => SECTION_UPLOAD_PROCESS,
            Self::ImageConvert => SECTION_IMAGE_CONVERT,
            Self::About => SECTION_ABOUT,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::UploadProcess => "Data Sweeper",
            Self::ImageConvert => "Image Converter",
            Self::About => "About Data Sweeper",
        }
    }

    pub fn intro(&self) -> &'static str {
        match self {
            Self::UploadProcess => "Transform your files between CSV and Excel formats with built-in data cleaning and transformation features.",
            Self::ImageConvert => "Convert your images between different formats.",
            Self::About => ABOUT_TEXT,
        }
    }
}

/// Dispatch a section selection to its screen
///
/// Unknown selections fall back to "Upload & Process".
pub fn route(selection: &str) -> Screen {
    Screen::ALL
        .into_iter()
        .find(|screen| screen.label() == selection)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_known_sections() {
        assert_eq!(route("Upload & Process"), Screen::UploadProcess);
        assert_eq!(route("Image Convert"), Screen::ImageConvert);
        assert_eq!(route("About"), Screen::About);
    }

    #[test]
    fn test_route_fallback() {
        assert_eq!(route(""), Screen::UploadProcess);
        assert_eq!(route("about"), Screen::UploadProcess);
        assert_eq!(route("Settings"), Screen::UploadProcess);
    }

    #[test]
    fn test_labels_round_trip() {
        for screen in Screen::ALL {
            assert_eq!(route(screen.label()), screen);
        }
    }
}
