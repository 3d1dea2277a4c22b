use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::constants::{MIME_JPEG, MIME_PNG, MIME_WEBP};

/// Formats an image can be re-encoded into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ImageTarget {
    #[default]
    Png,
    Jpeg,
    Webp,
}

impl ImageTarget {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Png => "PNG",
            Self::Jpeg => "JPEG",
            Self::Webp => "WEBP",
        }
    }

    /// Canonical output extension, including the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => ".png",
            Self::Jpeg => ".jpg",
            Self::Webp => ".webp",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => MIME_PNG,
            Self::Jpeg => MIME_JPEG,
            Self::Webp => MIME_WEBP,
        }
    }

    pub(crate) fn image_format(&self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Webp => image::ImageFormat::WebP,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_contracts() {
        assert_eq!(ImageTarget::Png.extension(), ".png");
        assert_eq!(ImageTarget::Png.mime_type(), "image/png");
        assert_eq!(ImageTarget::Jpeg.extension(), ".jpg");
        assert_eq!(ImageTarget::Jpeg.mime_type(), "image/jpeg");
        assert_eq!(ImageTarget::Webp.extension(), ".webp");
        assert_eq!(ImageTarget::Webp.mime_type(), "image/webp");
    }
}
