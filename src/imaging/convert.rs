use image::{ColorType, DynamicImage};
use serde::Serialize;
use std::io::Cursor;
use tracing::{debug, info};

use crate::constants::IMAGE_EXTENSIONS;
use crate::files::{replace_extension, OutputBuffer, UploadedFile};
use crate::utils::{Result, SweeperError};

use super::ImageTarget;

/// What the image screen shows about an upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageSummary {
    pub width: u32,
    pub height: u32,
    pub color: String,
}

/// Decode an uploaded image; only png/jpg/jpeg/webp uploads are accepted
pub fn decode_image(file: &UploadedFile) -> Result<DynamicImage> {
    if !IMAGE_EXTENSIONS.contains(&file.extension.as_str()) {
        return Err(SweeperError::UnsupportedTypeError(file.extension.clone()));
    }

    let image =
        image::load_from_memory(&file.bytes).map_err(|e| SweeperError::decode(&file.name, e))?;
    debug!(
        file = %file.name,
        width = image.width(),
        height = image.height(),
        color = ?image.color(),
        "image decoded"
    );
    Ok(image)
}

pub fn describe_image(image: &DynamicImage) -> ImageSummary {
    ImageSummary {
        width: image.width(),
        height: image.height(),
        color: format!("{:?}", image.color()),
    }
}

/// Re-encode a decoded image into `target`
///
/// Pixels are only converted when the encoder cannot take the source layout:
/// JPEG has no alpha channel and WebP only takes 8-bit RGB(A).
pub fn encode_image(image: &DynamicImage, target: ImageTarget, file_name: &str) -> Result<Vec<u8>> {
    let adapted;
    let source = match (target, image.color()) {
        (ImageTarget::Png, _) => image,
        (ImageTarget::Jpeg, ColorType::L8 | ColorType::Rgb8) => image,
        (ImageTarget::Jpeg, _) => {
            adapted = DynamicImage::ImageRgb8(image.to_rgb8());
            &adapted
        }
        (ImageTarget::Webp, ColorType::Rgb8 | ColorType::Rgba8) => image,
        (ImageTarget::Webp, color) if color.has_alpha() => {
            adapted = DynamicImage::ImageRgba8(image.to_rgba8());
            &adapted
        }
        (ImageTarget::Webp, _) => {
            adapted = DynamicImage::ImageRgb8(image.to_rgb8());
            &adapted
        }
    };

    let mut buf = Cursor::new(Vec::new());
    source
        .write_to(&mut buf, target.image_format())
        .map_err(|e| SweeperError::encode(file_name, e))?;
    Ok(buf.into_inner())
}

/// A converted upload: what was decoded plus the buffer to offer for download
#[derive(Debug, Clone)]
pub struct ConvertedImage {
    pub summary: ImageSummary,
    pub output: OutputBuffer,
}

/// Decode an upload and re-encode it as a downloadable buffer
pub fn convert_image(file: &UploadedFile, target: ImageTarget) -> Result<ConvertedImage> {
    let image = decode_image(file)?;
    let file_name = replace_extension(&file.name, target.extension());
    let bytes = encode_image(&image, target, &file_name)?;

    info!(
        source = %file.name,
        output = %file_name,
        format = target.label(),
        bytes = bytes.len(),
        "image converted"
    );

    Ok(ConvertedImage {
        summary: describe_image(&image),
        output: OutputBuffer {
            bytes,
            file_name,
            mime_type: target.mime_type(),
        },
    })
}
