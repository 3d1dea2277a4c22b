/// Image conversion workflow - Gateway

mod convert;
mod format;

pub use convert::{
    convert_image, decode_image, describe_image, encode_image, ConvertedImage, ImageSummary,
};
pub use format::ImageTarget;
