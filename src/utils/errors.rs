use thiserror::Error;

/// Main error type for Data Sweeper
#[derive(Error, Debug)]
pub enum SweeperError {
    #[error("{0}")]
    ValidationError(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedTypeError(String),

    #[error("Could not decode image {file}: {message}")]
    DecodeError { file: String, message: String },

    #[error("Could not parse {file}: {message}")]
    ParseError { file: String, message: String },

    #[error("Could not encode {file}: {message}")]
    EncodeError { file: String, message: String },

    #[error("Login required")]
    NotAuthenticated,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SweeperError {
    pub fn parse(file: &str, message: impl std::fmt::Display) -> Self {
        Self::ParseError {
            file: file.to_string(),
            message: message.to_string(),
        }
    }

    pub fn encode(file: &str, message: impl std::fmt::Display) -> Self {
        Self::EncodeError {
            file: file.to_string(),
            message: message.to_string(),
        }
    }

    pub fn decode(file: &str, message: impl std::fmt::Display) -> Self {
        Self::DecodeError {
            file: file.to_string(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SweeperError>;
