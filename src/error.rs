//! Error types for the form guide library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the form guide library
#[derive(Error, Debug)]
pub enum Error {
    /// PDF processing error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Screenshot could not be decoded
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Browser launch, navigation or capture failure
    #[error("Browser error: {0}")]
    Browser(String),

    /// A page script returned something we could not interpret
    #[error("Script error: {0}")]
    Script(String),

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Invalid PDF (no pages)
    #[error("PDF has no pages: {}", .0.display())]
    EmptyPdf(PathBuf),

    /// No screenshots to assemble
    #[error("No screenshots found in {}", .0.display())]
    NoScreenshots(PathBuf),

    /// General error
    #[error("{0}")]
    General(String),
}

impl From<chromiumoxide::error::CdpError> for Error {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Error::Browser(err.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::General(format!("Invalid URL: {}", err))
    }
}

impl From<glob::PatternError> for Error {
    fn from(err: glob::PatternError) -> Self {
        Error::General(format!("Invalid glob pattern: {}", err))
    }
}
