//! Error types for segmock

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid segmentation type: {0}")]
    InvalidSegmentationKind(String),

    #[error("Catalog not found: {}", .0.display())]
    CatalogNotFound(PathBuf),

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn invalid_catalog(msg: impl Into<String>) -> Self {
        Error::InvalidCatalog(msg.into())
    }
}
