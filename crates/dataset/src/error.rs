//! Dataset errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV in {path}: {message}")]
    Csv { path: String, message: String },

    #[error("Failed to parse merged output {path}: {message}")]
    Cache { path: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<DatasetError> for propchat_core::Error {
    fn from(err: DatasetError) -> Self {
        propchat_core::Error::Dataset(err.to_string())
    }
}
