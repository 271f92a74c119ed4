//! Error types for the export crate.

/// Errors that can occur while exporting a diff.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Serializing the export payload failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The format name is not one of the supported exports.
    #[error("unknown export format: {0}")]
    UnknownFormat(String),
}

/// Convenience alias for export results.
pub type ExportResult<T> = Result<T, ExportError>;
