use thiserror::Error;

/// Problems with the shape or contents of a passenger table.
///
/// Loader entry points wrap these in `anyhow` with file context; callers that
/// need the variant can `downcast_ref::<DatasetError>()`.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("row {row}, column '{column}': invalid value '{value}'")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
}
