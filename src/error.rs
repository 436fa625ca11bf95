use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the simulation core.
///
/// All failures are signaled at construction or through host-facing setters;
/// the tick step itself has no failure modes.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid user or API parameter.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// Malformed configuration file contents.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Propagated I/O errors (config file reading/writing).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
