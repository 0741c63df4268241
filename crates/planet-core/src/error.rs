use thiserror::Error;

/// Raised when a settings patch cannot be parsed at all.
///
/// Out-of-range values are never an error; they are coerced where used.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("malformed settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why the renderer could not load a texture.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TextureError {
    #[error("texture request for `{url}` failed: {reason}")]
    LoadFailed { url: String, reason: String },
    #[error("texture `{0}` decoded to an empty image")]
    Empty(String),
}
