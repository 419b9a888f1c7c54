/// Errors surfaced by an upload attempt. Any of them means the upload
/// failed as a whole; no partial result is ever returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("invalid file type {file_name:?}: only .step or .stp files are accepted")]
    InvalidExtension { file_name: String },

    #[error("failed to read {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("upload request failed: {reason}")]
    Transport { reason: String },

    #[error("server rejected upload ({status}): {detail}")]
    Status { status: u16, detail: String },

    #[error("malformed upload response: {reason}")]
    Decode { reason: String },

    #[error("invalid gateway configuration: {reason}")]
    Config { reason: String },
}
