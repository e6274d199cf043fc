//! # Error Handling
//!
//! Errors raised while merging a publish upload into a package metadata document.
//!
//! ## Key Types
//!
//! - [`MetaError`]: every failure `MetaDocument::update` can report
//! - [`ErrorCode`]: machine-readable classification with an HTTP status hint
//! - [`MetaResult<T>`]: convenience alias for results using `MetaError`
//!
//! ## Error Classifications
//!
//! - **Malformed Upload** (400 Bad Request): the publish payload lacks required fields
//! - **Unrecognized Tarball Path** (400 Bad Request): a tarball URL cannot be rebased
//! - **Patch Application** (500 Internal Server Error): the stored document has the wrong shape
//!
//! None of these are retryable. A failed update never leaves a partially patched
//! document behind, so callers can reject the publish and keep serving the old one.

/// Error code classification for machine-readable error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    MalformedUpload,         // Upload misses versions, dist-tags or dist.tarball
    UnrecognizedTarballPath, // Tarball URL has no scoped package path
    PatchApplication,        // Stored document cannot take the patch
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::MalformedUpload => "malformed_upload",
            ErrorCode::UnrecognizedTarballPath => "unrecognized_tarball_path",
            ErrorCode::PatchApplication => "patch_application",
        }
    }

    /// HTTP status a request handler should answer with.
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorCode::MalformedUpload | ErrorCode::UnrecognizedTarballPath => 400,
            ErrorCode::PatchApplication => 500,
        }
    }
}

/// Failures of the metadata merge
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetaError {
    #[error("Malformed upload: {reason}")]
    MalformedUpload { reason: String },

    #[error("Unrecognized tarball path: '{tarball}' has no @scope/package/-/@scope/file segment")]
    UnrecognizedTarballPath { tarball: String },

    #[error("Cannot apply patch at '{path}': {reason}")]
    PatchApplication { path: String, reason: String },
}

impl MetaError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        MetaError::MalformedUpload {
            reason: reason.into(),
        }
    }

    pub(crate) fn patch(path: impl ToString, reason: impl Into<String>) -> Self {
        MetaError::PatchApplication {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> ErrorCode {
        match self {
            MetaError::MalformedUpload { .. } => ErrorCode::MalformedUpload,
            MetaError::UnrecognizedTarballPath { .. } => ErrorCode::UnrecognizedTarballPath,
            MetaError::PatchApplication { .. } => ErrorCode::PatchApplication,
        }
    }
}

/// Convenient result type for metadata operations.
pub type MetaResult<T> = Result<T, MetaError>;
