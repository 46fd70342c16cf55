use std::path::PathBuf;
use thiserror::Error;

/// Credential file problems. Nothing can authenticate without the file, so
/// these are fatal to the process rather than to a single poll cycle.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("credential file not found: {0}")]
    Missing(PathBuf),
    #[error("failed to access credential file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("credential file {path} is malformed: {reason}")]
    Malformed { path: PathBuf, reason: String },
}

/// The refresh exchange was rejected or unusable. The refresh token itself is
/// presumably still valid, so the caller aborts the cycle and tries again on
/// the next tick.
#[derive(Debug, Error)]
pub enum AuthRefreshError {
    #[error("token refresh request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("token endpoint rejected refresh: {status} => {body}")]
    Rejected {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("token endpoint response missing access_token")]
    MissingAccessToken,
}

/// Any failure of a playback fetch. Kinds are distinguished for logging; the
/// caller handles them all the same way: skip this cycle, keep the previous
/// display state.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("playback request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("playback endpoint returned {0}")]
    Status(reqwest::StatusCode),
    #[error("playback endpoint returned {0} after token refresh")]
    RetryFailed(reqwest::StatusCode),
    #[error("unexpected payload: {0}")]
    Decode(String),
    #[error(transparent)]
    Refresh(#[from] AuthRefreshError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
