use crate::error::StorageError;
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Persisted OAuth credential record. Created once by an external
/// authorization exchange; read at every fetch; overwritten whenever a
/// refresh succeeds. `access_token` may be stale, `refresh_token` must not be
/// empty or the record cannot be renewed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    pub refresh_token: String,
    pub client_id: String,
    pub client_secret: String,
}

impl Credential {
    /// Bearer header value for API calls.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    /// Basic header value for the token endpoint.
    pub fn basic(&self) -> String {
        format!(
            "Basic {}",
            general_purpose::STANDARD.encode(format!("{}:{}", self.client_id, self.client_secret))
        )
    }
}

/// Flat JSON credential file, compatible with the record written by the
/// one-shot authorization helper. Unknown fields (scope, expires_in, ...) are
/// ignored on load and dropped on save.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Credential, StorageError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::Missing(self.path.clone()))
            }
            Err(e) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };
        let cred: Credential = serde_json::from_str(&raw).map_err(|e| StorageError::Malformed {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        if cred.refresh_token.trim().is_empty() {
            return Err(StorageError::Malformed {
                path: self.path.clone(),
                reason: "empty refresh_token".into(),
            });
        }
        Ok(cred)
    }

    /// Fully replaces the prior record. Writes a sibling temp file and renames
    /// it over the target so a crash mid-write never corrupts the record.
    pub fn save(&self, cred: &Credential) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(cred).map_err(|e| StorageError::Malformed {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json).map_err(|e| StorageError::Io {
            path: tmp.clone(),
            source: e,
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|e| StorageError::Io {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(())
    }
}
