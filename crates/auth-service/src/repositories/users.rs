//! Static credential records.
//!
//! The records are read once at startup from a JSON array and never change
//! afterwards. Lookups are a linear scan; the first exact match wins.

use crate::models::CredentialRecord;
use common::secret::ExposeSecret;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("Failed to read users file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse users file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Immutable set of credential records.
#[derive(Debug, Clone, Default)]
pub struct UserStore {
    records: Vec<CredentialRecord>,
}

impl UserStore {
    pub fn from_records(records: Vec<CredentialRecord>) -> Self {
        Self { records }
    }

    /// Parse a JSON array of `{username, password, details}` objects.
    pub fn from_json(json: &str) -> Result<Self, UserStoreError> {
        let records: Vec<CredentialRecord> = serde_json::from_str(json)?;
        Ok(Self::from_records(records))
    }

    /// Load records from a file on disk.
    pub async fn load(path: &Path) -> Result<Self, UserStoreError> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| UserStoreError::Io {
                path: path.display().to_string(),
                source,
            })?;

        Self::from_json(&contents)
    }

    /// Find the first record whose username and password both match exactly.
    pub fn find_by_credentials(&self, username: &str, password: &str) -> Option<&CredentialRecord> {
        self.records.iter().find(|record| {
            record.username == username && record.password.expose_secret() == password
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;

    const USERS_JSON: &str = r#"[
        {"username": "alice", "password": "pw1", "details": {"role": "admin"}},
        {"username": "bob", "password": "pw2", "details": {"role": "viewer"}},
        {"username": "alice", "password": "pw1", "details": {"role": "shadowed"}}
    ]"#;

    #[test]
    fn test_find_by_credentials_exact_match() {
        let store = UserStore::from_json(USERS_JSON).unwrap();

        let record = store.find_by_credentials("bob", "pw2").expect("bob should match");
        assert_eq!(record.details, serde_json::json!({"role": "viewer"}));
    }

    #[test]
    fn test_find_by_credentials_first_match_wins() {
        let store = UserStore::from_json(USERS_JSON).unwrap();

        let record = store.find_by_credentials("alice", "pw1").unwrap();
        assert_eq!(record.details, serde_json::json!({"role": "admin"}));
    }

    #[test]
    fn test_find_by_credentials_rejects_mismatch() {
        let store = UserStore::from_json(USERS_JSON).unwrap();

        assert!(store.find_by_credentials("alice", "pw2").is_none());
        assert!(store.find_by_credentials("ALICE", "pw1").is_none());
        assert!(store.find_by_credentials("mallory", "pw1").is_none());
        assert!(store.find_by_credentials("", "").is_none());
    }

    #[test]
    fn test_from_json_rejects_non_array() {
        let result = UserStore::from_json(r#"{"username": "alice"}"#);
        assert!(matches!(result, Err(UserStoreError::Parse(_))));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(USERS_JSON.as_bytes()).unwrap();

        let store = UserStore::load(file.path()).await.unwrap();
        assert_eq!(store.len(), 3);
        assert!(!store.is_empty());
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = UserStore::load(&dir.path().join("absent.json")).await;
        assert!(matches!(result, Err(UserStoreError::Io { .. })));
    }
}
