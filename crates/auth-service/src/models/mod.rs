use common::secret::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A static credential record loaded from the users file.
///
/// `details` is an opaque profile payload returned verbatim by `/me`.
#[derive(Clone, Deserialize)]
pub struct CredentialRecord {
    pub username: String,
    pub password: SecretString,
    #[serde(default)]
    pub details: serde_json::Value,
}

impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("details", &"[REDACTED]")
            .finish()
    }
}

/// Body of `POST /login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: SecretString,
}

/// Body of a successful `POST /login`.
#[derive(Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

impl fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginResponse")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use common::secret::ExposeSecret;

    #[test]
    fn test_credential_record_details_default_to_null() {
        let record: CredentialRecord =
            serde_json::from_str(r#"{"username": "carol", "password": "pw3"}"#).unwrap();
        assert_eq!(record.details, serde_json::Value::Null);
    }

    #[test]
    fn test_credential_record_debug_redacts_password() {
        let record: CredentialRecord = serde_json::from_str(
            r#"{"username": "alice", "password": "pw1", "details": {"role": "admin"}}"#,
        )
        .unwrap();

        let debug = format!("{record:?}");
        assert!(debug.contains("alice"));
        assert!(!debug.contains("pw1"));
        assert!(!debug.contains("admin"));
        assert_eq!(record.password.expose_secret(), "pw1");
    }

    #[test]
    fn test_login_request_requires_both_fields() {
        let missing_password = serde_json::from_str::<LoginRequest>(r#"{"username": "alice"}"#);
        assert!(missing_password.is_err());

        let missing_username = serde_json::from_str::<LoginRequest>(r#"{"password": "pw1"}"#);
        assert!(missing_username.is_err());
    }

    #[test]
    fn test_login_response_debug_redacts_token() {
        let response = LoginResponse {
            token: "eyJhbGciOiJIUzI1NiJ9.e30.sig".to_string(),
        };
        assert!(!format!("{response:?}").contains("eyJ"));
        assert_eq!(
            serde_json::to_string(&response).unwrap(),
            r#"{"token":"eyJhbGciOiJIUzI1NiJ9.e30.sig"}"#
        );
    }
}
