// ── Core error types ──
//
// User-facing errors from badgeville-core. Remote validation failures on
// save are NOT errors here: they come back as `Ok(false)` with messages
// attached to the record. Everything below is a hard failure.

use badgeville_api::ValidationErrors;
use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach {host}: {reason}")]
    ConnectionFailed { host: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    #[error("{entity_type} has no id yet -- create it before updating or deleting")]
    MissingIdentity { entity_type: String },

    /// Field errors on an operation that has no record to attach them to.
    #[error("Rejected by server: {errors}")]
    Rejected { errors: ValidationErrors },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<badgeville_api::Error> for CoreError {
    fn from(err: badgeville_api::Error) -> Self {
        match err {
            badgeville_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            // Timeouts never get here: the client reports them as `Timeout`
            // with the configured duration.
            badgeville_api::Error::Transport(ref e) => {
                if e.is_connect() {
                    CoreError::ConnectionFailed {
                        host: "<unknown>".into(),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            badgeville_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            badgeville_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            badgeville_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                host: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            badgeville_api::Error::NotFound { resource } => {
                let (entity_type, identifier) =
                    resource.split_once('/').unwrap_or((resource.as_str(), ""));
                CoreError::NotFound {
                    entity_type: entity_type.to_owned(),
                    identifier: identifier.to_owned(),
                }
            }
            badgeville_api::Error::Validation(errors) => CoreError::Rejected { errors },
            badgeville_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            badgeville_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Internal(format!("record merge failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_splits_collection_and_id() {
        let err = CoreError::from(badgeville_api::Error::NotFound {
            resource: "users/4f0b53c4a768656d4f000001".into(),
        });
        match err {
            CoreError::NotFound {
                entity_type,
                identifier,
            } => {
                assert_eq!(entity_type, "users");
                assert_eq!(identifier, "4f0b53c4a768656d4f000001");
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn validation_becomes_rejected() {
        let errors: ValidationErrors = [("email", "user email is already taken")]
            .into_iter()
            .collect();
        let err = CoreError::from(badgeville_api::Error::Validation(errors));
        assert_eq!(
            err.to_string(),
            "Rejected by server: email user email is already taken"
        );
    }

    #[test]
    fn timeouts_keep_duration() {
        let err = CoreError::from(badgeville_api::Error::Timeout { timeout_secs: 30 });
        assert!(matches!(err, CoreError::Timeout { timeout_secs: 30 }));
    }
}
