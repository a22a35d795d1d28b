//! Error bodies returned by the administration API.

use serde::{Deserialize, Serialize};

/// Error response body.
///
/// Older endpoints put the machine code in `error`, newer ones in `code`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code (older endpoints).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Machine-readable error code (newer endpoints).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
    /// Optional details, e.g. per-field validation messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiErrorResponse {
    /// The machine code, whichever field carried it.
    pub fn machine_code(&self) -> Option<&str> {
        self.code.as_deref().or(self.error.as_deref())
    }

    /// Whether the code names a business rule (`UPPER_SNAKE_CASE`).
    pub fn is_business_code(&self) -> bool {
        self.machine_code().is_some_and(|code| {
            code.contains('_')
                && code
                    .chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_machine_code_prefers_code() {
        let body: ApiErrorResponse = serde_json::from_value(serde_json::json!({
            "error": "Bad Request",
            "code": "CASH_CUSTODY_NOT_EMPTY",
            "message": "Cash custody must be empty"
        }))
        .unwrap();
        assert_eq!(body.machine_code(), Some("CASH_CUSTODY_NOT_EMPTY"));
        assert!(body.is_business_code());
    }

    #[test]
    fn test_plain_http_reason_is_not_business() {
        let body = ApiErrorResponse {
            error: Some("Not Found".to_string()),
            ..ApiErrorResponse::default()
        };
        assert!(!body.is_business_code());
    }
}
