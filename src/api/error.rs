use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Failure of a single backend call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-success status.
    #[error("{}", backend_message(*status, detail.as_deref()))]
    Backend {
        status: StatusCode,
        detail: Option<String>,
    },

    /// No response was received.
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// An id that cannot be placed in a request path.
    #[error("Invalid {kind} id: {id:?}")]
    InvalidId { kind: &'static str, id: String },

    /// A success response whose body did not match the expected shape.
    #[error("Unexpected response from server: {0}")]
    Decode(String),
}

fn backend_message(status: StatusCode, detail: Option<&str>) -> String {
    match detail {
        Some(detail) => detail.to_string(),
        None => format!("Request failed with status {status}"),
    }
}

impl ApiError {
    /// The backend's user-facing `detail`, when one was returned.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Backend { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Message to show the user: the backend detail, or `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.detail()
            .map(str::to_owned)
            .unwrap_or_else(|| fallback.to_string())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err)
        }
    }
}

/// Pull the `detail` field out of an error body.
///
/// Accepts a plain string detail or a list of validation objects carrying
/// `msg`, which are joined with `; `.
pub fn extract_error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body.trim()).ok()?;
    let detail = value.get("detail")?;

    let text = match detail {
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(text) => Some(text.clone()),
                Value::Object(map) => map.get("msg").and_then(Value::as_str).map(str::to_owned),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("; "),
        Value::Object(map) => map
            .get("message")
            .or_else(|| map.get("msg"))
            .and_then(Value::as_str)
            .map(str::to_owned)?,
        _ => return None,
    };

    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_string_detail() {
        assert_eq!(
            extract_error_detail(r#"{"detail":"Invalid credentials"}"#).as_deref(),
            Some("Invalid credentials")
        );
    }

    #[test]
    fn joins_validation_messages() {
        let body = r#"{"detail":[
            {"loc":["body","email"],"msg":"value is not a valid email address","type":"value_error"},
            {"loc":["body","password"],"msg":"field required","type":"missing"}
        ]}"#;
        assert_eq!(
            extract_error_detail(body).as_deref(),
            Some("value is not a valid email address; field required")
        );
    }

    #[test]
    fn missing_or_blank_detail_is_none() {
        assert_eq!(extract_error_detail(r#"{"error":"nope"}"#), None);
        assert_eq!(extract_error_detail(r#"{"detail":"   "}"#), None);
        assert_eq!(extract_error_detail("<html>Bad Gateway</html>"), None);
        assert_eq!(extract_error_detail(""), None);
    }

    #[test]
    fn user_message_falls_back_without_detail() {
        let err = ApiError::Backend {
            status: StatusCode::BAD_GATEWAY,
            detail: None,
        };
        assert_eq!(err.user_message("Login failed"), "Login failed");
        assert_eq!(err.to_string(), "Request failed with status 502 Bad Gateway");

        let err = ApiError::Backend {
            status: StatusCode::UNAUTHORIZED,
            detail: Some("Invalid credentials".to_string()),
        };
        assert_eq!(err.user_message("Login failed"), "Invalid credentials");
        assert_eq!(err.to_string(), "Invalid credentials");
    }
}
