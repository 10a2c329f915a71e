use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Failure classes for backend calls: an HTTP error response with the
/// backend's structured `{detail, code}` body, or a transport failure
/// that never produced a response. Client-side validation errors live in
/// `taskdeck-core` and never reach this layer.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{detail} ({code}, HTTP {status})")]
    Http {
        status: StatusCode,
        code: String,
        detail: String,
    },
    #[error("network request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("stored session cookie is not a valid header value")]
    InvalidSessionCookie,
}

impl ApiError {
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            ApiError::Http { status, .. }
                if *status == StatusCode::UNAUTHORIZED || *status == StatusCode::FORBIDDEN
        )
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

/// Build an [`ApiError::Http`] from a non-2xx response body. Bodies that
/// are not JSON, or JSON without the expected keys, fall back to the
/// status line so the caller always gets something readable.
pub(crate) fn http_error(status: StatusCode, body: &str) -> ApiError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    ApiError::Http {
        status,
        code: parsed.code.unwrap_or_else(|| "API_ERROR".to_string()),
        detail: parsed
            .detail
            .or(parsed.message)
            .unwrap_or_else(|| status_fallback(status)),
    }
}

fn status_fallback(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("An error occurred")
        .to_string()
}
