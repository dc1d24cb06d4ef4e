//! Response body parsing for the crawl API.

use super::error::ClientError;
use crate::status::RunStatus;
use serde::Deserialize;

/// Error body shapes returned by the API.
#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Detail { detail: Detail },
    Message { message: String },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Detail {
    Text(String),
    Validation(Vec<ValidationIssue>),
}

#[derive(Deserialize)]
struct ValidationIssue {
    #[serde(default)]
    loc: Vec<serde_json::Value>,
    msg: String,
}

impl ValidationIssue {
    /// "url: field required", skipping the leading "body"/"query" segment.
    fn describe(&self) -> String {
        let field = self
            .loc
            .iter()
            .skip_while(|seg| matches!(seg.as_str(), Some("body" | "query" | "path")))
            .map(|seg| match seg {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(".");

        if field.is_empty() {
            self.msg.clone()
        } else {
            format!("{}: {}", field, self.msg)
        }
    }
}

/// Extract a human-readable message from an error response body.
///
/// Falls back to the canonical reason phrase for `status` when the body is
/// empty or not in a known shape.
pub fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    let parsed = serde_json::from_str::<ErrorBody>(body).ok();

    let message = match parsed {
        Some(ErrorBody::Detail {
            detail: Detail::Text(text),
        }) => text,
        Some(ErrorBody::Detail {
            detail: Detail::Validation(issues),
        }) => issues
            .iter()
            .map(ValidationIssue::describe)
            .collect::<Vec<_>>()
            .join("; "),
        Some(ErrorBody::Message { message }) => message,
        None => String::new(),
    };

    if message.trim().is_empty() {
        status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
    } else {
        message
    }
}

/// Map a non-success response to a [`ClientError`].
pub fn status_error(status: reqwest::StatusCode, body: &str) -> ClientError {
    let message = error_message(status, body);
    if status.is_server_error() {
        ClientError::Server {
            status: status.as_u16(),
            message,
        }
    } else {
        ClientError::Rejected {
            status: status.as_u16(),
            message,
        }
    }
}

/// Decode and validate a run status payload.
pub fn parse_run_status(body: &str) -> Result<RunStatus, ClientError> {
    let status: RunStatus =
        serde_json::from_str(body).map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
    status.validate().map_err(ClientError::InvalidResponse)?;
    Ok(status)
}
