//! Plumbing shared by the Google API clients.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::Deserialize;

use crate::error::{Error, Result};

/// Error envelope returned by Google APIs on non-2xx responses.
///
/// See: <https://cloud.google.com/apis/design/errors#http_mapping>
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

pub fn http_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder()
        .timeout(timeout)
        .user_agent(concat!("viral-lens/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

/// Pass a successful response through, turning anything else into [`Error::Upstream`].
pub async fn ensure_success(operation: &'static str, response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    tracing::warn!(operation, status = status.as_u16(), "upstream request failed");
    Err(Error::Upstream {
        operation,
        status: status.as_u16(),
        message: error_message(&text),
    })
}

fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => match (envelope.error.message, envelope.error.status) {
            (Some(message), Some(status)) => format!("{} ({})", message, status),
            (Some(message), None) => message,
            (None, Some(status)) => status,
            (None, None) => body.trim().to_string(),
        },
        Err(_) => body.trim().to_string(),
    }
}
