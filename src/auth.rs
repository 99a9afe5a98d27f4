//! Service-account authentication for the YouTube Data and Sheets APIs.
//!
//! The key file is parsed and exchanged for a bearer token by `yup-oauth2`;
//! this module only picks the scopes and folds its failures into
//! [`Error::Authentication`].
//!
//! See: <https://developers.google.com/identity/protocols/oauth2/service-account>

use std::path::Path;

use yup_oauth2::{ServiceAccountAuthenticator, ServiceAccountKey};

use crate::error::{Error, Result};

pub const YOUTUBE_SCOPE: &str = "https://www.googleapis.com/auth/youtube.force-ssl";
pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// Scopes requested for a full analysis run.
pub const RUN_SCOPES: [&str; 2] = [YOUTUBE_SCOPE, SHEETS_SCOPE];

/// Bearer token shared by the API clients of one run.
#[derive(Clone)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(..)")
    }
}

/// Read a service-account key file.
pub async fn read_key(path: &Path) -> Result<ServiceAccountKey> {
    let key = yup_oauth2::read_service_account_key(path)
        .await
        .map_err(|e| Error::Authentication(format!("{}: {}", path.display(), e)))?;
    if key.client_email.trim().is_empty() {
        return Err(Error::Authentication(format!(
            "{}: client_email is empty",
            path.display()
        )));
    }
    Ok(key)
}

/// Trade `key` for an access token covering `scopes`.
pub async fn fetch_access_token(key: ServiceAccountKey, scopes: &[&str]) -> Result<AccessToken> {
    let account = key.client_email.clone();
    tracing::debug!(account = %account, token_uri = %key.token_uri, "requesting access token");

    let authenticator = ServiceAccountAuthenticator::builder(key)
        .build()
        .await
        .map_err(|e| Error::Authentication(format!("service account {}: {}", account, e)))?;
    let token = authenticator
        .token(scopes)
        .await
        .map_err(|e| Error::Authentication(format!("service account {}: {}", account, e)))?;
    let secret = token.token().ok_or_else(|| {
        Error::Authentication(format!("service account {}: no access token issued", account))
    })?;

    tracing::info!(account = %account, "obtained access token");
    Ok(AccessToken::new(secret))
}

/// Load credentials from `path` and authenticate for `scopes`.
pub async fn authenticate(path: &Path, scopes: &[&str]) -> Result<AccessToken> {
    let key = read_key(path).await?;
    fetch_access_token(key, scopes).await
}
