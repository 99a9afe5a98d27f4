use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

use crate::error::{Error, Result};

static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

pub const DEFAULT_YOUTUBE_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_SHEETS_API_BASE_URL: &str = "https://sheets.googleapis.com/v4";
const DEFAULT_CREDENTIALS_FILE: &str = "client_secret.json";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

/// Get the base data directory (~/.viral-lens/)
pub fn data_dir() -> &'static PathBuf {
    DATA_DIR.get_or_init(|| {
        std::env::var("VIRAL_LENS_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".viral-lens")
            })
    })
}

/// Get the .env file path
pub fn env_file_path() -> PathBuf {
    data_dir().join(".env")
}

/// Load environment variables from the data directory's .env file
pub fn load_env() {
    let env_path = env_file_path();
    if env_path.exists() {
        let _ = dotenvy::from_path(&env_path);
    } else {
        // Try current directory as fallback
        let _ = dotenvy::dotenv();
    }
}

/// Path of the service-account key file.
///
/// `VIRAL_LENS_CREDENTIALS` wins over `GOOGLE_APPLICATION_CREDENTIALS`; with
/// neither set, `client_secret.json` in the working directory is used.
pub fn credentials_path() -> PathBuf {
    std::env::var("VIRAL_LENS_CREDENTIALS")
        .or_else(|_| std::env::var("GOOGLE_APPLICATION_CREDENTIALS"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CREDENTIALS_FILE))
}

pub fn youtube_api_base_url() -> String {
    base_url_from_env("YOUTUBE_API_BASE_URL", DEFAULT_YOUTUBE_API_BASE_URL)
}

pub fn sheets_api_base_url() -> String {
    base_url_from_env("SHEETS_API_BASE_URL", DEFAULT_SHEETS_API_BASE_URL)
}

fn base_url_from_env(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(|v| v.trim_end_matches('/').to_string())
        .unwrap_or_else(|| default.to_string())
}

/// Timeout applied to every HTTP request
pub fn http_timeout() -> Result<Duration> {
    match std::env::var("VIRAL_LENS_HTTP_TIMEOUT_SECS") {
        Ok(raw) => parse_timeout_secs(&raw),
        Err(_) => Ok(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS)),
    }
}

fn parse_timeout_secs(raw: &str) -> Result<Duration> {
    let secs: u64 = raw.trim().parse().map_err(|_| {
        Error::Config(format!(
            "VIRAL_LENS_HTTP_TIMEOUT_SECS must be a whole number of seconds, got {:?}",
            raw
        ))
    })?;
    if secs == 0 {
        return Err(Error::Config(
            "VIRAL_LENS_HTTP_TIMEOUT_SECS must be greater than zero".to_string(),
        ));
    }
    Ok(Duration::from_secs(secs))
}

/// Validate that the credentials file is present
pub fn validate_config() -> Result<()> {
    let path = credentials_path();
    if !path.exists() {
        return Err(Error::Authentication(format!(
            "credentials file {} not found. Run `viral-lens init` to configure.",
            path.display()
        )));
    }
    Ok(())
}

/// Create the data directory if it doesn't exist
pub fn ensure_directories() -> Result<()> {
    std::fs::create_dir_all(data_dir())?;
    Ok(())
}
