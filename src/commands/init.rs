use std::path::PathBuf;

use crate::auth::read_key;
use crate::config::{data_dir, ensure_directories, env_file_path};
use crate::error::Result;

pub async fn run(credentials: Option<String>, force: bool) -> Result<()> {
    ensure_directories()?;

    let env_file = env_file_path();

    if env_file.exists() && !force {
        println!("Config already exists at {}", env_file.display());
        println!("Use --force to overwrite.");
        return Ok(());
    }

    let credentials = super::prompt_if_missing(credentials, "Path to service account key file")?;
    let path = std::fs::canonicalize(PathBuf::from(&credentials))?;

    // Fail now rather than on the first run.
    let key = read_key(&path).await?;

    std::fs::write(
        &env_file,
        format!("VIRAL_LENS_CREDENTIALS={}\n", path.display()),
    )?;

    println!("Config saved to {}", env_file.display());
    println!("Service account: {}", key.client_email);
    println!("Data directory: {}", data_dir().display());
    println!("Share the target spreadsheet with this account before running `viral-lens analyze`.");

    Ok(())
}
