use crate::auth::{YOUTUBE_SCOPE, authenticate};
use crate::config::{credentials_path, http_timeout, validate_config, youtube_api_base_url};
use crate::error::Result;
use crate::google::http_client;
use crate::resolver::resolve_uploads_playlist;
use crate::youtube::YouTubeClient;

pub async fn run(channel: Option<String>) -> Result<()> {
    let channel = super::prompt_if_missing(channel, "Channel ID or @handle")?;
    validate_config()?;

    let client = http_client(http_timeout()?)?;
    let token = authenticate(&credentials_path(), &[YOUTUBE_SCOPE]).await?;
    let youtube = YouTubeClient::new(client, youtube_api_base_url(), token);

    let playlist_id = resolve_uploads_playlist(&youtube, &channel).await?;
    println!("{}", playlist_id);

    Ok(())
}
