use crate::error::{Error, Result};
use crate::youtube::{ChannelLookup, YouTubeApi};

/// Pick the `channels.list` selector for a user-supplied identifier.
///
/// `@handle` is looked up by username with the `@` stripped; anything else is
/// taken as a raw channel id.
pub fn channel_lookup(identifier: &str) -> ChannelLookup<'_> {
    match identifier.strip_prefix('@') {
        Some(handle) => ChannelLookup::Username(handle),
        None => ChannelLookup::Id(identifier),
    }
}

/// Resolve a channel id or `@handle` to its uploads playlist id.
///
/// Issues exactly one `channels.list` call.
pub async fn resolve_uploads_playlist<Y: YouTubeApi>(youtube: &Y, identifier: &str) -> Result<String> {
    let identifier = identifier.trim();
    if identifier.is_empty() || identifier == "@" {
        return Err(Error::ChannelNotFound(identifier.to_string()));
    }

    let response = youtube.list_channels(channel_lookup(identifier)).await?;
    let channel = response
        .items
        .into_iter()
        .next()
        .ok_or_else(|| Error::ChannelNotFound(identifier.to_string()))?;

    let uploads = channel
        .content_details
        .and_then(|c| c.related_playlists.uploads)
        .ok_or(Error::MalformedRecord {
            id: channel.id,
            field: "contentDetails.relatedPlaylists.uploads",
        })?;

    tracing::info!(channel = identifier, playlist = %uploads, "resolved uploads playlist");
    Ok(uploads)
}
