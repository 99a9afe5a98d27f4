//! YouTube Data API v3: the three read operations a run consumes.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::auth::AccessToken;
use crate::error::Result;
use crate::google::ensure_success;

/// Upper bound the API accepts for `maxResults` on list calls.
pub const MAX_PAGE_SIZE: u32 = 50;

/// How `channels.list` selects the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLookup<'a> {
    /// `id=<channel id>`
    Id(&'a str),
    /// `forUsername=<name>`
    Username(&'a str),
}

/// Response structure for the `channels.list` API call.
///
/// See: <https://developers.google.com/youtube/v3/docs/channels/list>
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ChannelListResponse {
    /// Absent when nothing matched.
    #[serde(default)]
    pub items: Vec<Channel>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: String,
    pub content_details: Option<ChannelContentDetails>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelContentDetails {
    pub related_playlists: RelatedPlaylists,
}

/// Platform-managed playlists belonging to a channel.
#[derive(Debug, Serialize, Deserialize)]
pub struct RelatedPlaylists {
    /// Every public upload, newest first.
    pub uploads: Option<String>,
}

/// Response structure for the `playlistItems.list` API call.
///
/// See: <https://developers.google.com/youtube/v3/docs/playlistItems/list>
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemListResponse {
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
    /// Cursor for the following page; absent on the last page.
    pub next_page_token: Option<String>,
}

/// One entry of an uploads playlist.
///
/// Everything is optional so that a short entry fails as a malformed record
/// in the collector rather than as a decode error for the page.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItem {
    /// The playlist item's own id, not the video's.
    pub id: Option<String>,
    pub content_details: Option<PlaylistItemContentDetails>,
}

impl PlaylistItem {
    pub fn video_id(&self) -> Option<&str> {
        self.content_details.as_ref()?.video_id.as_deref()
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemContentDetails {
    pub video_id: Option<String>,
}

/// Response structure for the `videos.list` API call.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos/list>
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<Video>,
}

/// A `video` resource with the `snippet`, `statistics` and `contentDetails` parts.
///
/// Parts are optional here so that a missing one surfaces as a malformed
/// record instead of a decode failure for the whole page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: Option<String>,
    pub snippet: Option<VideoSnippet>,
    pub statistics: Option<VideoStatistics>,
    pub content_details: Option<VideoContentDetails>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    /// ISO 8601 timestamp, kept as text.
    pub published_at: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Thumbnails {
    pub default: Option<Thumbnail>,
    pub medium: Option<Thumbnail>,
    pub high: Option<Thumbnail>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: Option<String>,
}

/// Statistics about the video.
///
/// Counters are strings on the wire and are omitted when the owner hides them.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos#statistics>
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatistics {
    pub view_count: Option<String>,
    pub like_count: Option<String>,
    pub comment_count: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoContentDetails {
    /// ISO 8601 duration such as `PT3M30S`.
    pub duration: Option<String>,
}

/// The read operations the resolver and collector depend on.
#[allow(async_fn_in_trait)]
pub trait YouTubeApi {
    /// `channels.list` with `part=contentDetails`.
    async fn list_channels(&self, lookup: ChannelLookup<'_>) -> Result<ChannelListResponse>;

    /// One page of `playlistItems.list` with `part=contentDetails`.
    async fn list_playlist_items(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
        max_results: u32,
    ) -> Result<PlaylistItemListResponse>;

    /// `videos.list` for a batch of at most [`MAX_PAGE_SIZE`] ids.
    async fn list_videos(&self, ids: &[String]) -> Result<VideoListResponse>;
}

/// Authenticated HTTP implementation of [`YouTubeApi`].
#[derive(Debug, Clone)]
pub struct YouTubeClient {
    client: Client,
    base_url: String,
    token: AccessToken,
}

impl YouTubeClient {
    pub fn new(client: Client, base_url: impl Into<String>, token: AccessToken) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            token,
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        resource: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let response = self
            .client
            .get(format!("{}/{}", self.base_url, resource))
            .bearer_auth(self.token.secret())
            .query(query)
            .send()
            .await?;

        let response = ensure_success(operation, response).await?;
        Ok(response.json().await?)
    }
}

impl YouTubeApi for YouTubeClient {
    async fn list_channels(&self, lookup: ChannelLookup<'_>) -> Result<ChannelListResponse> {
        let selector = match lookup {
            ChannelLookup::Id(id) => ("id", id),
            ChannelLookup::Username(name) => ("forUsername", name),
        };
        tracing::debug!(?lookup, "channels.list");
        self.get(
            "channels.list",
            "channels",
            &[("part", "contentDetails"), selector],
        )
        .await
    }

    async fn list_playlist_items(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
        max_results: u32,
    ) -> Result<PlaylistItemListResponse> {
        let max_results = max_results.min(MAX_PAGE_SIZE).to_string();
        let mut query = vec![
            ("part", "contentDetails"),
            ("playlistId", playlist_id),
            ("maxResults", max_results.as_str()),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }
        tracing::debug!(playlist_id, page_token, "playlistItems.list");
        self.get("playlistItems.list", "playlistItems", &query).await
    }

    async fn list_videos(&self, ids: &[String]) -> Result<VideoListResponse> {
        let joined = ids.join(",");
        tracing::debug!(count = ids.len(), "videos.list");
        self.get(
            "videos.list",
            "videos",
            &[("part", "snippet,statistics,contentDetails"), ("id", joined.as_str())],
        )
        .await
    }
}
