//! In-memory stand-ins for the Google APIs.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use reqwest::{Client, Url};
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use crate::error::{Error, Result};
use crate::sheets::{SheetWriter, SpreadsheetRef};
use crate::youtube::{
    Channel, ChannelContentDetails, ChannelListResponse, ChannelLookup, PlaylistItem,
    PlaylistItemContentDetails, PlaylistItemListResponse, RelatedPlaylists, Thumbnail, Thumbnails,
    Video, VideoContentDetails, VideoListResponse, VideoSnippet, VideoStatistics, YouTubeApi,
};

/// A fully populated `videos.list` item.
pub fn video(id: &str, duration: &str) -> Video {
    Video {
        id: Some(id.to_string()),
        snippet: Some(VideoSnippet {
            published_at: Some("2024-03-01T09:30:00Z".to_string()),
            title: Some(format!("Video {id}")),
            description: Some(format!("About {id}")),
            thumbnails: Some(Thumbnails {
                high: Some(Thumbnail {
                    url: Some(format!("https://i.ytimg.com/vi/{id}/hqdefault.jpg")),
                }),
                ..Thumbnails::default()
            }),
        }),
        statistics: Some(VideoStatistics {
            view_count: Some("1000".to_string()),
            like_count: Some("100".to_string()),
            comment_count: Some("10".to_string()),
        }),
        content_details: Some(VideoContentDetails {
            duration: Some(duration.to_string()),
        }),
    }
}

/// Every third generated video is under a minute.
fn generated_duration(index: usize) -> &'static str {
    if index % 3 == 0 { "PT45S" } else { "PT3M30S" }
}

#[derive(Default)]
pub struct FakeYouTube {
    /// keyed by channel id or username
    channels: HashMap<String, Option<String>>,
    playlists: HashMap<String, usize>,
    fail_page: Option<usize>,
    no_thumbnail: HashSet<String>,
    channel_requests: Mutex<Vec<(String, String)>>,
    playlist_requests: Mutex<usize>,
    video_batches: Mutex<Vec<usize>>,
}

impl FakeYouTube {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_channel(mut self, key: &str, uploads: &str) -> Self {
        self.channels.insert(key.to_string(), Some(uploads.to_string()));
        self
    }

    pub fn with_channel_without_uploads(mut self, key: &str) -> Self {
        self.channels.insert(key.to_string(), None);
        self
    }

    /// Playlist of `len` videos with ids `<playlist>-v0000`, `<playlist>-v0001`, ...
    pub fn with_playlist(mut self, playlist_id: &str, len: usize) -> Self {
        self.playlists.insert(playlist_id.to_string(), len);
        self
    }

    /// Fail the zero-based `page`th playlist request.
    pub fn fail_playlist_page(mut self, page: usize) -> Self {
        self.fail_page = Some(page);
        self
    }

    pub fn without_high_thumbnail(mut self, video_id: &str) -> Self {
        self.no_thumbnail.insert(video_id.to_string());
        self
    }

    pub fn channel_requests(&self) -> Vec<(String, String)> {
        self.channel_requests.lock().unwrap().clone()
    }

    pub fn playlist_requests(&self) -> usize {
        *self.playlist_requests.lock().unwrap()
    }

    pub fn video_requests(&self) -> usize {
        self.video_batches.lock().unwrap().len()
    }

    pub fn video_batch_sizes(&self) -> Vec<usize> {
        self.video_batches.lock().unwrap().clone()
    }
}

impl YouTubeApi for FakeYouTube {
    async fn list_channels(&self, lookup: ChannelLookup<'_>) -> Result<ChannelListResponse> {
        let (param, key) = match lookup {
            ChannelLookup::Id(id) => ("id", id),
            ChannelLookup::Username(name) => ("forUsername", name),
        };
        self.channel_requests
            .lock()
            .unwrap()
            .push((param.to_string(), key.to_string()));

        let items = match self.channels.get(key) {
            Some(uploads) => vec![Channel {
                id: format!("UC-{key}"),
                content_details: Some(ChannelContentDetails {
                    related_playlists: RelatedPlaylists {
                        uploads: uploads.clone(),
                    },
                }),
            }],
            None => Vec::new(),
        };
        Ok(ChannelListResponse { items })
    }

    async fn list_playlist_items(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
        max_results: u32,
    ) -> Result<PlaylistItemListResponse> {
        let request_index = {
            let mut count = self.playlist_requests.lock().unwrap();
            *count += 1;
            *count - 1
        };
        if self.fail_page == Some(request_index) {
            return Err(Error::Upstream {
                operation: "playlistItems.list",
                status: 503,
                message: "backend unavailable".to_string(),
            });
        }

        let len = *self.playlists.get(playlist_id).ok_or(Error::Upstream {
            operation: "playlistItems.list",
            status: 404,
            message: "playlistNotFound".to_string(),
        })?;
        let start: usize = page_token.map_or(0, |t| t.parse().unwrap());
        let end = (start + max_results as usize).min(len);

        let items = (start..end)
            .map(|i| PlaylistItem {
                id: Some(format!("{playlist_id}-item{i:04}")),
                content_details: Some(PlaylistItemContentDetails {
                    video_id: Some(format!("{playlist_id}-v{i:04}")),
                }),
            })
            .collect();
        let next_page_token = (end < len).then(|| end.to_string());
        Ok(PlaylistItemListResponse {
            items,
            next_page_token,
        })
    }

    async fn list_videos(&self, ids: &[String]) -> Result<VideoListResponse> {
        self.video_batches.lock().unwrap().push(ids.len());

        let items = ids
            .iter()
            .map(|id| {
                let index: usize = id.rsplit("-v").next().unwrap().parse().unwrap();
                let mut v = video(id, generated_duration(index));
                if self.no_thumbnail.contains(id) {
                    v.snippet.as_mut().unwrap().thumbnails = None;
                }
                v
            })
            .collect();
        Ok(VideoListResponse { items })
    }
}

/// One call to [`SheetWriter::replace_first_worksheet`].
#[derive(Debug, Clone)]
pub struct SheetWrite {
    pub spreadsheet_id: String,
    pub rows: Vec<Vec<Value>>,
}

#[derive(Default)]
pub struct RecordingSheet {
    fail: bool,
    writes: Mutex<Vec<SheetWrite>>,
}

impl RecordingSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn writes(&self) -> Vec<SheetWrite> {
        self.writes.lock().unwrap().clone()
    }
}

impl SheetWriter for RecordingSheet {
    async fn replace_first_worksheet(
        &self,
        spreadsheet: &SpreadsheetRef,
        rows: Vec<Vec<Value>>,
    ) -> Result<()> {
        if self.fail {
            return Err(Error::Upstream {
                operation: "values.update",
                status: 403,
                message: "The caller does not have permission".to_string(),
            });
        }
        self.writes.lock().unwrap().push(SheetWrite {
            spreadsheet_id: spreadsheet.id().to_string(),
            rows,
        });
        Ok(())
    }
}

/// A request as it arrived at [`StubServer`].
#[derive(Debug, Clone, Default)]
pub struct ReceivedRequest {
    pub method: String,
    /// Path and query exactly as sent.
    pub target: String,
    pub authorization: Option<String>,
    pub body: String,
}

impl ReceivedRequest {
    fn url(&self) -> Url {
        Url::parse(&format!("http://stub{}", self.target)).unwrap()
    }

    /// Percent-encoded path.
    pub fn path(&self) -> String {
        self.url().path().to_string()
    }

    /// Decoded value of one query parameter.
    pub fn query(&self, name: &str) -> Option<String> {
        self.url()
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }
}

/// Plain HTTP/1.1 server on a loopback port that answers each connection
/// with the next scripted `(status, body)` and records what it was sent.
pub struct StubServer {
    base_url: String,
    requests: Arc<Mutex<Vec<ReceivedRequest>>>,
}

impl StubServer {
    pub async fn start(responses: Vec<(u16, Value)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));

        let log = Arc::clone(&requests);
        tokio::spawn(async move {
            for (status, body) in responses {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                let request = read_request(&mut stream).await;
                log.lock().unwrap().push(request);

                let body = body.to_string();
                let reply = format!(
                    "HTTP/1.1 {status} Stub\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(reply.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        Self { base_url, requests }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn requests(&self) -> Vec<ReceivedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

/// A client that never routes loopback traffic through an environment proxy.
pub fn local_client() -> Client {
    Client::builder().no_proxy().build().unwrap()
}

async fn read_request(stream: &mut TcpStream) -> ReceivedRequest {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];

    let head_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            return ReceivedRequest::default();
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).into_owned();
    let mut lines = head.lines();
    let mut request_line = lines.next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let target = request_line.next().unwrap_or_default().to_string();

    let mut content_length = 0;
    let mut authorization = None;
    for line in lines {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        if name.eq_ignore_ascii_case("content-length") {
            content_length = value.parse().unwrap_or(0);
        } else if name.eq_ignore_ascii_case("authorization") {
            authorization = Some(value.to_string());
        }
    }

    let body_start = head_end + 4;
    while buf.len() < body_start + content_length {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    ReceivedRequest {
        method,
        target,
        authorization,
        body: String::from_utf8_lossy(&buf[body_start..]).into_owned(),
    }
}
