//! Walks an uploads playlist page by page and turns each page into records.

use crate::error::{Error, Result};
use crate::record::{UNKNOWN_ID, VideoRecord};
use crate::youtube::{MAX_PAGE_SIZE, YouTubeApi};

pub const DEFAULT_LIMIT: usize = 1000;
pub const DEFAULT_PAGE_SIZE: u32 = MAX_PAGE_SIZE;

/// Bounds for one collection run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectOptions {
    /// Maximum number of records returned.
    pub limit: usize,
    /// `maxResults` for each playlist page, `1..=50`.
    pub page_size: u32,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl CollectOptions {
    pub fn validate(&self) -> Result<()> {
        if self.limit == 0 {
            return Err(Error::Config("limit must be at least 1".to_string()));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(Error::Config(format!(
                "page size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, self.page_size
            )));
        }
        Ok(())
    }
}

/// Why the paging loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The accumulator reached the limit.
    LimitReached,
    /// A page came back without a next-page cursor.
    Exhausted,
}

/// Records in playlist order plus bookkeeping about how they were fetched.
#[derive(Debug, Clone)]
pub struct Collection {
    pub records: Vec<VideoRecord>,
    pub pages: usize,
    pub termination: Termination,
}

/// Collect up to `options.limit` records from `playlist_id`.
///
/// Each playlist page costs one `playlistItems.list` and one batched
/// `videos.list` call. Any failure aborts the whole collection.
pub async fn collect<Y: YouTubeApi>(
    youtube: &Y,
    playlist_id: &str,
    options: CollectOptions,
) -> Result<Collection> {
    options.validate()?;

    let mut records: Vec<VideoRecord> = Vec::new();
    let mut page_token: Option<String> = None;
    let mut pages = 0;

    let termination = loop {
        let page = youtube
            .list_playlist_items(playlist_id, page_token.as_deref(), options.page_size)
            .await?;
        pages += 1;

        let ids = page
            .items
            .iter()
            .map(|item| {
                item.video_id().map(str::to_string).ok_or_else(|| Error::MalformedRecord {
                    id: item.id.clone().unwrap_or_else(|| UNKNOWN_ID.to_string()),
                    field: "contentDetails.videoId",
                })
            })
            .collect::<Result<Vec<_>>>()?;

        if !ids.is_empty() {
            let details = youtube.list_videos(&ids).await?;
            for video in details.items {
                records.push(VideoRecord::from_video(video)?);
            }
        }
        tracing::debug!(page = pages, ids = ids.len(), total = records.len(), "collected page");

        if records.len() >= options.limit {
            break Termination::LimitReached;
        }
        match page.next_page_token {
            Some(next) => page_token = Some(next),
            None => break Termination::Exhausted,
        }
    };

    records.truncate(options.limit);
    tracing::info!(
        playlist = playlist_id,
        records = records.len(),
        pages,
        ?termination,
        "collection finished"
    );

    Ok(Collection {
        records,
        pages,
        termination,
    })
}
