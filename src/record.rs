use jiff::Span;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::youtube::Video;

const WATCH_URL_PREFIX: &str = "https://www.youtube.com/watch?v=";
const SHORT_FORM_MAX_SECS: f64 = 60.0;

/// Stands in for the id in errors about entries that carry none.
pub const UNKNOWN_ID: &str = "<unknown>";

/// One row of the exported dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VideoRecord {
    pub title: String,
    pub description: String,
    pub published_at: String,
    pub views: String,
    pub likes: String,
    pub comments: String,
    /// ISO 8601, exactly as returned by the API
    pub duration: String,
    pub is_short_form: bool,
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "VideoID")]
    pub video_id: String,
    #[serde(rename = "ThumbnailURL")]
    pub thumbnail_url: String,
}

impl VideoRecord {
    /// Column labels, in field order.
    pub const FIELD_NAMES: [&'static str; 11] = [
        "Title",
        "Description",
        "PublishedAt",
        "Views",
        "Likes",
        "Comments",
        "Duration",
        "IsShortForm",
        "URL",
        "VideoID",
        "ThumbnailURL",
    ];

    /// Build a record from a `videos.list` item, classifying it on the way.
    pub fn from_video(video: Video) -> Result<Self> {
        let video_id = video.id.clone().ok_or_else(|| Error::MalformedRecord {
            id: UNKNOWN_ID.to_string(),
            field: "id",
        })?;
        let missing = |field| Error::MalformedRecord {
            id: video_id.clone(),
            field,
        };

        let snippet = video.snippet.as_ref().ok_or_else(|| missing("snippet"))?;
        let title = snippet.title.clone().ok_or_else(|| missing("snippet.title"))?;
        let published_at = snippet
            .published_at
            .clone()
            .ok_or_else(|| missing("snippet.publishedAt"))?;
        let thumbnail_url = snippet
            .thumbnails
            .as_ref()
            .and_then(|t| t.high.as_ref())
            .ok_or_else(|| missing("snippet.thumbnails.high"))?
            .url
            .clone()
            .ok_or_else(|| missing("snippet.thumbnails.high.url"))?;
        let duration = video
            .content_details
            .as_ref()
            .and_then(|c| c.duration.clone())
            .ok_or_else(|| missing("contentDetails.duration"))?;

        let stats = video.statistics.clone().unwrap_or_default();
        let url = watch_url(&video_id);
        let is_short_form = is_short_form(parse_duration_secs(&duration)?, &url);

        Ok(Self {
            title,
            description: snippet.description.clone().unwrap_or_default(),
            published_at,
            views: stats.view_count.unwrap_or_else(zero),
            likes: stats.like_count.unwrap_or_else(zero),
            comments: stats.comment_count.unwrap_or_else(zero),
            duration,
            is_short_form,
            url,
            video_id,
            thumbnail_url,
        })
    }
}

fn zero() -> String {
    "0".to_string()
}

pub fn watch_url(video_id: &str) -> String {
    format!("{}{}", WATCH_URL_PREFIX, video_id)
}

/// Short-form means under a minute, or a URL on the shorts path.
pub fn is_short_form(duration_secs: f64, url: &str) -> bool {
    duration_secs < SHORT_FORM_MAX_SECS || url.contains("shorts")
}

/// Total seconds of an ISO 8601 duration such as `PT1H2M3.5S` or `P1DT4M`.
///
/// Years and months have no fixed length and are rejected.
pub fn parse_duration_secs(value: &str) -> Result<f64> {
    let invalid = |reason: String| Error::InvalidDuration {
        value: value.to_string(),
        reason,
    };

    if !value.starts_with(['P', 'p']) {
        return Err(invalid("not an ISO 8601 duration".to_string()));
    }
    let span: Span = value.parse().map_err(|e: jiff::Error| invalid(e.to_string()))?;
    if span.get_years() != 0 || span.get_months() != 0 {
        return Err(invalid("calendar units have no fixed length".to_string()));
    }

    let whole = i64::from(span.get_weeks()) * 7 * 86_400
        + i64::from(span.get_days()) * 86_400
        + i64::from(span.get_hours()) * 3_600
        + span.get_minutes() * 60
        + span.get_seconds();
    let fraction = span.get_milliseconds() as f64 / 1e3
        + span.get_microseconds() as f64 / 1e6
        + span.get_nanoseconds() as f64 / 1e9;

    Ok(whole as f64 + fraction)
}
