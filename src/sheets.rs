//! Google Sheets v4 output: replaces the first worksheet with the dataset.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::auth::AccessToken;
use crate::error::{Error, Result};
use crate::google::ensure_success;
use crate::record::VideoRecord;

static SHEET_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://docs\.google\.com/spreadsheets/d/([A-Za-z0-9_-]+)").expect("valid regex")
});
static SHEET_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{20,}$").expect("valid regex"));

/// A spreadsheet identified by its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpreadsheetRef {
    id: String,
}

impl SpreadsheetRef {
    /// Accepts a sharing/edit URL (`https://docs.google.com/spreadsheets/d/<id>/edit#gid=0`)
    /// or a bare spreadsheet id.
    pub fn parse(location: &str) -> Result<Self> {
        let location = location.trim();
        if let Some(caps) = SHEET_URL_RE.captures(location) {
            return Ok(Self {
                id: caps[1].to_string(),
            });
        }
        if SHEET_ID_RE.is_match(location) {
            return Ok(Self {
                id: location.to_string(),
            });
        }
        Err(Error::InvalidSpreadsheet(location.to_string()))
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Header row followed by one row per record, in record order.
pub fn dataset_rows(records: &[VideoRecord]) -> Vec<Vec<Value>> {
    let header: Vec<Value> = VideoRecord::FIELD_NAMES.iter().map(|name| json!(name)).collect();
    let mut rows = Vec::with_capacity(records.len() + 1);
    rows.push(header);
    rows.extend(records.iter().map(|r| {
        vec![
            json!(r.title),
            json!(r.description),
            json!(r.published_at),
            json!(r.views),
            json!(r.likes),
            json!(r.comments),
            json!(r.duration),
            json!(r.is_short_form),
            json!(r.url),
            json!(r.video_id),
            json!(r.thumbnail_url),
        ]
    }));
    rows
}

/// A1 notation for a whole worksheet, quoting the title.
fn sheet_range(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

/// Destination for the finished dataset.
#[allow(async_fn_in_trait)]
pub trait SheetWriter {
    /// Clear the first worksheet, then write `rows` starting at A1.
    async fn replace_first_worksheet(
        &self,
        spreadsheet: &SpreadsheetRef,
        rows: Vec<Vec<Value>>,
    ) -> Result<()>;
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetMeta>,
}

#[derive(Debug, Deserialize)]
struct SheetMeta {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
    #[serde(default)]
    index: u32,
}

impl SpreadsheetMeta {
    fn first_sheet_title(self) -> Option<String> {
        self.sheets
            .into_iter()
            .min_by_key(|s| s.properties.index)
            .map(|s| s.properties.title)
    }
}

/// Authenticated HTTP implementation of [`SheetWriter`].
#[derive(Debug, Clone)]
pub struct SheetsClient {
    client: Client,
    base_url: String,
    token: AccessToken,
}

impl SheetsClient {
    pub fn new(client: Client, base_url: impl Into<String>, token: AccessToken) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            token,
        }
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| Error::Config(format!("invalid Sheets API URL {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("invalid Sheets API URL {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn first_sheet_title(&self, spreadsheet: &SpreadsheetRef) -> Result<String> {
        let response = self
            .client
            .get(self.url(&["spreadsheets", spreadsheet.id()])?)
            .bearer_auth(self.token.secret())
            .query(&[("fields", "sheets.properties(title,index)")])
            .send()
            .await?;
        let meta: SpreadsheetMeta = ensure_success("spreadsheets.get", response).await?.json().await?;
        meta.first_sheet_title().ok_or_else(|| {
            Error::InvalidSpreadsheet(format!("{} has no worksheets", spreadsheet.id()))
        })
    }
}

impl SheetWriter for SheetsClient {
    async fn replace_first_worksheet(
        &self,
        spreadsheet: &SpreadsheetRef,
        rows: Vec<Vec<Value>>,
    ) -> Result<()> {
        let title = self.first_sheet_title(spreadsheet).await?;
        let whole_sheet = sheet_range(&title);

        let clear = self
            .client
            .post(self.url(&[
                "spreadsheets",
                spreadsheet.id(),
                "values",
                &format!("{}:clear", whole_sheet),
            ])?)
            .bearer_auth(self.token.secret())
            .json(&json!({}))
            .send()
            .await?;
        ensure_success("values.clear", clear).await?;
        tracing::debug!(sheet = %title, "cleared worksheet");

        let origin = format!("{}!A1", whole_sheet);
        let row_count = rows.len();
        let update = self
            .client
            .put(self.url(&["spreadsheets", spreadsheet.id(), "values", &origin])?)
            .bearer_auth(self.token.secret())
            .query(&[("valueInputOption", "USER_ENTERED")])
            .json(&json!({
                "range": origin,
                "majorDimension": "ROWS",
                "values": rows,
            }))
            .send()
            .await?;
        ensure_success("values.update", update).await?;

        tracing::info!(spreadsheet = spreadsheet.id(), sheet = %title, rows = row_count, "wrote worksheet");
        Ok(())
    }
}
