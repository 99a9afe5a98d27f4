//! One analysis run: resolve, collect, write.

use crate::collector::{CollectOptions, Collection, collect};
use crate::error::Result;
use crate::resolver::resolve_uploads_playlist;
use crate::sheets::{SheetWriter, SpreadsheetRef, dataset_rows};
use crate::youtube::YouTubeApi;

/// The operator's inputs for a run.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// Channel id or `@handle`.
    pub channel: String,
    /// Spreadsheet URL or id.
    pub spreadsheet: String,
    pub options: CollectOptions,
}

impl AnalysisRequest {
    pub fn new(channel: impl Into<String>, spreadsheet: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            spreadsheet: spreadsheet.into(),
            options: CollectOptions::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub playlist_id: String,
    pub spreadsheet: SpreadsheetRef,
    pub collection: Collection,
}

/// Run the whole pipeline. The sheet is only touched once every record is in hand.
pub async fn run<Y, S>(youtube: &Y, sheet: &S, request: &AnalysisRequest) -> Result<AnalysisOutcome>
where
    Y: YouTubeApi,
    S: SheetWriter,
{
    let spreadsheet = SpreadsheetRef::parse(&request.spreadsheet)?;
    request.options.validate()?;

    let playlist_id = resolve_uploads_playlist(youtube, &request.channel).await?;
    let collection = collect(youtube, &playlist_id, request.options).await?;

    sheet
        .replace_first_worksheet(&spreadsheet, dataset_rows(&collection.records))
        .await?;

    Ok(AnalysisOutcome {
        playlist_id,
        spreadsheet,
        collection,
    })
}
