use crate::auth::{RUN_SCOPES, authenticate};
use crate::collector::CollectOptions;
use crate::config::{
    credentials_path, http_timeout, sheets_api_base_url, validate_config, youtube_api_base_url,
};
use crate::error::Result;
use crate::google::http_client;
use crate::pipeline::{self, AnalysisRequest};
use crate::record::VideoRecord;
use crate::sheets::SheetsClient;
use crate::youtube::YouTubeClient;

const TITLE_WIDTH: usize = 48;

pub async fn run(
    channel: Option<String>,
    spreadsheet: Option<String>,
    options: CollectOptions,
    json: bool,
) -> Result<()> {
    let channel = super::prompt_if_missing(channel, "Channel ID or @handle")?;
    let spreadsheet = super::prompt_if_missing(spreadsheet, "Google Spreadsheet URL")?;
    options.validate()?;
    validate_config()?;

    let client = http_client(http_timeout()?)?;
    let token = authenticate(&credentials_path(), &RUN_SCOPES).await?;
    let youtube = YouTubeClient::new(client.clone(), youtube_api_base_url(), token.clone());
    let sheets = SheetsClient::new(client, sheets_api_base_url(), token);

    eprintln!("Analyzing {}...", channel);
    let request = AnalysisRequest {
        channel,
        spreadsheet,
        options,
    };
    let outcome = pipeline::run(&youtube, &sheets, &request).await?;
    let records = &outcome.collection.records;

    if json {
        println!("{}", serde_json::to_string_pretty(records)?);
        return Ok(());
    }

    let shorts = records.iter().filter(|r| r.is_short_form).count();
    println!("Analysis complete!\n");
    println!(
        "Wrote {} video(s) ({} short-form) to spreadsheet {}\n",
        records.len(),
        shorts,
        outcome.spreadsheet.id()
    );
    print!("{}", format_table(records));

    Ok(())
}

fn format_table(records: &[VideoRecord]) -> String {
    let mut out = format!(
        "{:<4} {:<10} {:>12} {:>9} {:>8} {:<10} {:<5} {}\n",
        "#", "Published", "Views", "Likes", "Comments", "Duration", "Short", "Title"
    );
    for (i, r) in records.iter().enumerate() {
        out.push_str(&format!(
            "{:<4} {:<10} {:>12} {:>9} {:>8} {:<10} {:<5} {}\n",
            i + 1,
            r.published_at.get(..10).unwrap_or(r.published_at.as_str()),
            r.views,
            r.likes,
            r.comments,
            r.duration,
            if r.is_short_form { "yes" } else { "no" },
            truncate(&r.title, TITLE_WIDTH)
        ));
    }
    out
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width - 1).collect();
    cut.push('…');
    cut
}
