//! Status command implementation

use crate::cli::output::format_status_report;
use crate::cli::{CliResult, StatusArgs};
use crate::client::CrawlApiClient;

/// Handle `crawlwatch status` command
pub async fn handle_status(args: &StatusArgs, client: &CrawlApiClient) -> CliResult<String> {
    let status = client.get_run_status(&args.run_id).await?;

    if args.json {
        Ok(serde_json::to_string_pretty(&status)?)
    } else {
        Ok(format_status_report(&status))
    }
}
