//! Cancel command implementation

use crate::cli::{CancelArgs, CliResult};
use crate::client::CrawlApiClient;

/// Handle `crawlwatch cancel` command
pub async fn handle_cancel(args: &CancelArgs, client: &CrawlApiClient) -> CliResult<String> {
    let job_id = client.cancel_job(&args.run_id).await?;
    Ok(format!("✓ Cancellation requested for job {}", job_id))
}
