//! Start command implementation

use crate::cli::{CliResult, StartArgs};
use crate::client::{CrawlApiClient, StartCrawlRequest, StartCrawlResponse};
use crate::config::parse_http_url;

/// Handle `crawlwatch start` command
pub async fn handle_start(
    args: &StartArgs,
    client: &CrawlApiClient,
) -> CliResult<StartCrawlResponse> {
    let request = build_request(args)?;
    Ok(client.start_crawl(&request).await?)
}

fn build_request(args: &StartArgs) -> CliResult<StartCrawlRequest> {
    parse_http_url(&args.url)?;
    if args.max_pages == Some(0) {
        return Err("--max-pages must be at least 1".into());
    }

    Ok(StartCrawlRequest {
        website_url: args.url.clone(),
        max_pages: args.max_pages,
    })
}
