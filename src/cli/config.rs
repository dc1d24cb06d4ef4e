//! Config command handlers

use crate::cli::{CliResult, ConfigInitArgs};
use crate::config::EXAMPLE_CONFIG;
use std::fs;

/// Handle `crawlwatch config init` command
pub fn handle_config_init(args: &ConfigInitArgs) -> CliResult<String> {
    if args.output.exists() && !args.force {
        return Err(format!(
            "File already exists: {}. Use --force to overwrite.",
            args.output.display()
        )
        .into());
    }

    fs::write(&args.output, EXAMPLE_CONFIG)?;

    Ok(format!(
        "✓ Configuration file created: {}\n  Edit this file to point crawlwatch at your API.",
        args.output.display()
    ))
}
