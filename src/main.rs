use clap::Parser;
use crawlwatch::cli::{
    cancel, handle_completions, handle_config_init, load_config_with_overrides, start, status,
    watch, Cli, CliResult, Commands, ConfigCommands,
};
use crawlwatch::client::CrawlApiClient;
use crawlwatch::config::CrawlwatchConfig;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Config(ConfigCommands::Init(args)) => {
            handle_config_init(&args).map(|msg| {
                println!("{}", msg);
                0
            })
        }
        Commands::Completions(args) => {
            handle_completions(&args);
            Ok(0)
        }
        command => match load_config_with_overrides(&cli.global) {
            Ok(config) => run_api_command(command, config).await,
            Err(e) => Err(e),
        },
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Commands that talk to the crawl API.
async fn run_api_command(command: Commands, config: CrawlwatchConfig) -> CliResult<i32> {
    if let Err(e) = crawlwatch::logging::init_tracing(&config.logging) {
        eprintln!("Warning: failed to initialize logging: {}", e);
    }
    tracing::debug!(?config, "Loaded configuration");

    let client = Arc::new(CrawlApiClient::new(&config.api)?);

    match command {
        Commands::Watch(args) => {
            let finished =
                watch::watch_run(client, &config.poller, &args.run_id, args.json).await?;
            Ok(watch::exit_code(&finished))
        }
        Commands::Status(args) => {
            println!("{}", status::handle_status(&args, &client).await?);
            Ok(0)
        }
        Commands::Cancel(args) => {
            println!("{}", cancel::handle_cancel(&args, &client).await?);
            Ok(0)
        }
        Commands::Start(args) => {
            let started = start::handle_start(&args, &client).await?;
            println!("✓ Started crawl run {}", started.run_id);
            if args.watch {
                let finished =
                    watch::watch_run(client, &config.poller, &started.run_id, false).await?;
                Ok(watch::exit_code(&finished))
            } else {
                Ok(0)
            }
        }
        Commands::Config(_) | Commands::Completions(_) => Ok(0),
    }
}
