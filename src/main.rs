mod cli;

use anyhow::{bail, Context, Result};
use auto_rename::config::{load_configuration, AppConfig};
use auto_rename::storage::{RecordPage, RecordQuery};
use auto_rename::{AuditStore, RenameEngine, Scheduler};
use clap::Parser;
use cli::output;
use cli::progress::CliReporter;
use cli::{Cli, Commands};
use dotenv::dotenv;
use std::process;
use std::sync::Arc;
use std::thread;
use tracing::{error, info};

fn main() {
    dotenv().ok();

    let args = Cli::parse();

    let guard = cli::logging::init_logger();

    let result = run(args);
    if let Err(err) = &result {
        error!("Error: {:#}", err);
    }

    // process::exit skips destructors, so flush the file log first.
    drop(guard);
    if result.is_err() {
        process::exit(1);
    }
}

fn run(args: Cli) -> Result<()> {
    let config =
        load_configuration(&args.overrides()).context("Error loading configuration")?;

    match args.command.unwrap_or(Commands::Rename) {
        Commands::Rename if config.scheduling_enabled => run_watch(&config),
        Commands::Rename => run_rename(&config),
        Commands::Watch => run_watch(&config),
        Commands::Records {
            filter,
            new_name,
            page,
            page_size,
            json,
        } => {
            let store = open_store(&config)?;
            let records = match new_name {
                Some(name) => {
                    let found = store
                        .find_by_new_name(&name)
                        .context("Failed to look up record")?;
                    RecordPage::single(found)
                }
                None => {
                    let query = RecordQuery {
                        filter,
                        page,
                        page_size,
                    };
                    store.list(&query).context("Failed to list records")?
                }
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                output::print_records(&records);
            }
            Ok(())
        }
        Commands::Stats { json } => {
            let store = open_store(&config)?;
            let stats = store.stats().context("Failed to compute stats")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                output::print_stats(&stats);
            }
            Ok(())
        }
        Commands::Export { output: path } => {
            let store = open_store(&config)?;
            let page = store
                .list(&RecordQuery::all())
                .context("Failed to list records")?;
            let written = output::export_csv(&page.records, &path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Exported {} records to {}", written, path.display());
            Ok(())
        }
        Commands::PrintConfig => {
            println!("Configuration: {:#?}", config);
            Ok(())
        }
    }
}

fn open_store(config: &AppConfig) -> Result<AuditStore> {
    AuditStore::open(&config.audit_store_path)
        .with_context(|| format!("Failed to open audit store {}", config.audit_store_path))
}

fn run_rename(config: &AppConfig) -> Result<()> {
    config.validate()?;
    let store = Arc::new(open_store(config)?);
    let engine = RenameEngine::from_config(config, store);

    let outcome = engine.scan(&CliReporter::new())?;
    output::print_outcome(&outcome, config.dry_run);
    Ok(())
}

fn run_watch(config: &AppConfig) -> Result<()> {
    config.validate()?;
    let store = Arc::new(open_store(config)?);
    let engine = Arc::new(RenameEngine::from_config(config, store));

    let outcome = engine.scan(&CliReporter::new())?;
    output::print_outcome(&outcome, config.dry_run);

    info!(
        "Scheduled mode enabled: scanning {} every {}s",
        config.watched_directory, config.scheduling_interval_seconds
    );
    let scheduler = Scheduler::new(Arc::clone(&engine), config.interval());
    let (status, worker) = scheduler
        .start()
        .context("Failed to start scheduler thread")?;

    loop {
        thread::sleep(config.interval());
        if worker.is_finished() {
            bail!("scheduler thread stopped unexpectedly");
        }
        info!("Scheduler status: {}", output::status_line(&status.snapshot()));
    }
}
