use auto_rename::config::ConfigOverrides;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "auto-rename")]
#[command(about = "Rename files to unique identifiers and keep an audit log", long_about = None)]
pub struct Cli {
    /// Directory containing files to rename (also DIR)
    #[arg(long, global = true)]
    pub dir: Option<String>,

    /// Preview renames without touching any file (also DRY_RUN)
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Only rename direct children of the directory (also RECURSIVE=false)
    #[arg(long, global = true)]
    pub no_recursive: bool,

    /// SQLite audit store path (also DB_PATH)
    #[arg(long = "db", global = true)]
    pub db_path: Option<String>,

    /// Seconds between scheduled scans (also CRON_INTERVAL)
    #[arg(long, global = true)]
    pub interval: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Rename eligible files once, then keep scanning if CRON is set
    Rename,
    /// Rename once, then rescan the directory every interval
    Watch,
    /// List audit records, newest first
    Records {
        /// Only records whose original name contains this text
        #[arg(long, conflicts_with = "new_name")]
        filter: Option<String>,
        /// Show the attempt that produced this generated name
        #[arg(long)]
        new_name: Option<String>,
        /// 1-based page number
        #[arg(long)]
        page: Option<u32>,
        /// Records per page; all records when omitted
        #[arg(long)]
        page_size: Option<u32>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show aggregate audit counts
    Stats {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Write every audit record to a CSV file
    Export {
        #[arg(long, short)]
        output: PathBuf,
    },
    /// Print configuration values
    PrintConfig,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            watched_directory: self.dir.clone(),
            dry_run: self.dry_run.then_some(true),
            recursive: self.no_recursive.then_some(false),
            scheduling_enabled: matches!(self.command, Some(Commands::Watch)).then_some(true),
            scheduling_interval_seconds: self.interval,
            audit_store_path: self.db_path.clone(),
        }
    }
}
