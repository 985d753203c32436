//! ntdemo
//!
//! Hosts the standard record database in-process and runs one
//! write/read/verify pass per requested channel.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ntverify::nt::standard_database;
use ntverify::{Client, DemoConfig, Dispatcher, InMemoryRecordService, Registry};

#[derive(Debug, Parser)]
#[command(name = "ntdemo", version, about = "Round-trip verification of normative type records")]
struct Args {
    /// Print before/after transcripts and enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON file overriding the aggregate and auxiliary channel names
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// List the hosted records and exit
    #[arg(long)]
    list: bool,

    /// Channels to exercise (default: every hosted record)
    channels: Vec<String>,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<bool> {
    let config = match &args.config {
        Some(path) => DemoConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DemoConfig::default(),
    };

    let service = Arc::new(InMemoryRecordService::with_standard_database());
    let client = Client::new(service);

    if args.list {
        for name in client.record_names() {
            println!("{name}");
        }
        return Ok(true);
    }

    let dispatcher = Dispatcher::new(client, Registry::standard(), &config);
    let channels = if args.channels.is_empty() {
        standard_database().into_iter().map(|(name, _)| name).collect()
    } else {
        args.channels
    };

    let mut all_ok = true;
    for name in &channels {
        let outcome = dispatcher.demo(name, args.verbose);
        print!("{}", outcome.diagnostics);
        println!("{outcome}");
        all_ok &= outcome.success;
    }
    Ok(all_ok)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
