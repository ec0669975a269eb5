use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use reqwest::Client;
use sheetwatch::{
    config::Config,
    fetch::HttpCsvSource,
    poll::{spawn_command_reader, Command, Poller, Watcher, COMMAND_HELP},
    present::ConsolePresenter,
    session::SessionStore,
    sync::Syncer,
};
use std::{env, io::BufReader, path::PathBuf};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Watch a published spreadsheet CSV for new orders.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path (optional; defaults apply when missing)
    #[arg(short, long, default_value = "sheetwatch.yaml")]
    config: PathBuf,

    /// Log level, used when RUST_LOG is not set (falls back to LOG_LEVEL)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Poll on a timer and accept commands on stdin (default)
    Watch,
    /// Poll once, print the tables and exit
    Once,
    /// Poll once and push the data to the CRM webhook
    Sync {
        /// Webhook URL; the saved one is used when omitted
        #[arg(long)]
        url: Option<String>,
    },
    /// Open the dashboard session
    Login,
    /// Close the dashboard session
    Logout,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // ─── 1) init logging ─────────────────────────────────────────────
    let log_level = args
        .log_level
        .clone()
        .or_else(|| env::var("LOG_LEVEL").ok())
        .unwrap_or_else(|| "info".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level));
    fmt().with_env_filter(filter).with_target(false).init();
    info!(version = env!("CARGO_PKG_VERSION"), "startup");

    // ─── 2) config + session ─────────────────────────────────────────
    let cfg = Config::load(&args.config)?;
    let mut store = SessionStore::open(&cfg.session_path)?;

    let command = args.command.unwrap_or(Cmd::Watch);
    match command {
        Cmd::Login => {
            store.log_in()?;
            println!("logged in ({})", store.path().display());
            return Ok(());
        }
        Cmd::Logout => {
            store.log_out()?;
            println!("logged out");
            return Ok(());
        }
        _ => {}
    }
    if !store.is_logged_in() {
        bail!("not logged in; run `sheetwatch login` first");
    }

    // ─── 3) wire up poller, presenter, syncer ────────────────────────
    let client = Client::builder()
        .timeout(cfg.request_timeout())
        .build()
        .context("building HTTP client")?;
    let source = HttpCsvSource::new(client.clone(), cfg.sheet_url()?);
    info!(url = %source.url(), "data source");

    let syncer = Syncer::new(client, store, cfg.sync_source.clone());
    let mut watcher =
        Watcher::new(Poller::new(source), ConsolePresenter::stdout()).with_syncer(syncer);

    match command {
        Cmd::Once => {
            if !watcher.refresh().await {
                warn!("no data this time");
            }
        }
        Cmd::Sync { url } => {
            if !watcher.refresh().await {
                warn!("no data fetched; syncing empty tables");
            }
            let _ = watcher.handle(Command::Sync { url }).await;
        }
        _ => {
            let (tx, rx) = mpsc::channel::<Command>(16);
            spawn_command_reader(BufReader::new(std::io::stdin()), tx.clone())
                .context("starting stdin reader")?;
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    let _ = tx.send(Command::Shutdown).await;
                }
            });

            println!("{}", COMMAND_HELP);
            watcher.run(cfg.poll_interval(), rx).await;
        }
    }

    info!("all done");
    Ok(())
}
