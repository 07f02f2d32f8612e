//! Herald — relays Jenkins build starts and finishes to per-user Telegram
//! conversations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use tokio_util::sync::CancellationToken;

use herald::channel::{telegram::TelegramChannel, ChatChannel};
use herald::config::HeraldConfig;
use herald::directory::ConversationDirectory;
use herald::dispatch::Dispatcher;
use herald::jenkins::JenkinsClient;
use herald::poller::Poller;

/// Herald — Jenkins build notifications in your chat.
#[derive(Parser)]
#[command(name = "herald", version, about)]
struct Cli {
    /// Working directory (defaults to current directory).
    #[arg(short = 'C', long, global = true)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a sample config to .herald/config.toml.
    Init,

    /// Poll Jenkins and relay build notifications.
    Run {
        /// Single poll cycle, then exit.
        #[arg(long)]
        once: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let cwd = match &cli.dir {
        Some(d) => d.clone(),
        None => std::env::current_dir().wrap_err("failed to get current directory")?,
    };

    match cli.command {
        Command::Init => cmd_init(&cwd),
        Command::Run { once } => cmd_run(&cwd, once).await,
    }
}

/// Write the sample config.
fn cmd_init(cwd: &Path) -> Result<()> {
    let path = HeraldConfig::write_sample(cwd)?;
    println!("Config written: {}", path.display());
    println!("Fill in the Jenkins credentials, the Telegram bot token, and the [recipients] table.");
    Ok(())
}

/// Build the pipeline and run the poll loop (or one cycle with --once).
async fn cmd_run(cwd: &Path, once: bool) -> Result<()> {
    let config = HeraldConfig::load(cwd)?;

    let channel = Arc::new(TelegramChannel::new(config.telegram.bot_token.clone()));
    let conversations = channel
        .list_conversations()
        .await
        .wrap_err("failed to list Telegram conversations")?;

    eprintln!("[herald] Conversations:");
    let directory = ConversationDirectory::link(&config.recipients, &conversations);
    if directory.is_empty() {
        eprintln!(
            "[herald] no recipients linked — notifications will be dropped until a \
             configured recipient messages the bot"
        );
    }

    let ci = Arc::new(JenkinsClient::new(config.jenkins.clone()));
    let dispatcher = Dispatcher::new(channel, directory);
    let mut poller = Poller::new(ci, dispatcher);

    if once {
        for send in poller.cycle().await {
            let _ = send.await;
        }
        return Ok(());
    }

    // Shutdown on ctrl-c / SIGTERM.
    let cancel = CancellationToken::new();
    let shutdown_cancel = cancel.clone();
    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();
        #[cfg(unix)]
        {
            let mut sigterm =
                tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                    .expect("failed to install SIGTERM handler");
            tokio::select! {
                _ = ctrl_c => {}
                _ = sigterm.recv() => {}
            }
        }
        #[cfg(not(unix))]
        {
            let _ = ctrl_c.await;
        }
        eprintln!("\n[herald] Shutdown signal received");
        shutdown_cancel.cancel();
    });

    eprintln!(
        "[herald] polling {} every {}s",
        config.jenkins.base_url, config.poll_interval_secs
    );
    poller.run(config.poll_interval(), cancel).await;

    Ok(())
}
