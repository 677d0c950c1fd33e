use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use maintcal_sync::{commands, SyncConfig};
use shared_types::CredentialType;
use std::io::BufRead;
use std::path::PathBuf;
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "maintcal", author, version, about, long_about = None)]
struct Args {
    /// Configuration file (defaults to <config dir>/maintcal/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    log_file_path: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Publish maintenance windows from the mailbox to the calendar
    Run {
        /// Only read emails sent on or after this date (YYYY-MM-DD)
        #[arg(long)]
        since: Option<NaiveDate>,
        /// Print the events instead of publishing them
        #[arg(long)]
        dry_run: bool,
    },
    /// Print maintenance windows found in the mailbox as JSON lines
    List {
        #[arg(long)]
        since: Option<NaiveDate>,
    },
    /// Run the pattern rules against a saved .eml file
    Extract {
        #[arg(long, value_name = "PATH")]
        eml: PathBuf,
    },
    /// Report overlapping events on the calendar
    Overlaps,
    /// Print the locally recorded maintenance schedule
    Records,
    /// Read a secret from stdin and store it in the OS keychain
    StoreSecret {
        #[arg(long, value_enum)]
        kind: SecretKind,
        /// IMAP username, or OAuth client id for the calendar
        #[arg(long)]
        username: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SecretKind {
    /// IMAP password
    Imap,
    /// Google Calendar OAuth refresh token
    GoogleCalendar,
}

impl From<SecretKind> for CredentialType {
    fn from(kind: SecretKind) -> Self {
        match kind {
            SecretKind::Imap => CredentialType::Imap,
            SecretKind::GoogleCalendar => CredentialType::GoogleCalendar,
        }
    }
}

fn init_tracing(log_file_path: Option<&str>) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if let Some(log_path) = log_file_path {
        let log_path = std::path::Path::new(log_path);
        let file_appender = tracing_appender::rolling::never(
            log_path.parent().unwrap_or(std::path::Path::new(".")),
            log_path
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("maintcal.log")),
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        std::mem::forget(guard);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file_path.as_deref());

    let (config, config_path) =
        SyncConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    tracing::debug!("Using configuration from {}", config_path.display());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Command::Run { since, dry_run } => {
            let summary = commands::run(&config, since, dry_run, &mut out)
                .context("Maintenance sync failed")?;
            if summary.failed > 0 {
                anyhow::bail!("{} events could not be published", summary.failed);
            }
        }
        Command::List { since } => {
            commands::list(&config, since, &mut out).context("Listing maintenance failed")?;
        }
        Command::Extract { eml } => {
            commands::extract_eml(&config, &eml, &mut out)
                .with_context(|| format!("Extraction from {} failed", eml.display()))?;
        }
        Command::Overlaps => {
            commands::overlaps(&config).context("Overlap report failed")?;
        }
        Command::Records => {
            commands::records(&config, &mut out).context("Reading the schedule failed")?;
        }
        Command::StoreSecret { kind, username } => {
            let mut secret = String::new();
            std::io::stdin()
                .lock()
                .read_line(&mut secret)
                .context("Failed to read secret from stdin")?;
            commands::store_secret(&config, kind.into(), username.as_deref(), &secret)
                .context("Storing secret failed")?;
        }
    }

    Ok(())
}
