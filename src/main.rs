//! # Rekindle
//!
//! Recurring WhatsApp check-ins: pick a contact, a language, a cadence, a
//! daily delivery window, and a message intent; Rekindle fires a templated
//! message inside that window on every cadence period.
//!
//! Usage:
//!   rekindle schedule --phone 15551234567 --cadence-days 1 --window-start 8
//!   rekindle schedule --phone 15551234567 --language french --intent miss_you --dry-run
//!   rekindle cancel --phone 15551234567
//!   rekindle run

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rekindle_channels::{ConsoleSink, WhatsAppSink};
use rekindle_core::{FireHandler, Language, MessageIntent, RekindleConfig, ScheduleSpec};
use rekindle_scheduler::{JobTable, MessageWorker, ScheduleRegistrar, TokioJobRunner};

#[derive(Parser)]
#[command(name = "rekindle", version, about = "💌 Rekindle — recurring check-in messages")]
struct Cli {
    /// Config file path
    #[arg(long, default_value = "~/.rekindle/config.toml")]
    config: String,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Register (or replace) a contact's recurring delivery, then keep running.
    Schedule {
        /// Phone number; separators and a leading + are stripped
        #[arg(long)]
        phone: String,

        /// Display name (label only)
        #[arg(long)]
        name: Option<String>,

        /// english | arabic | french
        #[arg(long, default_value = "english")]
        language: String,

        /// Repeat interval in days (1, 2, 3 and 7 are the usual choices)
        #[arg(long, default_value = "1")]
        cadence_days: u32,

        /// Delivery window start hour, 24h clock
        #[arg(long, default_value = "8")]
        window_start: u32,

        /// Delivery window end hour (defaults to start + 1)
        #[arg(long)]
        window_end: Option<u32>,

        /// morning | night | miss_you
        #[arg(long, default_value = "morning")]
        intent: String,

        /// Log messages instead of sending via WhatsApp
        #[arg(long)]
        dry_run: bool,
    },
    /// Cancel a contact's recurring delivery.
    Cancel {
        #[arg(long)]
        phone: String,
    },
    /// Rearm persisted registrations and run until interrupted.
    Run {
        /// Log messages instead of sending via WhatsApp
        #[arg(long)]
        dry_run: bool,
    },
}

fn parse_language(s: &str) -> Result<Language> {
    match s.to_ascii_lowercase().as_str() {
        "english" | "en" => Ok(Language::English),
        "arabic" | "ar" => Ok(Language::Arabic),
        "french" | "fr" => Ok(Language::French),
        other => bail!("unknown language '{other}' (english | arabic | french)"),
    }
}

fn parse_intent(s: &str) -> Result<MessageIntent> {
    match s.to_ascii_lowercase().as_str() {
        "morning" => Ok(MessageIntent::Morning),
        "night" => Ok(MessageIntent::Night),
        "miss_you" | "missyou" | "miss-you" => Ok(MessageIntent::MissYou),
        other => bail!("unknown intent '{other}' (morning | night | miss_you)"),
    }
}

/// Strip the separators users type into phone numbers; validation of what
/// remains happens in `ScheduleSpec`.
fn normalize_phone(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '+' | ' ' | '-' | '(' | ')' | '.'))
        .collect()
}

fn build_handler(config: &RekindleConfig, dry_run: bool) -> Result<Arc<dyn FireHandler>> {
    if dry_run {
        Ok(Arc::new(MessageWorker::new(ConsoleSink)))
    } else {
        let sink = WhatsAppSink::new(config.whatsapp.clone())
            .context("whatsapp credentials missing; use --dry-run to test without them")?;
        Ok(Arc::new(MessageWorker::new(sink)))
    }
}

fn open_table(config: &RekindleConfig) -> Result<JobTable> {
    let db_path = PathBuf::from(shellexpand::tilde(&config.scheduler.db_path).to_string());
    Ok(JobTable::open(&db_path)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "rekindle=debug"
    } else {
        "rekindle=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let config_path = PathBuf::from(shellexpand::tilde(&cli.config).to_string());
    let config = RekindleConfig::load(&config_path)?;

    match cli.command {
        Command::Schedule {
            phone,
            name,
            language,
            cadence_days,
            window_start,
            window_end,
            intent,
            dry_run,
        } => {
            let spec = ScheduleSpec::new(
                normalize_phone(&phone),
                name,
                parse_language(&language)?,
                cadence_days,
                window_start,
                window_end.unwrap_or(window_start + 1),
                parse_intent(&intent)?,
            )?;

            let runner = TokioJobRunner::with_table(
                build_handler(&config, dry_run)?,
                open_table(&config)?,
            );
            runner.rearm().await?;
            ScheduleRegistrar::register(&spec, &runner).await?;

            tracing::info!(
                contact = %spec.contact_id,
                "scheduled — running until Ctrl-C"
            );
            tokio::signal::ctrl_c().await?;
        }
        Command::Cancel { phone } => {
            let runner =
                TokioJobRunner::with_table(build_handler(&config, true)?, open_table(&config)?);
            let contact_id = normalize_phone(&phone);
            ScheduleRegistrar::cancel(&contact_id, &runner).await?;
            tracing::info!(contact = %contact_id, "cancelled");
        }
        Command::Run { dry_run } => {
            let runner = TokioJobRunner::with_table(
                build_handler(&config, dry_run)?,
                open_table(&config)?,
            );
            let rearmed = runner.rearm().await?;
            tracing::info!(jobs = rearmed, "rearmed — running until Ctrl-C");
            tokio::signal::ctrl_c().await?;
        }
    }

    Ok(())
}
