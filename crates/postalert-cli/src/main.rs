use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tracing::{error, info, warn, Instrument};

use postalert_core::clock::SystemClock;
use postalert_core::config::SecretsConfig;
use postalert_core::secrets::{require_secret, FileSecretStore, SecretKey};
use postalert_core::PostalertConfig;
use postalert_discord::{Dispatcher, ReqwestTransport, TokioPause};
use postalert_sheets::SheetsClient;

mod run;
mod setup;

/// Alerts a Discord channel about tomorrow's posts that are not ready yet.
#[derive(Parser)]
#[command(name = "postalert", version)]
struct Cli {
    /// Config file. Falls back to $POSTALERT_CONFIG, then ~/.postalert/postalert.toml.
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Check tomorrow's schedule and send alerts (the default).
    Run(RunArgs),
    /// Store a secret once (webhook URL, role ID or Sheets API key).
    Setup(SetupArgs),
}

#[derive(Args, Default)]
struct RunArgs {
    /// Print the alerts instead of posting them.
    #[arg(long)]
    dry_run: bool,
    /// Check this date string instead of tomorrow's (must use the configured pattern).
    #[arg(long)]
    target_date: Option<String>,
}

#[derive(Args)]
struct SetupArgs {
    /// Which secret to store.
    #[arg(value_enum)]
    secret: setup::SetupTarget,
    /// Value to store. Read from stdin when omitted.
    value: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "postalert_cli=info,postalert_core=info,postalert_sheets=info,postalert_discord=info"
                    .into()
            }),
        )
        .init();

    let cli = Cli::parse();
    // explicit flag > POSTALERT_CONFIG env > ~/.postalert/postalert.toml
    let config_path = cli
        .config
        .clone()
        .or_else(|| std::env::var("POSTALERT_CONFIG").ok());

    let result = match cli.command {
        Some(Command::Setup(args)) => run_setup(config_path.as_deref(), args),
        Some(Command::Run(args)) => run_alerts(config_path.as_deref(), args).await,
        None => run_alerts(config_path.as_deref(), RunArgs::default()).await,
    };

    if let Err(ref e) = result {
        error!(error = %e, "postalert aborted");
    }
    result
}

fn run_setup(config_path: Option<&str>, args: SetupArgs) -> anyhow::Result<()> {
    // Setup must work before the rest of the config exists.
    let secrets_config = match PostalertConfig::load(config_path) {
        Ok(config) => config.secrets,
        Err(e) => {
            warn!("Config load failed ({}), using default secrets path", e);
            SecretsConfig::default()
        }
    };

    let key = SecretKey::from(args.secret);
    let value = match args.value {
        Some(v) => v,
        None => setup::prompt_value(key, std::io::stdin().lock())?,
    };

    let mut store = FileSecretStore::open(secrets_config.path())?;
    setup::store_secret(&mut store, key, &value)?;
    println!("Saved {} to {}", key.name(), store.path().display());
    Ok(())
}

async fn run_alerts(config_path: Option<&str>, args: RunArgs) -> anyhow::Result<()> {
    let config = PostalertConfig::load(config_path)?;
    let secrets = FileSecretStore::open(config.secrets.path())?;

    let api_key = require_secret(&secrets, SecretKey::SheetsApiKey)?;
    let store = SheetsClient::new(&config.sheet, api_key);
    let dispatcher = Dispatcher::new(
        Box::new(ReqwestTransport::new()),
        Box::new(TokioPause),
        Duration::from_millis(config.alert.send_delay_ms),
    );

    let alert_run = run::AlertRun {
        config: &config,
        store: &store,
        secrets: &secrets,
        clock: &SystemClock,
        dispatcher: &dispatcher,
    };
    let options = run::RunOptions {
        dry_run: args.dry_run,
        target_date: args.target_date,
    };

    let span = tracing::info_span!("alert_run", run_id = %uuid::Uuid::now_v7());
    let summary = alert_run.execute(&options).instrument(span).await?;

    if options.dry_run {
        for post in &summary.posts {
            println!("{post}\n");
        }
    }
    match summary.report {
        Some(report) if !report.all_ok() => warn!(
            target_date = %summary.target_date,
            sent = report.sent,
            failed = report.failures.len(),
            "run finished with delivery failures"
        ),
        _ => info!(
            target_date = %summary.target_date,
            targets = summary.targets.len(),
            posts = summary.posts.len(),
            "run finished"
        ),
    }
    Ok(())
}
