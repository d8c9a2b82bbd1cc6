//! Tipos de Cambio CLI
//!
//! Manual connectivity checks against BCCR and Hacienda, plus a one-shot
//! fetch through the full provider policy.
//!
//! Exit codes: 0 success, 1 request or parse failure, 2 missing or invalid
//! configuration.

mod config;

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::{BccrSettings, ConfigError};
use tipos_cambio_client::ReqwestTransport;
use tipos_cambio_service::{RateFetcher, bccr, hacienda};
use tipos_cambio_types::{
    CurrencyCode, DateFormat, FetchError, FetcherConfig, ProviderPolicy, RateRequest,
};

#[derive(Parser)]
#[command(name = "tipos-cambio")]
#[command(author, version, about = "Costa Rica exchange rate diagnostics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check BCCR credentials against the indicator service
    Bccr {
        /// Per-request timeout in seconds
        #[arg(long, default_value_t = 30)]
        timeout: u64,
    },
    /// Check the Hacienda USD and EUR endpoints
    Hacienda {
        /// Per-request timeout in seconds
        #[arg(long, env = "HACIENDA_TIMEOUT", default_value_t = 20)]
        timeout: u64,
    },
    /// Fetch rates through the provider policy and print them as JSON
    Fetch {
        /// Currencies to resolve (comma-separated)
        #[arg(long, value_delimiter = ',', default_value = "USD,EUR")]
        currencies: Vec<String>,
        /// Target date, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Fail on the first currency that cannot be resolved
        #[arg(long)]
        strict: bool,
        /// hacienda-first, bccr-only or hacienda-only
        #[arg(long, default_value_t = ProviderPolicy::default())]
        policy: ProviderPolicy,
        /// Per-request timeout in seconds
        #[arg(long, default_value_t = 20)]
        timeout: u64,
    },
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,tipos_cambio_service=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "Command failed");
            eprintln!("ERROR: {:#}", err);
            ExitCode::from(exit_status(&err))
        }
    }
}

/// 2 for missing or invalid configuration, 1 for anything else.
fn exit_status(err: &anyhow::Error) -> u8 {
    let configuration = err.downcast_ref::<ConfigError>().is_some()
        || matches!(
            err.downcast_ref::<FetchError>(),
            Some(FetchError::Configuration(_))
        );
    if configuration { 2 } else { 1 }
}

fn transport(timeout_secs: u64) -> Result<ReqwestTransport> {
    Ok(ReqwestTransport::new(Duration::from_secs(timeout_secs))?)
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Bccr { timeout } => check_bccr(&transport(timeout)?).await,
        Commands::Hacienda { timeout } => check_hacienda(&transport(timeout)?).await,
        Commands::Fetch {
            currencies,
            date,
            strict,
            policy,
            timeout,
        } => {
            let transport = transport(timeout)?;
            let settings = BccrSettings::from_env()?;
            let mut config = FetcherConfig::new(settings.credentials()).with_policy(policy);
            if strict {
                config = config.strict();
            }
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let request =
                RateRequest::new(date, currencies).with_lookback_days(settings.lookback_days);

            let fetcher = RateFetcher::new(transport, config);
            let rates = fetcher.fetch_rates(&request).await?;
            println!("{}", serde_json::to_string_pretty(&rates)?);
            Ok(())
        }
    }
}

async fn check_bccr(transport: &ReqwestTransport) -> Result<()> {
    let settings = BccrSettings::from_env()?;
    let config = FetcherConfig::new(settings.require_credentials()?);
    let request = RateRequest::new(Local::now().date_naive(), Vec::<String>::new())
        .with_lookback_days(settings.lookback_days);

    let (start, end) = request.window();
    println!(
        "Querying indicator {} for {} - {}...",
        settings.indicator,
        DateFormat::Iso.format(start),
        DateFormat::Iso.format(end)
    );

    let outcome =
        bccr::fetch_indicator_with_attempts(transport, &config, &settings.indicator, &request)
            .await;
    match outcome.result {
        Ok(value) => {
            println!("OK: connection successful. Latest value received: {}", value);
            Ok(())
        }
        Err(err) => {
            for attempt in &outcome.attempts {
                let status = attempt
                    .status
                    .map_or_else(|| "-".to_string(), |s| s.to_string());
                let outcome = match &attempt.outcome {
                    Ok(value) => value.to_string(),
                    Err(msg) => msg.clone(),
                };
                eprintln!(
                    "  {} [{}] {}: {}",
                    attempt.endpoint, attempt.date_format, status, outcome
                );
            }
            Err(err.into())
        }
    }
}

async fn check_hacienda(transport: &ReqwestTransport) -> Result<()> {
    let base_url = FetcherConfig::default().hacienda_base_url;

    for currency in CurrencyCode::all() {
        let url = hacienda::hacienda_url(&base_url, *currency);
        println!("Querying {} at {}...", currency, url);

        let rate = hacienda::fetch_rate(transport, &base_url, *currency)
            .await
            .with_context(|| format!("Hacienda {}", currency))?;
        println!("OK {}: {}", currency, rate);
    }
    Ok(())
}
