use std::path::PathBuf;

use anyhow::anyhow;
use clap::{Args, Parser, Subcommand};
use playcheck::{Acknowledger, Config, Outcome, Verifier};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "playcheck")]
#[command(about = "Verify and acknowledge Google Play purchases", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Fetch a product purchase and print its receipt
    Verify(PurchaseArgs),

    /// Fetch a subscription purchase
    VerifySubscription(PurchaseArgs),

    /// Acknowledge a product purchase and print its receipt
    Acknowledge(PurchaseArgs),

    /// Acknowledge a subscription purchase
    AcknowledgeSubscription(PurchaseArgs),
}

#[derive(Args, Debug, PartialEq, Eq)]
struct PurchaseArgs {
    /// Application package name, e.g. `com.example.app`
    package: String,

    /// Product or subscription id
    product_id: String,

    /// Purchase token from the device
    token: String,

    /// Service-account key file; falls back to `google_play.key_path` from config
    key_path: Option<PathBuf>,
}

/// Prints `<Type>:` and the pretty JSON of the outcome; returns whether it succeeded
fn print_outcome<T: Serialize>(label: &str, outcome: &Outcome<T>) -> anyhow::Result<bool> {
    match outcome {
        Outcome::Success(record) => {
            println!("{}:", label);
            println!("{}", serde_json::to_string_pretty(record)?);
        }
        Outcome::Failure(failure) => {
            println!("Failure:");
            println!("{}", serde_json::to_string_pretty(failure)?);
        }
    }
    Ok(outcome.is_success())
}

fn resolve_key_path(args: &PurchaseArgs, config: &Config) -> anyhow::Result<PathBuf> {
    args.key_path
        .clone()
        .or_else(|| config.google_play.key_path.clone())
        .ok_or_else(|| {
            anyhow!("No key path given: pass it as the last argument or set PLAYCHECK__GOOGLE_PLAY__KEY_PATH")
        })
}

async fn run(command: Commands, config: Config) -> anyhow::Result<bool> {
    match command {
        Commands::Verify(args) => {
            let mut verifier =
                Verifier::from_config(resolve_key_path(&args, &config)?, &config.google_play);
            verifier.boot().await?;
            let outcome = verifier
                .verify(&args.package, &args.product_id, &args.token)
                .await?;
            print_outcome("Receipt", &outcome)
        }
        Commands::VerifySubscription(args) => {
            let mut verifier =
                Verifier::from_config(resolve_key_path(&args, &config)?, &config.google_play);
            verifier.boot().await?;
            let outcome = verifier
                .verify_subscription(&args.package, &args.product_id, &args.token)
                .await?;
            print_outcome("Subscription", &outcome)
        }
        Commands::Acknowledge(args) => {
            let mut acknowledger =
                Acknowledger::from_config(resolve_key_path(&args, &config)?, &config.google_play);
            acknowledger.boot().await?;
            let outcome = acknowledger
                .acknowledge(&args.package, &args.product_id, &args.token)
                .await?;
            print_outcome("Receipt", &outcome)
        }
        Commands::AcknowledgeSubscription(args) => {
            let mut acknowledger =
                Acknowledger::from_config(resolve_key_path(&args, &config)?, &config.google_play);
            acknowledger.boot().await?;
            let outcome = acknowledger
                .acknowledge_subscription(&args.package, &args.product_id, &args.token)
                .await?;
            print_outcome("Acknowledged", &outcome)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Usage errors exit with status 2
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for the result
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,playcheck=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load()?;

    if !run(cli.command, config).await? {
        std::process::exit(1);
    }

    Ok(())
}
