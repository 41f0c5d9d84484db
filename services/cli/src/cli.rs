use crate::intake::{run_submit, run_validate, InputArgs};
use clap::{Parser, Subcommand};
use talent_intake::config::AppConfig;
use talent_intake::error::AppError;
use talent_intake::telemetry;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "talent-intake",
    about = "Validate and store candidate submissions from the command line",
    version
)]
struct Cli {
    /// Override the configured log filter (for example `debug` or `talent_intake=trace`)
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate and persist candidates into a store that lives for this invocation
    Submit(InputArgs),
    /// Run the field rules only and print one verdict per candidate
    Validate(InputArgs),
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut config = AppConfig::load()?;

    if let Some(level) = cli.log_level {
        config.telemetry.log_level = level;
    }

    telemetry::init(&config.telemetry)?;
    debug!(environment = ?config.environment, command = ?cli.command, "talent intake cli starting");

    match cli.command {
        Command::Submit(args) => run_submit(args).await,
        Command::Validate(args) => run_validate(args),
    }
}
