use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use manat::core::conversion::Direction;
use manat::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List the currencies available on a date
    Currencies {
        /// Date in YYYY-MM-DD format, defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Convert an amount to or from manat
    Convert {
        /// Date of the exchange rate, YYYY-MM-DD
        #[arg(short, long)]
        date: String,
        /// Currency code; the first available currency when omitted
        #[arg(short = 'C', long)]
        currency: Option<String>,
        /// Amount to convert
        #[arg(short, long)]
        amount: String,
        /// Convert manat into the currency instead of the other way round
        #[arg(long)]
        from_manat: bool,
    },
    /// Fill in the form step by step
    Interactive,
    /// Check that the catalog and conversion services are up
    Status,
}

impl Commands {
    fn into_app_command(self) -> Option<manat::AppCommand> {
        match self {
            Commands::Setup => None,
            Commands::Currencies { date } => Some(manat::AppCommand::Currencies { date }),
            Commands::Convert {
                date,
                currency,
                amount,
                from_manat,
            } => Some(manat::AppCommand::Convert {
                direction: if from_manat {
                    Direction::FromReference
                } else {
                    Direction::ToReference
                },
                date,
                currency,
                amount,
            }),
            Commands::Interactive => Some(manat::AppCommand::Interactive),
            Commands::Status => Some(manat::AppCommand::Status),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command.map(Commands::into_app_command) {
        Some(None) => manat::cli::setup::setup(),
        Some(Some(cmd)) => manat::run_command(cmd, cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
