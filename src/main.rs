use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use spendscan::cli::{
    handle_config_command, handle_expense_command, handle_export_command,
    handle_merchant_command, handle_parse_command, handle_report_command, handle_scan_command,
    ConfigCommands, ExpenseCommands, ExportFormat, MerchantCommands, ScanArgs,
};
use spendscan::config::{Settings, SpendscanPaths};
use spendscan::storage::Storage;

#[derive(Parser)]
#[command(
    name = "spendscan",
    version,
    about = "Turn photographed receipts into categorized expenses",
    long_about = "spendscan reads the text on a receipt photo, picks out the merchant, \
                  total, tax and date, suggests a spending category, and records the \
                  result as an expense. Categories you choose are remembered per merchant."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a receipt image and record it as an expense
    Scan(ScanArgs),

    /// Extract receipt fields from a text transcript (stdin if no file)
    Parse {
        file: Option<PathBuf>,
    },

    /// Expense management commands
    #[command(subcommand, alias = "exp")]
    Expense(ExpenseCommands),

    /// Learned merchant categories
    #[command(subcommand)]
    Merchant(MerchantCommands),

    /// Spending per category
    Report {
        /// Only this month (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,

        /// Write CSV to this file instead of printing
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export all data
    Export {
        #[arg(value_enum)]
        format: ExportFormat,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigCommands>,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let paths = SpendscanPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;
    let storage = Storage::open(paths.clone())?;

    match cli.command {
        Commands::Scan(args) => handle_scan_command(&storage, &settings, args).await?,
        Commands::Parse { file } => handle_parse_command(&storage, file)?,
        Commands::Expense(cmd) => handle_expense_command(&storage, &settings, cmd)?,
        Commands::Merchant(cmd) => handle_merchant_command(&storage, cmd)?,
        Commands::Report { month, output } => {
            handle_report_command(&storage, &settings, month, output)?
        }
        Commands::Export { format, output } => handle_export_command(&storage, format, output)?,
        Commands::Config { action } => handle_config_command(&paths, &mut settings, action)?,
    }

    Ok(())
}
