mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::loan::{BreakdownArgs, LoanArgs};

/// Auto-loan payment calculations with decimal precision
#[derive(Parser)]
#[command(
    name = "alc",
    version,
    about = "Auto-loan payment calculator",
    long_about = "A CLI for auto-loan payment calculations with decimal precision. \
                  Computes the fixed monthly payment, total monthly cost including \
                  recurring expenses, and a month-by-month amortization schedule."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the monthly payment summary
    Payment(LoanArgs),
    /// Generate the month-by-month amortization schedule
    Schedule(LoanArgs),
    /// Express a down payment as both an amount and a percentage
    Breakdown(BreakdownArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Payment(args) => commands::loan::run_payment(args),
        Commands::Schedule(args) => commands::loan::run_schedule(args),
        Commands::Breakdown(args) => commands::loan::run_breakdown(args),
        Commands::Version => {
            println!("alc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
