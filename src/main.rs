use clap::Parser;
use mrv_import::cli::{args::Args, commands};
use std::process;

fn main() {
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        // Without a signal handler the command simply runs to completion
        let shutdown_signal = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("Failed to install CTRL+C signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        };

        tokio::select! {
            result = commands::run(args) => result,
            _ = shutdown_signal => {
                eprintln!("\nReceived CTRL+C, stopping import...");
                Err(mrv_import::Error::processing_interrupted("Import interrupted by user").into())
            }
        }
    });

    match result {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("MRV Import - Measurement CSV Importer");
    println!("=====================================");
    println!();
    println!("Parse, validate and map CO2-removal and wastewater measurement");
    println!("spreadsheets (CSV) into MRV measurement-creation requests.");
    println!();
    println!("USAGE:");
    println!("    mrv-import <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    import      Run the full import pipeline over a CSV file (main command)");
    println!("    template    Write the CSV import template");
    println!("    detect      Show which field each CSV header is detected as");
    println!("    preview     Show the first rows of a CSV file as parsed");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Start from the template:");
    println!("    mrv-import template --output measurements.csv");
    println!();
    println!("    # Check a file and see what would be imported:");
    println!("    mrv-import import measurements.csv --project-id proj-001");
    println!();
    println!("    # Import, dropping invalid rows, and write JSON Lines batches:");
    println!("    mrv-import import measurements.csv --project-id proj-001 \\");
    println!("                      --skip-invalid-rows --submit-jsonl requests.jsonl");
    println!();
    println!("    # Map Japanese headers explicitly:");
    println!("    mrv-import import data.csv --map timestamp=測定日時 --map ph=水素イオン濃度");
    println!();
    println!("For detailed help on any command, use:");
    println!("    mrv-import <COMMAND> --help");
}
