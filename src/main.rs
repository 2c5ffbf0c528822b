//! edgestat - command-line entry point

use clap::Parser;
use edgestat::{app::App, cli::Cli, error::ErrorReporter, AppError};
use std::process;

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        // Leave the alternate screen if the dashboard was up
        ratatui::restore();
        eprintln!("Application panic: {}", panic_info);
        process::exit(99);
    }));

    let cli = Cli::parse();

    if let Err(message) = cli.validate() {
        eprintln!("Error: {}", message);
        process::exit(1);
    }

    let reporter = ErrorReporter::new(cli.use_colors(), cli.verbose || cli.debug);
    let result = match App::new(cli) {
        Ok(app) => app.run().await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        reporter.report_error(&e);
        print_error_suggestions(&e);
        process::exit(e.exit_code());
    }
}

/// Print helpful suggestions for common errors
fn print_error_suggestions(error: &AppError) {
    let tips: &[&str] = match error {
        AppError::Config(_) => &[
            "Check EDGESTAT_* variables and your .env file",
            "Run with --debug to print the merged configuration",
        ],
        AppError::Protocol(_) => &["Only http:// and https:// URLs can be probed"],
        AppError::Resolution(_) => &[
            "Check that the domain has A records (dig A <domain>)",
            "Pass a resolvable domain or an IPv4 address with -t",
        ],
        AppError::Transport(_) | AppError::Timeout(_) => &[
            "The edge may be filtering the port; try -p",
            "Use --insecure if the edge serves a certificate for another name",
        ],
        AppError::Terminal(_) => &["Dashboard mode needs an interactive terminal"],
        _ => &[],
    };

    if tips.is_empty() {
        return;
    }
    eprintln!();
    for tip in tips {
        eprintln!("  - {}", tip);
    }
}
