//! trawl: interactive CLI/TUI client for remote log search and analysis.

use std::process::ExitCode;

use trawl::cli;

fn main() -> ExitCode {
    // Logging is initialized by cli::run based on --log-level/--log-format.
    match cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");

            // Print the cause chain in debug mode
            if std::env::var("RUST_BACKTRACE").is_ok() {
                if let Some(source) = std::error::Error::source(&e) {
                    eprintln!("Caused by: {source}");
                }
            }

            ExitCode::from(e.exit_code() as u8)
        }
    }
}
