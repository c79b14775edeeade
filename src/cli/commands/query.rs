//! One-shot query command: submit, wait, print.

use std::path::PathBuf;
use std::time::Duration as StdDuration;

use chrono::Duration;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::cli::Cli;
use crate::config::Config;
use crate::error::{Result, TrawlError};
use crate::remote::TimeRange;
use crate::util::truncate_line;

use super::{client_from, emit};

/// Arguments for the query command.
#[derive(Debug, Args)]
pub struct QueryArgs {
    /// The query to run.
    #[arg(required = true, trailing_var_arg = true)]
    pub query: Vec<String>,

    /// How far back to search (e.g. 15m, 2h, 1d).
    #[arg(long, default_value = "1h")]
    pub last: String,

    /// Maximum result lines to fetch.
    #[arg(short = 'n', long, default_value = "10000")]
    pub limit: u64,

    /// Output file path (stdout if not specified).
    #[arg(short = 'O', long = "out")]
    pub output_file: Option<PathBuf>,

    /// Append to the output file instead of truncating it.
    #[arg(long)]
    pub append: bool,
}

/// Run the query command.
pub fn run(_cli: &Cli, config: &Config, args: &QueryArgs) -> Result<()> {
    let client = client_from(config)?;

    let window = humantime::parse_duration(&args.last)
        .map_err(|e| TrawlError::invalid_arg("last", e.to_string()))?;
    let window = Duration::from_std(window)
        .map_err(|_| TrawlError::invalid_arg("last", "duration out of range"))?;
    let query = args.query.join(" ");

    let handle = client.submit_search(&query, TimeRange::last(window))?;
    info!(search = %handle.id, "search submitted");

    // Keep the terminal alive while the remote works.
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").expect("static template"));
    spinner.set_message(format!("searching ({})", handle.id));
    spinner.enable_steady_tick(StdDuration::from_millis(120));

    let waited = client.wait_for_search(&handle);
    spinner.finish_and_clear();
    waited?;

    let results = client.fetch_text_results(&handle, 0, args.limit)?;
    let truncate_at = config.display.truncate_at;
    let rendered: Vec<String> = results
        .lines
        .iter()
        .map(|line| truncate_line(line, truncate_at))
        .collect();

    emit(args.output_file.as_ref(), args.append, &rendered.join("\n"))?;
    if (rendered.len() as u64) < results.total {
        eprintln!("showing {} of {} results", rendered.len(), results.total);
    }
    Ok(())
}
