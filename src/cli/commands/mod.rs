//! One-shot command implementations.

pub mod config;
pub mod entities;
pub mod query;
pub mod shell;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::remote::RemoteClient;
use crate::util::open_output;

/// Build the remote client from loaded configuration.
pub(crate) fn client_from(config: &Config) -> Result<Arc<RemoteClient>> {
    Ok(Arc::new(RemoteClient::new(&config.remote)?))
}

/// Write rendered output to stdout or to `--output <file>`.
pub(crate) fn emit(output_file: Option<&PathBuf>, append: bool, content: &str) -> Result<()> {
    match output_file {
        Some(path) => {
            let mut file = open_output(path, append)?;
            writeln!(file, "{content}")
                .map_err(|e| crate::error::TrawlError::io("writing output file", e))?;
        }
        None => println!("{content}"),
    }
    Ok(())
}
