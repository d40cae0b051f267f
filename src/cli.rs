//! Command-line interface definitions.
//!
//! The fetcher is designed to run unattended (cron, CI); every portal
//! mapping is compiled in, so the surface stays minimal.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the lex.uz dataset fetcher.
///
/// # Examples
///
/// ```sh
/// # Write data/ and metadata.json into the current directory
/// lex_uz_fetch
///
/// # Write elsewhere and fail the run when any fetch exhausts its retries
/// lex_uz_fetch -o /srv/lexuz --strict
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Directory that receives data/ and metadata.json
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Exit nonzero if any listing fetch exhausted its retries
    #[arg(long)]
    pub strict: bool,
}
