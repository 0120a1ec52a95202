use clap::{ArgAction, Parser};
use std::path::PathBuf;

use convertino_core::Encoding;

#[derive(Parser, Debug)]
#[command(name = "convertino")]
#[command(author, version, about = "Convert audio files between MP3, WAV and AIFF")]
pub struct Cli {
    /// Input file or directory
    #[arg(short, long)]
    pub file: PathBuf,

    /// Target encoding: mp3, wav, aif or aiff (required for directories)
    #[arg(short, long)]
    pub encoding: Option<Encoding>,

    /// Path to config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Default log filter when RUST_LOG is not set.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}
