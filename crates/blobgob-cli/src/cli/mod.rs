//! CLI for the BlobGob container enumerator and downloader.

mod banner;
mod interrupt;
mod run;

use clap::{CommandFactory, Parser};
use blobgob_core::config::BlobGobConfig;
use blobgob_core::endpoint::{default_destination, Endpoint};
use blobgob_core::error::ConfigError;
use std::path::PathBuf;

pub use banner::print_banner;
pub use interrupt::spawn_interrupt_monitor;
pub use run::run_download;

/// Enumerate anonymously listable blob containers and download their contents.
#[derive(Debug, Parser)]
#[command(name = "blobgob")]
#[command(about = "BlobGob: enumerate and download publicly listable blob containers", long_about = None)]
pub struct Cli {
    /// Storage account name.
    #[arg(long)]
    pub account: Option<String>,

    /// File with one container name per line.
    #[arg(long, default_value = "names.txt", value_name = "FILE")]
    pub containers: PathBuf,

    /// File with one directory prefix per line.
    #[arg(long, default_value = "names.txt", value_name = "FILE")]
    pub dirprefixes: PathBuf,

    /// Directory to save downloaded blobs (default: account name up to the first '.').
    #[arg(long, visible_alias = "output", value_name = "DIR")]
    pub dest: Option<PathBuf>,

    /// SOCKS5 proxy address (e.g. 127.0.0.1:1080).
    #[arg(long, value_name = "HOST:PORT")]
    pub socks: Option<String>,

    /// Base URL to use instead of https://{account}.blob.core.windows.net (e.g. a storage emulator).
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Display version information.
    #[arg(long)]
    pub version: bool,

    /// Enable verbose output.
    #[arg(long)]
    pub verbose: bool,
}

impl Cli {
    /// Account name, if one was given and is not blank.
    pub fn account(&self) -> Option<&str> {
        self.account.as_deref().map(str::trim).filter(|a| !a.is_empty())
    }

    /// True when a required input is missing and usage should be shown.
    pub fn missing_required(&self) -> bool {
        self.account().is_none()
            || self.containers.as_os_str().is_empty()
            || self.dirprefixes.as_os_str().is_empty()
    }

    pub fn destination(&self, account: &str) -> PathBuf {
        self.dest
            .clone()
            .filter(|d| !d.as_os_str().is_empty())
            .unwrap_or_else(|| default_destination(account))
    }

    pub fn storage_endpoint(&self, account: &str) -> Result<Endpoint, ConfigError> {
        match self.endpoint.as_deref() {
            Some(base) => Endpoint::custom(base),
            None => Endpoint::azure(account),
        }
    }

    /// `--socks` wins over the config file.
    pub fn proxy<'a>(&'a self, cfg: &'a BlobGobConfig) -> Option<&'a str> {
        self.socks.as_deref().or(cfg.socks_proxy.as_deref())
    }

    /// `Version: {major}.{minor}`, as printed by `--version`.
    pub fn version_line() -> String {
        format!(
            "Version: {}.{}",
            env!("CARGO_PKG_VERSION_MAJOR"),
            env!("CARGO_PKG_VERSION_MINOR")
        )
    }

    pub fn print_usage() {
        let _ = Cli::command().print_help();
        println!();
    }
}
