//! User-visible status lines on stdout, colored by severity.
//!
//! Each line is mirrored as a tracing event so the log file holds the full
//! history even when `--verbose` hides a line from the terminal.

use console::style;
use std::fmt::Display;
use std::path::Path;

use crate::dispatch::DispatchSummary;
use crate::error::{DownloadError, ListError, TransportError};

#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    verbose: bool,
}

impl Reporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn container_found(&self, container: &str) {
        tracing::info!(container, "container found");
        println!("{}", style(format!("Container \"{container}\" found!")).green());
    }

    pub fn container_missing(&self, container: &str, status: u32) {
        tracing::debug!(container, status, "container not found");
        if self.verbose {
            println!(
                "{}",
                style(format!("Container \"{container}\" not found, skipping.")).red()
            );
        }
    }

    pub fn container_error(&self, container: &str, err: &TransportError) {
        tracing::warn!(container, error = %err, timeout = err.is_timeout(), "container probe failed");
        let line = if err.is_timeout() {
            format!("Timed out checking container {container}")
        } else {
            format!("Error checking container {container}: {err}")
        };
        println!("{}", style(line).red());
    }

    pub fn requesting(&self, url: impl Display) {
        tracing::debug!(%url, "requesting listing");
        if self.verbose {
            println!("{}", style(format!("\nRequesting Blob: {url}")).yellow());
        }
    }

    pub fn listing_failed(&self, url: impl Display, err: &ListError) {
        tracing::warn!(%url, error = %err, "listing skipped");
        match err {
            ListError::Transport(e) => {
                println!("{}", style(format!("Error accessing URL {url}: {e}")).red());
            }
            ListError::Status { code, body } => {
                println!("{}", style(format!("Listing {url} returned HTTP {code}")).red());
                if !body.is_empty() {
                    println!("Response Content: {body}");
                }
            }
            ListError::Decode { message, body } => {
                println!("{}", style(format!("Error parsing XML: {message}")).red());
                println!("Response Content: {body}");
            }
        }
    }

    pub fn prefix_empty(&self, prefix: &str, container: &str) {
        tracing::debug!(prefix, container, "prefix has no blobs");
        if self.verbose {
            println!(
                "{}",
                style(format!("\nPrefix \"{prefix}\" has no blobs in container \"{container}\"!\n"))
                    .red()
            );
        }
    }

    pub fn prefix_has_blobs(&self, prefix: &str, container: &str, count: usize) {
        tracing::info!(prefix, container, count, "prefix has blobs");
        println!(
            "{}",
            style(format!("\nPrefix \"{prefix}\" has blobs in container \"{container}\"!\n"))
                .green()
        );
    }

    pub fn blob_skipped(&self, name: &str, reason: impl Display) {
        tracing::warn!(blob = name, %reason, "blob not queued");
        println!("{}", style(format!("Skipping blob {name}: {reason}")).red());
    }

    pub fn directory_failed(&self, dir: &Path, err: &std::io::Error) {
        tracing::warn!(dir = %dir.display(), error = %err, "directory creation failed");
        println!(
            "{}",
            style(format!("Error creating directory {}: {err}", dir.display())).red()
        );
    }

    pub fn downloading(&self, url: &str, dest: &Path) {
        tracing::debug!(url, dest = %dest.display(), "download started");
        if self.verbose {
            println!("Downloading {url} to {}", dest.display());
        }
    }

    pub fn download_ok(&self, dest: &Path, bytes: u64) {
        tracing::info!(dest = %dest.display(), bytes, "download complete");
        println!(
            "{}",
            style(format!("Successfully downloaded blob file to {}", dest.display())).blue()
        );
    }

    pub fn download_failed(&self, url: &str, err: &DownloadError) {
        tracing::warn!(url, error = %err, timeout = err.is_timeout(), "download failed");
        let line = if err.is_timeout() {
            format!("Timed out downloading {url}")
        } else {
            format!("Failed to download {url}: {err}")
        };
        println!("{}", style(line).red());
    }

    pub fn listing_done(&self, container: &str, prefix: &str, summary: &DispatchSummary) {
        tracing::info!(
            container,
            prefix,
            queued = summary.queued,
            downloaded = summary.downloaded,
            failed = summary.failed,
            skipped = summary.skipped,
            "listing dispatched"
        );
    }

    pub fn finished(&self) {
        tracing::info!("run finished");
        println!("{}", style("****** Finished ******").green());
        println!();
    }
}
