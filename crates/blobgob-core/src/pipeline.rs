//! The enumerate-then-download run.
//!
//! Loader → validator → for each valid container × prefix: enumerator →
//! dispatcher. Listings are processed strictly one after another; only the
//! downloads inside one listing run in parallel.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::client::BlobClient;
use crate::dispatch::{dispatch, DispatchSummary};
use crate::endpoint::Endpoint;
use crate::input::load_lines;
use crate::listing::list_blobs;
use crate::report::Reporter;
use crate::validate::validate_containers;

/// Everything a run needs besides the client.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub endpoint: Endpoint,
    /// Newline-delimited container names.
    pub containers_file: PathBuf,
    /// Newline-delimited directory prefixes.
    pub prefixes_file: PathBuf,
    /// Local root that mirrors the remote blob names.
    pub destination: PathBuf,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub containers_checked: usize,
    pub valid_containers: usize,
    pub listings_with_blobs: usize,
    pub downloads: DispatchSummary,
}

/// Runs the whole pipeline. Only setup failures (input files, destination
/// root) are errors; everything network-related is reported and skipped.
pub fn run(opts: &RunOptions, client: &BlobClient, reporter: &Reporter) -> Result<RunSummary> {
    let containers = load_lines(&opts.containers_file).context("reading containers file")?;
    let prefixes = load_lines(&opts.prefixes_file).context("reading directory prefixes file")?;
    fs::create_dir_all(&opts.destination).with_context(|| {
        format!(
            "creating destination directory {}",
            opts.destination.display()
        )
    })?;
    tracing::info!(
        containers = containers.len(),
        prefixes = prefixes.len(),
        dest = %opts.destination.display(),
        "starting run"
    );

    let valid = validate_containers(client, &opts.endpoint, &containers, reporter);
    let mut summary = RunSummary {
        containers_checked: containers.len(),
        valid_containers: valid.len(),
        ..RunSummary::default()
    };

    for container in &valid {
        for prefix in &prefixes {
            if let Some(listing) = process_listing(opts, client, reporter, container, prefix) {
                summary.listings_with_blobs += 1;
                summary.downloads += listing;
            }
        }
    }

    tracing::info!(?summary, "run complete");
    Ok(summary)
}

/// One (container, prefix) pair. Returns `None` when nothing was dispatched.
fn process_listing(
    opts: &RunOptions,
    client: &BlobClient,
    reporter: &Reporter,
    container: &str,
    prefix: &str,
) -> Option<DispatchSummary> {
    let url = opts.endpoint.list_url(container, prefix, None);
    reporter.requesting(&url);

    let blobs = match list_blobs(client, &opts.endpoint, container, prefix) {
        Ok(blobs) => blobs,
        Err(err) => {
            reporter.listing_failed(&url, &err);
            return None;
        }
    };
    if blobs.is_empty() {
        reporter.prefix_empty(prefix, container);
        return None;
    }

    reporter.prefix_has_blobs(prefix, container, blobs.len());
    let listing = dispatch(client, &blobs, &opts.destination, reporter);
    reporter.listing_done(container, prefix, &listing);
    Some(listing)
}
