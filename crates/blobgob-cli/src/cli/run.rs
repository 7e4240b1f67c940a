//! Default action: validate containers, enumerate prefixes, download blobs.

use anyhow::{Context, Result};
use blobgob_core::client::build_client;
use blobgob_core::config;
use blobgob_core::pipeline::{self, RunOptions};
use blobgob_core::report::Reporter;

use super::Cli;

pub async fn run_download(cli: &Cli, account: &str) -> Result<()> {
    let cfg = config::load_or_init().context("loading config")?;
    tracing::debug!("loaded config: {:?}", cfg);

    let opts = RunOptions {
        endpoint: cli.storage_endpoint(account)?,
        containers_file: cli.containers.clone(),
        prefixes_file: cli.dirprefixes.clone(),
        destination: cli.destination(account),
    };
    let client = build_client(cli.proxy(&cfg), &cfg)?;
    let reporter = Reporter::new(cli.verbose);

    // Curl transfers block; keep them off the runtime so the interrupt monitor stays responsive.
    let summary = tokio::task::spawn_blocking(move || pipeline::run(&opts, &client, &reporter))
        .await
        .context("pipeline task join")??;

    tracing::info!(
        valid_containers = summary.valid_containers,
        listings = summary.listings_with_blobs,
        downloaded = summary.downloads.downloaded,
        failed = summary.downloads.failed,
        "download run finished"
    );
    reporter.finished();
    Ok(())
}
