//! Download dispatcher.
//!
//! For one listing: resolve each blob's local destination, create its parent
//! directories, and feed the resulting jobs through a bounded queue to a fixed
//! pool of download workers. Returns only after every worker has drained the
//! queue and exited, so at most one listing's downloads are ever in flight.

mod fetch;
mod path;
mod worker;

pub use path::local_path;

use std::fs;
use std::ops::AddAssign;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::Mutex;
use std::thread;

use crate::client::BlobClient;
use crate::config::{DOWNLOAD_WORKERS, JOB_QUEUE_CAPACITY};
use crate::listing::BlobDescriptor;
use crate::report::Reporter;

/// A queued download: where to fetch from and where to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadJob {
    pub source_url: String,
    pub dest: PathBuf,
}

/// Outcome counts for one dispatch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Jobs handed to the worker pool.
    pub queued: usize,
    pub downloaded: usize,
    pub failed: usize,
    /// Descriptors dropped before queueing (bad name or directory creation failed).
    pub skipped: usize,
}

impl AddAssign for DispatchSummary {
    fn add_assign(&mut self, rhs: Self) {
        self.queued += rhs.queued;
        self.downloaded += rhs.downloaded;
        self.failed += rhs.failed;
        self.skipped += rhs.skipped;
    }
}

/// Resolves the destination for `blob` and creates its parent directories.
/// Returns `None` (after reporting) when the blob must not be queued.
pub fn prepare_job(blob: &BlobDescriptor, dest_root: &Path, reporter: &Reporter) -> Option<DownloadJob> {
    let Some(dest) = local_path(dest_root, &blob.name) else {
        reporter.blob_skipped(&blob.name, "name has no file component");
        return None;
    };
    if let Some(dir) = dest.parent() {
        if let Err(err) = fs::create_dir_all(dir) {
            reporter.directory_failed(dir, &err);
            return None;
        }
    }
    Some(DownloadJob {
        source_url: blob.source_url.clone(),
        dest,
    })
}

/// Downloads `blobs` under `dest_root` with [`DOWNLOAD_WORKERS`] workers.
///
/// Per-file failures are reported and counted; they never stop other downloads.
/// An empty `blobs` slice does no filesystem work at all.
pub fn dispatch(
    client: &BlobClient,
    blobs: &[BlobDescriptor],
    dest_root: &Path,
    reporter: &Reporter,
) -> DispatchSummary {
    let mut summary = DispatchSummary::default();
    if blobs.is_empty() {
        return summary;
    }

    let (tx, rx) = mpsc::sync_channel::<DownloadJob>(JOB_QUEUE_CAPACITY);
    let rx = Mutex::new(rx);

    thread::scope(|scope| {
        let workers: Vec<_> = (0..DOWNLOAD_WORKERS)
            .map(|worker_id| {
                let rx = &rx;
                thread::Builder::new()
                    .name(format!("download-{worker_id}"))
                    .spawn_scoped(scope, move || worker::run(worker_id, client, rx, reporter))
            })
            .filter_map(|spawned| match spawned {
                Ok(handle) => Some(handle),
                Err(err) => {
                    tracing::error!("failed to spawn download worker: {}", err);
                    None
                }
            })
            .collect();

        if workers.is_empty() {
            summary.skipped += blobs.len();
            return;
        }

        for blob in blobs {
            let Some(job) = prepare_job(blob, dest_root, reporter) else {
                summary.skipped += 1;
                continue;
            };
            if tx.send(job).is_err() {
                tracing::error!("download queue closed early");
                break;
            }
            summary.queued += 1;
        }
        // Closing the queue lets the workers drain and exit.
        drop(tx);

        for handle in workers {
            match handle.join() {
                Ok(stats) => {
                    summary.downloaded += stats.downloaded;
                    summary.failed += stats.failed;
                }
                Err(_) => tracing::error!("download worker panicked"),
            }
        }
    });

    summary
}
