//! Download worker: drains the shared job queue until it is closed.

use std::sync::mpsc::Receiver;
use std::sync::Mutex;

use super::fetch::download_to_file;
use super::DownloadJob;
use crate::client::BlobClient;
use crate::report::Reporter;

/// Per-worker outcome counts, merged into the dispatch summary on join.
#[derive(Debug, Default, Clone, Copy)]
pub(super) struct WorkerStats {
    pub downloaded: usize,
    pub failed: usize,
}

pub(super) fn run(
    worker_id: usize,
    client: &BlobClient,
    jobs: &Mutex<Receiver<DownloadJob>>,
    reporter: &Reporter,
) -> WorkerStats {
    let mut stats = WorkerStats::default();
    loop {
        // Hold the lock only while waiting for the next job.
        let next = match jobs.lock() {
            Ok(rx) => rx.recv(),
            Err(poisoned) => poisoned.into_inner().recv(),
        };
        let Ok(job) = next else {
            break;
        };

        reporter.downloading(&job.source_url, &job.dest);
        match download_to_file(client, &job.source_url, &job.dest) {
            Ok(bytes) => {
                stats.downloaded += 1;
                reporter.download_ok(&job.dest, bytes);
            }
            Err(err) => {
                stats.failed += 1;
                reporter.download_failed(&job.source_url, &err);
            }
        }
    }
    tracing::debug!(
        worker_id,
        downloaded = stats.downloaded,
        failed = stats.failed,
        "download worker exiting"
    );
    stats
}
