//! Container validation: a metadata probe per candidate name.

use crate::client::BlobClient;
use crate::endpoint::Endpoint;
use crate::report::Reporter;

/// Result of probing one container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Found,
    /// Any non-200 status.
    Missing(u32),
    /// Transport failure; the container is treated as invalid.
    Unreachable,
}

/// Probes `{container}?restype=container` with a HEAD. Only HTTP 200 counts as found.
pub fn probe_container(
    client: &BlobClient,
    endpoint: &Endpoint,
    container: &str,
    reporter: &Reporter,
) -> ProbeOutcome {
    let url = endpoint.probe_url(container);
    match client.head(url.as_str()) {
        Ok(200) => {
            reporter.container_found(container);
            ProbeOutcome::Found
        }
        Ok(status) => {
            reporter.container_missing(container, status);
            ProbeOutcome::Missing(status)
        }
        Err(err) => {
            reporter.container_error(container, &err);
            ProbeOutcome::Unreachable
        }
    }
}

pub fn container_exists(
    client: &BlobClient,
    endpoint: &Endpoint,
    container: &str,
    reporter: &Reporter,
) -> bool {
    probe_container(client, endpoint, container, reporter) == ProbeOutcome::Found
}

/// Probes every candidate in order and keeps the ones that exist. Unreachable
/// containers are skipped; validation never aborts the run.
pub fn validate_containers(
    client: &BlobClient,
    endpoint: &Endpoint,
    candidates: &[String],
    reporter: &Reporter,
) -> Vec<String> {
    candidates
        .iter()
        .filter(|name| container_exists(client, endpoint, name, reporter))
        .cloned()
        .collect()
}
