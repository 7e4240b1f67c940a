//! Blob enumeration: filtered container listings decoded into blob descriptors.
//!
//! Follows `NextMarker` continuation tokens so a prefix with more blobs than
//! one page still yields the whole set, in server order. A marker that was
//! already followed ends the listing.

mod parse;

use std::collections::HashSet;

use crate::client::BlobClient;
use crate::endpoint::Endpoint;
use crate::error::ListError;

/// A blob reported by a listing: its name relative to the container and the URL to fetch it from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobDescriptor {
    pub name: String,
    pub source_url: String,
}

/// Lists every blob in `container` whose name starts with `prefix`.
///
/// Transport failures, non-2xx responses and undecodable bodies on any page
/// fail the whole listing; the caller treats that as zero blobs.
pub fn list_blobs(
    client: &BlobClient,
    endpoint: &Endpoint,
    container: &str,
    prefix: &str,
) -> Result<Vec<BlobDescriptor>, ListError> {
    let mut blobs = Vec::new();
    let mut marker: Option<String> = None;
    let mut seen_markers: HashSet<String> = HashSet::new();

    loop {
        let url = endpoint.list_url(container, prefix, marker.as_deref());
        tracing::debug!(%url, "listing page");
        let page = fetch_page(client, url.as_str())?;

        blobs.extend(page.blobs.into_iter().map(|b| BlobDescriptor {
            source_url: b
                .url
                .unwrap_or_else(|| endpoint.blob_url(container, &b.name).to_string()),
            name: b.name,
        }));

        match page.next_marker {
            Some(next) if seen_markers.insert(next.clone()) => marker = Some(next),
            Some(next) => {
                tracing::warn!(marker = %next, "listing repeated a continuation marker, stopping");
                break;
            }
            None => break,
        }
    }

    Ok(blobs)
}

fn fetch_page(client: &BlobClient, url: &str) -> Result<parse::ListingPage, ListError> {
    let response = client.get(url)?;
    let body = response.text();
    if !response.is_success() {
        return Err(ListError::Status {
            code: response.status,
            body,
        });
    }
    parse::parse_listing(&body).map_err(|e| ListError::Decode {
        message: e.to_string(),
        body,
    })
}
