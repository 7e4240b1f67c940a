//! Decode one page of an `EnumerationResults` listing document.

use serde::Deserialize;

/// `<EnumerationResults>` root. The root element name itself is not checked.
#[derive(Debug, Deserialize)]
struct EnumerationResults {
    #[serde(rename = "Blobs", default)]
    blobs: BlobsElement,
    #[serde(rename = "NextMarker", default)]
    next_marker: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct BlobsElement {
    #[serde(rename = "Blob", default)]
    blob: Vec<BlobElement>,
}

#[derive(Debug, Deserialize)]
struct BlobElement {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Url", default)]
    url: Option<String>,
}

/// A listed blob before its source URL is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ListedBlob {
    pub name: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ListingPage {
    pub blobs: Vec<ListedBlob>,
    /// Continuation token; `None` on the last page.
    pub next_marker: Option<String>,
}

/// Parse a listing body, keeping server order.
pub(crate) fn parse_listing(body: &str) -> Result<ListingPage, quick_xml::DeError> {
    let body = body.trim_start_matches('\u{feff}');
    let doc: EnumerationResults = quick_xml::de::from_str(body)?;
    let blobs = doc
        .blobs
        .blob
        .into_iter()
        .map(|b| ListedBlob {
            name: b.name,
            url: b.url.filter(|u| !u.trim().is_empty()),
        })
        .collect();
    Ok(ListingPage {
        blobs,
        next_marker: doc.next_marker.filter(|m| !m.is_empty()),
    })
}
