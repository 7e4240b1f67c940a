//! Storage endpoint URLs: container probe, listing and synthesized blob URLs.

use std::path::PathBuf;
use url::Url;

use crate::error::ConfigError;

/// Where containers live. Either the public blob service for an account or an
/// explicit base URL (e.g. a local storage emulator).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base: Url,
}

impl Endpoint {
    /// `https://{account}.blob.core.windows.net`
    pub fn azure(account: &str) -> Result<Self, ConfigError> {
        let account = account.trim();
        if account.is_empty() {
            return Err(ConfigError::Endpoint(account.to_string()));
        }
        Self::custom(&format!("https://{account}.blob.core.windows.net/"))
    }

    /// Containers are addressed as `{base}/{container}`.
    pub fn custom(base: &str) -> Result<Self, ConfigError> {
        let base_url = Url::parse(base).map_err(|_| ConfigError::Endpoint(base.to_string()))?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.host_str().is_none() {
            return Err(ConfigError::Endpoint(base.to_string()));
        }
        Ok(Self { base: base_url })
    }

    /// URL of a container; the name becomes a single path segment.
    pub fn container_url(&self, container: &str) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(container);
        }
        url
    }

    /// Container metadata probe: `{container}?restype=container`.
    pub fn probe_url(&self, container: &str) -> Url {
        let mut url = self.container_url(container);
        url.query_pairs_mut().append_pair("restype", "container");
        url
    }

    /// Filtered listing: `{container}?restype=container&comp=list&prefix={prefix}[&marker={marker}]`.
    pub fn list_url(&self, container: &str, prefix: &str, marker: Option<&str>) -> Url {
        let mut url = self.container_url(container);
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("restype", "container")
                .append_pair("comp", "list")
                .append_pair("prefix", prefix);
            if let Some(marker) = marker {
                query.append_pair("marker", marker);
            }
        }
        url
    }

    /// Direct blob URL, used when a listing entry carries no `<Url>`.
    pub fn blob_url(&self, container: &str, blob_name: &str) -> Url {
        let mut url = self.container_url(container);
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.extend(blob_name.split('/'));
        }
        url
    }
}

/// Default destination root: the text before the first `.` of the account.
pub fn default_destination(account: &str) -> PathBuf {
    PathBuf::from(account.split('.').next().unwrap_or(account))
}
