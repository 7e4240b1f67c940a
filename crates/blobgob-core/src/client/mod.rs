//! Shared request client.
//!
//! A [`BlobClient`] is the single request policy for a whole run: timeout,
//! optional SOCKS5 proxy and user agent. Every request gets a fresh libcurl
//! easy handle configured from that policy, so the client is cheap to share
//! across download workers.

mod proxy;

pub use proxy::SocksProxy;

use std::sync::Arc;
use std::time::Duration;

use crate::config::BlobGobConfig;
use crate::error::{ConfigError, TransportError};

/// Request policy applied uniformly to every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    pub timeout: Duration,
    pub proxy: Option<SocksProxy>,
    pub user_agent: Option<String>,
}

/// Status and fully buffered body of a GET.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u32,
    pub body: Vec<u8>,
}

impl Response {
    pub fn is_success(&self) -> bool {
        is_success(self.status)
    }

    /// Body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Debug, Clone)]
pub struct BlobClient {
    opts: Arc<ClientOptions>,
}

/// Builds the run-wide client. An empty or absent `proxy_addr` means a direct
/// connection; anything else must parse as a SOCKS5 endpoint.
pub fn build_client(proxy_addr: Option<&str>, cfg: &BlobGobConfig) -> Result<BlobClient, ConfigError> {
    let proxy = match proxy_addr.map(str::trim).filter(|a| !a.is_empty()) {
        Some(addr) => Some(SocksProxy::parse(addr)?),
        None => None,
    };
    if let Some(p) = &proxy {
        tracing::info!(host = p.host(), port = p.port(), "routing requests through SOCKS5 proxy");
    }
    Ok(BlobClient::new(ClientOptions {
        timeout: cfg.request_timeout(),
        proxy,
        user_agent: cfg.user_agent.clone(),
    }))
}

impl BlobClient {
    pub fn new(opts: ClientOptions) -> Self {
        Self {
            opts: Arc::new(opts),
        }
    }

    pub fn options(&self) -> &ClientOptions {
        &self.opts
    }

    /// Easy handle for `url` with the client policy applied.
    pub(crate) fn easy(&self, url: &str) -> Result<curl::easy::Easy, curl::Error> {
        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.timeout(self.opts.timeout)?;
        if let Some(proxy) = &self.opts.proxy {
            easy.proxy(&proxy.curl_proxy_url())?;
        }
        if let Some(ua) = &self.opts.user_agent {
            easy.useragent(ua)?;
        }
        Ok(easy)
    }

    /// Metadata-only request (HEAD). Returns the final status code.
    /// Any body a server sends anyway is discarded.
    pub fn head(&self, url: &str) -> Result<u32, TransportError> {
        let mut easy = self.easy(url)?;
        easy.nobody(true)?;
        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| Ok(data.len()))?;
            transfer.perform()?;
        }
        Ok(easy.response_code()?)
    }

    /// GET with the whole body buffered in memory. Non-2xx is not an error here.
    pub fn get(&self, url: &str) -> Result<Response, TransportError> {
        let mut body = Vec::new();
        let mut easy = self.easy(url)?;
        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }
        let status = easy.response_code()?;
        Ok(Response { status, body })
    }
}

pub(crate) fn is_success(status: u32) -> bool {
    (200..300).contains(&status)
}

/// Status code from a raw header line such as `HTTP/1.1 200 OK`.
pub(crate) fn status_from_header_line(line: &[u8]) -> Option<u32> {
    let line = std::str::from_utf8(line).ok()?;
    if !line.starts_with("HTTP/") {
        return None;
    }
    line.split_whitespace().nth(1)?.parse().ok()
}
