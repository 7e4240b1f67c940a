//! SOCKS5 proxy address parsing.

use url::Url;

use crate::error::ConfigError;

/// A validated SOCKS5 endpoint. Host names are resolved by the proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocksProxy {
    host: String,
    port: u16,
    credentials: Option<(String, String)>,
}

impl SocksProxy {
    /// Accepts `host:port`, `user:pass@host:port`, or the same with a
    /// `socks5://` / `socks5h://` scheme.
    pub fn parse(addr: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::Proxy {
            addr: addr.to_string(),
            reason: reason.to_string(),
        };

        let addr_trimmed = addr.trim();
        if addr_trimmed.is_empty() {
            return Err(invalid("empty address"));
        }
        let with_scheme = if addr_trimmed.contains("://") {
            addr_trimmed.to_string()
        } else {
            format!("socks5://{addr_trimmed}")
        };

        let url = Url::parse(&with_scheme).map_err(|e| invalid(&e.to_string()))?;
        if !matches!(url.scheme(), "socks5" | "socks5h") {
            return Err(invalid("only socks5 proxies are supported"));
        }
        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| invalid("missing host"))?;
        let port = url.port().ok_or_else(|| invalid("missing port"))?;
        if !matches!(url.path(), "" | "/") || url.query().is_some() {
            return Err(invalid("unexpected path or query"));
        }

        let credentials = if url.username().is_empty() {
            None
        } else {
            Some((
                url.username().to_string(),
                url.password().unwrap_or_default().to_string(),
            ))
        };

        Ok(Self {
            host: host.to_string(),
            port,
            credentials,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Proxy string handed to libcurl (`socks5h://[user:pass@]host:port`).
    pub fn curl_proxy_url(&self) -> String {
        match &self.credentials {
            Some((user, pass)) => format!("socks5h://{}:{}@{}:{}", user, pass, self.host, self.port),
            None => format!("socks5h://{}:{}", self.host, self.port),
        }
    }
}
