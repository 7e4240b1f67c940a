//! Minimal HTTP/1.1 blob service for integration tests.
//!
//! Path-style addressing under a fixed account: `/{ACCOUNT}/{container}[/{blob}]`.
//! Answers container probes (`?restype=container`), listings
//! (`?restype=container&comp=list&prefix=..[&marker=..]`) and blob GETs, and
//! records how many blob downloads were in flight at once.

use std::collections::{HashMap, HashSet};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use blobgob_core::endpoint::Endpoint;

pub const ACCOUNT: &str = "acct";

#[derive(Debug, Clone)]
struct Canned {
    status: u16,
    body: Vec<u8>,
}

#[derive(Default)]
struct State {
    containers: HashSet<String>,
    /// (container, prefix, marker) -> listing response
    listings: HashMap<(String, String, Option<String>), Canned>,
    /// "{container}/{blob}" -> blob response
    blobs: HashMap<String, Canned>,
    blob_delay: Duration,
    /// Sent with container probe responses even when the request was a HEAD.
    probe_body: Option<Vec<u8>>,
}

#[derive(Default)]
struct Counters {
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    blob_requests: AtomicUsize,
}

#[derive(Clone)]
pub struct BlobServer {
    base: String,
    state: Arc<Mutex<State>>,
    counters: Arc<Counters>,
}

impl BlobServer {
    /// Starts the server on an ephemeral port. It runs until the process exits.
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let server = BlobServer {
            base: format!("http://127.0.0.1:{}/{}", port, ACCOUNT),
            state: Arc::new(Mutex::new(State::default())),
            counters: Arc::new(Counters::default()),
        };
        let accept = server.clone();
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let srv = accept.clone();
                thread::spawn(move || srv.handle(stream));
            }
        });
        server
    }

    pub fn endpoint(&self) -> Endpoint {
        Endpoint::custom(&self.base).unwrap()
    }

    pub fn add_container(&self, name: &str) {
        self.state.lock().unwrap().containers.insert(name.to_string());
    }

    pub fn blob_url(&self, container: &str, name: &str) -> String {
        format!("{}/{}/{}", self.base, container, name)
    }

    pub fn add_blob(&self, container: &str, name: &str, body: &[u8]) {
        self.set_blob_response(container, name, 200, body);
    }

    pub fn set_blob_response(&self, container: &str, name: &str, status: u16, body: &[u8]) {
        self.state.lock().unwrap().blobs.insert(
            format!("{container}/{name}"),
            Canned {
                status,
                body: body.to_vec(),
            },
        );
    }

    /// Misbehave on container probes: answer HEAD with a body.
    pub fn set_probe_body(&self, body: &[u8]) {
        self.state.lock().unwrap().probe_body = Some(body.to_vec());
    }

    /// Each blob response is held back this long (to overlap downloads).
    pub fn set_blob_delay(&self, delay: Duration) {
        self.state.lock().unwrap().blob_delay = delay;
    }

    /// Single-page listing whose `<Url>`s point back at this server.
    pub fn set_listing(&self, container: &str, prefix: &str, names: &[&str]) {
        self.set_listing_page(container, prefix, None, names, None);
    }

    pub fn set_listing_page(
        &self,
        container: &str,
        prefix: &str,
        marker: Option<&str>,
        names: &[&str],
        next_marker: Option<&str>,
    ) {
        let body = self.listing_xml(container, names, next_marker);
        self.set_listing_raw(container, prefix, marker, 200, &body);
    }

    pub fn set_listing_raw(
        &self,
        container: &str,
        prefix: &str,
        marker: Option<&str>,
        status: u16,
        body: &str,
    ) {
        self.state.lock().unwrap().listings.insert(
            (
                container.to_string(),
                prefix.to_string(),
                marker.map(str::to_string),
            ),
            Canned {
                status,
                body: body.as_bytes().to_vec(),
            },
        );
    }

    pub fn listing_xml(&self, container: &str, names: &[&str], next_marker: Option<&str>) -> String {
        let mut xml = String::from(
            "\u{feff}<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<EnumerationResults>\n  <Blobs>\n",
        );
        for name in names {
            xml.push_str(&format!(
                "    <Blob>\n      <Name>{}</Name>\n      <Url>{}</Url>\n      \
                 <Properties><Content-Type>application/octet-stream</Content-Type></Properties>\n    </Blob>\n",
                name,
                self.blob_url(container, name)
            ));
        }
        xml.push_str("  </Blobs>\n");
        match next_marker {
            Some(m) => xml.push_str(&format!("  <NextMarker>{m}</NextMarker>\n")),
            None => xml.push_str("  <NextMarker />\n"),
        }
        xml.push_str("</EnumerationResults>");
        xml
    }

    /// Highest number of blob downloads served concurrently.
    pub fn max_in_flight(&self) -> usize {
        self.counters.max_in_flight.load(Ordering::SeqCst)
    }

    /// Number of blob GETs received.
    pub fn blob_requests(&self) -> usize {
        self.counters.blob_requests.load(Ordering::SeqCst)
    }

    fn handle(&self, mut stream: TcpStream) {
        let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
        let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));
        let Some(request) = read_request(&mut stream) else {
            return;
        };
        let mut parts = request.lines().next().unwrap_or("").split_whitespace();
        let method = parts.next().unwrap_or("").to_string();
        let target = parts.next().unwrap_or("").to_string();
        let head = method.eq_ignore_ascii_case("HEAD");

        let (path, query) = target.split_once('?').unwrap_or((target.as_str(), ""));
        let params: HashMap<String, String> = url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();
        let prefix = format!("/{}/", ACCOUNT);
        let Some(rest) = path.strip_prefix(&prefix) else {
            respond(&mut stream, 404, b"", head);
            return;
        };
        let (container, blob) = match rest.split_once('/') {
            Some((c, b)) => (c.to_string(), Some(b.to_string())),
            None => (rest.to_string(), None),
        };

        match (blob, params.get("restype").map(String::as_str), params.get("comp").map(String::as_str)) {
            (None, Some("container"), Some("list")) => {
                let key = (
                    container,
                    params.get("prefix").cloned().unwrap_or_default(),
                    params.get("marker").cloned(),
                );
                let canned = self.state.lock().unwrap().listings.get(&key).cloned();
                let canned = canned.unwrap_or_else(|| Canned {
                    status: 200,
                    body: self.listing_xml(&key.0, &[], None).into_bytes(),
                });
                respond(&mut stream, canned.status, &canned.body, head);
            }
            (None, Some("container"), None) => {
                let (exists, body) = {
                    let state = self.state.lock().unwrap();
                    (state.containers.contains(&container), state.probe_body.clone())
                };
                let status = if exists { 200 } else { 404 };
                match body {
                    Some(body) => respond(&mut stream, status, &body, false),
                    None => respond(&mut stream, status, b"", head),
                }
            }
            (Some(blob), _, _) => self.serve_blob(&mut stream, &container, &blob, head),
            _ => respond(&mut stream, 400, b"", head),
        }
    }

    fn serve_blob(&self, stream: &mut TcpStream, container: &str, blob: &str, head: bool) {
        self.counters.blob_requests.fetch_add(1, Ordering::SeqCst);
        let now = self.counters.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let (canned, delay) = {
            let state = self.state.lock().unwrap();
            (state.blobs.get(&format!("{container}/{blob}")).cloned(), state.blob_delay)
        };
        thread::sleep(delay);
        match canned {
            Some(c) => respond(stream, c.status, &c.body, head),
            None => respond(stream, 404, b"BlobNotFound", head),
        }

        self.counters.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Reads until the end of the request headers.
fn read_request(stream: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
        if buf.len() > 64 * 1024 {
            break;
        }
    }
    if buf.is_empty() {
        return None;
    }
    String::from_utf8(buf).ok()
}

fn respond(stream: &mut TcpStream, status: u16, body: &[u8], head: bool) {
    let reason = match status {
        200 => "OK",
        400 => "Bad Request",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    };
    let header = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nContent-Type: application/xml\r\nConnection: close\r\n\r\n",
        status,
        reason,
        if head { 0 } else { body.len() }
    );
    let _ = stream.write_all(header.as_bytes());
    if !head {
        let _ = stream.write_all(body);
    }
    let _ = stream.flush();
}
