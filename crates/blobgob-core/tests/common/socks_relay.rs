//! Minimal SOCKS5 relay for integration tests.
//!
//! No authentication, CONNECT only. Accepts IPv4, IPv6 and domain targets,
//! then pipes bytes both ways. Counts the tunnels it opened so tests can
//! check that traffic really went through the proxy.

use std::io::{self, Read, Write};
use std::net::{Ipv4Addr, Ipv6Addr, Shutdown, TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Clone)]
pub struct SocksRelay {
    addr: String,
    connections: Arc<AtomicUsize>,
    targets: Arc<Mutex<Vec<String>>>,
}

impl SocksRelay {
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let relay = SocksRelay {
            addr: listener.local_addr().unwrap().to_string(),
            connections: Arc::new(AtomicUsize::new(0)),
            targets: Arc::new(Mutex::new(Vec::new())),
        };
        let accept = relay.clone();
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let relay = accept.clone();
                thread::spawn(move || {
                    let _ = relay.handle(stream);
                });
            }
        });
        relay
    }

    /// `host:port` to hand to the client as its proxy.
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Number of CONNECT tunnels established.
    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    /// `host:port` of every CONNECT request, in arrival order.
    pub fn targets(&self) -> Vec<String> {
        self.targets.lock().unwrap().clone()
    }

    fn handle(&self, mut client: TcpStream) -> io::Result<()> {
        client.set_read_timeout(Some(Duration::from_secs(10)))?;

        // Greeting: VER NMETHODS METHODS...
        let mut head = [0u8; 2];
        client.read_exact(&mut head)?;
        let mut methods = vec![0u8; head[1] as usize];
        client.read_exact(&mut methods)?;
        if head[0] != 5 || !methods.contains(&0) {
            client.write_all(&[5, 0xff])?;
            return Ok(());
        }
        client.write_all(&[5, 0])?;

        // Request: VER CMD RSV ATYP DST.ADDR DST.PORT
        let mut req = [0u8; 4];
        client.read_exact(&mut req)?;
        if req[1] != 1 {
            client.write_all(&[5, 7, 0, 1, 0, 0, 0, 0, 0, 0])?;
            return Ok(());
        }
        let host = match req[3] {
            1 => {
                let mut ip = [0u8; 4];
                client.read_exact(&mut ip)?;
                Ipv4Addr::from(ip).to_string()
            }
            3 => {
                let mut len = [0u8; 1];
                client.read_exact(&mut len)?;
                let mut name = vec![0u8; len[0] as usize];
                client.read_exact(&mut name)?;
                String::from_utf8_lossy(&name).into_owned()
            }
            4 => {
                let mut ip = [0u8; 16];
                client.read_exact(&mut ip)?;
                format!("[{}]", Ipv6Addr::from(ip))
            }
            _ => {
                client.write_all(&[5, 8, 0, 1, 0, 0, 0, 0, 0, 0])?;
                return Ok(());
            }
        };
        let mut port = [0u8; 2];
        client.read_exact(&mut port)?;
        let target = format!("{}:{}", host, u16::from_be_bytes(port));

        let upstream = match TcpStream::connect(&target) {
            Ok(s) => s,
            Err(_) => {
                client.write_all(&[5, 5, 0, 1, 0, 0, 0, 0, 0, 0])?;
                return Ok(());
            }
        };
        client.write_all(&[5, 0, 0, 1, 0, 0, 0, 0, 0, 0])?;
        self.connections.fetch_add(1, Ordering::SeqCst);
        self.targets.lock().unwrap().push(target);

        client.set_read_timeout(None)?;
        let mut client_rd = client.try_clone()?;
        let mut upstream_wr = upstream.try_clone()?;
        let uplink = thread::spawn(move || {
            let _ = io::copy(&mut client_rd, &mut upstream_wr);
            let _ = upstream_wr.shutdown(Shutdown::Write);
        });
        let mut upstream_rd = upstream;
        let _ = io::copy(&mut upstream_rd, &mut client);
        let _ = client.shutdown(Shutdown::Write);
        let _ = uplink.join();
        Ok(())
    }
}
