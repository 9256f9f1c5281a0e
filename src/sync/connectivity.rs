use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

/// Whether the device currently has a network path.
/// Only used to tell `Offline` from `Error` after a failed delivery.
pub trait Connectivity {
    fn is_online(&self) -> bool;
}

impl<C: Connectivity + ?Sized> Connectivity for &C {
    fn is_online(&self) -> bool {
        (**self).is_online()
    }
}

/// Fixed answer, for callers that already know (and for tests).
#[derive(Debug, Clone, Copy)]
pub struct StaticConnectivity(pub bool);

impl Connectivity for StaticConnectivity {
    fn is_online(&self) -> bool {
        self.0
    }
}

const DEFAULT_HOST: &str = "script.google.com:443";

/// Resolves the webhook host and opens (then drops) a TCP connection to it.
pub struct SystemConnectivity {
    target: String,
    timeout: Duration,
}

impl SystemConnectivity {
    /// Try the host of `endpoint`, or the default Apps Script host when the
    /// endpoint is missing or not a URL.
    pub fn for_endpoint(endpoint: Option<&str>, timeout: Duration) -> Self {
        let target = endpoint
            .and_then(|e| reqwest::Url::parse(e).ok())
            .and_then(|u| {
                let host = u.host_str()?.to_string();
                let port = u.port_or_known_default()?;
                Some(format!("{}:{}", host, port))
            })
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        Self { target, timeout }
    }
}

impl Connectivity for SystemConnectivity {
    fn is_online(&self) -> bool {
        let Ok(addrs) = self.target.to_socket_addrs() else {
            return false;
        };
        addrs
            .into_iter()
            .any(|addr| TcpStream::connect_timeout(&addr, self.timeout).is_ok())
    }
}
