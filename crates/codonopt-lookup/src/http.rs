use std::error::Error as StdError;
use std::io;
use std::time::Duration;

use tracing::debug;

use crate::transport::{Transport, TransportError};

/// Blocking HTTP(S) transport backed by a shared `ureq` agent.
pub struct HttpTransport {
    agent: ureq::Agent,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .user_agent(concat!("codonopt/", env!("CARGO_PKG_VERSION")))
                .build(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HttpTransport {
    fn fetch(&self, url: &str, timeout: Duration) -> Result<String, TransportError> {
        debug!(url, ?timeout, "GET");
        let response = self
            .agent
            .get(url)
            .timeout(timeout)
            .call()
            .map_err(|err| match err {
                ureq::Error::Status(code, _) => TransportError::Status(code),
                ureq::Error::Transport(transport) => classify(&transport, timeout),
            })?;
        response
            .into_string()
            .map_err(|err| classify(&err, timeout))
    }
}

fn classify(err: &(dyn StdError + 'static), timeout: Duration) -> TransportError {
    if is_timeout(err) {
        TransportError::Timeout(timeout)
    } else {
        TransportError::Connection(err.to_string())
    }
}

/// Whether `err` or any of its sources is an I/O timeout.
fn is_timeout(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(err) = current {
        if let Some(io_err) = err.downcast_ref::<io::Error>() {
            if matches!(
                io_err.kind(),
                io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
            ) {
                return true;
            }
        }
        current = err.source();
    }
    false
}
