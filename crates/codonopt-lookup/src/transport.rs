use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("connection failed: {0}")]
    Connection(String),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
}

/// Fetches the body of a URL. Implementations must be shareable across the
/// worker pool.
pub trait Transport: Send + Sync {
    fn fetch(&self, url: &str, timeout: Duration) -> Result<String, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn fetch(&self, url: &str, timeout: Duration) -> Result<String, TransportError> {
        (**self).fetch(url, timeout)
    }
}
