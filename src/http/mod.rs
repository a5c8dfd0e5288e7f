//! HTTP transport for resolved requests
//!
//! The engine talks to the network only through the [`Transport`] trait so
//! runs can be driven by a scripted transport in tests.

mod transport;

pub use transport::{ReqwestTransport, Transport};

/// Raw outcome of an HTTP exchange, before normalization
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    /// Reason phrase of the status, when known
    pub reason: Option<String>,
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Whether the server returned any payload bytes
    pub fn has_payload(&self) -> bool {
        !self.body.is_empty()
    }

    /// Body as text, replacing invalid UTF-8
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
