//! Network transfer primitives: the synchronous reachability probe and the
//! blocking GET used by the remote fetch helper.

mod curl;
mod scripted;

pub use self::curl::{CurlOptions, CurlTransport};
pub use scripted::{ScriptedResponse, ScriptedTransport};

/// Response body of a successful GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedBody {
    pub bytes: Vec<u8>,
    /// `Content-Type` header, if the server sent one.
    pub content_type: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Curl reported an error (timeout, connection, refused HEAD, etc.).
    #[error("curl: {0}")]
    Curl(#[from] ::curl::Error),
    /// Response had a non-2xx status.
    #[error("HTTP {0}")]
    Status(u32),
    /// Transport unavailable or refused the request outright.
    #[error("{0}")]
    Refused(String),
}

/// Network access used by the origin guard and the remote fetch helper.
pub trait Transport: Send + Sync {
    /// Synchronous HEAD; returns the final status code.
    /// Runs on the calling thread; see `origin::is_cross_origin_reachable`.
    fn head_status(&self, url: &str) -> Result<u32, TransportError>;

    /// Blocking GET. Non-2xx responses are `TransportError::Status`.
    /// Call from `spawn_blocking` if used from async code.
    fn get(&self, url: &str) -> Result<FetchedBody, TransportError>;
}
