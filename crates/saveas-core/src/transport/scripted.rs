//! Scripted transport for dry runs and tests: no network, canned answers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{FetchedBody, Transport, TransportError};

/// Canned answer for one URL.
#[derive(Debug, Clone)]
pub enum ScriptedResponse {
    /// HEAD returns 200; GET returns this body.
    Ok(FetchedBody),
    /// Both HEAD and GET report this status.
    Status(u32),
    /// The request is refused before any response (network error).
    Refused,
}

/// Transport that answers from a fixed table and counts calls.
/// Unknown URLs are refused.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: Mutex<HashMap<String, ScriptedResponse>>,
    head_calls: AtomicUsize,
    get_calls: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, url: &str, response: ScriptedResponse) -> Self {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(url.to_string(), response);
        self
    }

    /// Shorthand for a reachable URL serving `bytes` as `content_type`.
    pub fn serve(self, url: &str, bytes: &[u8], content_type: &str) -> Self {
        self.respond(
            url,
            ScriptedResponse::Ok(FetchedBody {
                bytes: bytes.to_vec(),
                content_type: Some(content_type.to_string()),
            }),
        )
    }

    pub fn head_calls(&self) -> usize {
        self.head_calls.load(Ordering::SeqCst)
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    fn lookup(&self, url: &str) -> Option<ScriptedResponse> {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(url)
            .cloned()
    }
}

impl Transport for ScriptedTransport {
    fn head_status(&self, url: &str) -> Result<u32, TransportError> {
        self.head_calls.fetch_add(1, Ordering::SeqCst);
        match self.lookup(url) {
            Some(ScriptedResponse::Ok(_)) => Ok(200),
            Some(ScriptedResponse::Status(code)) => Ok(code),
            Some(ScriptedResponse::Refused) | None => Err(TransportError::Refused(format!(
                "HEAD {} refused",
                url
            ))),
        }
    }

    fn get(&self, url: &str) -> Result<FetchedBody, TransportError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        match self.lookup(url) {
            Some(ScriptedResponse::Ok(body)) => Ok(body),
            Some(ScriptedResponse::Status(code)) => Err(TransportError::Status(code)),
            Some(ScriptedResponse::Refused) | None => {
                Err(TransportError::Refused(format!("GET {} refused", url)))
            }
        }
    }
}
