//! libcurl transport (via the `curl` crate).

use std::str;
use std::time::Duration;

use super::{FetchedBody, Transport, TransportError};
use crate::config::SaverConfig;

/// Timeouts and identification for curl handles.
#[derive(Debug, Clone)]
pub struct CurlOptions {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub probe_timeout: Duration,
    pub user_agent: String,
}

impl Default for CurlOptions {
    fn default() -> Self {
        Self::from_config(&SaverConfig::default())
    }
}

impl CurlOptions {
    pub fn from_config(cfg: &SaverConfig) -> Self {
        Self {
            connect_timeout: cfg.connect_timeout(),
            request_timeout: cfg.request_timeout(),
            probe_timeout: cfg.probe_timeout(),
            user_agent: cfg
                .user_agent
                .clone()
                .unwrap_or_else(default_user_agent),
        }
    }
}

fn default_user_agent() -> String {
    format!("saveas/{}", env!("CARGO_PKG_VERSION"))
}

/// Transport backed by one libcurl easy handle per request.
#[derive(Debug, Clone, Default)]
pub struct CurlTransport {
    options: CurlOptions,
}

impl CurlTransport {
    pub fn new(options: CurlOptions) -> Self {
        Self { options }
    }

    fn easy(&self, url: &str, timeout: Duration) -> Result<curl::easy::Easy, TransportError> {
        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.useragent(&self.options.user_agent)?;
        easy.connect_timeout(self.options.connect_timeout)?;
        easy.timeout(timeout)?;
        Ok(easy)
    }
}

impl Transport for CurlTransport {
    fn head_status(&self, url: &str) -> Result<u32, TransportError> {
        let mut easy = self.easy(url, self.options.probe_timeout)?;
        easy.nobody(true)?; // HEAD request
        easy.perform()?;
        let code = easy.response_code()?;
        tracing::debug!(url, code, "HEAD probe");
        Ok(code)
    }

    fn get(&self, url: &str) -> Result<FetchedBody, TransportError> {
        let mut body = Vec::new();
        let mut headers: Vec<String> = Vec::new();
        let mut easy = self.easy(url, self.options.request_timeout)?;

        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    headers.push(s.trim_end().to_string());
                }
                true
            })?;
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(TransportError::Status(code));
        }

        Ok(FetchedBody {
            bytes: body,
            content_type: content_type(&headers),
        })
    }
}

/// Last `Content-Type` in the collected header lines (redirects repeat headers).
fn content_type(lines: &[String]) -> Option<String> {
    lines
        .iter()
        .filter_map(|line| line.split_once(':'))
        .filter(|(name, _)| name.trim().eq_ignore_ascii_case("content-type"))
        .map(|(_, value)| value.trim().to_string())
        .last()
}
