//! Base64 data-URL encoding for hosts that cannot download object-URLs.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::host::HostError;

/// Generic binary MIME, also used when a blob declares none.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// MIME that makes Safari-family hosts treat a data-URL as a file to save.
pub const ATTACHMENT_MIME: &str = "attachment/file";

/// Encodes `blob` as `data:<mime>;base64,<payload>`.
pub fn encode(blob: &crate::blob::Blob) -> String {
    let mime = if blob.mime().is_empty() {
        OCTET_STREAM
    } else {
        blob.mime()
    };
    format!("data:{};base64,{}", mime, STANDARD.encode(blob.bytes()))
}

/// Rewrites the leading `data:<type>;` to `data:attachment/file;`.
/// URLs without a `;` after the type are returned unchanged.
pub fn force_attachment(url: &str) -> String {
    let Some(rest) = url.strip_prefix("data:") else {
        return url.to_string();
    };
    match rest.find(';') {
        Some(idx) => format!("data:{};{}", ATTACHMENT_MIME, &rest[idx + 1..]),
        None => url.to_string(),
    }
}

/// A decoded data-URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedDataUrl {
    /// Everything between `data:` and the payload, minus `;base64`.
    pub media_type: String,
    pub bytes: Vec<u8>,
}

/// Decodes a `data:` URL. Non-base64 payloads are taken verbatim.
pub fn decode(url: &str) -> Result<DecodedDataUrl, HostError> {
    let rest = url.strip_prefix("data:").ok_or(HostError::BadDataUrl)?;
    let (header, payload) = rest.split_once(',').ok_or(HostError::BadDataUrl)?;
    match header.strip_suffix(";base64") {
        Some(media_type) => {
            let bytes = STANDARD
                .decode(payload.trim())
                .map_err(|_| HostError::BadDataUrl)?;
            Ok(DecodedDataUrl {
                media_type: media_type.to_string(),
                bytes,
            })
        }
        None => Ok(DecodedDataUrl {
            media_type: header.to_string(),
            bytes: payload.as_bytes().to_vec(),
        }),
    }
}
