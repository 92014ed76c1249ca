//! UTF-8 byte-order-mark injection for text and XML blobs.

use regex::Regex;
use std::sync::LazyLock;

use crate::blob::{Blob, SaveOptions};

/// UTF-8 encoding of U+FEFF.
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// `text/*`, `application/xml` and `*+xml` types that declare `charset=utf-8`.
static UTF8_TEXT_MIME: LazyLock<Regex> = LazyLock::new(|| {
    // Static pattern, safe to panic
    Regex::new(r"(?i)^\s*(?:text/\S*|application/xml|\S*/\S*\+xml)\s*;.*charset\s*=\s*utf-8")
        .expect("BOM MIME pattern is valid")
});

/// True when `mime` is a UTF-8 text or XML type that gets a BOM under `auto_bom`.
pub fn wants_bom(mime: &str) -> bool {
    UTF8_TEXT_MIME.is_match(mime)
}

/// Returns a new blob with the BOM prepended when `auto_bom` is set and the
/// MIME type matches; otherwise returns the input untouched.
pub fn apply(blob: Blob, options: &SaveOptions) -> Blob {
    if !options.auto_bom || !wants_bom(blob.mime()) {
        return blob;
    }
    let mut bytes = Vec::with_capacity(UTF8_BOM.len() + blob.len());
    bytes.extend_from_slice(&UTF8_BOM);
    bytes.extend_from_slice(blob.bytes());
    let out = Blob::new(bytes, blob.mime());
    match blob.name() {
        Some(name) => out.with_name(name),
        None => out,
    }
}
