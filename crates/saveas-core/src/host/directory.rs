//! Native host whose download manager writes files into a directory.
//!
//! Object-URLs are entries in an in-process table; clicks and navigations
//! resolve `blob:`, `data:` and `http(s):` hrefs and write the bytes to
//! `<dir>/<name>` via a `.part` temp file and an atomic no-clobber link.
//! Existing files are never overwritten.

use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use super::filename::{filename_from_url_path, sanitize_filename};
use super::{Anchor, Host, HostError, PopupId};
use crate::blob::{Blob, DEFAULT_NAME};
use crate::data_url;
use crate::transport::Transport;

/// Suffix of in-progress temp files.
const TEMP_SUFFIX: &str = ".part";

pub struct DirectoryHost {
    dir: PathBuf,
    origin: String,
    transport: Arc<dyn Transport>,
    object_urls: Mutex<HashMap<String, Blob>>,
    written: Mutex<Vec<PathBuf>>,
    next_id: AtomicU64,
}

impl DirectoryHost {
    pub fn new(dir: impl Into<PathBuf>, origin: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            dir: dir.into(),
            origin: origin.into(),
            transport,
            object_urls: Mutex::new(HashMap::new()),
            written: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files written so far, in order.
    pub fn written(&self) -> Vec<PathBuf> {
        self.written
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of object-URLs not yet revoked.
    pub fn live_object_urls(&self) -> usize {
        self.object_urls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    /// Resolves `href` to bytes and writes them under `name`.
    fn materialize(&self, href: &str, name: &str) -> Result<PathBuf, HostError> {
        let bytes = if href.starts_with("blob:") {
            self.object_urls
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .get(href)
                .map(|blob| blob.bytes().to_vec())
                .ok_or_else(|| HostError::UnknownObjectUrl(href.to_string()))?
        } else if href.starts_with("data:") {
            data_url::decode(href)?.bytes
        } else if href.starts_with("http://") || href.starts_with("https://") {
            self.transport.get(href)?.bytes
        } else {
            return Err(HostError::UnsupportedHref(href.to_string()));
        };
        self.write_file(name, &bytes)
    }

    fn write_file(&self, name: &str, bytes: &[u8]) -> Result<PathBuf, HostError> {
        std::fs::create_dir_all(&self.dir)?;
        let name = sanitize_filename(name).unwrap_or_else(|| DEFAULT_NAME.to_string());

        let mut temp = tempfile::Builder::new()
            .prefix(".saveas-")
            .suffix(TEMP_SUFFIX)
            .tempfile_in(&self.dir)?;
        temp.write_all(bytes)?;
        temp.as_file().sync_all()?;

        // persist_noclobber fails atomically when the target exists, so
        // concurrent saves of one name each land on their own path.
        let mut n = 0u32;
        let final_path = loop {
            let candidate = numbered_path(&self.dir, &name, n);
            match temp.persist_noclobber(&candidate) {
                Ok(_) => break candidate,
                Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => {
                    temp = err.file;
                    n += 1;
                }
                Err(err) => return Err(err.error.into()),
            }
        };

        tracing::info!(path = %final_path.display(), bytes = bytes.len(), "saved file");
        self.written
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(final_path.clone());
        Ok(final_path)
    }

    /// Navigations carry no download name; use the URL path or the default.
    fn navigation_name(url: &str) -> String {
        filename_from_url_path(url).unwrap_or_else(|| DEFAULT_NAME.to_string())
    }
}

/// `dir/name` for `n == 0`, else `dir/stem (n).ext`.
fn numbered_path(dir: &Path, name: &str, n: u32) -> PathBuf {
    if n == 0 {
        return dir.join(name);
    }
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => dir.join(format!("{} ({}).{}", stem, n, ext)),
        _ => dir.join(format!("{} ({})", name, n)),
    }
}

impl Host for DirectoryHost {
    fn has_document(&self) -> bool {
        true
    }

    fn user_agent(&self) -> Option<String> {
        Some(format!("saveas/{}", env!("CARGO_PKG_VERSION")))
    }

    fn anchor_supports_download(&self) -> bool {
        true
    }

    fn has_legacy_save_blob(&self) -> bool {
        true
    }

    fn is_safari_family(&self) -> bool {
        false
    }

    fn can_read_data_url(&self) -> bool {
        true
    }

    fn origin(&self) -> String {
        self.origin.clone()
    }

    fn dispatch_click(&self, anchor: &Anchor) -> Result<(), HostError> {
        if anchor.opens_new_context() {
            // Opened rather than downloaded: no download name applies.
            tracing::info!(href = %anchor.href, "opening link in new context");
            self.materialize(&anchor.href, &Self::navigation_name(&anchor.href))?;
        } else {
            self.materialize(&anchor.href, &anchor.download)?;
        }
        Ok(())
    }

    fn dispatch_legacy_click(&self, anchor: &Anchor) -> Result<(), HostError> {
        self.dispatch_click(anchor)
    }

    fn create_object_url(&self, blob: &Blob) -> String {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let url = format!("blob:{}/{}", self.origin, id);
        self.object_urls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(url.clone(), blob.clone());
        url
    }

    fn revoke_object_url(&self, url: &str) {
        self.object_urls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(url);
    }

    fn open_popup(&self) -> Option<PopupId> {
        Some(PopupId(self.next_id.fetch_add(1, Ordering::Relaxed)))
    }

    fn set_popup_placeholder(&self, popup: PopupId, text: &str) {
        tracing::debug!(popup = popup.0, text, "popup placeholder");
    }

    fn navigate_popup(&self, popup: PopupId, url: &str) -> Result<(), HostError> {
        tracing::debug!(popup = popup.0, "popup navigated");
        self.materialize(url, &Self::navigation_name(url))?;
        Ok(())
    }

    fn navigate_current(&self, url: &str) -> Result<(), HostError> {
        self.materialize(url, &Self::navigation_name(url))?;
        Ok(())
    }

    fn legacy_save_or_open(&self, blob: &Blob, name: &str) -> Result<(), HostError> {
        self.write_file(name, blob.bytes())?;
        Ok(())
    }
}
