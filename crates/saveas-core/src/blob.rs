//! Save request model: in-memory blobs, URL content, and options.

use std::fmt;
use std::sync::{Arc, Once};

/// File name used when neither the caller nor the blob supplies one.
pub const DEFAULT_NAME: &str = "download";

/// Immutable in-memory binary object with a MIME type and optional name.
///
/// Cloning is cheap; the bytes are shared.
#[derive(Clone, PartialEq, Eq)]
pub struct Blob {
    bytes: Arc<[u8]>,
    mime: String,
    name: Option<String>,
}

impl Blob {
    pub fn new(bytes: impl Into<Vec<u8>>, mime: impl Into<String>) -> Self {
        Self {
            bytes: Arc::from(bytes.into()),
            mime: mime.into(),
            name: None,
        }
    }

    /// Attaches a file name, as a `File` object carries one.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for Blob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blob")
            .field("len", &self.bytes.len())
            .field("mime", &self.mime)
            .field("name", &self.name)
            .finish()
    }
}

/// What is being saved: bytes already in memory, or a URL to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveContent {
    Blob(Blob),
    Url(String),
}

impl From<Blob> for SaveContent {
    fn from(blob: Blob) -> Self {
        SaveContent::Blob(blob)
    }
}

impl From<String> for SaveContent {
    fn from(url: String) -> Self {
        SaveContent::Url(url)
    }
}

impl From<&str> for SaveContent {
    fn from(url: &str) -> Self {
        SaveContent::Url(url.to_string())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveOptions {
    /// Prepend a UTF-8 BOM to UTF-8 text and XML blobs.
    pub auto_bom: bool,
}

/// Options as a caller may pass them, including the deprecated boolean form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OptionsArg {
    #[default]
    Absent,
    Options(SaveOptions),
    /// Legacy positional flag meaning "disable auto BOM".
    LegacyFlag(bool),
}

static LEGACY_OPTIONS_WARNING: Once = Once::new();

impl OptionsArg {
    /// Coerces to `SaveOptions`. The legacy flag is inverted into `auto_bom`
    /// and warned about once per process.
    pub fn resolve(self) -> SaveOptions {
        match self {
            OptionsArg::Absent => SaveOptions::default(),
            OptionsArg::Options(opts) => opts,
            OptionsArg::LegacyFlag(disable_bom) => {
                LEGACY_OPTIONS_WARNING.call_once(|| {
                    tracing::warn!("Deprecated: expected save options to be a SaveOptions value");
                });
                SaveOptions {
                    auto_bom: !disable_bom,
                }
            }
        }
    }
}

impl From<SaveOptions> for OptionsArg {
    fn from(opts: SaveOptions) -> Self {
        OptionsArg::Options(opts)
    }
}

impl From<Option<SaveOptions>> for OptionsArg {
    fn from(opts: Option<SaveOptions>) -> Self {
        opts.map_or(OptionsArg::Absent, OptionsArg::Options)
    }
}

impl From<bool> for OptionsArg {
    fn from(flag: bool) -> Self {
        OptionsArg::LegacyFlag(flag)
    }
}

/// A single save action. Consumed exactly once by the selected executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub content: SaveContent,
    pub name: Option<String>,
    pub options: SaveOptions,
}

impl SaveRequest {
    pub fn new(
        content: impl Into<SaveContent>,
        name: Option<&str>,
        options: impl Into<OptionsArg>,
    ) -> Self {
        Self {
            content: content.into(),
            name: name.map(str::to_string),
            options: options.into().resolve(),
        }
    }

    /// Effective file name: suggested name, then the blob's own name, then `"download"`.
    /// Empty strings count as absent.
    pub fn resolved_name(&self) -> String {
        let blob_name = match &self.content {
            SaveContent::Blob(blob) => blob.name(),
            SaveContent::Url(_) => None,
        };
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(blob_name.filter(|n| !n.is_empty()))
            .unwrap_or(DEFAULT_NAME)
            .to_string()
    }
}
