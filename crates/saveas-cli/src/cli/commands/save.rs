//! `saveas save` – save a local file or URL into a directory.
//!
//! The real path runs the globally installed saver over a directory host and
//! curl. `--dry-run` swaps in a recording host with no network and prints
//! every host call as a JSON line instead.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use saveas_core::config::SaverConfig;
use saveas_core::data_url::OCTET_STREAM;
use saveas_core::host::{DirectoryHost, HostProfile, RecordingHost};
use saveas_core::registry;
use saveas_core::transport::{CurlOptions, CurlTransport, ScriptedTransport, Transport};
use saveas_core::{Blob, SaveContent, SaveOptions, Saver};

#[derive(Debug)]
pub struct SaveArgs {
    pub source: String,
    pub name: Option<String>,
    pub mime: Option<String>,
    pub auto_bom: bool,
    pub dir: Option<PathBuf>,
    /// Simulated host for a dry run.
    pub dry_run: Option<HostProfile>,
}

pub async fn run_save(cfg: &SaverConfig, args: SaveArgs) -> Result<()> {
    let content = load_content(&args.source, args.mime.as_deref())?;
    let options = SaveOptions {
        auto_bom: args.auto_bom,
    };
    let name = args.name.as_deref();

    if let Some(profile) = args.dry_run {
        let host = Arc::new(RecordingHost::new(profile));
        let saver = Saver::builder(host.clone(), Arc::new(ScriptedTransport::new()))
            .config(cfg.clone())
            .build();
        println!("strategy: {}", saver.strategy());
        saver.save(content, name, options);
        saver.shutdown().await;
        for event in host.events() {
            println!("{}", serde_json::to_string(&event)?);
        }
        return Ok(());
    }

    let dir = match args.dir.or_else(|| cfg.download_dir.clone()) {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let transport: Arc<dyn Transport> = Arc::new(CurlTransport::new(CurlOptions::from_config(cfg)));
    let host = Arc::new(DirectoryHost::new(
        &dir,
        cfg.page_origin.clone(),
        Arc::clone(&transport),
    ));
    let saver = registry::global().install_with(|| {
        Saver::builder(host.clone(), transport)
            .config(cfg.clone())
            .build()
    });

    tracing::info!(source = %args.source, dir = %dir.display(), "save requested");
    saver.save(content, name, options);
    saver.settle().await;
    // Every step has run; release object-URLs now instead of after the grace period.
    saver.shutdown().await;

    let written = host.written();
    if written.is_empty() {
        bail!("nothing was saved from {} (see the log for details)", args.source);
    }
    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// URLs are saved as URLs; anything else is read from disk into a blob named
/// after the file.
fn load_content(source: &str, mime: Option<&str>) -> Result<SaveContent> {
    if is_url(source) {
        return Ok(SaveContent::Url(source.to_string()));
    }
    let path = Path::new(source);
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let mut blob = Blob::new(bytes, mime.unwrap_or(OCTET_STREAM));
    if let Some(file_name) = path.file_name().and_then(|n| n.to_str()) {
        blob = blob.with_name(file_name);
    }
    Ok(blob.into())
}
