//! CLI for the saveas dispatcher.

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use saveas_core::config;
use saveas_core::host::HostProfile;

use commands::{run_completions, run_config, run_man, run_probe, run_save, SaveArgs};

/// Top-level CLI for saveas.
#[derive(Debug, Parser)]
#[command(name = "saveas")]
#[command(about = "saveas: save blobs and URLs through the best download primitive a host supports", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Simulated host environments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Profile {
    /// Current desktop browser (download attribute).
    Desktop,
    /// Only the blocking save-or-open blob primitive.
    LegacyBlob,
    /// Safari without download attribute support.
    OldSafari,
    /// WebView embedded in a native macOS app.
    MacosWebview,
    /// Chrome on iOS.
    ChromeIos,
    /// No document at all.
    Headless,
}

impl Profile {
    pub fn host_profile(self) -> HostProfile {
        match self {
            Profile::Desktop => HostProfile::desktop(),
            Profile::LegacyBlob => HostProfile::legacy_blob(),
            Profile::OldSafari => HostProfile::old_safari(),
            Profile::MacosWebview => HostProfile::macos_webview(),
            Profile::ChromeIos => HostProfile::chrome_ios(),
            Profile::Headless => HostProfile::headless(),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Classify a simulated host and show the strategy it gets.
    Probe {
        #[arg(long, value_enum, default_value = "desktop")]
        profile: Profile,
        /// Override the profile's user agent.
        #[arg(long, value_name = "UA")]
        user_agent: Option<String>,
        /// Remove anchor download attribute support.
        #[arg(long)]
        no_download_attr: bool,
        /// Add the legacy save-or-open blob primitive.
        #[arg(long)]
        legacy_blob: bool,
        /// Mark the host as Safari-family.
        #[arg(long)]
        safari: bool,
        /// Remove the ability to read blobs into data URLs.
        #[arg(long)]
        no_file_reader: bool,
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Save a local file or an HTTP(S) URL.
    Save {
        /// Local file path or http(s):// URL.
        source: String,
        /// Suggested file name.
        #[arg(long)]
        name: Option<String>,
        /// MIME type for a local file (default application/octet-stream).
        #[arg(long)]
        mime: Option<String>,
        /// Prepend a UTF-8 BOM to UTF-8 text and XML content.
        #[arg(long)]
        auto_bom: bool,
        /// Download directory (default from config, else current directory).
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
        /// Record host calls against a simulated host instead of writing files.
        #[arg(long)]
        dry_run: bool,
        /// Host simulated by --dry-run (default desktop).
        #[arg(long, value_enum, requires = "dry_run")]
        profile: Option<Profile>,
    },

    /// Show the configuration file path and effective settings.
    Config,

    /// Print shell completions to stdout.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Print the man page (roff) to stdout.
    Man,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Probe {
                profile,
                user_agent,
                no_download_attr,
                legacy_blob,
                safari,
                no_file_reader,
                json,
            } => {
                let mut host = profile.host_profile();
                if user_agent.is_some() {
                    host.user_agent = user_agent;
                }
                host.anchor_download &= !no_download_attr;
                host.legacy_save_blob |= legacy_blob;
                host.safari_family |= safari;
                host.data_url_reader &= !no_file_reader;
                run_probe(host, json)?;
            }
            CliCommand::Save {
                source,
                name,
                mime,
                auto_bom,
                dir,
                dry_run,
                profile,
            } => {
                let args = SaveArgs {
                    source,
                    name,
                    mime,
                    auto_bom,
                    dir,
                    dry_run: dry_run
                        .then(|| profile.unwrap_or(Profile::Desktop).host_profile()),
                };
                run_save(&cfg, args).await?;
            }
            CliCommand::Config => run_config(&cfg)?,
            CliCommand::Completions { shell } => run_completions(shell, &mut Cli::command()),
            CliCommand::Man => run_man(Cli::command())?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
