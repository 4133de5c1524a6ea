//! CLI argument definitions for envm-fetch.
//!
//! Kept apart from the entrypoint so that parsing can be unit tested and
//! the binary stays focused on orchestration.

use crate::config::ConfigOverrides;
use crate::package::ARCHIVE_KIND;
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// List, download, and verify Go toolchain packages.
#[derive(Parser, Debug)]
#[command(name = "envm-fetch")]
#[command(version, about)]
#[command(long_about = concat!(
    "List, download, and verify Go toolchain packages.\n\n",
    "The published download listing is scraped into a catalog of stable and ",
    "archived versions. A package is chosen by kind, operating system, and ",
    "architecture, downloaded through a temporary file, and verified against ",
    "the checksum published alongside it.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  List stable versions:\n",
    "    $ envm-fetch list --stable\n\n",
    "  Download and verify the host archive of a version:\n",
    "    $ envm-fetch fetch 1.21.0 --dest ~/.envm/downloads\n\n",
    "  Verify a file downloaded earlier:\n",
    "    $ envm-fetch verify go1.21.0.linux-amd64.tar.gz --version 1.21.0\n\n",
    "ENVIRONMENT:\n",
    "  ENVM_SOURCE_URL   listing location (overridden by --source)\n",
    "  RUST_LOG          log filter (overrides -v/-q)",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List versions from the download listing.
    List(ListArgs),

    /// Download and verify a package.
    Fetch(FetchArgs),

    /// Verify an already downloaded package.
    Verify(VerifyArgs),
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Listing location [default: the public Go download listing].
    #[arg(long, global = true, value_name = "URL")]
    pub source: Option<String>,

    /// Configuration file [default: envm/fetch.toml in the user config directory].
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Request timeout in seconds; 0 disables it. Downloads only wait
    /// this long to connect and for the response head.
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Do not render download progress.
    #[arg(long, global = true)]
    pub no_progress: bool,

    /// Increase log verbosity (repeatable: -v, -vv, -vvv).
    #[arg(
        short,
        long = "verbose",
        global = true,
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Suppress status output (errors still shown).
    #[arg(short, long, global = true, conflicts_with = "verbosity")]
    pub quiet: bool,
}

impl GlobalArgs {
    /// The configuration layer these flags contribute.
    #[must_use]
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            source_url: self.source.clone(),
            timeout_secs: self.timeout,
            no_progress: self.no_progress,
        }
    }

    /// Default log filter implied by `-v`/`-q`.
    #[must_use]
    pub const fn log_level(&self) -> log::LevelFilter {
        if self.quiet {
            return log::LevelFilter::Error;
        }
        match self.verbosity {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

/// Arguments for the list command.
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Only stable versions.
    #[arg(long, conflicts_with = "archived")]
    pub stable: bool,

    /// Only archived versions.
    #[arg(long)]
    pub archived: bool,

    /// Output in JSON format for scripting.
    #[arg(long)]
    pub json: bool,
}

/// Package selection shared by `fetch` and `verify`.
#[derive(Args, Debug, Clone)]
pub struct PlatformArgs {
    /// Package kind (Archive, Installer, or Source).
    #[arg(long, default_value = ARCHIVE_KIND)]
    pub kind: String,

    /// Operating system as used in file names.
    #[arg(long, default_value_t = host_os())]
    pub os: String,

    /// Architecture as used in file names.
    #[arg(long, default_value_t = host_arch())]
    pub arch: String,
}

impl Default for PlatformArgs {
    /// The host's archive package.
    fn default() -> Self {
        Self {
            kind: ARCHIVE_KIND.to_owned(),
            os: host_os(),
            arch: host_arch(),
        }
    }
}

/// Arguments for the fetch command.
#[derive(Args, Debug, Clone)]
pub struct FetchArgs {
    /// Version to download (e.g. `1.21.0` or `go1.21.0`).
    #[arg(value_name = "VERSION")]
    pub version: String,

    /// Package selection.
    #[command(flatten)]
    pub platform: PlatformArgs,

    /// Directory the package is written to.
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub dest: Utf8PathBuf,
}

/// Arguments for the verify command.
#[derive(Args, Debug, Clone)]
pub struct VerifyArgs {
    /// Downloaded file to verify.
    #[arg(value_name = "FILE")]
    pub file: Utf8PathBuf,

    /// Version the file belongs to.
    #[arg(long = "version", value_name = "VERSION")]
    pub version: String,

    /// Package selection.
    #[command(flatten)]
    pub platform: PlatformArgs,
}

/// Host operating system in the naming used by package files.
#[must_use]
pub fn host_os() -> String {
    match std::env::consts::OS {
        "macos" => "darwin".to_owned(),
        other => other.to_owned(),
    }
}

/// Host architecture in the naming used by package files.
#[must_use]
pub fn host_arch() -> String {
    match std::env::consts::ARCH {
        "x86_64" => "amd64".to_owned(),
        "x86" => "386".to_owned(),
        "aarch64" => "arm64".to_owned(),
        other => other.to_owned(),
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
