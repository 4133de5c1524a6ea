//! Error types for the envm fetch CLI.
//!
//! Each stage of acquisition has its own error enum next to the code that
//! raises it. [`FetchError`] gathers them for callers that drive the whole
//! pipeline.

use crate::artefact::download::DownloadError;
use crate::artefact::verification::VerifyError;
use crate::catalog::collector::CatalogError;
use crate::config::ConfigError;
use crate::resolution::ResolveError;
use thiserror::Error;

/// Errors that can occur while listing, fetching, or verifying packages.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The listing could not be collected.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// No package matched the requested platform.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The package could not be downloaded.
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// The downloaded file failed verification.
    #[error(transparent)]
    Verify(#[from] VerifyError),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The listing was fetched but yielded no versions.
    #[error("the download listing contains no versions; its layout may have changed")]
    EmptyCatalog,

    /// The requested version is not in the listing.
    #[error("version {version} is not listed; run `envm-fetch list` to see available versions")]
    VersionNotFound {
        /// The version that was requested.
        version: String,
    },

    /// The resolved package publishes no checksum to verify against.
    #[error("package {file_name} has no published checksum")]
    MissingChecksum {
        /// File name of the package.
        file_name: String,
    },

    /// Serialising output failed.
    #[error("failed to encode output")]
    Encode(#[from] serde_json::Error),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result alias for fetch operations.
pub type Result<T> = std::result::Result<T, FetchError>;
