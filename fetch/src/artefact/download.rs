//! Package download over HTTP.
//!
//! Provides a trait-based abstraction for fetching a resolved package so
//! that the acquisition pipeline can be tested without network access,
//! plus the `ureq` implementation used in production.

use super::atomic::{AtomicFile, CopyError, copy_observed};
use super::progress::{DownloadState, NoProgress, ProgressObserver};
use crate::catalog::collector::Cause;
use crate::package::Package;
use crate::transport::{FetchOptions, UnexpectedStatus, download_agent};
use camino::Utf8Path;
use log::debug;
use std::fs::File;
use std::io::Read;

/// What to download. Built from a resolved [`Package`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadTarget {
    /// Absolute download location.
    pub url: String,
    /// File name as published.
    pub file_name: String,
    /// Published digest; carried for the caller's verification step.
    pub checksum: String,
    /// Published digest algorithm.
    pub algorithm: String,
}

impl From<&Package> for DownloadTarget {
    fn from(package: &Package) -> Self {
        Self {
            url: package.url.clone(),
            file_name: package.file_name.clone(),
            checksum: package.checksum.clone(),
            algorithm: package.algorithm.clone(),
        }
    }
}

/// Errors arising from package downloads.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// The request failed, the status was not 200, or the body could not
    /// be read.
    #[error("installation package ({url}) download failed")]
    Download {
        /// The location that was requested.
        url: String,
        /// The underlying failure.
        #[source]
        source: Cause,
    },

    /// Creating, writing, or renaming a local file failed.
    #[error("I/O error writing download: {0}")]
    Io(#[from] std::io::Error),

    /// The caller cancelled the download.
    #[error("download of {url} was cancelled")]
    Cancelled {
        /// The location that was being downloaded.
        url: String,
    },
}

impl DownloadError {
    fn download(url: &str, source: impl Into<Cause>) -> Self {
        Self::Download {
            url: url.to_owned(),
            source: source.into(),
        }
    }

    fn from_copy(url: &str, err: CopyError) -> Self {
        match err {
            CopyError::Read(e) => Self::download(url, e),
            CopyError::Write(e) => Self::Io(e),
            CopyError::Cancelled => Self::Cancelled {
                url: url.to_owned(),
            },
        }
    }
}

/// Trait for downloading a package to a local path.
pub trait PackageDownloader {
    /// Stream the package straight into `dest`.
    ///
    /// A failure part-way through may leave a partial file at `dest`.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError`] on request, status, read, or write failure.
    fn download(&self, target: &DownloadTarget, dest: &Utf8Path) -> Result<u64, DownloadError>;

    /// Download through `<dest>.tmp` and rename onto `dest` on success.
    ///
    /// `dest` either does not exist afterwards or holds the complete body.
    /// Progress and state transitions are reported to `observer`.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError`] on request, status, read, write, or rename
    /// failure.
    fn download_atomic(
        &self,
        target: &DownloadTarget,
        dest: &Utf8Path,
        observer: &mut dyn ProgressObserver,
    ) -> Result<u64, DownloadError>;
}

/// HTTP-based downloader using `ureq`.
///
/// # Examples
///
/// ```no_run
/// use camino::Utf8Path;
/// use envm_fetch::artefact::download::{DownloadTarget, HttpDownloader, PackageDownloader};
/// use envm_fetch::artefact::progress::NoProgress;
///
/// let downloader = HttpDownloader::default();
/// let target = DownloadTarget {
///     url: "https://golang.google.cn/dl/go1.21.0.linux-amd64.tar.gz".to_owned(),
///     ..DownloadTarget::default()
/// };
/// let dest = Utf8Path::new("/tmp/go1.21.0.linux-amd64.tar.gz");
/// downloader.download_atomic(&target, dest, &mut NoProgress)?;
/// # Ok::<(), envm_fetch::artefact::download::DownloadError>(())
/// ```
pub struct HttpDownloader {
    agent: ureq::Agent,
    options: FetchOptions,
}

impl HttpDownloader {
    /// Create a downloader honouring the given deadline and cancellation
    /// token.
    #[must_use]
    pub fn new(options: FetchOptions) -> Self {
        Self {
            agent: download_agent(&options),
            options,
        }
    }

    /// Issue the request and return the declared size with the body reader.
    fn open(&self, url: &str) -> Result<(u64, impl Read + use<>), DownloadError> {
        if self.options.is_cancelled() {
            return Err(DownloadError::Cancelled {
                url: url.to_owned(),
            });
        }
        debug!("GET {url}");
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| DownloadError::download(url, e))?;
        let status = response.status().as_u16();
        if status != 200 {
            return Err(DownloadError::download(url, UnexpectedStatus(status)));
        }
        let total = content_length(response.headers());
        Ok((total, response.into_body().into_reader()))
    }

    fn run_atomic(
        &self,
        target: &DownloadTarget,
        dest: &Utf8Path,
        observer: &mut dyn ProgressObserver,
        state: &mut DownloadState,
    ) -> Result<u64, DownloadError> {
        let url = target.url.as_str();
        advance(observer, state, DownloadState::Fetching);
        let mut file = AtomicFile::create(dest)?;
        let (total, mut body) = self.open(url)?;
        advance(observer, state, DownloadState::Writing);
        let written = file
            .fill_from(&mut body, total, observer, &self.options)
            .map_err(|e| DownloadError::from_copy(url, e))?;
        file.commit()?;
        advance(observer, state, DownloadState::Renamed);
        Ok(written)
    }
}

impl Default for HttpDownloader {
    fn default() -> Self {
        Self::new(FetchOptions::default())
    }
}

impl PackageDownloader for HttpDownloader {
    fn download(&self, target: &DownloadTarget, dest: &Utf8Path) -> Result<u64, DownloadError> {
        let url = target.url.as_str();
        let (total, mut body) = self.open(url)?;
        let mut file = File::create(dest.as_std_path())?;
        let written = copy_observed(&mut body, &mut file, total, &mut NoProgress, &self.options)
            .map_err(|e| DownloadError::from_copy(url, e))?;
        debug!("wrote {written} bytes to {dest}");
        Ok(written)
    }

    fn download_atomic(
        &self,
        target: &DownloadTarget,
        dest: &Utf8Path,
        observer: &mut dyn ProgressObserver,
    ) -> Result<u64, DownloadError> {
        let mut state = DownloadState::NotStarted;
        debug!("download state: {state}");
        observer.on_state(state);
        let result = self.run_atomic(target, dest, observer, &mut state);
        if let Err(err) = &result {
            debug!("download of {} failed: {err}", target.url);
            advance(observer, &mut state, DownloadState::Failed);
        }
        result
    }
}

/// Move `state` to `next` and tell the observer.
fn advance(observer: &mut dyn ProgressObserver, state: &mut DownloadState, next: DownloadState) {
    debug_assert!(
        state.can_advance_to(next),
        "illegal download transition {state} -> {next}"
    );
    debug!("download state: {next}");
    *state = next;
    observer.on_state(next);
}

/// Parse the declared body size, treating absent or malformed values as
/// unknown (zero).
fn content_length(headers: &ureq::http::HeaderMap) -> u64 {
    headers
        .get(ureq::http::header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(0)
}
