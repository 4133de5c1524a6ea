//! Version acquisition orchestrator.
//!
//! Chains the stages a caller needs to obtain a usable toolchain package:
//! pick the version from the catalog, resolve the platform package,
//! download it atomically, then verify its checksum. A file that fails
//! verification is removed so that only verified packages remain at the
//! destination.

use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, warn};
use std::io::Write;

use crate::artefact::download::{DownloadTarget, PackageDownloader};
use crate::artefact::progress::{ByteCountLine, NoProgress, ProgressObserver};
use crate::artefact::verification::verify_checksum;
use crate::catalog::{Catalog, VersionRecord};
use crate::error::{FetchError, Result};
use crate::output::write_stderr_line;
use crate::package::Package;
use crate::resolution::find_package;

/// Which package of which version is wanted.
#[derive(Debug, Clone, Copy)]
pub struct PackageQuery<'a> {
    /// Version name, with or without the `go` lead.
    pub version: &'a str,
    /// Package kind (e.g. `Archive`).
    pub kind: &'a str,
    /// Operating system as used in file names (e.g. `linux`).
    pub os: &'a str,
    /// Architecture as used in file names (e.g. `amd64`).
    pub arch: &'a str,
}

/// A query plus where and how to acquire it.
#[derive(Debug, Clone)]
pub struct AcquireRequest<'a> {
    /// The package to acquire.
    pub query: PackageQuery<'a>,
    /// Directory the package is placed in.
    pub dest_dir: &'a Utf8Path,
    /// Render byte-count progress while downloading.
    pub progress: bool,
    /// Suppress status lines.
    pub quiet: bool,
}

/// Look up `version` in `catalog`.
///
/// # Errors
///
/// Returns [`FetchError::EmptyCatalog`] when the catalog has no versions
/// at all, so a changed page layout is not mistaken for a typo, and
/// [`FetchError::VersionNotFound`] otherwise.
pub fn select_version<'a>(catalog: &'a Catalog, version: &str) -> Result<&'a VersionRecord> {
    if catalog.is_empty() {
        return Err(FetchError::EmptyCatalog);
    }
    catalog
        .find_version(version)
        .ok_or_else(|| FetchError::VersionNotFound {
            version: version.to_owned(),
        })
}

/// Select and resolve the package `query` names.
///
/// # Errors
///
/// Returns the errors of [`select_version`] and
/// [`FetchError::Resolve`] when no package matches.
pub fn resolve_query<'a>(catalog: &'a Catalog, query: &PackageQuery<'_>) -> Result<&'a Package> {
    let record = select_version(catalog, query.version)?;
    Ok(find_package(record, query.kind, query.os, query.arch)?)
}

/// Acquire a verified package described by `request` from `catalog`.
///
/// Returns the path of the verified file.
///
/// # Errors
///
/// Returns [`FetchError`] from whichever stage failed.
pub fn acquire_with(
    request: &AcquireRequest<'_>,
    catalog: &Catalog,
    downloader: &dyn PackageDownloader,
    stderr: &mut dyn Write,
) -> Result<Utf8PathBuf> {
    let package = resolve_query(catalog, &request.query)?;
    if package.checksum_spec().is_none() {
        return Err(FetchError::MissingChecksum {
            file_name: package.file_name.clone(),
        });
    }
    debug!("resolved {} to {}", request.query.version, package.url);

    std::fs::create_dir_all(request.dest_dir.as_std_path())?;
    let dest = request.dest_dir.join(&package.file_name);

    if !request.quiet {
        write_stderr_line(stderr, format!("Downloading {}...", package.file_name));
    }
    download(request, package, &dest, downloader, stderr)?;

    if let Err(err) = verify_checksum(package, &dest) {
        warn!("removing {dest} after failed verification");
        if let Err(remove_err) = std::fs::remove_file(dest.as_std_path()) {
            debug!("could not remove {dest}: {remove_err}");
        }
        return Err(err.into());
    }

    if !request.quiet {
        write_stderr_line(stderr, format!("Verified {} checksum.", package.algorithm));
    }
    Ok(dest)
}

fn download(
    request: &AcquireRequest<'_>,
    package: &Package,
    dest: &Utf8Path,
    downloader: &dyn PackageDownloader,
    stderr: &mut dyn Write,
) -> Result<u64> {
    let target = DownloadTarget::from(package);
    let mut quiet_observer = NoProgress;
    let mut line;
    let observer: &mut dyn ProgressObserver = if request.progress && !request.quiet {
        line = ByteCountLine::new(stderr, package.file_name.as_str());
        &mut line
    } else {
        &mut quiet_observer
    };
    let written = downloader.download_atomic(&target, dest, observer)?;
    debug!("downloaded {written} bytes to {dest}");
    Ok(written)
}

#[cfg(test)]
#[path = "acquisition_tests.rs"]
mod tests;
