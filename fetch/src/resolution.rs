//! Package resolution for a requested platform.
//!
//! Maps a (kind, OS, architecture) request onto one package of a version.
//! Resolution is a pure function of its inputs: the first package in
//! listing order whose kind matches and whose file name carries the
//! platform prefix wins.

use crate::catalog::VersionRecord;
use crate::package::Package;
use thiserror::Error;

/// Literal lead of every package file name (`go1.21.0.linux-amd64...`).
pub const PACKAGE_NAME_LEAD: &str = "go";

/// Errors arising from package resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No package of the version matches the request.
    #[error("no {kind} package of version {version} for {os}/{arch}")]
    PackageNotFound {
        /// Version that was searched.
        version: String,
        /// Requested kind.
        kind: String,
        /// Requested operating system.
        os: String,
        /// Architecture actually searched, after normalisation.
        arch: String,
    },
}

/// Apply the platform naming rule used when building the file prefix.
///
/// `linux`/`x86_64` is searched as `386`. Every other pair is unchanged.
///
/// # Examples
///
/// ```
/// use envm_fetch::resolution::normalise_arch;
///
/// assert_eq!(normalise_arch("linux", "x86_64"), "386");
/// assert_eq!(normalise_arch("darwin", "x86_64"), "x86_64");
/// ```
#[must_use]
pub fn normalise_arch<'a>(os: &str, arch: &'a str) -> &'a str {
    // Selects the 32-bit build; amd64 is never substituted.
    if os == "linux" && arch == "x86_64" {
        "386"
    } else {
        arch
    }
}

/// The file name prefix a matching package must start with.
///
/// `arch` is used as given; apply [`normalise_arch`] first.
#[must_use]
pub fn platform_prefix(version: &str, os: &str, arch: &str) -> String {
    format!("{PACKAGE_NAME_LEAD}{version}.{os}-{arch}")
}

/// Find the package of `record` matching `kind`, `os`, and `arch`.
///
/// Kind is compared case-insensitively; the file name must start with
/// [`platform_prefix`] of the normalised platform. Ties are broken by
/// listing order only.
///
/// # Errors
///
/// Returns [`ResolveError::PackageNotFound`] when no package matches.
///
/// # Examples
///
/// ```
/// use envm_fetch::catalog::{VersionRecord, Zone};
/// use envm_fetch::package::Package;
/// use envm_fetch::resolution::find_package;
///
/// let mut record = VersionRecord::new("1.21.0", Zone::Stable);
/// record.packages.push(Package {
///     file_name: "go1.21.0.linux-amd64.tar.gz".to_owned(),
///     kind: "Archive".to_owned(),
///     ..Package::default()
/// });
///
/// let pkg = find_package(&record, "archive", "linux", "amd64").expect("match");
/// assert_eq!(pkg.file_name, "go1.21.0.linux-amd64.tar.gz");
/// ```
pub fn find_package<'a>(
    record: &'a VersionRecord,
    kind: &str,
    os: &str,
    arch: &str,
) -> Result<&'a Package, ResolveError> {
    let arch = normalise_arch(os, arch);
    let prefix = platform_prefix(&record.name, os, arch);
    record
        .packages
        .iter()
        .find(|pkg| pkg.is_kind(kind) && pkg.file_name.starts_with(&prefix))
        .ok_or_else(|| ResolveError::PackageNotFound {
            version: record.name.clone(),
            kind: kind.to_owned(),
            os: os.to_owned(),
            arch: arch.to_owned(),
        })
}
