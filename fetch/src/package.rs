//! Package metadata published for a single downloadable artefact.
//!
//! A [`Package`] is one row of a version's download table: where the file
//! lives, which platform it targets, and the digest published for it. The
//! checksum algorithm is kept exactly as published; it is only interpreted
//! when a download is verified.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Package kind label for source tarballs.
pub const SOURCE_KIND: &str = "Source";
/// Package kind label for compressed binary distributions.
pub const ARCHIVE_KIND: &str = "Archive";
/// Package kind label for platform installers.
pub const INSTALLER_KIND: &str = "Installer";

/// File extensions stripped by [`Package::archive_name`], longest first.
const ARCHIVE_EXTENSIONS: &[&str] = &[".tar.gz", ".zip", ".pkg", ".msi"];

/// Metadata for one downloadable artefact of a version.
///
/// # Examples
///
/// ```
/// use envm_fetch::package::Package;
///
/// let pkg = Package {
///     file_name: "go1.21.0.linux-amd64.tar.gz".to_owned(),
///     kind: "Archive".to_owned(),
///     ..Package::default()
/// };
/// assert!(pkg.is_kind("archive"));
/// assert_eq!(pkg.archive_name(), "go1.21.0.linux-amd64");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Package {
    /// File name as shown in the listing (e.g. `go1.21.0.linux-amd64.tar.gz`).
    pub file_name: String,
    /// Absolute download location.
    pub url: String,
    /// Packaging format label, compared case-insensitively.
    pub kind: String,
    /// Operating system label; empty for source packages.
    pub os: String,
    /// Architecture label; empty for source packages.
    pub arch: String,
    /// Human-readable size (e.g. `64MB`), never parsed.
    pub size: String,
    /// Hex-encoded digest; empty when none is published.
    pub checksum: String,
    /// Digest algorithm name as published (e.g. `SHA256`).
    pub algorithm: String,
}

impl Package {
    /// Return true when this package has the given kind, ignoring case.
    #[must_use]
    pub fn is_kind(&self, kind: &str) -> bool {
        self.kind.eq_ignore_ascii_case(kind)
    }

    /// Return the file name with its archive extension removed.
    #[must_use]
    pub fn archive_name(&self) -> &str {
        ARCHIVE_EXTENSIONS
            .iter()
            .find_map(|ext| self.file_name.strip_suffix(ext))
            .unwrap_or(&self.file_name)
    }

    /// Return `(checksum, algorithm)` when both are published.
    ///
    /// A row with only one of the two is treated as carrying no checksum.
    #[must_use]
    pub fn checksum_spec(&self) -> Option<(&str, &str)> {
        if self.checksum.is_empty() || self.algorithm.is_empty() {
            None
        } else {
            Some((self.checksum.as_str(), self.algorithm.as_str()))
        }
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.file_name, self.kind, self.size)
    }
}

/// Digest algorithms accepted for checksum verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChecksumAlgorithm {
    /// SHA-256, published as `SHA256`.
    Sha256,
    /// SHA-1, published as `SHA1`.
    Sha1,
}

/// The algorithm name was not one of the recognised values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised checksum algorithm \"{0}\"")]
pub struct UnknownAlgorithm(pub String);

impl FromStr for ChecksumAlgorithm {
    type Err = UnknownAlgorithm;

    /// Parse a published algorithm name. Matching is exact: `sha256` is
    /// not the same label as `SHA256`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "SHA256" => Ok(Self::Sha256),
            "SHA1" => Ok(Self::Sha1),
            other => Err(UnknownAlgorithm(other.to_owned())),
        }
    }
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha256 => f.write_str("SHA256"),
            Self::Sha1 => f.write_str("SHA1"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn package(file_name: &str) -> Package {
        Package {
            file_name: file_name.to_owned(),
            ..Package::default()
        }
    }

    #[rstest]
    #[case::tarball("go1.21.0.linux-amd64.tar.gz", "go1.21.0.linux-amd64")]
    #[case::zip("go1.21.0.windows-amd64.zip", "go1.21.0.windows-amd64")]
    #[case::pkg("go1.21.0.darwin-arm64.pkg", "go1.21.0.darwin-arm64")]
    #[case::msi("go1.21.0.windows-386.msi", "go1.21.0.windows-386")]
    #[case::unknown("go1.21.0.src.tar.xz", "go1.21.0.src.tar.xz")]
    fn archive_name_strips_known_extensions(#[case] file_name: &str, #[case] expected: &str) {
        assert_eq!(package(file_name).archive_name(), expected);
    }

    #[rstest]
    #[case::exact("Archive", true)]
    #[case::lower("archive", true)]
    #[case::upper("ARCHIVE", true)]
    #[case::other("Installer", false)]
    fn kind_comparison_ignores_case(#[case] requested: &str, #[case] expected: bool) {
        let pkg = Package {
            kind: ARCHIVE_KIND.to_owned(),
            ..Package::default()
        };
        assert_eq!(pkg.is_kind(requested), expected);
    }

    #[test]
    fn checksum_spec_requires_both_fields() {
        let mut pkg = package("go1.21.0.src.tar.gz");
        assert!(pkg.checksum_spec().is_none());

        pkg.checksum = "ab".repeat(32);
        assert!(pkg.checksum_spec().is_none());

        pkg.algorithm = "SHA256".to_owned();
        let (checksum, algorithm) = pkg.checksum_spec().expect("both fields set");
        assert_eq!(checksum.len(), 64);
        assert_eq!(algorithm, "SHA256");
    }

    #[rstest]
    #[case::sha256("SHA256", Some(ChecksumAlgorithm::Sha256))]
    #[case::sha1("SHA1", Some(ChecksumAlgorithm::Sha1))]
    #[case::md5("MD5", None)]
    #[case::lowercase("sha256", None)]
    #[case::empty("", None)]
    fn algorithm_parsing_is_exact(#[case] raw: &str, #[case] expected: Option<ChecksumAlgorithm>) {
        assert_eq!(raw.parse::<ChecksumAlgorithm>().ok(), expected);
    }

    #[test]
    fn algorithm_display_round_trips_published_label() {
        assert_eq!(ChecksumAlgorithm::Sha256.to_string(), "SHA256");
        assert_eq!(ChecksumAlgorithm::Sha1.to_string(), "SHA1");
    }
}
