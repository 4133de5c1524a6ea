//! Checksum verification of downloaded packages.
//!
//! A downloaded file is hashed with the algorithm its package publishes
//! and the lowercase hex digest compared with the published checksum.
//! Only `SHA256` and `SHA1` are accepted; any other label is rejected
//! before hashing.

use crate::package::{ChecksumAlgorithm, Package};
use camino::Utf8Path;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, Read};

/// Errors arising from checksum verification.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// The published algorithm is not `SHA256` or `SHA1`.
    #[error("unsupported checksum algorithm: {algorithm}")]
    UnsupportedChecksumAlgorithm {
        /// The algorithm label as published.
        algorithm: String,
    },

    /// The file's digest differs from the published checksum.
    #[error("checksum mismatch: expected {expected}, got {actual}")]
    ChecksumNotMatched {
        /// The published checksum.
        expected: String,
        /// The digest computed from the file.
        actual: String,
    },

    /// The file could not be opened or read.
    #[error("I/O error reading download: {0}")]
    Io(#[from] io::Error),
}

/// Verify the file at `path` against the checksum published for `package`.
///
/// Verification has no side effects, so repeating it on an unchanged file
/// gives the same answer.
///
/// # Errors
///
/// Returns [`VerifyError`] when the file cannot be read, the algorithm is
/// not supported, or the digest does not match.
///
/// # Examples
///
/// ```no_run
/// use camino::Utf8Path;
/// use envm_fetch::artefact::verification::verify_checksum;
/// use envm_fetch::package::Package;
///
/// let package = Package {
///     checksum: "a4ae5bf1...".to_owned(),
///     algorithm: "SHA256".to_owned(),
///     ..Package::default()
/// };
/// verify_checksum(&package, Utf8Path::new("/tmp/go1.21.0.linux-amd64.tar.gz"))?;
/// # Ok::<(), envm_fetch::artefact::verification::VerifyError>(())
/// ```
pub fn verify_checksum(package: &Package, path: &Utf8Path) -> Result<(), VerifyError> {
    verify_digest(&package.algorithm, &package.checksum, path)
}

/// Verify `path` against an explicit algorithm label and expected digest.
///
/// The file is opened before the algorithm is checked, so a missing file
/// is reported as [`VerifyError::Io`] whatever the label.
///
/// # Errors
///
/// See [`verify_checksum`].
pub fn verify_digest(algorithm: &str, expected: &str, path: &Utf8Path) -> Result<(), VerifyError> {
    let mut file = File::open(path.as_std_path())?;
    let algorithm = algorithm
        .parse::<ChecksumAlgorithm>()
        .map_err(|e| VerifyError::UnsupportedChecksumAlgorithm { algorithm: e.0 })?;
    let actual = compute_digest(algorithm, &mut file)?;
    if actual == expected {
        Ok(())
    } else {
        Err(VerifyError::ChecksumNotMatched {
            expected: expected.to_owned(),
            actual,
        })
    }
}

/// Hash everything `reader` yields and return the lowercase hex digest.
///
/// # Errors
///
/// Returns the I/O error from reading.
pub fn compute_digest(algorithm: ChecksumAlgorithm, reader: &mut dyn Read) -> io::Result<String> {
    match algorithm {
        ChecksumAlgorithm::Sha256 => hash_reader::<Sha256>(reader),
        ChecksumAlgorithm::Sha1 => hash_reader::<Sha1>(reader),
    }
}

fn hash_reader<D: Digest>(reader: &mut dyn Read) -> io::Result<String> {
    let mut hasher = D::new();
    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(buffer.get(..bytes_read).unwrap_or_default());
    }
    let digest = hasher.finalize();
    Ok(digest
        .iter()
        .fold(String::with_capacity(digest.len() * 2), |mut hex, byte| {
            // Writing to a String cannot fail.
            let _ = write!(hex, "{byte:02x}");
            hex
        }))
}
