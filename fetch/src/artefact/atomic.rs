//! Temp-file-then-rename materialisation of downloaded bytes.
//!
//! Bytes are written to `<destination>.tmp` and only renamed onto the
//! destination once the whole body has been copied and synced. The
//! destination therefore either does not exist or holds a complete file.

use super::progress::ProgressObserver;
use crate::transport::FetchOptions;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs::File;
use std::io::{self, Read, Write};

/// Copy buffer size.
const CHUNK_SIZE: usize = 8192;

/// Return the working path used while downloading to `dest`.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use envm_fetch::artefact::atomic::temp_path_for;
///
/// let temp = temp_path_for(Utf8Path::new("/tmp/go1.21.0.tar.gz"));
/// assert_eq!(temp.as_str(), "/tmp/go1.21.0.tar.gz.tmp");
/// ```
#[must_use]
pub fn temp_path_for(dest: &Utf8Path) -> Utf8PathBuf {
    Utf8PathBuf::from(format!("{dest}.tmp"))
}

/// Why an observed copy stopped early.
#[derive(Debug, thiserror::Error)]
pub enum CopyError {
    /// Reading from the source failed.
    #[error("read failed: {0}")]
    Read(#[source] io::Error),
    /// Writing to the sink failed.
    #[error("write failed: {0}")]
    Write(#[source] io::Error),
    /// The caller cancelled the transfer.
    #[error("transfer cancelled")]
    Cancelled,
}

/// Copy `reader` into `writer`, notifying `observer` after every chunk.
///
/// Cancellation is checked before each read.
///
/// # Errors
///
/// Returns [`CopyError`] identifying which side of the copy failed.
pub fn copy_observed(
    reader: &mut dyn Read,
    writer: &mut dyn Write,
    total: u64,
    observer: &mut dyn ProgressObserver,
    options: &FetchOptions,
) -> Result<u64, CopyError> {
    let mut buffer = [0u8; CHUNK_SIZE];
    let mut written: u64 = 0;
    loop {
        if options.is_cancelled() {
            return Err(CopyError::Cancelled);
        }
        let read = match reader.read(&mut buffer) {
            Ok(0) => return Ok(written),
            Ok(read) => read,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(CopyError::Read(e)),
        };
        let chunk = buffer.get(..read).unwrap_or_default();
        writer.write_all(chunk).map_err(CopyError::Write)?;
        written = written.saturating_add(chunk.len() as u64);
        observer.on_progress(written, total);
    }
}

/// A destination file under construction.
///
/// Dropping an uncommitted `AtomicFile` closes the working file and leaves
/// it at its `.tmp` path; the destination is untouched.
#[derive(Debug)]
pub struct AtomicFile {
    file: File,
    temp_path: Utf8PathBuf,
    dest: Utf8PathBuf,
}

impl AtomicFile {
    /// Create (or truncate) the working file for `dest`.
    ///
    /// # Errors
    ///
    /// Returns the I/O error from creating the working file.
    pub fn create(dest: &Utf8Path) -> io::Result<Self> {
        let temp_path = temp_path_for(dest);
        let file = File::create(temp_path.as_std_path())?;
        Ok(Self {
            file,
            temp_path,
            dest: dest.to_owned(),
        })
    }

    /// The working file path.
    #[must_use]
    pub fn temp_path(&self) -> &Utf8Path {
        &self.temp_path
    }

    /// Copy `reader` into the working file.
    ///
    /// # Errors
    ///
    /// Returns [`CopyError`] if reading, writing, or cancellation stops the
    /// copy. The working file keeps whatever was written.
    pub fn fill_from(
        &mut self,
        reader: &mut dyn Read,
        total: u64,
        observer: &mut dyn ProgressObserver,
        options: &FetchOptions,
    ) -> Result<u64, CopyError> {
        copy_observed(reader, &mut self.file, total, observer, options)
    }

    /// Flush, close, and rename the working file onto the destination.
    ///
    /// # Errors
    ///
    /// Returns the I/O error from syncing or renaming. On failure the
    /// destination is left as it was.
    pub fn commit(self) -> io::Result<Utf8PathBuf> {
        let Self {
            mut file,
            temp_path,
            dest,
        } = self;
        file.flush()?;
        file.sync_all()?;
        drop(file);
        std::fs::rename(temp_path.as_std_path(), dest.as_std_path())?;
        Ok(dest)
    }
}
