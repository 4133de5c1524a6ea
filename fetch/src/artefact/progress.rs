//! Download state machine and byte-count progress reporting.

use std::fmt;
use std::io::Write;

/// Lifecycle of a single atomic download.
///
/// `Renamed` is the only successful terminal state. `Failed` is reachable
/// from `Fetching` and `Writing` and always leaves the destination absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DownloadState {
    /// Nothing has happened yet.
    NotStarted,
    /// The working file is being created and the request issued.
    Fetching,
    /// The response body is being copied into the working file.
    Writing,
    /// The working file was renamed onto the destination.
    Renamed,
    /// The download stopped before the rename.
    Failed,
}

impl DownloadState {
    /// Return true when moving from `self` to `next` is a legal transition.
    ///
    /// # Examples
    ///
    /// ```
    /// use envm_fetch::artefact::progress::DownloadState;
    ///
    /// assert!(DownloadState::Fetching.can_advance_to(DownloadState::Failed));
    /// assert!(!DownloadState::Renamed.can_advance_to(DownloadState::Failed));
    /// ```
    #[must_use]
    pub const fn can_advance_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::NotStarted, Self::Fetching)
                | (Self::Fetching, Self::Writing | Self::Failed)
                | (Self::Writing, Self::Renamed | Self::Failed)
        )
    }

    /// Return true for `Renamed` and `Failed`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Renamed | Self::Failed)
    }
}

impl fmt::Display for DownloadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotStarted => "not started",
            Self::Fetching => "fetching",
            Self::Writing => "writing",
            Self::Renamed => "renamed",
            Self::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Receives download progress.
pub trait ProgressObserver {
    /// Called after every chunk written, with the running total and the
    /// declared size (zero when unknown).
    fn on_progress(&mut self, written: u64, total: u64);

    /// Called on each state transition.
    fn on_state(&mut self, _state: DownloadState) {}
}

/// Observer that discards all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&mut self, _written: u64, _total: u64) {}
}

/// Observer that rewrites a single line with raw byte counts.
///
/// The line is terminated with a newline once the download reaches a
/// terminal state.
pub struct ByteCountLine<'a> {
    out: &'a mut dyn Write,
    label: String,
    drew_line: bool,
}

impl<'a> ByteCountLine<'a> {
    /// Report progress for `label` (usually the file name) onto `out`.
    pub fn new(out: &'a mut dyn Write, label: impl Into<String>) -> Self {
        Self {
            out,
            label: label.into(),
            drew_line: false,
        }
    }
}

impl ProgressObserver for ByteCountLine<'_> {
    fn on_progress(&mut self, written: u64, total: u64) {
        let line = if total == 0 {
            format!("\rDownloading {}: {written} bytes", self.label)
        } else {
            format!("\rDownloading {}: {written} / {total} bytes", self.label)
        };
        if self.out.write_all(line.as_bytes()).is_ok() && self.out.flush().is_ok() {
            self.drew_line = true;
        }
    }

    fn on_state(&mut self, state: DownloadState) {
        if state.is_terminal() && self.drew_line {
            self.drew_line = false;
            if writeln!(self.out).is_err() {
                // Progress output is best-effort.
            }
        }
    }
}
