//! Downloading and verifying a resolved package.
//!
//! # Sub-modules
//!
//! - [`atomic`] - Temp-file-then-rename materialisation of a download.
//! - [`download`] - Download trait and HTTP implementation.
//! - [`progress`] - Download state machine and progress observers.
//! - [`verification`] - Checksum verification of a downloaded file.

pub mod atomic;
pub mod download;
pub mod progress;
pub mod verification;
