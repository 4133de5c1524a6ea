//! envm fetch library.
//!
//! Collects the catalog of Go releases from the published download listing,
//! resolves the package for a platform, and downloads it with atomic
//! placement and checksum verification. It is used by the `envm-fetch`
//! binary and can be consumed directly by version-manager front ends.
//!
//! # Modules
//!
//! - [`acquisition`] - Select, download, and verify in one pipeline
//! - [`artefact`] - Atomic download, progress, and checksum verification
//! - [`catalog`] - Listing collection and parsing into a version catalog
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Layered configuration
//! - [`dirs`] - Directory resolution abstraction for platform-specific paths
//! - [`error`] - Aggregate error type
//! - [`output`] - Listing output formatting
//! - [`package`] - Package metadata and checksum algorithms
//! - [`resolution`] - Platform package resolution
//! - [`transport`] - Timeouts and cancellation for network operations

pub mod acquisition;
pub mod artefact;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod dirs;
pub mod error;
pub mod output;
pub mod package;
pub mod resolution;
pub mod transport;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
