//! Version catalog collected from the published download listing.
//!
//! # Sub-modules
//!
//! - [`collector`] - Fetches the listing and hands it to the parser.
//! - [`document`] - Narrow view over the listing's HTML structure.
//! - [`parser`] - Lenient conversion of the listing into a [`Catalog`].

pub mod collector;
pub mod document;
pub mod parser;

use crate::package::Package;
use serde::Serialize;
use std::fmt;

/// The listing zone a version was published in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    /// Current releases listed at the top of the page.
    Stable,
    /// Older releases listed under the archive section.
    Archived,
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stable => f.write_str("stable"),
            Self::Archived => f.write_str("archived"),
        }
    }
}

/// One version and its packages, in listing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionRecord {
    /// Version identifier without the `go` lead (e.g. `1.21.0`).
    pub name: String,
    /// Zone the version was listed in.
    pub zone: Zone,
    /// Packages in document order; may be empty.
    pub packages: Vec<Package>,
}

impl VersionRecord {
    /// Create a record with no packages.
    #[must_use]
    pub fn new(name: impl Into<String>, zone: Zone) -> Self {
        Self {
            name: name.into(),
            zone,
            packages: Vec::new(),
        }
    }
}

/// The parsed result of one listing fetch.
///
/// Records are held stable-first, then archived, each in document order.
/// A catalog never changes after construction.
///
/// # Examples
///
/// ```
/// use envm_fetch::catalog::{Catalog, VersionRecord, Zone};
///
/// let catalog = Catalog::new(
///     vec![VersionRecord::new("1.21.0", Zone::Stable)],
///     vec![VersionRecord::new("1.20.7", Zone::Archived)],
/// );
/// let names: Vec<_> = catalog.all_versions().map(|v| v.name.as_str()).collect();
/// assert_eq!(names, ["1.21.0", "1.20.7"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    versions: Vec<VersionRecord>,
}

impl Catalog {
    /// Build a catalog from the two zones' records.
    #[must_use]
    pub fn new(stable: Vec<VersionRecord>, archived: Vec<VersionRecord>) -> Self {
        let mut versions = stable;
        versions.extend(archived);
        Self { versions }
    }

    /// Versions from the stable zone, in document order.
    pub fn stable_versions(&self) -> impl Iterator<Item = &VersionRecord> {
        self.in_zone(Zone::Stable)
    }

    /// Versions from the archive zone, in document order.
    pub fn archived_versions(&self) -> impl Iterator<Item = &VersionRecord> {
        self.in_zone(Zone::Archived)
    }

    /// Every version, stable records before archived records.
    pub fn all_versions(&self) -> impl Iterator<Item = &VersionRecord> {
        self.stable_versions().chain(self.archived_versions())
    }

    /// Look up a version by name, with or without the `go` lead.
    #[must_use]
    pub fn find_version(&self, name: &str) -> Option<&VersionRecord> {
        let wanted = name.strip_prefix(parser::VERSION_ID_PREFIX).unwrap_or(name);
        self.all_versions().find(|record| record.name == wanted)
    }

    /// Number of versions in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// Return true when the listing yielded no versions at all.
    ///
    /// Parsing never fails, so an empty catalog is how a changed page
    /// layout shows up.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    fn in_zone(&self, zone: Zone) -> impl Iterator<Item = &VersionRecord> {
        self.versions.iter().filter(move |record| record.zone == zone)
    }
}
