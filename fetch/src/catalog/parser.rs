//! Lenient conversion of a listing page into a [`Catalog`].
//!
//! Parsing never fails. Blocks without an anchor are skipped, tables
//! without rows produce versions without packages, and missing cells
//! become empty fields. Callers detect a broken layout through
//! [`Catalog::is_empty`].

use super::document::{Block, ListingDocument, Row};
use super::{Catalog, VersionRecord, Zone};
use crate::package::Package;
use log::{debug, trace};
use url::Url;

/// Literal lead of every version block id (`go1.21.0`).
pub const VERSION_ID_PREFIX: &str = "go";
/// Suffix of the checksum column label (`SHA256 Checksum`).
const CHECKSUM_LABEL_SUFFIX: &str = " Checksum";

/// Fixed column positions of a download table.
const COL_FILE: usize = 0;
const COL_KIND: usize = 1;
const COL_OS: usize = 2;
const COL_ARCH: usize = 3;
const COL_SIZE: usize = 4;
const COL_CHECKSUM: usize = 5;

/// Parse a listing page fetched from `base_url`.
///
/// Relative download links are resolved against `base_url`; pass an empty
/// string to keep links verbatim.
///
/// # Examples
///
/// ```
/// use envm_fetch::catalog::parser::parse_catalog;
///
/// let catalog = parse_catalog("<html><body>moved</body></html>", "");
/// assert!(catalog.is_empty());
/// ```
#[must_use]
pub fn parse_catalog(html: &str, base_url: &str) -> Catalog {
    let document = ListingDocument::parse(html);
    let base = Url::parse(base_url).ok();
    let stable = parse_zone(&document.stable_blocks(), Zone::Stable, base.as_ref());
    let archived = parse_zone(&document.archived_blocks(), Zone::Archived, base.as_ref());
    debug!(
        "parsed catalog: {} stable, {} archived versions",
        stable.len(),
        archived.len()
    );
    Catalog::new(stable, archived)
}

fn parse_zone(blocks: &[Block<'_>], zone: Zone, base: Option<&Url>) -> Vec<VersionRecord> {
    blocks
        .iter()
        .filter_map(|block| parse_block(block, zone, base))
        .collect()
}

fn parse_block(block: &Block<'_>, zone: Zone, base: Option<&Url>) -> Option<VersionRecord> {
    let Some(anchor) = block.anchor() else {
        trace!("skipping {zone} block without an id");
        return None;
    };
    let name = anchor.strip_prefix(VERSION_ID_PREFIX).unwrap_or(anchor);
    if name.is_empty() {
        trace!("skipping {zone} block with empty version id {anchor:?}");
        return None;
    }

    let mut record = VersionRecord::new(name, zone);
    if let Some(table) = block.first_table() {
        let algorithm = table
            .last_header_label()
            .map(|label| strip_checksum_suffix(&label).to_owned())
            .unwrap_or_default();
        record.packages = table
            .data_rows()
            .iter()
            .map(|row| parse_row(row, &algorithm, base))
            .collect();
    } else {
        trace!("version {name} has no download table");
    }
    Some(record)
}

fn parse_row(row: &Row<'_>, algorithm: &str, base: Option<&Url>) -> Package {
    let file_cell = row.column(COL_FILE);
    let href = file_cell
        .and_then(|cell| cell.link_href())
        .unwrap_or_default();
    Package {
        file_name: file_cell
            .and_then(|cell| cell.link_text())
            .unwrap_or_default(),
        url: resolve_href(href, base),
        kind: row.column_text(COL_KIND),
        os: row.column_text(COL_OS),
        arch: row.column_text(COL_ARCH),
        size: row.column_text(COL_SIZE),
        checksum: row.column_text(COL_CHECKSUM),
        algorithm: algorithm.to_owned(),
    }
}

fn strip_checksum_suffix(label: &str) -> &str {
    label.strip_suffix(CHECKSUM_LABEL_SUFFIX).unwrap_or(label)
}

/// Resolve a possibly relative link against the page location.
fn resolve_href(href: &str, base: Option<&Url>) -> String {
    if href.is_empty() {
        return String::new();
    }
    match base.map(|base| base.join(href)) {
        Some(Ok(resolved)) => resolved.into(),
        _ => href.to_owned(),
    }
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
