//! Output formatting for the fetch CLI.
//!
//! Version listings are rendered either as aligned text or as JSON for
//! scripting. Status lines go to an injected writer so that callers and
//! tests decide where they land.

use crate::catalog::{VersionRecord, Zone};
use serde::Serialize;
use std::fmt::Write as _;
use std::io::Write;

/// Write one line to `stderr`, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort output; ignore write failures.
    }
}

/// Format versions for human-readable output, one per line.
///
/// # Examples
///
/// ```
/// use envm_fetch::catalog::{VersionRecord, Zone};
/// use envm_fetch::output::format_human;
///
/// let versions = [VersionRecord::new("1.21.0", Zone::Stable)];
/// let text = format_human(versions.iter());
/// assert!(text.starts_with("1.21.0"));
/// assert!(text.contains("stable"));
/// ```
#[must_use]
pub fn format_human<'a>(versions: impl Iterator<Item = &'a VersionRecord>) -> String {
    let mut output = String::new();
    for record in versions {
        let count = record.packages.len();
        let noun = if count == 1 { "package" } else { "packages" };
        // Writing to a String cannot fail.
        let _ = writeln!(output, "{:<12} {:<8} {count} {noun}", record.name, record.zone);
    }
    if output.is_empty() {
        output.push_str("No versions listed.\n");
    }
    output
}

/// Format versions as a JSON array.
///
/// # Errors
///
/// Returns the serialisation error, which only occurs for non-string map
/// keys and so indicates a programming error.
pub fn format_json<'a>(
    versions: impl Iterator<Item = &'a VersionRecord>,
) -> Result<String, serde_json::Error> {
    let entries: Vec<VersionEntry<'a>> = versions.map(VersionEntry::from).collect();
    serde_json::to_string_pretty(&entries)
}

/// JSON entry for one version.
#[derive(Debug, Serialize)]
pub struct VersionEntry<'a> {
    /// Version identifier.
    pub version: &'a str,
    /// Listing zone.
    pub zone: Zone,
    /// Packages in listing order.
    pub packages: Vec<PackageEntry<'a>>,
}

/// JSON entry for one package.
#[derive(Debug, Serialize)]
pub struct PackageEntry<'a> {
    /// File name.
    pub file_name: &'a str,
    /// Kind label.
    pub kind: &'a str,
    /// OS label.
    pub os: &'a str,
    /// Architecture label.
    pub arch: &'a str,
    /// Human-readable size.
    pub size: &'a str,
    /// Download location.
    pub url: &'a str,
    /// Published digest.
    pub checksum: &'a str,
    /// Digest algorithm.
    pub algorithm: &'a str,
}

impl<'a> From<&'a VersionRecord> for VersionEntry<'a> {
    fn from(record: &'a VersionRecord) -> Self {
        Self {
            version: &record.name,
            zone: record.zone,
            packages: record
                .packages
                .iter()
                .map(|pkg| PackageEntry {
                    file_name: &pkg.file_name,
                    kind: &pkg.kind,
                    os: &pkg.os,
                    arch: &pkg.arch,
                    size: &pkg.size,
                    url: &pkg.url,
                    checksum: &pkg.checksum,
                    algorithm: &pkg.algorithm,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::package;

    fn records() -> Vec<VersionRecord> {
        let mut stable = VersionRecord::new("1.21.0", Zone::Stable);
        stable.packages = vec![
            package("go1.21.0.linux-amd64.tar.gz", "Archive", "Linux", "x86-64"),
            package("go1.21.0.src.tar.gz", "Source", "", ""),
        ];
        let mut archived = VersionRecord::new("1.20.7", Zone::Archived);
        archived.packages = vec![package("go1.20.7.linux-amd64.tar.gz", "Archive", "Linux", "x86-64")];
        vec![stable, archived]
    }

    #[test]
    fn human_output_lists_each_version() {
        let text = format_human(records().iter());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines.first().is_some_and(|l| l.contains("stable") && l.ends_with("2 packages")));
        assert!(lines.get(1).is_some_and(|l| l.contains("archived") && l.ends_with("1 package")));
    }

    #[test]
    fn human_output_reports_empty_listing() {
        assert_eq!(format_human(std::iter::empty()), "No versions listed.\n");
    }

    #[test]
    fn json_output_carries_packages() {
        let recs = records();
        let json = format_json(recs.iter()).expect("serialise");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");
        assert_eq!(value[0]["version"], "1.21.0");
        assert_eq!(value[0]["zone"], "stable");
        assert_eq!(value[0]["packages"][0]["algorithm"], "SHA256");
        assert_eq!(value[1]["zone"], "archived");
    }

    #[test]
    fn write_stderr_line_appends_newline() {
        let mut out = Vec::new();
        write_stderr_line(&mut out, "done");
        assert_eq!(out, b"done\n");
    }
}
