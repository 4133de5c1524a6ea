//! Shared test utilities for the fetch crate.
//!
//! Builders here produce listing pages shaped like the published download
//! page so that parser, collector, and behavioural tests agree on one
//! fixture format.

use crate::package::Package;
use sha1::Sha1;
use sha2::{Digest, Sha256};

/// One package row of a fixture listing.
#[derive(Debug, Clone, Copy)]
pub struct FixtureRow<'a> {
    /// File name shown as link text.
    pub file_name: &'a str,
    /// Link target.
    pub href: &'a str,
    /// Kind column.
    pub kind: &'a str,
    /// OS column.
    pub os: &'a str,
    /// Architecture column.
    pub arch: &'a str,
    /// Size column.
    pub size: &'a str,
    /// Checksum column.
    pub checksum: &'a str,
}

impl<'a> FixtureRow<'a> {
    /// A binary archive row with a relative `/dl/` link and no checksum.
    #[must_use]
    pub fn archive(file_name: &'a str, os: &'a str, arch: &'a str) -> Self {
        Self {
            file_name,
            href: "",
            kind: "Archive",
            os,
            arch,
            size: "64MB",
            checksum: "",
        }
    }

    /// Render the row as table markup.
    #[must_use]
    pub fn to_html(&self) -> String {
        let href = if self.href.is_empty() {
            format!("/dl/{}", self.file_name)
        } else {
            self.href.to_owned()
        };
        format!(
            concat!(
                "<tr><td class=\"filename\"><a class=\"download\" href=\"{href}\">{file}</a></td>",
                "<td>{kind}</td><td>{os}</td><td>{arch}</td><td>{size}</td>",
                "<td><tt>{checksum}</tt></td></tr>\n"
            ),
            href = href,
            file = self.file_name,
            kind = self.kind,
            os = self.os,
            arch = self.arch,
            size = self.size,
            checksum = self.checksum,
        )
    }
}

/// Render a version block containing one download table.
///
/// `class` is `toggleVisible` for stable blocks and `toggle` for archived
/// ones; `checksum_label` is the last header cell (e.g. `SHA256 Checksum`).
#[must_use]
pub fn version_block(class: &str, id: &str, checksum_label: &str, rows: &[FixtureRow<'_>]) -> String {
    let body: String = rows.iter().map(FixtureRow::to_html).collect();
    format!(
        concat!(
            "<div class=\"{class}\" id=\"{id}\">\n",
            "<div class=\"expanded\"><table class=\"downloadtable\">\n",
            "<thead><tr class=\"first\"><th>File name</th><th>Kind</th><th>OS</th>",
            "<th>Arch</th><th>Size</th><th>{label}</th></tr></thead>\n",
            "{body}</table></div></div>\n"
        ),
        class = class,
        id = id,
        label = checksum_label,
        body = body,
    )
}

/// Render a stable-zone version block with a SHA-256 checksum column.
#[must_use]
pub fn stable_block(version: &str, rows: &[FixtureRow<'_>]) -> String {
    version_block("toggleVisible", &format!("go{version}"), "SHA256 Checksum", rows)
}

/// Render an archive-zone version block with a SHA-256 checksum column.
#[must_use]
pub fn archived_block(version: &str, rows: &[FixtureRow<'_>]) -> String {
    version_block("toggle", &format!("go{version}"), "SHA256 Checksum", rows)
}

/// Assemble a listing page from pre-rendered blocks.
#[must_use]
pub fn listing_page(stable: &[String], archived: &[String]) -> String {
    format!(
        concat!(
            "<!DOCTYPE html><html><head><title>Downloads</title></head><body>\n",
            "<h2 id=\"stable\">Stable versions</h2>\n{stable}",
            "<div id=\"archive\"><div class=\"expanded\">\n{archived}</div></div>\n",
            "</body></html>\n"
        ),
        stable = stable.concat(),
        archived = archived.concat(),
    )
}

/// A package record as the parser would produce it for `file_name`.
#[must_use]
pub fn package(file_name: &str, kind: &str, os: &str, arch: &str) -> Package {
    Package {
        file_name: file_name.to_owned(),
        url: format!("https://dl.example.test/{file_name}"),
        kind: kind.to_owned(),
        os: os.to_owned(),
        arch: arch.to_owned(),
        size: "64MB".to_owned(),
        checksum: String::new(),
        algorithm: "SHA256".to_owned(),
    }
}

/// Lowercase hex SHA-256 of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Lowercase hex SHA-1 of `bytes`.
#[must_use]
pub fn sha1_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha1::digest(bytes))
}
