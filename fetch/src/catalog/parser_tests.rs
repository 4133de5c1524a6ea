//! Unit tests for listing parsing.

use super::*;
use crate::test_utils::{
    FixtureRow, archived_block, listing_page, stable_block, version_block,
};
use rstest::{fixture, rstest};

const BASE: &str = "https://golang.google.cn/dl/";

#[fixture]
fn listing() -> String {
    let digest = "a".repeat(64);
    let source = FixtureRow {
        file_name: "go1.21.0.src.tar.gz",
        href: "",
        kind: "Source",
        os: "",
        arch: "",
        size: "26MB",
        checksum: &digest,
    };
    let linux = FixtureRow {
        checksum: &digest,
        ..FixtureRow::archive("go1.21.0.linux-amd64.tar.gz", "Linux", "x86-64")
    };
    listing_page(
        &[
            stable_block("1.21.0", &[source, linux]),
            stable_block("1.20.7", &[]),
        ],
        &[
            archived_block("1.20.6", &[FixtureRow::archive(
                "go1.20.6.linux-amd64.tar.gz",
                "Linux",
                "x86-64",
            )]),
            archived_block("1.19.12", &[]),
        ],
    )
}

fn names<'a>(records: impl Iterator<Item = &'a VersionRecord>) -> Vec<&'a str> {
    records.map(|record| record.name.as_str()).collect()
}

#[rstest]
fn parses_both_zones_in_document_order(listing: String) {
    let catalog = parse_catalog(&listing, BASE);
    assert_eq!(names(catalog.stable_versions()), ["1.21.0", "1.20.7"]);
    assert_eq!(names(catalog.archived_versions()), ["1.20.6", "1.19.12"]);
    assert_eq!(
        names(catalog.all_versions()),
        ["1.21.0", "1.20.7", "1.20.6", "1.19.12"]
    );
}

#[rstest]
fn maps_columns_by_position(listing: String) {
    let catalog = parse_catalog(&listing, BASE);
    let record = catalog.find_version("1.21.0").expect("stable version");
    assert_eq!(record.packages.len(), 2);

    let linux = record.packages.get(1).expect("second row");
    assert_eq!(linux.file_name, "go1.21.0.linux-amd64.tar.gz");
    assert_eq!(linux.url, "https://golang.google.cn/dl/go1.21.0.linux-amd64.tar.gz");
    assert_eq!(linux.kind, "Archive");
    assert_eq!(linux.os, "Linux");
    assert_eq!(linux.arch, "x86-64");
    assert_eq!(linux.size, "64MB");
    assert_eq!(linux.checksum, "a".repeat(64));
    assert_eq!(linux.algorithm, "SHA256");
}

#[rstest]
fn versions_without_rows_are_kept(listing: String) {
    let catalog = parse_catalog(&listing, BASE);
    let record = catalog.find_version("1.20.7").expect("empty stable version");
    assert!(record.packages.is_empty());
}

#[test]
fn algorithm_comes_from_last_header_cell() {
    let row = FixtureRow {
        checksum: "da39a3ee5e6b4b0d3255bfef95601890afd80709",
        ..FixtureRow::archive("go1.4.linux-amd64.tar.gz", "Linux", "x86-64")
    };
    let block = version_block("toggle", "go1.4", "SHA1 Checksum", &[row]);
    let catalog = parse_catalog(&listing_page(&[], &[block]), BASE);
    let record = catalog.find_version("1.4").expect("archived version");
    let pkg = record.packages.first().expect("one package");
    assert_eq!(pkg.algorithm, "SHA1");
}

#[test]
fn unknown_algorithm_labels_are_kept_verbatim() {
    let block = version_block(
        "toggleVisible",
        "go1.22.0",
        "MD5 Checksum",
        &[FixtureRow::archive("go1.22.0.linux-amd64.tar.gz", "Linux", "x86-64")],
    );
    let catalog = parse_catalog(&listing_page(&[block], &[]), BASE);
    let pkg = catalog
        .find_version("1.22.0")
        .and_then(|record| record.packages.first())
        .expect("package parsed");
    assert_eq!(pkg.algorithm, "MD5");
}

#[test]
fn blocks_without_id_are_skipped() {
    let anonymous = "<div class=\"toggleVisible\"><table></table></div>".to_owned();
    let page = listing_page(&[anonymous, stable_block("1.21.0", &[])], &[]);
    let catalog = parse_catalog(&page, BASE);
    assert_eq!(names(catalog.all_versions()), ["1.21.0"]);
}

#[test]
fn bare_prefix_id_is_skipped() {
    let page = listing_page(&[version_block("toggleVisible", "go", "SHA256 Checksum", &[])], &[]);
    assert!(parse_catalog(&page, BASE).is_empty());
}

#[test]
fn block_without_table_has_no_packages() {
    let page = listing_page(&["<div id=\"go1.21.1\"><p>soon</p></div>".to_owned()], &[]);
    let catalog = parse_catalog(&page, BASE);
    let record = catalog.find_version("1.21.1").expect("version kept");
    assert!(record.packages.is_empty());
}

#[test]
fn short_rows_fill_missing_columns_with_empty_strings() {
    let block = concat!(
        "<div class=\"toggleVisible\" id=\"go1.21.0\"><table>",
        "<thead><tr class=\"first\"><th>File name</th><th>SHA256 Checksum</th></tr></thead>",
        "<tr><td><a href=\"/dl/go1.21.0.src.tar.gz\">go1.21.0.src.tar.gz</a></td><td>Source</td></tr>",
        "</table></div>"
    );
    let catalog = parse_catalog(&listing_page(&[block.to_owned()], &[]), BASE);
    let pkg = catalog
        .find_version("1.21.0")
        .and_then(|record| record.packages.first())
        .expect("row parsed");
    assert_eq!(pkg.kind, "Source");
    assert_eq!(pkg.os, "");
    assert_eq!(pkg.checksum, "");
}

#[rstest]
#[case::relative("/dl/go1.21.0.src.tar.gz", "https://golang.google.cn/dl/go1.21.0.src.tar.gz")]
#[case::absolute(
    "https://dl.google.com/go/go1.21.0.src.tar.gz",
    "https://dl.google.com/go/go1.21.0.src.tar.gz"
)]
fn links_are_resolved_against_the_source(#[case] href: &str, #[case] expected: &str) {
    let row = FixtureRow {
        href,
        ..FixtureRow::archive("go1.21.0.src.tar.gz", "", "")
    };
    let catalog = parse_catalog(&listing_page(&[stable_block("1.21.0", &[row])], &[]), BASE);
    let pkg = catalog
        .find_version("1.21.0")
        .and_then(|record| record.packages.first())
        .expect("row parsed");
    assert_eq!(pkg.url, expected);
}

#[test]
fn links_are_verbatim_without_a_base() {
    let catalog = parse_catalog(
        &listing_page(
            &[stable_block(
                "1.21.0",
                &[FixtureRow::archive("go1.21.0.src.tar.gz", "", "")],
            )],
            &[],
        ),
        "",
    );
    let pkg = catalog
        .find_version("1.21.0")
        .and_then(|record| record.packages.first())
        .expect("row parsed");
    assert_eq!(pkg.url, "/dl/go1.21.0.src.tar.gz");
}

#[rstest]
#[case::empty("")]
#[case::plain_text("service unavailable")]
#[case::unrelated_html("<html><body><table><tr><td>x</td></tr></table></body></html>")]
fn unrecognised_documents_yield_an_empty_catalog(#[case] body: &str) {
    assert!(parse_catalog(body, BASE).is_empty());
}
