//! Structural view over the download listing page.
//!
//! Every assumption about the page layout lives here: which ids delimit the
//! stable and archive zones, which elements form a version block, and how a
//! download table is laid out. The parser only asks for zones, blocks,
//! tables, rows, and numbered columns.

use scraper::{ElementRef, Html, Selector};

/// Id of the heading that opens the stable zone.
const STABLE_ZONE_ID: &str = "stable";
/// Id of the container holding archived versions.
const ARCHIVE_ZONE_ID: &str = "archive";
/// Class of a header row inside a download table.
const HEADER_ROW_CLASS: &str = "first";

/// A parsed listing page.
pub struct ListingDocument {
    html: Html,
}

impl ListingDocument {
    /// Parse an HTML body. Parsing is infallible; malformed markup yields a
    /// document with fewer recognisable blocks.
    #[must_use]
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }

    /// Version blocks of the stable zone.
    ///
    /// These are the `div` siblings that follow the `#stable` element, up to
    /// the `#archive` element when it is a sibling.
    #[must_use]
    pub fn stable_blocks(&self) -> Vec<Block<'_>> {
        let Some(anchor) = self.element_by_id(STABLE_ZONE_ID) else {
            return Vec::new();
        };
        anchor
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .take_while(|element| element.value().id() != Some(ARCHIVE_ZONE_ID))
            .filter(|element| element.value().name() == "div")
            .map(Block)
            .collect()
    }

    /// Version blocks of the archive zone: every `div.toggle` inside
    /// `#archive`.
    #[must_use]
    pub fn archived_blocks(&self) -> Vec<Block<'_>> {
        let Some(zone) = self.element_by_id(ARCHIVE_ZONE_ID) else {
            return Vec::new();
        };
        select_all(zone, "div.toggle").into_iter().map(Block).collect()
    }

    fn element_by_id(&self, id: &str) -> Option<ElementRef<'_>> {
        let root = self.html.root_element();
        root.descendants()
            .filter_map(ElementRef::wrap)
            .find(|element| element.value().id() == Some(id))
    }
}

/// A structural block that may describe one version.
#[derive(Clone, Copy)]
pub struct Block<'a>(ElementRef<'a>);

impl<'a> Block<'a> {
    /// The block's `id` attribute, if any.
    #[must_use]
    pub fn anchor(&self) -> Option<&'a str> {
        self.0.value().id()
    }

    /// The first download table inside the block.
    #[must_use]
    pub fn first_table(&self) -> Option<Table<'a>> {
        select_all(self.0, "table").into_iter().next().map(Table)
    }
}

/// A download table.
#[derive(Clone, Copy)]
pub struct Table<'a>(ElementRef<'a>);

impl<'a> Table<'a> {
    /// Trimmed text of the last header cell (e.g. `SHA256 Checksum`).
    #[must_use]
    pub fn last_header_label(&self) -> Option<String> {
        select_all(self.0, "thead th")
            .last()
            .map(|cell| text_of(*cell))
    }

    /// Rows carrying package data, in document order.
    ///
    /// Header rows (class `first`) and rows without any `td` are skipped.
    #[must_use]
    pub fn data_rows(&self) -> Vec<Row<'a>> {
        select_all(self.0, "tr")
            .into_iter()
            .filter(|row| !row.value().classes().any(|class| class == HEADER_ROW_CLASS))
            .map(|row| Row {
                cells: select_all(row, "td"),
            })
            .filter(|row| !row.cells.is_empty())
            .collect()
    }
}

/// One data row of a download table.
pub struct Row<'a> {
    cells: Vec<ElementRef<'a>>,
}

impl<'a> Row<'a> {
    /// The cell at `index`, counting `td` elements from zero.
    #[must_use]
    pub fn column(&self, index: usize) -> Option<Cell<'a>> {
        self.cells.get(index).copied().map(Cell)
    }

    /// Trimmed text of column `index`, or an empty string when absent.
    #[must_use]
    pub fn column_text(&self, index: usize) -> String {
        self.column(index)
            .map(|cell| cell.text())
            .unwrap_or_default()
    }
}

/// A single table cell.
#[derive(Clone, Copy)]
pub struct Cell<'a>(ElementRef<'a>);

impl<'a> Cell<'a> {
    /// Trimmed text content of the cell.
    #[must_use]
    pub fn text(&self) -> String {
        text_of(self.0)
    }

    /// Trimmed text of the first link in the cell.
    #[must_use]
    pub fn link_text(&self) -> Option<String> {
        self.first_link().map(text_of)
    }

    /// The `href` of the first link in the cell.
    #[must_use]
    pub fn link_href(&self) -> Option<&'a str> {
        self.first_link()
            .and_then(|link| link.value().attr("href"))
    }

    fn first_link(&self) -> Option<ElementRef<'a>> {
        select_all(self.0, "a").into_iter().next()
    }
}

/// Collect the descendants of `scope` matching `css`.
///
/// The selectors used by this module are constants, so a parse failure
/// can only mean a programming error; it is logged and treated as no match.
fn select_all<'a>(scope: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => scope.select(&selector).collect(),
        Err(e) => {
            log::error!("invalid selector {css:?}: {e}");
            Vec::new()
        }
    }
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_owned()
}
