//! Paginated document model
//!
//! Report sections are laid out on A4 pages with a running vertical cursor
//! (millimetres from the top edge). A block that would cross the bottom margin
//! starts a new page. Tables paginate row by row and repeat their header on
//! every continuation page.
//!
//! Table cells wrap inside equal-width columns. Row heights are estimated
//! from the wrapped line count so the planned geometry is never shorter than
//! the rendered table.

/// A4 page width in mm
pub const PAGE_WIDTH: f64 = 210.0;
/// A4 page height in mm
pub const PAGE_HEIGHT: f64 = 297.0;
/// Margin on every side in mm
pub const MARGIN: f64 = 20.0;
/// Distance of the footer baseline from the bottom edge in mm
pub const FOOTER_OFFSET: f64 = 10.0;

/// Width available between the left and right margins
pub const PRINTABLE_WIDTH: f64 = PAGE_WIDTH - 2.0 * MARGIN;

const BOTTOM_LIMIT: f64 = PAGE_HEIGHT - MARGIN;
const TEXT_HEIGHT: f64 = 7.0;
const ROW_HEIGHT: f64 = 8.0;
const LINE_HEIGHT: f64 = 5.0;
const BLOCK_GAP: f64 = 4.0;
/// Average glyph advance of 9pt table text, rounded up
const CHAR_WIDTH: f64 = 1.7;
/// Left plus right cell padding
const CELL_PADDING: f64 = 4.0;

/// Characters that fit on one line of a column when `columns` share the
/// printable width
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn chars_per_line(columns: usize) -> usize {
    let width = PRINTABLE_WIDTH / columns.max(1) as f64 - CELL_PADDING;
    ((width / CHAR_WIDTH).floor().max(1.0)) as usize
}

/// Lines `text` occupies at `per_line` characters per line
///
/// Breaks at spaces first; a word longer than a line is split.
#[must_use]
pub fn wrapped_lines(text: &str, per_line: usize) -> usize {
    let per_line = per_line.max(1);
    text.split('\n')
        .map(|line| {
            let mut lines = 1;
            let mut used = 0;
            for word in line.split_whitespace() {
                let len = word.chars().count();
                if used == 0 {
                    used = len;
                } else if used + 1 + len <= per_line {
                    used += 1 + len;
                } else {
                    lines += 1;
                    used = len;
                }
                while used > per_line {
                    lines += 1;
                    used -= per_line;
                }
            }
            lines
        })
        .sum()
}

#[allow(clippy::cast_precision_loss)]
fn cells_height(cells: &[String], per_line: usize) -> f64 {
    let lines = cells
        .iter()
        .map(|cell| wrapped_lines(cell, per_line))
        .max()
        .unwrap_or(1);
    ROW_HEIGHT + (lines.max(1) - 1) as f64 * LINE_HEIGHT
}

/// Heading size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingLevel {
    /// Document title
    Title,
    /// Section heading
    Section,
}

impl HeadingLevel {
    const fn height(self) -> f64 {
        match self {
            Self::Title => 14.0,
            Self::Section => 10.0,
        }
    }
}

/// One table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// Cell texts; a `\n` separates a title from its subheading
    pub cells: Vec<String>,
    /// Rendered bold and shaded
    pub emphasis: bool,
}

/// A table before layout
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Header cells
    pub header: Vec<String>,
    /// Body rows
    pub rows: Vec<TableRow>,
}

impl Table {
    /// Create a table with the given header
    #[must_use]
    pub fn new<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a plain row
    pub fn push_row(&mut self, cells: Vec<String>) {
        self.rows.push(TableRow {
            cells,
            emphasis: false,
        });
    }

    /// Append an emphasised row
    pub fn push_emphasized_row(&mut self, cells: Vec<String>) {
        self.rows.push(TableRow {
            cells,
            emphasis: true,
        });
    }

    /// Number of columns
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    /// Height of the header row in mm, wrapped cells included
    #[must_use]
    pub fn header_height(&self) -> f64 {
        cells_height(&self.header, chars_per_line(self.column_count()))
    }

    /// Height of `row` in mm, wrapped cells included
    #[must_use]
    pub fn row_height(&self, row: &TableRow) -> f64 {
        cells_height(&row.cells, chars_per_line(self.column_count()))
    }
}

/// A laid-out block on a page
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Heading text
    Heading {
        /// Heading text
        text: String,
        /// Size
        level: HeadingLevel,
        /// Top position in mm
        y: f64,
    },
    /// A line of body text
    Text {
        /// Content
        text: String,
        /// Top position in mm
        y: f64,
    },
    /// The part of a table that fits on this page
    Table {
        /// Header cells, repeated on every page the table spans
        header: Vec<String>,
        /// Rows placed on this page
        rows: Vec<TableRow>,
        /// Header row height in mm
        header_height: f64,
        /// Height of each row in `rows`, in mm
        row_heights: Vec<f64>,
        /// Top position in mm
        y: f64,
        /// Bottom position in mm
        end_y: f64,
    },
    /// PNG raster
    Image {
        /// PNG bytes
        png: Vec<u8>,
        /// Display width in mm
        width: f64,
        /// Display height in mm
        height: f64,
        /// Top position in mm
        y: f64,
    },
}

/// One page of the document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Blocks in reading order
    pub blocks: Vec<Block>,
    /// Centred footer text, set by [`PagedDocument::finalize`]
    pub footer: Option<String>,
}

/// Capability used to lay a report out
pub trait DocumentBuilder {
    /// Add a heading
    fn add_heading(&mut self, text: &str, level: HeadingLevel);

    /// Add a line of body text
    fn add_text(&mut self, text: &str);

    /// Add a table, paginating as needed. Returns the cursor position
    /// immediately after the table.
    fn add_table(&mut self, table: Table) -> f64;

    /// Add a PNG image of `width_px` x `height_px`, scaled to the printable width
    fn add_image(&mut self, png: Vec<u8>, width_px: u32, height_px: u32);

    /// Force a page break
    fn new_page(&mut self);

    /// Number of pages so far
    fn page_count(&self) -> usize;
}

/// In-memory A4 document
#[derive(Debug, Clone, PartialEq)]
pub struct PagedDocument {
    title: String,
    pages: Vec<Page>,
    cursor: f64,
}

impl PagedDocument {
    /// Start a document with one empty page
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            pages: vec![Page::default()],
            cursor: MARGIN,
        }
    }

    /// Document title
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Pages in order
    #[must_use]
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Current vertical cursor
    #[must_use]
    pub const fn cursor(&self) -> f64 {
        self.cursor
    }

    /// Stamp `Page i of N | <footer_text>` on every page
    pub fn finalize(&mut self, footer_text: &str) {
        let total = self.pages.len();
        for (i, page) in self.pages.iter_mut().enumerate() {
            page.footer = Some(format!("Page {} of {total} | {footer_text}", i + 1));
        }
    }

    fn current_page(&mut self) -> &mut Page {
        if self.pages.is_empty() {
            self.pages.push(Page::default());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn is_page_empty(&self) -> bool {
        self.pages.last().map_or(true, |p| p.blocks.is_empty())
    }

    /// Break to a new page unless `height` still fits below the cursor
    fn ensure_space(&mut self, height: f64) {
        if self.cursor + height > BOTTOM_LIMIT && !self.is_page_empty() {
            self.new_page();
        }
    }

    fn push_block(&mut self, block: Block) {
        self.current_page().blocks.push(block);
    }
}

impl DocumentBuilder for PagedDocument {
    fn add_heading(&mut self, text: &str, level: HeadingLevel) {
        let height = level.height();
        self.ensure_space(height);
        let y = self.cursor;
        self.push_block(Block::Heading {
            text: text.to_string(),
            level,
            y,
        });
        self.cursor += height;
    }

    fn add_text(&mut self, text: &str) {
        self.ensure_space(TEXT_HEIGHT);
        let y = self.cursor;
        self.push_block(Block::Text {
            text: text.to_string(),
            y,
        });
        self.cursor += TEXT_HEIGHT;
    }

    fn add_table(&mut self, table: Table) -> f64 {
        let header_height = table.header_height();
        let heights: Vec<f64> = table.rows.iter().map(|row| table.row_height(row)).collect();
        self.ensure_space(header_height + heights.first().copied().unwrap_or(ROW_HEIGHT));

        let mut start = self.cursor;
        let mut y = start + header_height;
        let mut segment: Vec<TableRow> = Vec::new();
        let mut segment_heights: Vec<f64> = Vec::new();

        for (row, height) in table.rows.into_iter().zip(heights) {
            if y + height > BOTTOM_LIMIT && !segment.is_empty() {
                self.push_block(Block::Table {
                    header: table.header.clone(),
                    rows: std::mem::take(&mut segment),
                    header_height,
                    row_heights: std::mem::take(&mut segment_heights),
                    y: start,
                    end_y: y,
                });
                self.new_page();
                start = self.cursor;
                y = start + header_height;
            }
            segment.push(row);
            segment_heights.push(height);
            y += height;
        }

        self.push_block(Block::Table {
            header: table.header,
            rows: segment,
            header_height,
            row_heights: segment_heights,
            y: start,
            end_y: y,
        });
        self.cursor = y + BLOCK_GAP;
        y
    }

    fn add_image(&mut self, png: Vec<u8>, width_px: u32, height_px: u32) {
        let width = PRINTABLE_WIDTH;
        let height = if width_px == 0 {
            0.0
        } else {
            width * f64::from(height_px) / f64::from(width_px)
        };
        self.ensure_space(height);
        let y = self.cursor;
        self.push_block(Block::Image {
            png,
            width,
            height,
            y,
        });
        self.cursor += height + BLOCK_GAP;
    }

    fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.cursor = MARGIN;
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }
}
