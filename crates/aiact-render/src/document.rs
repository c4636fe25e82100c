// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::colors::{INK, MUTED};
use crate::escape::truncate_chars;
use crate::pdf::{wrap_text, Font, Page, PdfDocument, LINE_CHAR_WIDTH, PAGE_HEIGHT, PAGE_WIDTH};

pub const BLANK_SECTION_PLACEHOLDER: &str =
    "This section has not been completed yet. Add the required information before relying on this document.";

const UNTITLED: &str = "Untitled document";
const MARGIN_X: f32 = 56.0;
const TOP: f32 = PAGE_HEIGHT - 72.0;
const BOTTOM: f32 = 72.0;
const TITLE_SIZE: f32 = 20.0;
const HEADING_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 11.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentSection {
    pub heading: String,
    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
enum Block {
    Title(String),
    Heading(String),
    Body(String),
    Placeholder(String),
    Gap(f32),
}

impl Block {
    fn height(&self) -> f32 {
        match self {
            Self::Title(_) => 30.0,
            Self::Heading(_) => 22.0,
            Self::Body(_) | Self::Placeholder(_) => 15.0,
            Self::Gap(h) => *h,
        }
    }
}

/// Renders a generated compliance document. Sections whose body is missing
/// or blank get [`BLANK_SECTION_PLACEHOLDER`]; content flows onto as many
/// A4 pages as needed.
#[must_use]
pub fn render_document_pdf(title: &str, sections: &[DocumentSection]) -> Vec<u8> {
    let title = if title.trim().is_empty() {
        UNTITLED
    } else {
        title.trim()
    };
    let pages = paginate(layout(title, sections));
    let total = pages.len();

    let mut doc = PdfDocument::new(title);
    for (idx, blocks) in pages.into_iter().enumerate() {
        let mut page = Page::default();
        let mut y = TOP;
        for block in blocks {
            y -= block.height();
            match &block {
                Block::Title(text) => page.text(MARGIN_X, y, Font::Bold, TITLE_SIZE, INK, text),
                Block::Heading(text) => page.text(MARGIN_X, y, Font::Bold, HEADING_SIZE, INK, text),
                Block::Body(text) => page.text(MARGIN_X, y, Font::Regular, BODY_SIZE, INK, text),
                Block::Placeholder(text) => {
                    page.text(MARGIN_X, y, Font::Regular, BODY_SIZE, MUTED, text);
                }
                Block::Gap(_) => {}
            }
        }
        page.line(
            (MARGIN_X, BOTTOM - 20.0),
            (PAGE_WIDTH - MARGIN_X, BOTTOM - 20.0),
            0.5,
            MUTED,
        );
        page.text(
            MARGIN_X,
            BOTTOM - 36.0,
            Font::Regular,
            9.0,
            MUTED,
            &truncate_chars(title, 70),
        );
        let footer = format!("Page {} of {total}", idx + 1);
        page.text(
            PAGE_WIDTH - MARGIN_X - 60.0,
            BOTTOM - 36.0,
            Font::Regular,
            9.0,
            MUTED,
            &footer,
        );
        doc.push_page(page);
    }
    doc.finish()
}

fn max_chars(size: f32) -> usize {
    ((PAGE_WIDTH - 2.0 * MARGIN_X) / (size * LINE_CHAR_WIDTH)) as usize
}

fn layout(title: &str, sections: &[DocumentSection]) -> Vec<Block> {
    let mut blocks: Vec<Block> = wrap_text(title, max_chars(TITLE_SIZE))
        .into_iter()
        .map(Block::Title)
        .collect();
    blocks.push(Block::Gap(10.0));

    for section in sections {
        let heading = section.heading.trim();
        let heading = if heading.is_empty() { "Untitled section" } else { heading };
        blocks.push(Block::Gap(8.0));
        blocks.extend(
            wrap_text(heading, max_chars(HEADING_SIZE))
                .into_iter()
                .map(Block::Heading),
        );

        let body_lines = section
            .body
            .as_deref()
            .map(|body| wrap_text(body, max_chars(BODY_SIZE)))
            .unwrap_or_default();
        if body_lines.is_empty() {
            blocks.extend(
                wrap_text(BLANK_SECTION_PLACEHOLDER, max_chars(BODY_SIZE))
                    .into_iter()
                    .map(Block::Placeholder),
            );
        } else {
            blocks.extend(body_lines.into_iter().map(Block::Body));
        }
    }
    blocks
}

/// Splits blocks into pages; a gap never starts a page.
fn paginate(blocks: Vec<Block>) -> Vec<Vec<Block>> {
    let capacity = TOP - BOTTOM;
    let mut pages: Vec<Vec<Block>> = Vec::new();
    let mut current: Vec<Block> = Vec::new();
    let mut used = 0.0f32;
    for block in blocks {
        let is_gap = matches!(block, Block::Gap(_));
        let h = block.height();
        if used + h > capacity {
            pages.push(std::mem::take(&mut current));
            used = 0.0;
        }
        if is_gap && current.is_empty() {
            continue;
        }
        used += h;
        current.push(block);
    }
    if !current.is_empty() || pages.is_empty() {
        pages.push(current);
    }
    pages
}
