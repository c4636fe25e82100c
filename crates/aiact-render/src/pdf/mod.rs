// SPDX-License-Identifier: Apache-2.0

//! Minimal PDF 1.4 writer: A4 pages, the two standard Helvetica faces, text,
//! lines and filled rectangles. Output carries no timestamps so it is
//! reproducible byte for byte.

mod layout;
mod writer;

pub(crate) use layout::{wrap_text, LINE_CHAR_WIDTH};
pub(crate) use writer::{Font, Page, PdfDocument, PAGE_HEIGHT, PAGE_WIDTH};
