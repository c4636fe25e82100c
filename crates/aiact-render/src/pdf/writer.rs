// SPDX-License-Identifier: Apache-2.0

use std::fmt::Write as _;

use crate::colors::Rgb;
use crate::escape::pdf_escape;

pub(crate) const PAGE_WIDTH: f32 = 595.0;
pub(crate) const PAGE_HEIGHT: f32 = 842.0;

const CATALOG_ID: usize = 1;
const PAGES_ID: usize = 2;
const FONT_REGULAR_ID: usize = 3;
const FONT_BOLD_ID: usize = 4;
const INFO_ID: usize = 5;
const FIRST_PAGE_ID: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Font {
    Regular,
    Bold,
}

impl Font {
    const fn resource(self) -> &'static str {
        match self {
            Self::Regular => "F1",
            Self::Bold => "F2",
        }
    }
}

/// Content stream of one page.
#[derive(Debug, Default, Clone)]
pub(crate) struct Page {
    ops: Vec<u8>,
}

impl Page {
    pub(crate) fn text(&mut self, x: f32, y: f32, font: Font, size: f32, color: Rgb, body: &str) {
        self.push(&format!(
            "BT /{} {size:.1} Tf {} rg {x:.2} {y:.2} Td (",
            font.resource(),
            color.pdf_operands()
        ));
        self.ops.extend_from_slice(&pdf_escape(body));
        self.ops.extend_from_slice(b") Tj ET\n");
    }

    /// Text centred on `center_x`, using the layout width estimate.
    pub(crate) fn text_centered(
        &mut self,
        center_x: f32,
        y: f32,
        font: Font,
        size: f32,
        color: Rgb,
        body: &str,
    ) {
        let width = super::layout::estimate_width(body, size);
        self.text(center_x - width / 2.0, y, font, size, color, body);
    }

    pub(crate) fn line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, color: Rgb) {
        self.push(&format!(
            "{} RG {width:.2} w {:.2} {:.2} m {:.2} {:.2} l S\n",
            color.pdf_operands(),
            from.0,
            from.1,
            to.0,
            to.1
        ));
    }

    pub(crate) fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, width: f32, color: Rgb) {
        self.push(&format!(
            "{} RG {width:.2} w {x:.2} {y:.2} {w:.2} {h:.2} re S\n",
            color.pdf_operands()
        ));
    }

    pub(crate) fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb) {
        self.push(&format!(
            "{} rg {x:.2} {y:.2} {w:.2} {h:.2} re f\n",
            color.pdf_operands()
        ));
    }

    fn push(&mut self, op: &str) {
        self.ops.extend_from_slice(op.as_bytes());
    }
}

#[derive(Debug, Clone)]
pub(crate) struct PdfDocument {
    title: String,
    pages: Vec<Page>,
}

impl PdfDocument {
    pub(crate) fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            pages: Vec::new(),
        }
    }

    pub(crate) fn push_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    /// Serializes objects, cross-reference table and trailer.
    pub(crate) fn finish(mut self) -> Vec<u8> {
        if self.pages.is_empty() {
            self.pages.push(Page::default());
        }
        let page_count = self.pages.len();
        let object_count = FIRST_PAGE_ID + 2 * page_count - 1;
        let mut offsets = vec![0usize; object_count + 1];
        let mut out: Vec<u8> = Vec::new();
        out.extend_from_slice(b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n");

        let kids = (0..page_count)
            .map(|i| format!("{} 0 R", FIRST_PAGE_ID + 2 * i))
            .collect::<Vec<_>>()
            .join(" ");

        write_object(
            &mut out,
            &mut offsets,
            CATALOG_ID,
            format!("<< /Type /Catalog /Pages {PAGES_ID} 0 R >>").as_bytes(),
        );
        write_object(
            &mut out,
            &mut offsets,
            PAGES_ID,
            format!("<< /Type /Pages /Kids [{kids}] /Count {page_count} >>").as_bytes(),
        );
        write_object(
            &mut out,
            &mut offsets,
            FONT_REGULAR_ID,
            b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>",
        );
        write_object(
            &mut out,
            &mut offsets,
            FONT_BOLD_ID,
            b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>",
        );
        let mut info = b"<< /Title (".to_vec();
        info.extend_from_slice(&pdf_escape(&self.title));
        info.extend_from_slice(b") /Producer (aiact-render) >>");
        write_object(&mut out, &mut offsets, INFO_ID, &info);

        for (idx, page) in self.pages.iter().enumerate() {
            let page_id = FIRST_PAGE_ID + 2 * idx;
            let content_id = page_id + 1;
            let dict = format!(
                "<< /Type /Page /Parent {PAGES_ID} 0 R /MediaBox [0 0 {PAGE_WIDTH:.0} {PAGE_HEIGHT:.0}] /Resources << /Font << /F1 {FONT_REGULAR_ID} 0 R /F2 {FONT_BOLD_ID} 0 R >> >> /Contents {content_id} 0 R >>"
            );
            write_object(&mut out, &mut offsets, page_id, dict.as_bytes());

            let mut stream = format!("<< /Length {} >>\nstream\n", page.ops.len()).into_bytes();
            stream.extend_from_slice(&page.ops);
            stream.extend_from_slice(b"\nendstream");
            write_object(&mut out, &mut offsets, content_id, &stream);
        }

        let xref_offset = out.len();
        let mut xref = String::new();
        let _ = write!(xref, "xref\n0 {}\n0000000000 65535 f \n", object_count + 1);
        for offset in offsets.iter().skip(1) {
            let _ = write!(xref, "{offset:010} 00000 n \n");
        }
        let _ = write!(
            xref,
            "trailer\n<< /Size {} /Root {CATALOG_ID} 0 R /Info {INFO_ID} 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
            object_count + 1
        );
        out.extend_from_slice(xref.as_bytes());
        out
    }
}

fn write_object(out: &mut Vec<u8>, offsets: &mut [usize], id: usize, body: &[u8]) {
    offsets[id] = out.len();
    out.extend_from_slice(format!("{id} 0 obj\n").as_bytes());
    out.extend_from_slice(body);
    out.extend_from_slice(b"\nendobj\n");
}
