// SPDX-License-Identifier: Apache-2.0

#[must_use]
pub fn xml_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if c.is_control() && c != '\t' && c != '\n' => out.push(' '),
            c => out.push(c),
        }
    }
    out
}

/// Encodes text as a PDF literal string body for a WinAnsi font. Latin-1
/// passes through; anything else becomes `?`.
#[must_use]
pub fn pdf_escape(input: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.extend_from_slice(b"\\\\"),
            '(' => out.extend_from_slice(b"\\("),
            ')' => out.extend_from_slice(b"\\)"),
            '\n' | '\r' | '\t' => out.push(b' '),
            c if c.is_control() => {}
            c if (c as u32) < 0x80 || ((c as u32) >= 0xa0 && (c as u32) <= 0xff) => {
                out.push(c as u32 as u8);
            }
            _ => out.push(b'?'),
        }
    }
    out
}

/// Shortens `input` to at most `max` characters, ending in `...`.
pub(crate) fn truncate_chars(input: &str, max: usize) -> String {
    if input.chars().count() <= max {
        return input.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = input.chars().take(keep).collect();
    out.push_str("...");
    out
}
