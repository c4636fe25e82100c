// SPDX-License-Identifier: Apache-2.0

/// Average Helvetica glyph width as a fraction of the font size.
pub(crate) const LINE_CHAR_WIDTH: f32 = 0.5;

pub(crate) fn estimate_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * LINE_CHAR_WIDTH
}

/// Greedy word wrap to `max_chars` per line. Words longer than a line are
/// split; blank input yields no lines.
pub(crate) fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_len = 0usize;
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > max_chars {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            let needed = if current_len == 0 {
                word.len()
            } else {
                current_len + 1 + word.len()
            };
            if needed > max_chars && current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.extend(word.iter());
            current_len += word.len();
        }
        if current_len > 0 {
            lines.push(current);
        }
    }
    lines
}
