//! Placement of single-line and wrapped text inside a layer box.
//!
//! Coordinates are canvas pixels of the top-left corner of each line, using the same convention
//! as the rasterizer: a line is drawn with its top edge at `y`.

use crate::foundation::core::LayerBox;
use crate::foundation::error::LayerfillResult;
use crate::template::directive::{HAlign, VAlign};
use crate::text::metrics::TextMeasure;

/// Upward shift of every line, in ems, between the stored text anchor and the drawn line top.
pub const BASELINE_SHIFT_EM: f32 = 0.26;
/// Leftward nudge of every line, in ems.
pub const X_NUDGE_EM: f32 = 0.01;
/// Distance between consecutive wrapped lines, in ems.
pub const LINE_PITCH_EM: f32 = 1.2;
/// Leading below the last line that is not part of the block height, in ems.
pub const TRAILING_LEADING_EM: f32 = 0.2;

/// One line of text positioned on the canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub x: f32,
    pub y: f32,
    /// Measured width of `text`.
    pub width: f32,
}

/// Geometry and modifiers of one text layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextBox {
    pub bbox: LayerBox,
    pub font_size: f32,
    pub align: HAlign,
    pub valign: VAlign,
    /// Lay out as a wrapped paragraph instead of a single line.
    pub wrapped: bool,
}

/// Horizontal start of a line of `text_width` inside a box of `layer_width`.
pub fn aligned_x(text_width: f32, layer_width: f32, align: HAlign) -> f32 {
    match align {
        HAlign::Left => 0.0,
        HAlign::Center => (layer_width - text_width) / 2.0,
        HAlign::Right => layer_width - text_width,
    }
}

/// Pixel size glyphs are shaped and drawn at: the layer's font size truncated to whole pixels.
///
/// Offsets and wrap widths keep the fractional size.
pub fn glyph_size(font_size: f32) -> f32 {
    font_size.trunc().max(1.0)
}

pub fn contains_cjk(text: &str) -> bool {
    text.chars().any(|c| ('\u{4E00}'..='\u{9FFF}').contains(&c))
}

/// Wrap width in characters for a paragraph layer.
///
/// One CJK ideograph is roughly one em wide, so the box holds `width / font_size` of them; Latin
/// text gets twice as many characters.
pub fn wrap_width_chars(text: &str, layer_width: f32, font_size: f32) -> usize {
    let ems = (layer_width / font_size).round_ties_even().max(0.0) as usize;
    let chars = if contains_cjk(text) { ems } else { ems * 2 };
    chars.max(1)
}

/// Greedy word wrap at `width` characters.
///
/// Tabs expand to 8-column stops and every other whitespace character becomes a space.
/// Whitespace inside a line is kept as written; only whitespace at a line break is dropped.
/// Hyphenated words may break after the hyphen. A word longer than `width` fills what is left of
/// the current line (preferring a hyphen inside that space) and continues on the next ones, which
/// is how unspaced CJK text gets broken. Empty input yields one empty line.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    // Reversed so the next chunk is at the end.
    let mut chunks: Vec<Vec<char>> = split_chunks(&expand_whitespace(text));
    chunks.reverse();

    let mut lines: Vec<String> = Vec::new();
    while !chunks.is_empty() {
        if !lines.is_empty() && chunks.last().is_some_and(|c| is_space(c)) {
            chunks.pop();
        }

        let mut cur: Vec<char> = Vec::new();
        while let Some(chunk) = chunks.last() {
            if cur.len() + chunk.len() > width {
                break;
            }
            cur.extend_from_slice(chunk);
            chunks.pop();
        }

        if let Some(chunk) = chunks.last_mut()
            && chunk.len() > width
        {
            let space_left = width.saturating_sub(cur.len()).max(1);
            let mut end = space_left;
            if let Some(h) = chunk[..space_left].iter().rposition(|&c| c == '-')
                && h > 0
                && chunk[..h].iter().any(|&c| c != '-')
            {
                end = h + 1;
            }
            cur.extend(chunk.drain(..end));
        }

        let trailing = cur.iter().rev().take_while(|&&c| c == ' ').count();
        cur.truncate(cur.len() - trailing);
        if !cur.is_empty() {
            lines.push(cur.into_iter().collect());
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn is_space(chunk: &[char]) -> bool {
    chunk.iter().all(|&c| c == ' ')
}

fn expand_whitespace(text: &str) -> Vec<char> {
    let mut out = Vec::with_capacity(text.len());
    let mut column = 0;
    for c in text.chars() {
        match c {
            '\t' => {
                let n = 8 - column % 8;
                out.extend(std::iter::repeat_n(' ', n));
                column += n;
            }
            '\n' | '\r' => {
                out.push(' ');
                column = 0;
            }
            c if c.is_whitespace() => {
                out.push(' ');
                column += 1;
            }
            c => {
                out.push(c);
                column += 1;
            }
        }
    }
    out
}

/// Split into runs of spaces and words, breaking hyphenated words after the hyphen.
fn split_chunks(chars: &[char]) -> Vec<Vec<char>> {
    let mut out: Vec<Vec<char>> = Vec::new();
    let mut cur: Vec<char> = Vec::new();
    for (i, &c) in chars.iter().enumerate() {
        let starts_run = cur.last().is_some_and(|&prev| (prev == ' ') != (c == ' '));
        if starts_run {
            out.push(std::mem::take(&mut cur));
        }
        cur.push(c);
        if c == '-' && breaks_after_hyphen(chars, i) {
            out.push(std::mem::take(&mut cur));
        }
    }
    if !cur.is_empty() {
        out.push(cur);
    }
    out
}

/// `well-known` breaks as `well-` + `known`: two letters before the hyphen and a letter after
/// (optionally behind one more hyphen) followed by another letter.
fn breaks_after_hyphen(chars: &[char], i: usize) -> bool {
    let letter = |j: usize| chars.get(j).is_some_and(|c| c.is_alphabetic());
    let hyphen = |j: usize| chars.get(j) == Some(&'-');
    let before = i >= 2
        && letter(i - 1)
        && (letter(i - 2) || (i >= 3 && hyphen(i - 2) && letter(i - 3)));
    let after = letter(i + 1) && (letter(i + 2) || (hyphen(i + 2) && letter(i + 3)));
    before && after
}

/// Height of a wrapped block of `line_count` lines.
pub fn block_height(line_count: usize, font_size: f32) -> f32 {
    line_count as f32 * LINE_PITCH_EM * font_size - TRAILING_LEADING_EM * font_size
}

/// Position every line of `text` (already normalized) inside `tb`.
pub fn compute_origin<M: TextMeasure + ?Sized>(
    text: &str,
    tb: &TextBox,
    measure: &mut M,
) -> LayerfillResult<Vec<PlacedLine>> {
    let fs = tb.font_size;
    let glyph_fs = glyph_size(fs);
    let layer_w = tb.bbox.width as f32;
    let left = tb.bbox.x as f32 - X_NUDGE_EM * fs;
    let top = tb.bbox.y as f32 - BASELINE_SHIFT_EM * fs;

    if !tb.wrapped {
        let width = measure.measure_width(text, glyph_fs)?;
        return Ok(vec![PlacedLine {
            text: text.to_owned(),
            x: left + aligned_x(width, layer_w, tb.align),
            y: top,
            width,
        }]);
    }

    let lines = wrap_text(text, wrap_width_chars(text, layer_w, fs));
    let total = block_height(lines.len(), fs);
    let layer_h = tb.bbox.height as f32;
    let mut y = top
        + match tb.valign {
            VAlign::Top => 0.0,
            VAlign::Middle => (layer_h - total) / 2.0,
            VAlign::Bottom => layer_h - total,
        };

    let mut out = Vec::with_capacity(lines.len());
    for line in lines {
        let width = measure.measure_width(&line, glyph_fs)?;
        out.push(PlacedLine {
            x: left + aligned_x(width, layer_w, tb.align),
            y,
            width,
            text: line,
        });
        y += LINE_PITCH_EM * fs;
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/text/layout.rs"]
mod tests;
