use super::*;
use crate::foundation::error::LayerfillError;

/// Every character is half an em wide.
struct HalfEm;

impl TextMeasure for HalfEm {
    fn measure_width(&mut self, text: &str, font_size: f32) -> LayerfillResult<f32> {
        Ok(text.chars().count() as f32 * 0.5 * font_size)
    }
}

struct Failing;

impl TextMeasure for Failing {
    fn measure_width(&mut self, _text: &str, _font_size: f32) -> LayerfillResult<f32> {
        Err(LayerfillError::font("boom"))
    }
}

fn text_box(align: HAlign, valign: VAlign, wrapped: bool) -> TextBox {
    TextBox {
        bbox: LayerBox::new(100, 50, 200, 100),
        font_size: 20.0,
        align,
        valign,
        wrapped,
    }
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

#[test]
fn aligned_x_cases() {
    assert_eq!(aligned_x(40.0, 200.0, HAlign::Left), 0.0);
    assert_eq!(aligned_x(40.0, 200.0, HAlign::Center), 80.0);
    assert_eq!(aligned_x(40.0, 200.0, HAlign::Right), 160.0);
    // Overflowing text goes negative rather than being clamped.
    assert_eq!(aligned_x(240.0, 200.0, HAlign::Right), -40.0);
}

#[test]
fn single_line_applies_fixed_corrections() {
    let lines = compute_origin("Hello", &text_box(HAlign::Left, VAlign::Top, false), &mut HalfEm)
        .unwrap();
    assert_eq!(lines.len(), 1);
    let l = &lines[0];
    assert_eq!(l.text, "Hello");
    assert!(approx(l.width, 50.0));
    assert!(approx(l.x, 100.0 - 0.2));
    assert!(approx(l.y, 50.0 - 5.2));
}

#[test]
fn single_line_ignores_vertical_alignment() {
    let top = compute_origin("Hi", &text_box(HAlign::Left, VAlign::Top, false), &mut HalfEm)
        .unwrap();
    let bottom = compute_origin("Hi", &text_box(HAlign::Left, VAlign::Bottom, false), &mut HalfEm)
        .unwrap();
    assert_eq!(top, bottom);
}

#[test]
fn horizontal_alignment_is_ordered_and_symmetric() {
    for text in ["a", "Hello", "fits in the box"] {
        let x = |align| {
            compute_origin(text, &text_box(align, VAlign::Top, false), &mut HalfEm).unwrap()[0].x
        };
        let (l, c, r) = (x(HAlign::Left), x(HAlign::Center), x(HAlign::Right));
        assert!(l < c && c < r, "{text}: {l} {c} {r}");
        assert!(approx(c - l, r - c));
    }
}

#[test]
fn wrap_width_doubles_for_latin_text() {
    assert_eq!(wrap_width_chars("中文", 200.0, 20.0), 10);
    assert_eq!(wrap_width_chars("latin", 200.0, 20.0), 20);
    // Ties round to even.
    assert_eq!(wrap_width_chars("中", 50.0, 20.0), 2);
    assert_eq!(wrap_width_chars("中", 70.0, 20.0), 4);
    assert_eq!(wrap_width_chars("中", 5.0, 20.0), 1);
}

#[test]
fn wrap_text_greedy_words() {
    assert_eq!(
        wrap_text("the quick brown fox jumps", 10),
        vec!["the quick", "brown fox", "jumps"]
    );
    assert_eq!(wrap_text("spaced\tout\n", 20), vec!["spaced  out"]);
    assert_eq!(wrap_text("", 5), vec![""]);
    assert_eq!(wrap_text("   ", 5), vec![""]);
}

#[test]
fn wrap_text_keeps_inner_whitespace_and_drops_it_at_breaks() {
    assert_eq!(wrap_text("a  b c", 10), vec!["a  b c"]);
    assert_eq!(wrap_text("ab   cd", 3), vec!["ab", "cd"]);
    assert_eq!(wrap_text("x\ny", 5), vec!["x y"]);
}

#[test]
fn wrap_text_breaks_after_hyphens() {
    assert_eq!(wrap_text("well-known word", 6), vec!["well-", "known", "word"]);
    assert_eq!(wrap_text("well-known", 20), vec!["well-known"]);
    assert_eq!(wrap_text("x ab-c-defgh", 6), vec!["x ab-", "c-", "defgh"]);
    // An overlong word is cut after the last hyphen that fits.
    assert_eq!(wrap_text("12-34567", 4), vec!["12-", "3456", "7"]);
    assert_eq!(wrap_text("a-bcdef", 3), vec!["a-", "bcd", "ef"]);
}

#[test]
fn wrap_text_breaks_long_words() {
    assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    assert_eq!(wrap_text("ab cdefghij", 5), vec!["ab cd", "efghi", "j"]);
    assert_eq!(wrap_text("一二三四五六七", 3), vec!["一二三", "四五六", "七"]);
    assert_eq!(wrap_text("abcd efghijkl", 4), vec!["abcd", "efgh", "ijkl"]);
}

#[test]
fn paragraph_lines_step_by_line_pitch() {
    // 200px / 20px = 10 ems -> 20 Latin characters per line.
    let text = "alpha beta gamma delta epsilon";
    let tb = text_box(HAlign::Left, VAlign::Top, true);
    let lines = compute_origin(text, &tb, &mut HalfEm).unwrap();
    let texts: Vec<_> = lines.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts, vec!["alpha beta gamma", "delta epsilon"]);
    assert!(approx(lines[0].y, 50.0 - 5.2));
    assert!(approx(lines[1].y - lines[0].y, 24.0));
}

#[test]
fn paragraph_lines_align_independently() {
    let tb = text_box(HAlign::Right, VAlign::Top, true);
    let lines = compute_origin("alpha beta gamma delta epsilon", &tb, &mut HalfEm).unwrap();
    for l in &lines {
        assert!(approx(l.x + l.width, 100.0 + 200.0 - 0.2), "{l:?}");
    }
}

#[test]
fn paragraph_vertical_alignment_offsets() {
    let text = "alpha beta gamma delta epsilon";
    let total = block_height(2, 20.0);
    assert!(approx(total, 44.0));

    let y0 = |valign| {
        compute_origin(text, &text_box(HAlign::Left, valign, true), &mut HalfEm).unwrap()[0].y
    };
    let top = y0(VAlign::Top);
    assert!(approx(y0(VAlign::Middle) - top, (100.0 - total) / 2.0));
    assert!(approx(y0(VAlign::Bottom) - top, 100.0 - total));
}

#[test]
fn measurement_errors_propagate() {
    let tb = text_box(HAlign::Center, VAlign::Top, false);
    assert!(compute_origin("x", &tb, &mut Failing).is_err());
}

#[test]
fn glyphs_use_whole_pixel_sizes_while_offsets_keep_the_fraction() {
    assert_eq!(glyph_size(20.7), 20.0);
    assert_eq!(glyph_size(12.0), 12.0);
    assert_eq!(glyph_size(0.4), 1.0);

    let tb = TextBox {
        font_size: 20.7,
        ..text_box(HAlign::Left, VAlign::Top, false)
    };
    let lines = compute_origin("Hello", &tb, &mut HalfEm).unwrap();
    // Five half-em glyphs at 20px.
    assert!(approx(lines[0].width, 50.0));
    assert!(approx(lines[0].x, 100.0 - 0.01 * 20.7));
    assert!(approx(lines[0].y, 50.0 - 0.26 * 20.7));
}
