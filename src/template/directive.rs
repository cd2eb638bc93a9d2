//! Layer-name directive grammar.
//!
//! A variable layer is named `@<field>#<opcode>[_<modifier>...]`, for example `@title#t_c_p` or
//! `@photo#i_contain_lt`. Names that do not match the grammar are ordinary static layers.

/// Horizontal text alignment inside the layer box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical placement of a wrapped text block inside the layer box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// Image fitting policy for `i` directives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FitMode {
    /// Fill the box and crop the overflow.
    #[default]
    Cover,
    /// Fit inside the box and pad with transparency.
    Contain,
}

/// One of the nine alignment points used when cropping or padding an image.
///
/// Spelled as two letters: horizontal (`l`, `c`, `r`) then vertical (`t`, `m`, `b`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Anchor {
    pub horizontal: HAlign,
    pub vertical: VAlign,
}

impl Default for Anchor {
    fn default() -> Self {
        Self::CENTER
    }
}

impl Anchor {
    pub const CENTER: Self = Self {
        horizontal: HAlign::Center,
        vertical: VAlign::Middle,
    };

    /// Every anchor in row-major order (`lt`, `ct`, `rt`, `lm`, ... `rb`).
    pub const ALL: [Self; 9] = {
        const H: [HAlign; 3] = [HAlign::Left, HAlign::Center, HAlign::Right];
        const V: [VAlign; 3] = [VAlign::Top, VAlign::Middle, VAlign::Bottom];
        let mut out = [Self::CENTER; 9];
        let mut i = 0;
        while i < 9 {
            out[i] = Self {
                horizontal: H[i % 3],
                vertical: V[i / 3],
            };
            i += 1;
        }
        out
    };

    /// Parse a two-letter anchor token such as `lt` or `cm`.
    pub fn parse(token: &str) -> Option<Self> {
        let mut chars = token.chars();
        let (h, v) = (chars.next()?, chars.next()?);
        if chars.next().is_some() {
            return None;
        }
        let horizontal = match h {
            'l' => HAlign::Left,
            'c' => HAlign::Center,
            'r' => HAlign::Right,
            _ => return None,
        };
        let vertical = match v {
            't' => VAlign::Top,
            'm' => VAlign::Middle,
            'b' => VAlign::Bottom,
            _ => return None,
        };
        Some(Self {
            horizontal,
            vertical,
        })
    }

    pub(crate) fn code(self) -> &'static str {
        match (self.horizontal, self.vertical) {
            (HAlign::Left, VAlign::Top) => "lt",
            (HAlign::Center, VAlign::Top) => "ct",
            (HAlign::Right, VAlign::Top) => "rt",
            (HAlign::Left, VAlign::Middle) => "lm",
            (HAlign::Center, VAlign::Middle) => "cm",
            (HAlign::Right, VAlign::Middle) => "rm",
            (HAlign::Left, VAlign::Bottom) => "lb",
            (HAlign::Center, VAlign::Bottom) => "cb",
            (HAlign::Right, VAlign::Bottom) => "rb",
        }
    }
}

impl std::fmt::Display for Anchor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Modifiers of a text (`t`) directive.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextDirective {
    pub align: HAlign,
    pub valign: VAlign,
    /// Set by a bare `p` token; `pm`/`pb` clear it again.
    pub paragraph: bool,
    /// Rotation in degrees, counter-clockwise. `None` means the layer is never rotated, which is
    /// distinct from an explicit `a0`.
    pub rotation_deg: Option<f64>,
}

impl TextDirective {
    /// Whether the text is laid out as a wrapped, multi-line block.
    ///
    /// `pm`/`pb` imply wrapping even though they clear the `paragraph` flag.
    pub fn is_wrapped(&self) -> bool {
        self.paragraph || self.valign != VAlign::Top
    }
}

/// Modifiers of an image (`i`) directive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImageDirective {
    pub fit: FitMode,
    pub anchor: Anchor,
}

/// What a variable layer does with its row value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DirectiveKind {
    Text(TextDirective),
    Image(ImageDirective),
    Visibility,
}

/// A parsed layer-name directive.
#[derive(Clone, Debug, PartialEq)]
pub struct Directive {
    /// Row column the layer reads from; never empty.
    pub field: String,
    pub kind: DirectiveKind,
}

impl Directive {
    /// Parse a layer name; returns `None` for ordinary static layers.
    ///
    /// Names with more than one `#` never match. Unknown modifier tokens are ignored.
    pub fn parse(layer_name: &str) -> Option<Self> {
        let body = layer_name.strip_prefix('@')?;
        let mut parts = body.split('#');
        let (field, rest) = (parts.next()?, parts.next()?);
        if parts.next().is_some() || field.is_empty() || rest.is_empty() {
            return None;
        }

        let mut tokens = rest.split('_');
        let opcode = tokens.next()?;
        let kind = match opcode.chars().next()? {
            't' => DirectiveKind::Text(parse_text_modifiers(tokens)),
            'i' => DirectiveKind::Image(parse_image_modifiers(tokens)),
            'v' => DirectiveKind::Visibility,
            _ => return None,
        };

        Some(Self {
            field: field.to_owned(),
            kind,
        })
    }

    pub fn is_image(&self) -> bool {
        matches!(self.kind, DirectiveKind::Image(_))
    }
}

fn parse_text_modifiers<'a>(tokens: impl Iterator<Item = &'a str>) -> TextDirective {
    let mut out = TextDirective::default();
    let mut center = false;
    let mut right = false;
    let mut bare_p = false;

    for token in tokens {
        match token {
            "p" => bare_p = true,
            "pm" => out.valign = VAlign::Middle,
            "pb" => out.valign = VAlign::Bottom,
            t if t.starts_with('c') => center = true,
            t if t.starts_with('r') => right = true,
            t => {
                if let Some(deg) = parse_rotation(t) {
                    out.rotation_deg = Some(deg);
                }
            }
        }
    }

    out.align = if center {
        HAlign::Center
    } else if right {
        HAlign::Right
    } else {
        HAlign::Left
    };
    out.paragraph = bare_p && out.valign == VAlign::Top;
    out
}

fn parse_rotation(token: &str) -> Option<f64> {
    let number = token.strip_prefix('a')?;
    let digits = number.strip_prefix('-').unwrap_or(number);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    number.parse::<f64>().ok()
}

fn parse_image_modifiers<'a>(tokens: impl Iterator<Item = &'a str>) -> ImageDirective {
    let mut out = ImageDirective::default();
    for token in tokens {
        match token {
            "cover" => out.fit = FitMode::Cover,
            "contain" => out.fit = FitMode::Contain,
            t => {
                if let Some(anchor) = Anchor::parse(t) {
                    out.anchor = anchor;
                }
            }
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/template/directive.rs"]
mod tests;
