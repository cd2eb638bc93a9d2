/// Escape tokens spreadsheet exporters leave behind for CR, LF and TAB.
const SPREADSHEET_ESCAPES: [&str; 3] = ["_x000D_", "_x000A_", "_x0009_"];

/// Clean a raw cell value before it is measured or drawn.
///
/// Applied in order: drop spreadsheet escape tokens, strip one pair of enclosing `"`, trim
/// whitespace, turn curly double quotes into corner brackets (`「` / `」`), and replace `/` with
/// `&`.
pub fn normalize_text(raw: &str) -> String {
    let s = strip_spreadsheet_escapes(raw);
    let s = s
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(&s);

    s.trim()
        .replace('\u{201C}', "\u{300C}")
        .replace('\u{201D}', "\u{300D}")
        .replace('/', "&")
}

/// Remove only the spreadsheet escape tokens; shared with file-name sanitizing.
pub(crate) fn strip_spreadsheet_escapes(raw: &str) -> String {
    SPREADSHEET_ESCAPES
        .iter()
        .fold(raw.to_owned(), |acc, token| acc.replace(token, ""))
}

#[cfg(test)]
#[path = "../../tests/unit/text/normalize.rs"]
mod tests;
