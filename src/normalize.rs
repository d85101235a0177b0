/// Normalizes raw input text ahead of planning: CRLF/CR to LF, smart quotes
/// and dashes to ASCII, ellipsis glyph to three dots, NBSP to space, and
/// zero-width characters (including the UTF-8 BOM) removed. Pure and
/// unconfigured, matching the exact rule list the planner's input contract
/// depends on.
pub fn normalize_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push('\n');
            }
            '\u{2018}' | '\u{2019}' => out.push('\''),
            '\u{201C}' | '\u{201D}' => out.push('"'),
            '\u{2013}' | '\u{2014}' => out.push('-'),
            '\u{2026}' => out.push_str("..."),
            '\u{00A0}' => out.push(' '),
            '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{FEFF}' => {}
            other => out.push(other),
        }
    }
    out
}
