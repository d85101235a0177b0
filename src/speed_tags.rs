/// A `[[N]]` marker's effect: at `at_index` in the tag-stripped text, reset
/// the base WPM to `wpm`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedChange {
    pub at_index: usize,
    pub wpm: f64,
}

/// Scans `text` for `[[N]]` markers, strips them, and records the post-strip
/// index and target WPM of each. Only meaningful in `dynamic` speed mode;
/// callers in `constant` mode should skip this stage entirely.
pub fn extract_speed_tags(text: &str) -> (String, Vec<SpeedChange>) {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut changes = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '[' && chars.get(i + 1) == Some(&'[') {
            if let Some((digits_end, value)) = parse_marker(&chars, i + 2) {
                changes.push(SpeedChange {
                    at_index: out.chars().count(),
                    wpm: value.clamp(10.0, 999.0),
                });
                i = digits_end;
                continue;
            }
        }
        out.push(chars[i]);
        i += 1;
    }

    (out, changes)
}

/// Parses `\d+]]` starting at `start`; returns the index just past the
/// closing `]]` and the parsed value on success.
fn parse_marker(chars: &[char], start: usize) -> Option<(usize, f64)> {
    let mut j = start;
    while j < chars.len() && chars[j].is_ascii_digit() {
        j += 1;
    }
    if j == start {
        return None;
    }
    if chars.get(j) != Some(&']') || chars.get(j + 1) != Some(&']') {
        return None;
    }
    let digits: String = chars[start..j].iter().collect();
    let value: f64 = digits.parse().ok()?;
    Some((j + 2, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_single_marker_and_strips_it() {
        let (stripped, changes) = extract_speed_tags("Hi [[120]]there.");
        assert_eq!(stripped, "Hi there.");
        assert_eq!(changes, vec![SpeedChange { at_index: 3, wpm: 120.0 }]);
    }

    #[test]
    fn clamps_out_of_range_values() {
        let (_, changes) = extract_speed_tags("[[5]]a[[5000]]b");
        assert_eq!(changes[0].wpm, 10.0);
        assert_eq!(changes[1].wpm, 999.0);
    }

    #[test]
    fn leaves_malformed_markers_untouched() {
        let (stripped, changes) = extract_speed_tags("a [[nope]] b [[42] c");
        assert_eq!(stripped, "a [[nope]] b [[42] c");
        assert!(changes.is_empty());
    }

    #[test]
    fn no_markers_is_identity() {
        let (stripped, changes) = extract_speed_tags("plain text");
        assert_eq!(stripped, "plain text");
        assert!(changes.is_empty());
    }
}
