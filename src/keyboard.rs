use crate::rng::PlannerRng;

/// Three-row QWERTY layout, lowercase. Row 0 is the number row, matching
/// the teacher's `qwerty_adjacent_char` digit handling; rows 1-3 are the
/// letter rows. Index within a row gives the "column" used to compute a
/// grid neighborhood rather than a fixed per-key neighbor list.
const ROWS: [&[char]; 4] = [
    &['1', '2', '3', '4', '5', '6', '7', '8', '9', '0'],
    &['q', 'w', 'e', 'r', 't', 'y', 'u', 'i', 'o', 'p'],
    &['a', 's', 'd', 'f', 'g', 'h', 'j', 'k', 'l'],
    &['z', 'x', 'c', 'v', 'b', 'n', 'm'],
];

fn locate(ch: char) -> Option<(usize, usize)> {
    let lower = ch.to_ascii_lowercase();
    ROWS.iter()
        .enumerate()
        .find_map(|(r, row)| row.iter().position(|&c| c == lower).map(|c| (r, c)))
}

/// Returns the 8-neighborhood of `ch` in the row layout: the keys directly
/// above, below, left, right, and diagonal, bounded by row lengths. Rows
/// have different lengths, so a diagonal lookup is done by proportional
/// column mapping rather than assuming aligned columns.
fn neighbor_set(row: usize, col: usize) -> Vec<char> {
    let mut out = Vec::with_capacity(8);
    let this_row = ROWS[row];

    if col > 0 {
        out.push(this_row[col - 1]);
    }
    if col + 1 < this_row.len() {
        out.push(this_row[col + 1]);
    }

    for &other_row in &[row.wrapping_sub(1), row + 1] {
        if other_row == usize::MAX || other_row >= ROWS.len() {
            continue;
        }
        let r = ROWS[other_row];
        if r.is_empty() {
            continue;
        }
        let mapped = (col * r.len()) / this_row.len().max(1);
        for c in mapped.saturating_sub(1)..=(mapped + 1).min(r.len().saturating_sub(1)) {
            if let Some(&ch) = r.get(c) {
                out.push(ch);
            }
        }
    }

    out.sort_unstable();
    out.dedup();
    out
}

/// Uniform pick from the 8-neighborhood of `ch`; returns `ch` itself if it
/// isn't a mapped key (e.g. whitespace or punctuation outside the grid).
pub fn nearby(ch: char, rng: &mut PlannerRng) -> char {
    let Some((row, col)) = locate(ch) else {
        return ch;
    };
    let neighbors = neighbor_set(row, col);
    if neighbors.is_empty() {
        return ch;
    }
    let chosen = *rng.pick(&neighbors);
    if ch.is_ascii_uppercase() {
        chosen.to_ascii_uppercase()
    } else {
        chosen
    }
}

/// Uniform pick over `a..=z`, preserving the case of `template` if given.
pub fn random_letter(rng: &mut PlannerRng, uppercase: bool) -> char {
    let idx = rng.int(0, 25) as u8;
    let ch = (b'a' + idx) as char;
    if uppercase {
        ch.to_ascii_uppercase()
    } else {
        ch
    }
}

/// Shifts a digit by one position within `0..=9`, clamping at the bounds
/// rather than wrapping (a typo nudges the key next door, not across the
/// row).
pub fn nearby_digit(d: u8, rng: &mut PlannerRng) -> u8 {
    debug_assert!(d <= 9);
    let delta: i64 = if rng.bool(0.5) { 1 } else { -1 };
    (d as i64 + delta).clamp(0, 9) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearby_never_returns_self_when_neighbors_exist() {
        let mut rng = PlannerRng::from_seed(3);
        for _ in 0..200 {
            let n = nearby('j', &mut rng);
            assert!(neighbor_set(2, 6).contains(&n) || n == 'j');
        }
    }

    #[test]
    fn nearby_passes_through_unmapped_chars() {
        let mut rng = PlannerRng::from_seed(1);
        assert_eq!(nearby(' ', &mut rng), ' ');
        assert_eq!(nearby('!', &mut rng), '!');
    }

    #[test]
    fn nearby_digit_stays_in_bounds() {
        let mut rng = PlannerRng::from_seed(5);
        for _ in 0..50 {
            assert!(nearby_digit(0, &mut rng) <= 9);
            assert!(nearby_digit(9, &mut rng) <= 9);
        }
    }

    #[test]
    fn uppercase_neighbor_preserves_case() {
        let mut rng = PlannerRng::from_seed(9);
        for _ in 0..50 {
            let n = nearby('K', &mut rng);
            assert!(n.is_ascii_uppercase() || !n.is_ascii_alphabetic());
        }
    }
}
