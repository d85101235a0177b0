/// An uncorrected erroneous insertion the planner has committed to correct
/// later via a deletion-backtrack: navigate to end, backspace down to
/// `buffer_length_at_start`, retype the correct span. `buffer_length_at_start`
/// (not the target text's own index) is what anchors the correction, since
/// length-changing typos (`double`/`skip`) would otherwise misalign it.
#[derive(Debug, Clone, PartialEq)]
pub enum OpenMistake {
    Char {
        target_start_index: usize,
        buffer_length_at_start: usize,
        created_at_index: usize,
    },
    Synonym {
        target_start_index: usize,
        buffer_length_at_start: usize,
        created_at_index: usize,
        trigger_at_word_ordinal: u64,
    },
}

impl OpenMistake {
    pub fn buffer_length_at_start(&self) -> usize {
        match self {
            OpenMistake::Char { buffer_length_at_start, .. } => *buffer_length_at_start,
            OpenMistake::Synonym { buffer_length_at_start, .. } => *buffer_length_at_start,
        }
    }

    pub fn target_start_index(&self) -> usize {
        match self {
            OpenMistake::Char { target_start_index, .. } => *target_start_index,
            OpenMistake::Synonym { target_start_index, .. } => *target_start_index,
        }
    }
}

/// A queued single-character substitution error, to be repaired in place by
/// a future fix session. Located by content context rather than a raw
/// buffer index, because later corrections can shift everything after them.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingFix {
    pub id: u64,
    pub wrong_char: char,
    pub correct_char: char,
    pub context_before: String,
    pub context_after: String,
    pub created_at_word_ordinal: u64,
    pub created_at_buffer_index: usize,
}

/// Outcome of trying to relocate a `PendingFix` inside the current buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelocateConfidence {
    /// Both context windows matched at this position.
    FullContext,
    /// Only the left-hand context window matched.
    LeftContextOnly,
    /// Neither context matched; this is just the first occurrence of the
    /// wrong character.
    FirstOccurrence,
}

/// Searches `buffer` for the best candidate position of `fix`, preferring a
/// full-context match, falling back to left-context-only, and finally to
/// the first bare occurrence of `wrong_char`. Returns `None` if the
/// character no longer appears anywhere.
pub fn relocate(buffer: &[char], fix: &PendingFix) -> Option<(usize, RelocateConfidence)> {
    let radius_before = fix.context_before.chars().count();
    let radius_after = fix.context_after.chars().count();

    let mut first_occurrence = None;
    let mut left_only = None;

    for (i, &ch) in buffer.iter().enumerate() {
        if ch != fix.wrong_char {
            continue;
        }
        if first_occurrence.is_none() {
            first_occurrence = Some(i);
        }

        let before_start = i.saturating_sub(radius_before);
        let before: String = buffer[before_start..i].iter().collect();
        let left_matches = before.ends_with(fix.context_before.as_str()) || before == fix.context_before;

        if left_matches {
            if left_only.is_none() {
                left_only = Some(i);
            }
            let after_end = (i + 1 + radius_after).min(buffer.len());
            let after_start = (i + 1).min(buffer.len());
            let after: String = buffer[after_start..after_end].iter().collect();
            if after.starts_with(fix.context_after.as_str()) || after == fix.context_after {
                return Some((i, RelocateConfidence::FullContext));
            }
        }
    }

    if let Some(i) = left_only {
        return Some((i, RelocateConfidence::LeftContextOnly));
    }
    first_occurrence.map(|i| (i, RelocateConfidence::FirstOccurrence))
}
