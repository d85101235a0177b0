use anyhow::{bail, Result};

use crate::config::{AdvancedConfig, SpeedMode, SynonymCorrectionMode, TypingOptions};
use crate::emitter::PlanBuilder;
use crate::keyboard;
use crate::mistakes::{relocate, OpenMistake, PendingFix};
use crate::model::{Event, Key, PauseReason, Plan};
use crate::normalize::normalize_text;
use crate::rng::{derive_seed, PlannerRng};
use crate::speed_tags::{extract_speed_tags, SpeedChange};
use crate::synonyms;
use crate::timing;

/// A character the keyboard model has no mapping for; ASCII printable
/// characters and newline are the supported range, mirroring the
/// teacher's `find_first_unsupported_char` gate in `generate_plan_impl`.
fn find_unsupported_char(text: &str) -> Option<char> {
    text.chars()
        .find(|&c| c != '\n' && c != '\t' && !(c == ' ' || c.is_ascii_graphic()))
}

fn is_word_char(c: char) -> bool {
    c.is_alphabetic()
}

/// Half-open `[start, end)` word spans matching `letter(letter|')*letter?`.
fn word_spans(chars: &[char]) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        if is_word_char(chars[i]) {
            let start = i;
            i += 1;
            while i < chars.len()
                && (is_word_char(chars[i])
                    || (chars[i] == '\'' && i + 1 < chars.len() && is_word_char(chars[i + 1])))
            {
                i += 1;
            }
            spans.push((start, i));
        } else {
            i += 1;
        }
    }
    spans
}

#[derive(Debug, Clone, Copy)]
enum TypoKind {
    Nearby,
    Random,
    Double,
    Skip,
}

/// Generates a deterministic typing plan for `raw_text` under `options`.
/// This is the crate's single entry point: normalizes the text, derives a
/// seed, and drives the per-character state machine described in the
/// planner's design notes.
pub fn generate_plan(raw_text: &str, options: &TypingOptions) -> Result<Plan> {
    let normalized = normalize_text(raw_text);
    if let Some(bad) = find_unsupported_char(&normalized) {
        bail!("unsupported character {bad:?} in input text");
    }

    let (speed_wpm, speed_mode, speed_variance, mistake_rate, fatigue_mode, avg_word_length, seed_opt, cfg) =
        options.normalized();
    let dynamic = matches!(speed_mode, SpeedMode::Dynamic);

    let (typing_text, speed_changes) = if dynamic {
        extract_speed_tags(&normalized)
    } else {
        (normalized.clone(), Vec::new())
    };

    let entropy = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    let seed = derive_seed(seed_opt, &normalized, entropy);

    let chars: Vec<char> = typing_text.chars().collect();
    let events = State::new(
        chars.clone(),
        speed_wpm,
        dynamic,
        speed_variance,
        mistake_rate,
        fatigue_mode,
        avg_word_length,
        cfg,
        speed_changes,
        seed,
    )
    .run();

    let estimated_seconds: f64 = events.iter().map(Event::delay).sum();

    Ok(Plan {
        normalized_text: typing_text,
        events,
        estimated_seconds,
        seed,
    })
}

struct State {
    target: Vec<char>,
    pb: PlanBuilder,
    rng: PlannerRng,
    cfg: AdvancedConfig,
    dynamic: bool,
    speed_variance: f64,
    mistake_rate: f64,
    fatigue_mode: bool,
    avg_word_length: f64,
    speed_changes: Vec<SpeedChange>,

    base_wpm: f64,
    drift_target: f64,
    current_wpm: f64,
    chars_since_drift: usize,
    burst_remaining: Option<i64>,

    open_mistake: Option<OpenMistake>,
    pending_fixes: Vec<PendingFix>,
    next_fix_id: u64,
    last_mistake_pos: Option<usize>,
    words_completed: u64,
}

impl State {
    #[allow(clippy::too_many_arguments)]
    fn new(
        target: Vec<char>,
        base_wpm: f64,
        dynamic: bool,
        speed_variance: f64,
        mistake_rate: f64,
        fatigue_mode: bool,
        avg_word_length: f64,
        cfg: AdvancedConfig,
        speed_changes: Vec<SpeedChange>,
        seed: u32,
    ) -> Self {
        Self {
            target,
            pb: PlanBuilder::new(),
            rng: PlannerRng::from_seed(seed),
            cfg,
            dynamic,
            speed_variance,
            mistake_rate,
            fatigue_mode,
            avg_word_length,
            speed_changes,
            base_wpm,
            drift_target: base_wpm,
            current_wpm: base_wpm,
            chars_since_drift: 0,
            burst_remaining: None,
            open_mistake: None,
            pending_fixes: Vec::new(),
            next_fix_id: 0,
            last_mistake_pos: None,
            words_completed: 0,
        }
    }

    fn run(mut self) -> Vec<Event> {
        let spans = word_spans(&self.target);
        let word_start_to_idx: std::collections::HashMap<usize, usize> =
            spans.iter().enumerate().map(|(idx, &(s, _))| (s, idx)).collect();

        let mut i = 0usize;
        let mut current_word: Option<(usize, usize)> = None;
        let len = self.target.len();

        while i < len {
            self.maybe_realize_char_mistake(i);
            self.maybe_apply_speed_tag(i);

            if current_word.is_none() {
                if let Some(&word_idx) = word_start_to_idx.get(&i) {
                    let (start, end) = spans[word_idx];
                    self.maybe_advance_burst();
                    if self.try_synonym_substitution(start, end) {
                        i = end;
                        self.finish_word(i);
                        continue;
                    }
                    current_word = Some((start, end));
                }
            }

            let ch = self.target[i];
            let word_len_so_far = current_word.map(|(start, _)| i - start + 1).unwrap_or(1).max(1);
            self.advance_speed_state();
            self.type_position(i, ch, word_len_so_far);
            i += 1;

            if let Some((_, end)) = current_word {
                if i == end {
                    current_word = None;
                    self.finish_word(i);
                }
            }
        }

        self.finalize();
        self.pb.into_events()
    }

    /// Called with `i` at the position just past the word that completed
    /// (the current target position), since a deferred synonym realization
    /// retypes everything from the substitution up to here, not just the
    /// substituted word's own span.
    fn finish_word(&mut self, i: usize) {
        self.words_completed += 1;
        if let Some(n) = self.burst_remaining {
            if n > 0 {
                self.burst_remaining = Some(n - 1);
            }
        }
        self.maybe_realize_synonym_mistake(i);
        self.maybe_run_fix_session(false);
    }

    fn progress(&self, i: usize) -> f64 {
        if self.target.is_empty() {
            0.0
        } else {
            i as f64 / self.target.len() as f64
        }
    }

    fn in_burst(&self) -> bool {
        matches!(self.burst_remaining, Some(n) if n > 0)
    }

    fn effective_wpm(&self) -> f64 {
        if self.in_burst() {
            self.current_wpm * self.cfg.burst_speed_mult
        } else {
            self.current_wpm
        }
    }

    fn advance_speed_state(&mut self) {
        if !self.dynamic {
            return;
        }
        self.chars_since_drift += 1;
        if self.chars_since_drift >= self.cfg.drift_every_chars {
            self.chars_since_drift = 0;
            let u = self.rng.float() * 2.0 - 1.0;
            self.drift_target = (self.base_wpm * (1.0 + u * self.speed_variance)).clamp(10.0, 999.0);
        }
        self.current_wpm += (self.drift_target - self.current_wpm) * self.cfg.drift_smoothing;
    }

    fn maybe_advance_burst(&mut self) {
        if !self.cfg.burst_enabled {
            return;
        }
        match self.burst_remaining {
            None => {
                self.burst_remaining = Some(self.rng.int(self.cfg.burst_words_min, self.cfg.burst_words_max));
            }
            Some(0) => {
                let pause = timing::burst_think_pause_s(&self.cfg, &mut self.rng);
                self.pb.pause(pause, PauseReason::ThinkBurstEnd);
                self.burst_remaining = Some(self.rng.int(self.cfg.burst_words_min, self.cfg.burst_words_max));
            }
            Some(_) => {}
        }
    }

    fn maybe_apply_speed_tag(&mut self, i: usize) {
        if !self.dynamic {
            return;
        }
        if let Some(change) = self.speed_changes.iter().find(|c| c.at_index == i) {
            self.base_wpm = change.wpm;
            self.drift_target = change.wpm;
            self.current_wpm = change.wpm;
            self.pb.pause(self.cfg.sync_pause_s, PauseReason::SpeedTag);
        }
    }

    fn char_delay(&mut self, ch: char, i: usize) -> f64 {
        let progress = self.progress(i);
        let wpm = self.effective_wpm();
        timing::inter_key_delay_s(
            ch,
            wpm,
            progress,
            &self.cfg,
            self.speed_variance,
            self.fatigue_mode,
            &mut self.rng,
        )
    }

    fn type_plain_char(&mut self, ch: char, i: usize) {
        let delay = self.char_delay(ch, i);
        self.pb.type_char(ch, delay);
        self.after_char_pauses(ch, i);
    }

    fn press_enter(&mut self, i: usize) {
        let delay = self.char_delay('\n', i);
        self.pb.press_key(Key::Enter, delay);
        self.after_char_pauses('\n', i);
    }

    fn after_char_pauses(&mut self, ch: char, i: usize) {
        let micro = timing::micro_pause_s(&self.cfg, &mut self.rng);
        self.pb.pause(micro, PauseReason::Micro);

        if matches!(ch, '.' | ',' | '!' | '?' | ';' | ':' | '\n') {
            let next_is_newline = self.target.get(i + 1) == Some(&'\n');
            let pause = timing::punctuation_pause_s(ch, next_is_newline, &self.cfg, &mut self.rng);
            let reason = if ch == '\n' && next_is_newline {
                PauseReason::Paragraph
            } else {
                PauseReason::Punctuation
            };
            self.pb.pause(pause, reason);
        }
    }

    fn mistake_probability(&self, ch: char, word_len_so_far: usize, i: usize) -> f64 {
        if ch == '\n' {
            return 0.0;
        }
        let mut p = self.mistake_rate;
        if ch.is_whitespace() {
            p *= 0.25;
        }
        if self.cfg.dynamic_mistakes {
            if ch.is_uppercase() {
                p *= 1.35;
            }
            if matches!(ch, '.' | ',' | '!' | '?' | ';' | ':') {
                p *= 1.20;
            }
            // Current word length so far (not the word's total length)
            // relative to the configured average, per the dynamic-mistake
            // weighting: the probability climbs the deeper into a long word
            // typing has already gone.
            let relative = word_len_so_far as f64 / self.avg_word_length.max(3.0);
            if relative >= 2.2 {
                p *= 1.28;
            } else if relative >= 1.6 {
                p *= 1.15;
            }
        }
        if self.in_burst() {
            p *= 1.08;
        }
        if self.open_mistake.is_some() {
            return 0.0;
        }
        if let Some(last) = self.last_mistake_pos {
            let delta = i.saturating_sub(last);
            if delta < self.cfg.clustering_decay_chars {
                let decay = self.cfg.clustering_decay_chars as f64;
                let frac = 1.0 - (delta as f64 / decay);
                p *= 1.0 + 0.5 * frac;
            }
        }
        p.clamp(0.0, 0.75)
    }

    fn draw_typo_kind(&mut self) -> TypoKind {
        let w = self.cfg.typo_weights;
        let total = (w.nearby + w.random + w.double + w.skip).max(1e-9);
        let u = self.rng.float() * total;
        if u < w.nearby {
            TypoKind::Nearby
        } else if u < w.nearby + w.random {
            TypoKind::Random
        } else if u < w.nearby + w.random + w.double {
            TypoKind::Double
        } else {
            TypoKind::Skip
        }
    }

    /// Attempts to draw a wrong character for a substitution typo, retrying
    /// up to 5 times to avoid sampling the original character back.
    fn draw_substitution(&mut self, ch: char, kind: TypoKind) -> Option<char> {
        for _ in 0..5 {
            let candidate = match kind {
                TypoKind::Nearby => keyboard::nearby(ch, &mut self.rng),
                TypoKind::Random => {
                    if ch.is_ascii_digit() {
                        let d = ch.to_digit(10).unwrap() as u8;
                        let nd = keyboard::nearby_digit(d, &mut self.rng);
                        char::from_digit(nd as u32, 10).unwrap_or(ch)
                    } else if ch.is_ascii_alphabetic() {
                        keyboard::random_letter(&mut self.rng, ch.is_uppercase())
                    } else {
                        keyboard::random_letter(&mut self.rng, false)
                    }
                }
                _ => unreachable!("draw_substitution only called for Nearby/Random"),
            };
            let effective = if self.cfg.case_sensitive_typos {
                candidate
            } else {
                candidate.to_ascii_lowercase()
            };
            if effective != ch {
                return Some(effective);
            }
        }
        None
    }

    fn type_position(&mut self, i: usize, ch: char, word_len_so_far: usize) {
        if ch == '\n' {
            self.press_enter(i);
            return;
        }

        let p = self.mistake_probability(ch, word_len_so_far, i);
        if !self.rng.bool(p) {
            self.type_plain_char(ch, i);
            return;
        }

        self.last_mistake_pos = Some(i);
        match self.draw_typo_kind() {
            TypoKind::Double => self.reflex_double(ch, i),
            TypoKind::Skip => self.reflex_skip(ch, i),
            kind @ (TypoKind::Nearby | TypoKind::Random) => {
                let Some(wrong) = self.draw_substitution(ch, kind) else {
                    self.type_plain_char(ch, i);
                    return;
                };
                self.handle_substitution_typo(i, ch, wrong);
            }
        }
    }

    fn reflex_double(&mut self, ch: char, i: usize) {
        self.type_plain_char(ch, i);
        let delay = self.char_delay(ch, i);
        self.pb.type_char(ch, delay);
        let pause = timing::reflex_pause_s(&self.cfg, &mut self.rng);
        self.pb.pause(pause, PauseReason::Reflex);
        let bdelay = timing::backspace_delay_s(&self.cfg, &mut self.rng);
        self.pb.press_key(Key::Backspace, bdelay);
    }

    fn reflex_skip(&mut self, ch: char, i: usize) {
        let pause = timing::reflex_pause_s(&self.cfg, &mut self.rng);
        self.pb.pause(pause, PauseReason::Reflex);
        self.type_plain_char(ch, i);
    }

    fn reflex_substitution(&mut self, ch: char, wrong: char, i: usize) {
        let delay = self.char_delay(wrong, i);
        self.pb.type_char(wrong, delay);
        let pause = timing::reflex_pause_s(&self.cfg, &mut self.rng);
        self.pb.pause(pause, PauseReason::Reflex);
        let bdelay = timing::backspace_delay_s(&self.cfg, &mut self.rng);
        self.pb.press_key(Key::Backspace, bdelay);
        self.type_plain_char(ch, i);
    }

    fn handle_substitution_typo(&mut self, i: usize, ch: char, wrong: char) {
        if self.rng.bool(self.cfg.reflex_rate) {
            self.reflex_substitution(ch, wrong, i);
            return;
        }

        let u = self.rng.float();
        if self.cfg.fix_sessions_enabled && u >= self.cfg.deletion_backtrack_chance {
            self.create_pending_fix(ch, wrong);
            self.type_plain_char(wrong, i);
            return;
        }

        self.start_open_mistake_char(i);
        self.type_plain_char(wrong, i);
    }

    fn create_pending_fix(&mut self, correct: char, wrong: char) {
        let buf_index = self.pb.buffer.len();
        let (before, after) = self.pb.buffer.context_around(buf_index, self.cfg.context_window_chars);
        self.next_fix_id += 1;
        self.pending_fixes.push(PendingFix {
            id: self.next_fix_id,
            wrong_char: wrong,
            correct_char: correct,
            context_before: before,
            context_after: after,
            created_at_word_ordinal: self.words_completed,
            created_at_buffer_index: buf_index,
        });
    }

    fn start_open_mistake_char(&mut self, i: usize) {
        self.open_mistake = Some(OpenMistake::Char {
            target_start_index: i,
            buffer_length_at_start: self.pb.buffer.len(),
            created_at_index: i,
        });
    }

    fn maybe_realize_char_mistake(&mut self, i: usize) {
        let created_at_index = match &self.open_mistake {
            Some(OpenMistake::Char { created_at_index, .. }) => *created_at_index,
            _ => return,
        };
        let delta = i.saturating_sub(created_at_index);
        if delta < self.cfg.realization_min_delay_chars {
            return;
        }
        let force = delta >= self.cfg.realization_max_delay_chars;
        let steps = (delta.saturating_sub(self.cfg.realization_min_delay_chars) + 1) as f64;
        let prob = (self.cfg.realization_base + self.cfg.realization_sensitivity * steps).clamp(0.0, 0.95);
        if force || self.rng.bool(prob) {
            self.correct_open_mistake(i);
        }
    }

    /// `i` is the current target position (just past the word that was
    /// completed when this is called). A backtracked synonym retypes
    /// everything from the substitution up to here, not just its own word
    /// span, since any correct text typed in between would otherwise be
    /// deleted and never retyped.
    fn maybe_realize_synonym_mistake(&mut self, i: usize) {
        let trigger_at_word_ordinal = match &self.open_mistake {
            Some(OpenMistake::Synonym { trigger_at_word_ordinal, .. }) => *trigger_at_word_ordinal,
            _ => return,
        };
        if self.words_completed >= trigger_at_word_ordinal {
            self.correct_open_mistake(i);
        }
    }

    /// Corrects the current open mistake: navigate to end, backspace down
    /// to `buffer_length_at_start`, retype `target[target_start..target_end]`
    /// at a reduced sigma, and drop any pending fixes whose snapshot fell
    /// inside the window that was just deleted and retyped.
    fn correct_open_mistake(&mut self, target_end: usize) {
        let Some(om) = self.open_mistake.take() else { return };
        let target_start = om.target_start_index();
        let buffer_length_at_start = om.buffer_length_at_start();
        let is_synonym = matches!(om, OpenMistake::Synonym { .. });

        let reason = if is_synonym {
            PauseReason::SynonymRealization
        } else {
            PauseReason::Realization
        };
        let pause = timing::realization_pause_s(&self.cfg, &mut self.rng);
        self.pb.pause(pause, reason);

        let nav_delay = self.cfg.min_inter_key_s;
        self.pb.press_key(Key::CtrlEnd, nav_delay);
        self.pb.pause(self.cfg.sync_pause_s, PauseReason::Sync);

        let old_len = self.pb.buffer.len();
        let backspaces = old_len.saturating_sub(buffer_length_at_start);
        for _ in 0..backspaces {
            let bdelay = timing::backspace_delay_s(&self.cfg, &mut self.rng);
            self.pb.press_key(Key::Backspace, bdelay);
        }

        let careful_cfg = AdvancedConfig {
            base_sigma: (self.cfg.base_sigma * 0.6).max(0.05),
            ..self.cfg.clone()
        };
        for idx in target_start..target_end.min(self.target.len()) {
            let ch = self.target[idx];
            if ch == '\n' {
                self.pb.press_key(Key::Enter, careful_cfg.min_inter_key_s);
                continue;
            }
            let delay = timing::inter_key_delay_s(
                ch,
                self.current_wpm,
                self.progress(idx),
                &careful_cfg,
                self.speed_variance,
                self.fatigue_mode,
                &mut self.rng,
            );
            self.pb.type_char(ch, delay);
        }

        self.pending_fixes
            .retain(|f| !(f.created_at_buffer_index >= buffer_length_at_start && f.created_at_buffer_index < old_len));
    }

    fn try_synonym_substitution(&mut self, start: usize, end: usize) -> bool {
        if !self.cfg.synonym_replace_enabled || self.open_mistake.is_some() {
            return false;
        }
        if !self.rng.bool(self.cfg.synonym_replace_chance) {
            return false;
        }
        let word: String = self.target[start..end].iter().collect();
        let Some(alt) = synonyms::pick_alternative(&word, self.cfg.allow_multi_word_synonyms, &mut self.rng) else {
            return false;
        };

        let buffer_len_before = self.pb.buffer.len();
        for ch in alt.chars() {
            let delay = self.char_delay(ch, start);
            self.pb.type_char(ch, delay);
        }

        match self.cfg.synonym_correction_mode {
            SynonymCorrectionMode::Live => {
                let pause = timing::reflex_pause_s(&self.cfg, &mut self.rng);
                self.pb.pause(pause, PauseReason::Reflex);
                let alt_len = alt.chars().count();
                for _ in 0..alt_len {
                    let bdelay = timing::backspace_delay_s(&self.cfg, &mut self.rng);
                    self.pb.press_key(Key::Backspace, bdelay);
                }
                for ch in self.target[start..end].to_vec() {
                    let delay = self.char_delay(ch, start);
                    self.pb.type_char(ch, delay);
                }
            }
            SynonymCorrectionMode::Backtrack => {
                let backtrack = self.rng.int(self.cfg.min_backtrack_words, self.cfg.max_backtrack_words) as u64;
                self.open_mistake = Some(OpenMistake::Synonym {
                    target_start_index: start,
                    buffer_length_at_start: buffer_len_before,
                    created_at_index: start,
                    trigger_at_word_ordinal: self.words_completed + 1 + backtrack,
                });
            }
        }
        true
    }

    fn maybe_run_fix_session(&mut self, final_session: bool) {
        if final_session {
            if !self.pending_fixes.is_empty() {
                self.run_fix_session(true);
            }
            return;
        }
        let interval = self.cfg.fix_session_interval_words as u64;
        if self.words_completed > 0
            && self.words_completed % interval == 0
            && self.open_mistake.is_none()
            && !self.pending_fixes.is_empty()
        {
            self.run_fix_session(false);
        }
    }

    fn run_fix_session(&mut self, final_session: bool) {
        let pause = timing::fix_session_pause_s(&self.cfg, &mut self.rng);
        self.pb.pause(pause, PauseReason::FixSession);
        self.pb.press_key(Key::CtrlEnd, self.cfg.min_inter_key_s);
        self.pb.pause(self.cfg.sync_pause_s, PauseReason::Sync);

        let snapshot: Vec<char> = self.pb.buffer.as_string().chars().collect();
        let mut resolved: Vec<(usize, PendingFix)> = Vec::new();
        for fix in self.pending_fixes.drain(..) {
            match relocate(&snapshot, &fix) {
                Some((pos, _confidence)) => resolved.push((pos, fix)),
                None => {
                    tracing::warn!(fix_id = fix.id, "could not relocate pending fix; dropping it");
                }
            }
        }
        resolved.sort_by(|a, b| b.0.cmp(&a.0));

        let take_n = if final_session {
            resolved.len()
        } else {
            resolved.len().min(self.cfg.fix_session_max_fixes)
        };

        let mut leftover = Vec::new();
        let mut aborted = false;
        for (idx, (pos, fix)) in resolved.into_iter().enumerate() {
            if aborted || idx >= take_n {
                leftover.push(fix);
                continue;
            }
            match self.pb.buffer.char_at(pos) {
                Some(c) if c == fix.correct_char => continue,
                Some(c) if c == fix.wrong_char => {}
                _ => {
                    tracing::warn!(fix_id = fix.id, "pending fix position mismatch; aborting session");
                    aborted = true;
                    leftover.push(fix);
                    continue;
                }
            }

            let before_len = self.pb.buffer.len();
            self.pb.move_caret_to(pos + 1, self.cfg.min_inter_key_s, self.cfg.sync_pause_s);
            let bdelay = timing::backspace_delay_s(&self.cfg, &mut self.rng);
            self.pb.press_key(Key::Backspace, bdelay);
            let cdelay = self.char_delay(fix.correct_char, pos);
            self.pb.type_char(fix.correct_char, cdelay);

            if self.pb.buffer.len() != before_len {
                tracing::warn!(fix_id = fix.id, "fix session changed buffer length unexpectedly; aborting");
                aborted = true;
            }
        }

        if aborted {
            self.pending_fixes.clear();
        } else {
            self.pending_fixes.extend(leftover);
        }

        self.pb.press_key(Key::CtrlEnd, self.cfg.min_inter_key_s);
        let return_pause = timing::fix_session_pause_s(&self.cfg, &mut self.rng);
        self.pb.pause(return_pause * 0.4, PauseReason::FixSession);
    }

    fn finalize(&mut self) {
        if self.open_mistake.is_some() {
            self.correct_open_mistake(self.target.len());
        }
        if !self.pending_fixes.is_empty() {
            self.run_fix_session(true);
        }

        let expected: String = self.target.iter().collect();
        if self.pb.buffer.as_string() != expected {
            tracing::warn!("plan failed to converge by normal means; applying full safety-net retype");
            self.pb.press_key(Key::CtrlEnd, self.cfg.min_inter_key_s);
            let len = self.pb.buffer.len();
            self.pb.backspace_n(len, self.cfg.min_inter_key_s);
            let careful_cfg = AdvancedConfig {
                base_sigma: (self.cfg.base_sigma * 1.4).min(1.0),
                ..self.cfg.clone()
            };
            for &ch in &self.target.clone() {
                if ch == '\n' {
                    self.pb.press_key(Key::Enter, careful_cfg.min_inter_key_s);
                    continue;
                }
                let delay = timing::inter_key_delay_s(
                    ch,
                    self.current_wpm.max(20.0),
                    1.0,
                    &careful_cfg,
                    self.speed_variance,
                    false,
                    &mut self.rng,
                );
                self.pb.type_char(ch, delay);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AdvancedConfigOverrides;

    fn opts(mistake_rate: f64, seed: u32) -> TypingOptions {
        TypingOptions {
            mistake_rate,
            seed: Some(seed),
            ..Default::default()
        }
    }

    #[test]
    fn empty_input_produces_empty_plan() {
        let plan = generate_plan("", &opts(0.3, 1)).unwrap();
        assert!(plan.events.is_empty());
        assert_eq!(plan.estimated_seconds, 0.0);
    }

    #[test]
    fn zero_mistake_rate_converges_without_corrections() {
        let options = opts(0.0, 7);
        let plan = generate_plan("Hello world. This should type cleanly.", &options).unwrap();
        assert_eq!(plan.apply(), plan.normalized_text);
        assert!(!plan
            .events
            .iter()
            .any(|e| matches!(e, Event::Key { key: Key::Backspace, .. })));
    }

    #[test]
    fn determinism_same_seed_same_plan() {
        let options = opts(0.5, 42);
        let a = generate_plan("Typing is a skill that rewards practice.", &options).unwrap();
        let b = generate_plan("Typing is a skill that rewards practice.", &options).unwrap();
        assert_eq!(a.events, b.events);
        assert_eq!(a.seed, b.seed);
    }

    #[test]
    fn forced_reflex_converges() {
        let options = TypingOptions {
            mistake_rate: 1.0,
            seed: Some(123),
            advanced: AdvancedConfigOverrides {
                reflex_rate: Some(1.0),
                typo_weights: Some(crate::config::TypoWeights {
                    nearby: 1.0,
                    random: 0.0,
                    double: 0.0,
                    skip: 0.0,
                }),
                case_sensitive_typos: Some(false),
                ..Default::default()
            },
            ..Default::default()
        };
        let plan = generate_plan("a", &options).unwrap();
        assert_eq!(plan.apply(), "a");
        assert!(plan
            .events
            .iter()
            .any(|e| matches!(e, Event::Key { key: Key::Backspace, .. })));
    }

    #[test]
    fn forced_delete_and_retype_converges() {
        let options = TypingOptions {
            mistake_rate: 0.8,
            seed: Some(9),
            advanced: AdvancedConfigOverrides {
                reflex_rate: Some(0.0),
                realization_base: Some(1.0),
                realization_min_delay_chars: Some(1),
                realization_max_delay_chars: Some(2),
                synonym_replace_enabled: Some(false),
                ..Default::default()
            },
            ..Default::default()
        };
        let plan = generate_plan("Typing.", &options).unwrap();
        assert_eq!(plan.apply(), "Typing.");
        assert!(plan
            .events
            .iter()
            .any(|e| matches!(e, Event::Key { key: Key::Backspace, .. })));
        assert!(plan
            .events
            .iter()
            .any(|e| matches!(e, Event::Key { key: Key::CtrlEnd, .. })));
    }

    #[test]
    fn fix_session_navigates_with_left_or_right() {
        let options = TypingOptions {
            mistake_rate: 0.9,
            seed: Some(55),
            advanced: AdvancedConfigOverrides {
                typo_weights: Some(crate::config::TypoWeights {
                    nearby: 0.8,
                    random: 0.2,
                    double: 0.0,
                    skip: 0.0,
                }),
                reflex_rate: Some(0.0),
                deletion_backtrack_chance: Some(0.0),
                fix_sessions_enabled: Some(true),
                fix_session_interval_words: Some(2),
                synonym_replace_enabled: Some(false),
                ..Default::default()
            },
            ..Default::default()
        };
        let plan = generate_plan(
            "Hello world this is a longer sentence for review.",
            &options,
        )
        .unwrap();
        assert_eq!(plan.apply(), plan.normalized_text);
        assert!(plan.events.iter().any(|e| matches!(
            e,
            Event::Key { key: Key::Left, .. } | Event::Key { key: Key::Right, .. }
        )));
    }

    #[test]
    fn synonym_live_correction_converges() {
        let options = TypingOptions {
            mistake_rate: 0.0,
            seed: Some(3),
            advanced: AdvancedConfigOverrides {
                synonym_replace_enabled: Some(true),
                synonym_replace_chance: Some(1.0),
                synonym_correction_mode: Some(SynonymCorrectionMode::Live),
                ..Default::default()
            },
            ..Default::default()
        };
        let plan = generate_plan("Quick fox.", &options).unwrap();
        assert_eq!(plan.apply(), plan.normalized_text);
        assert!(plan
            .events
            .iter()
            .any(|e| matches!(e, Event::Key { key: Key::Backspace, .. })));
    }

    #[test]
    fn synonym_backtrack_correction_converges() {
        let options = TypingOptions {
            mistake_rate: 0.0,
            seed: Some(3),
            advanced: AdvancedConfigOverrides {
                synonym_replace_enabled: Some(true),
                synonym_replace_chance: Some(1.0),
                synonym_correction_mode: Some(SynonymCorrectionMode::Backtrack),
                min_backtrack_words: Some(1),
                max_backtrack_words: Some(1),
                ..Default::default()
            },
            ..Default::default()
        };
        let plan = generate_plan("Quick fox.", &options).unwrap();
        assert_eq!(plan.apply(), plan.normalized_text);
        assert!(plan
            .events
            .iter()
            .any(|e| matches!(e, Event::Pause { reason: PauseReason::SynonymRealization, .. })));
    }

    #[test]
    fn speed_tag_changes_recorded_wpm_and_strips_marker() {
        let options = TypingOptions {
            mistake_rate: 0.0,
            seed: Some(1),
            speed_mode: SpeedMode::Dynamic,
            ..Default::default()
        };
        let plan = generate_plan("Hi [[120]]there.", &options).unwrap();
        assert_eq!(plan.normalized_text, "Hi there.");
        assert_eq!(plan.apply(), "Hi there.");
    }

    #[test]
    fn unsupported_character_is_an_error() {
        let err = generate_plan("emoji \u{1F600}", &opts(0.0, 1)).unwrap_err();
        assert!(err.to_string().contains("unsupported character"));
    }

    #[test]
    fn every_delay_is_within_clamped_bounds() {
        let options = opts(0.4, 99);
        let plan = generate_plan("A reasonably long sentence to exercise timing.", &options).unwrap();
        for event in &plan.events {
            match event {
                Event::Char { delay_after_s, .. } | Event::Key { delay_after_s, .. } => {
                    assert!(*delay_after_s >= 0.0);
                }
                Event::Pause { seconds, .. } => {
                    assert!(*seconds >= 0.0 && *seconds <= 30.0);
                }
            }
        }
    }
}
