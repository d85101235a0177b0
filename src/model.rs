use serde::{Deserialize, Serialize};

/// One step in the typed-event stream. Consumers apply these strictly in
/// order; each step is self-contained and carries its own timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Inserts a single character at the caret.
    Char { ch: char, delay_after_s: f64 },
    /// A non-character key press that mutates buffer or caret.
    Key { key: Key, delay_after_s: f64 },
    /// An idle interval with no buffer effect.
    Pause { seconds: f64, reason: PauseReason },
}

impl Event {
    pub fn delay(&self) -> f64 {
        match self {
            Event::Char { delay_after_s, .. } => *delay_after_s,
            Event::Key { delay_after_s, .. } => *delay_after_s,
            Event::Pause { seconds, .. } => *seconds,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Enter,
    Backspace,
    Left,
    Right,
    Home,
    End,
    CtrlHome,
    CtrlEnd,
}

/// Opaque tag explaining why a pause was inserted. Not consumed by
/// downstream dispatchers; useful for tests and observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PauseReason {
    Micro,
    Punctuation,
    Paragraph,
    ThinkBurstEnd,
    Reflex,
    Realization,
    SynonymRealization,
    FixSession,
    SpeedTag,
    Sync,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub normalized_text: String,
    pub events: Vec<Event>,
    pub estimated_seconds: f64,
    pub seed: u32,
}

impl Plan {
    /// Replays every event against a fresh buffer and returns the resulting
    /// text. Used by tests to check the convergence property.
    pub fn apply(&self) -> String {
        let mut buf: Vec<char> = Vec::new();
        let mut caret: usize = 0;
        for event in &self.events {
            match event {
                Event::Char { ch, .. } => {
                    buf.insert(caret, *ch);
                    caret += 1;
                }
                Event::Key { key, .. } => apply_key(&mut buf, &mut caret, *key),
                Event::Pause { .. } => {}
            }
        }
        buf.into_iter().collect()
    }
}

fn apply_key(buf: &mut Vec<char>, caret: &mut usize, key: Key) {
    match key {
        Key::Enter => {
            buf.insert(*caret, '\n');
            *caret += 1;
        }
        Key::Backspace => {
            if *caret > 0 {
                buf.remove(*caret - 1);
                *caret -= 1;
            }
        }
        Key::Left => {
            if *caret > 0 {
                *caret -= 1;
            }
        }
        Key::Right => {
            if *caret < buf.len() {
                *caret += 1;
            }
        }
        Key::Home => {
            let mut i = *caret;
            while i > 0 && buf[i - 1] != '\n' {
                i -= 1;
            }
            *caret = i;
        }
        Key::End => {
            let mut i = *caret;
            while i < buf.len() && buf[i] != '\n' {
                i += 1;
            }
            *caret = i;
        }
        Key::CtrlHome => *caret = 0,
        Key::CtrlEnd => *caret = buf.len(),
    }
}
