use crate::model::{Event, Key, PauseReason};
use crate::shadow::ShadowBuffer;

/// The only write path into a plan: every emission applies the change to
/// the shadow buffer first, then records the event, keeping the two
/// permanently in sync the way the planner's correctness guarantee
/// requires.
pub struct PlanBuilder {
    pub buffer: ShadowBuffer,
    events: Vec<Event>,
}

impl PlanBuilder {
    pub fn new() -> Self {
        Self {
            buffer: ShadowBuffer::new(),
            events: Vec::new(),
        }
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    pub fn type_char(&mut self, ch: char, delay_after_s: f64) {
        self.buffer.insert(ch);
        self.events.push(Event::Char { ch, delay_after_s });
    }

    pub fn press_key(&mut self, key: Key, delay_after_s: f64) {
        match key {
            Key::Enter => self.buffer.insert('\n'),
            Key::Backspace => self.buffer.backspace(),
            Key::Left => self.buffer.move_left(),
            Key::Right => self.buffer.move_right(),
            Key::Home => self.buffer.move_home(),
            Key::End => self.buffer.move_end(),
            Key::CtrlHome => self.buffer.move_ctrl_home(),
            Key::CtrlEnd => self.buffer.move_ctrl_end(),
        }
        self.events.push(Event::Key { key, delay_after_s });
    }

    pub fn pause(&mut self, seconds: f64, reason: PauseReason) {
        if seconds > 0.0 {
            self.events.push(Event::Pause { seconds, reason });
        }
    }

    /// Deletes the last `count` characters via individual backspaces.
    pub fn backspace_n(&mut self, count: usize, delay_per_step_s: f64) {
        for _ in 0..count {
            self.press_key(Key::Backspace, delay_per_step_s);
        }
    }

    /// Moves the caret to an absolute buffer position by repeated
    /// left/right single-step motions, emitting a short sync pause
    /// afterward to model external-editor coalescing of a multi-step move.
    pub fn move_caret_to(&mut self, target: usize, step_delay_s: f64, sync_pause_s: f64) {
        let target = target.min(self.buffer.len());
        let mut moved = false;
        while self.buffer.caret() < target {
            self.press_key(Key::Right, step_delay_s);
            moved = true;
        }
        while self.buffer.caret() > target {
            self.press_key(Key::Left, step_delay_s);
            moved = true;
        }
        if moved {
            self.pause(sync_pause_s, PauseReason::Sync);
        }
    }
}

impl Default for PlanBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_char_updates_buffer_and_events() {
        let mut pb = PlanBuilder::new();
        pb.type_char('a', 0.05);
        pb.type_char('b', 0.05);
        assert_eq!(pb.buffer.as_string(), "ab");
        assert_eq!(pb.into_events().len(), 2);
    }

    #[test]
    fn move_caret_to_emits_steps_and_sync_pause() {
        let mut pb = PlanBuilder::new();
        for c in "hello".chars() {
            pb.type_char(c, 0.02);
        }
        pb.move_caret_to(1, 0.01, 0.06);
        assert_eq!(pb.buffer.caret(), 1);
        let events = pb.into_events();
        let pauses = events
            .iter()
            .filter(|e| matches!(e, Event::Pause { reason: PauseReason::Sync, .. }))
            .count();
        assert_eq!(pauses, 1);
    }

    #[test]
    fn move_caret_to_noop_emits_no_sync_pause() {
        let mut pb = PlanBuilder::new();
        pb.type_char('a', 0.02);
        pb.move_caret_to(1, 0.01, 0.06);
        let events = pb.into_events();
        assert!(events
            .iter()
            .all(|e| !matches!(e, Event::Pause { reason: PauseReason::Sync, .. })));
    }
}
