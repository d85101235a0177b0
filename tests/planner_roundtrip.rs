use typing_planner::config::{AdvancedConfigOverrides, SpeedMode};
use typing_planner::{generate_plan, Event, Key, TypingOptions};

fn options(mistake_rate: f64, seed: u32) -> TypingOptions {
    TypingOptions {
        mistake_rate,
        seed: Some(seed),
        ..Default::default()
    }
}

#[test]
fn plan_replay_matches_normalized_text_across_seeds() {
    let text = "The quick brown fox jumps over the lazy dog, again and again.";
    for seed in 0..20u32 {
        let options = options(0.35, seed);
        let plan = generate_plan(text, &options).unwrap();
        assert_eq!(
            plan.apply(),
            plan.normalized_text,
            "seed {seed} failed to converge"
        );
    }
}

#[test]
fn multiline_text_preserves_newlines_through_corrections() {
    let text = "First line here.\nSecond line follows.\n\nThird paragraph after a blank line.";
    let options = options(0.4, 17);
    let plan = generate_plan(text, &options).unwrap();
    assert_eq!(plan.apply(), plan.normalized_text);
    assert!(plan
        .events
        .iter()
        .any(|e| matches!(e, Event::Key { key: Key::Enter, .. })));
}

#[test]
fn smart_punctuation_is_normalized_before_planning() {
    let text = "\u{201C}Hello\u{201D} \u{2013} world\u{2026}";
    let plan = generate_plan(text, &options(0.0, 1)).unwrap();
    assert_eq!(plan.normalized_text, "\"Hello\" - world...");
}

#[test]
fn dynamic_speed_mode_honors_inline_speed_tags() {
    let options = TypingOptions {
        mistake_rate: 0.0,
        seed: Some(4),
        speed_mode: SpeedMode::Dynamic,
        ..Default::default()
    };
    let plan = generate_plan("Start slow. [[200]]Now much faster.", &options).unwrap();
    assert!(!plan.normalized_text.contains("[["));
    assert_eq!(plan.apply(), plan.normalized_text);
}

#[test]
fn unsupported_character_rejected_before_planning() {
    let err = generate_plan("price: \u{1F4B0}", &options(0.0, 1)).unwrap_err();
    assert!(err.to_string().to_lowercase().contains("unsupported"));
}

#[test]
fn estimated_seconds_matches_summed_event_delays() {
    let plan = generate_plan("A short sample sentence.", &options(0.2, 8)).unwrap();
    let summed: f64 = plan.events.iter().map(Event::delay).sum();
    assert!((plan.estimated_seconds - summed).abs() < 1e-9);
}

#[test]
fn high_mistake_rate_still_converges_with_fix_sessions_and_reflex() {
    let options = TypingOptions {
        mistake_rate: 0.6,
        seed: Some(31),
        advanced: AdvancedConfigOverrides {
            fix_session_interval_words: Some(3),
            ..Default::default()
        },
        ..Default::default()
    };
    let text = "Writing under pressure tends to introduce many small errors along the way.";
    let plan = generate_plan(text, &options).unwrap();
    assert_eq!(plan.apply(), plan.normalized_text);
}

#[test]
fn empty_text_yields_empty_plan_with_zero_duration() {
    let plan = generate_plan("", &options(0.5, 2)).unwrap();
    assert!(plan.events.is_empty());
    assert_eq!(plan.estimated_seconds, 0.0);
    assert_eq!(plan.normalized_text, "");
}
