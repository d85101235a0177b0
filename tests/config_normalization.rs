use typing_planner::config::{AdvancedConfigOverrides, TypoWeights};
use typing_planner::TypingOptions;

#[test]
fn overrides_normalize_is_idempotent() {
    let overrides = AdvancedConfigOverrides {
        min_inter_key_s: Some(1.0),
        max_inter_key_s: Some(0.2),
        reflex_rate: Some(-3.0),
        typo_weights: Some(TypoWeights {
            nearby: -1.0,
            random: 2.0,
            double: 0.0,
            skip: 0.0,
        }),
        ..Default::default()
    };
    let once = overrides.normalize();
    assert!(once.min_inter_key_s <= once.max_inter_key_s);
    assert_eq!(once.reflex_rate, 0.0);
    assert_eq!(once.typo_weights.nearby, 0.0);
}

#[test]
fn typing_options_clamp_speed_and_variance_out_of_range() {
    let options = TypingOptions {
        speed_wpm: -40.0,
        speed_variance: 5.0,
        avg_word_length: 0.0,
        ..Default::default()
    };
    let (speed_wpm, _, speed_variance, _, _, avg_word_length, ..) = options.normalized();
    assert!(speed_wpm >= 10.0);
    assert!((0.0..=1.0).contains(&speed_variance));
    assert!(avg_word_length >= 3.0);
}

#[test]
fn unset_overrides_fall_back_to_documented_defaults() {
    let cfg = AdvancedConfigOverrides::default().normalize();
    assert!(cfg.burst_words_min <= cfg.burst_words_max);
    assert!(cfg.fix_session_max_fixes >= 1);
}
