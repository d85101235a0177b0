use typing_planner::config::AdvancedConfigOverrides;
use typing_planner::{estimate, solve_wpm, TypingOptions};

fn options() -> TypingOptions {
    TypingOptions {
        mistake_rate: 0.0,
        seed: Some(21),
        advanced: AdvancedConfigOverrides {
            burst_enabled: Some(false),
            ..Default::default()
        },
        ..Default::default()
    }
}

#[test]
fn estimate_bounds_bracket_the_mean() {
    let text = "Measuring typing duration across a handful of seeds.";
    let summary = estimate(text, &options(), 6).unwrap();
    assert!(summary.min_seconds <= summary.mean_seconds);
    assert!(summary.mean_seconds <= summary.max_seconds);
}

#[test]
fn solve_wpm_finds_a_speed_near_the_target_duration() {
    let text = "A sentence chosen to take a predictable amount of time to type out.";
    let target_seconds = 8.0;
    let wpm = solve_wpm(text, &options(), target_seconds, (15.0, 150.0), 4).unwrap();

    let mut solved = options();
    solved.speed_wpm = wpm;
    let achieved = estimate(text, &solved, 6).unwrap();
    assert!((achieved.mean_seconds - target_seconds).abs() < target_seconds * 0.4);
}

#[test]
fn solve_wpm_rejects_zero_target_duration() {
    let result = solve_wpm("anything", &options(), 0.0, (10.0, 200.0), 3);
    assert!(result.is_err());
}
