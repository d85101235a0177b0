use typing_planner::{generate_plan, Plan, TypingOptions};

#[test]
fn plan_round_trips_through_json() {
    let options = TypingOptions {
        mistake_rate: 0.3,
        seed: Some(14),
        ..Default::default()
    };
    let plan = generate_plan("Hello there, friend.", &options).unwrap();

    let json = serde_json::to_string_pretty(&plan).expect("plan should serialize");
    let restored: Plan = serde_json::from_str(&json).expect("plan should deserialize");

    assert_eq!(restored.normalized_text, plan.normalized_text);
    assert_eq!(restored.events, plan.events);
    assert_eq!(restored.seed, plan.seed);
}
