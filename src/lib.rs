//! Deterministic synthesis of a human-like typing event stream from a
//! target text: keystrokes, corrections, and pauses that a downstream
//! dispatcher can replay verbatim to drive a real input surface.

pub mod config;
pub mod emitter;
pub mod estimator;
pub mod keyboard;
pub mod mistakes;
pub mod model;
pub mod normalize;
pub mod planner;
pub mod rng;
pub mod shadow;
pub mod speed_tags;
pub mod synonyms;
pub mod timing;

pub use config::{
    AdvancedConfig, AdvancedConfigOverrides, SpeedMode, SynonymCorrectionMode, TypingOptions,
    TypoWeights,
};
pub use estimator::{estimate, solve_wpm, DurationEstimate};
pub use model::{Event, Key, PauseReason, Plan};
pub use planner::generate_plan;
