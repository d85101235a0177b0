use crate::config::AdvancedConfig;
use crate::rng::PlannerRng;

const HUNT_AND_PECK_SYMBOLS: &str = "@#$%^&*~`|\\<>+=_/\"'";

fn log_normal(mean: f64, sigma: f64, rng: &mut PlannerRng) -> f64 {
    let z = rng.normal();
    (mean.max(1e-6).ln() - sigma * sigma / 2.0 + sigma * z).exp()
}

/// Effective sigma for the inter-key LogNormal draw, widened by the
/// configured speed variance.
pub fn effective_sigma(base_sigma: f64, speed_variance: f64) -> f64 {
    (base_sigma * (0.35 + 0.9 * speed_variance)).clamp(0.08, 0.65)
}

/// Samples the delay, in seconds, following a single keystroke typing
/// `ch` at `wpm`, given typing progress in `[0, 1]` for the fatigue
/// multiplier.
#[allow(clippy::too_many_arguments)]
pub fn inter_key_delay_s(
    ch: char,
    wpm: f64,
    progress: f64,
    cfg: &AdvancedConfig,
    speed_variance: f64,
    fatigue_mode: bool,
    rng: &mut PlannerRng,
) -> f64 {
    const KEYSTROKES_PER_WORD: f64 = 5.0;
    let mean_s = 60.0 / (wpm.max(1.0) * KEYSTROKES_PER_WORD);

    let mut multiplier = 1.0;
    if ch.is_uppercase() {
        multiplier *= 1.08;
    }
    if ch.is_ascii_digit() {
        multiplier *= 1.05;
    }
    if matches!(ch, '(' | ')' | '[' | ']' | '{' | '}') {
        multiplier *= 1.06;
    }
    if matches!(ch, '.' | ',' | '!' | '?' | ';' | ':') {
        multiplier *= 1.10;
    }
    if cfg.hunt_and_peck_enabled && HUNT_AND_PECK_SYMBOLS.contains(ch) {
        multiplier *= cfg.hunt_and_peck_delay_multiplier;
    }
    if fatigue_mode {
        multiplier *= 1.0 + cfg.fatigue_multiplier_max * progress.clamp(0.0, 1.0);
    }

    let sigma = effective_sigma(cfg.base_sigma, speed_variance);
    let sample = log_normal(mean_s * multiplier, sigma, rng);
    sample.clamp(cfg.min_inter_key_s, cfg.max_inter_key_s)
}

/// Samples a backspace delay in seconds.
pub fn backspace_delay_s(cfg: &AdvancedConfig, rng: &mut PlannerRng) -> f64 {
    log_normal(cfg.backspace_delay_s, 0.18, rng).clamp(0.01, 0.35)
}

/// Optional micro-pause before a keystroke; zero most of the time.
pub fn micro_pause_s(cfg: &AdvancedConfig, rng: &mut PlannerRng) -> f64 {
    if rng.bool(cfg.micro_pause_chance) {
        let u = rng.float();
        (cfg.micro_pause_min_s + u * (cfg.micro_pause_max_s - cfg.micro_pause_min_s)) * cfg.pause_scale
    } else {
        0.0
    }
}

/// Pause following a punctuation character, scaled by `pause_scale`.
/// `next_is_newline` adds extra weight for a blank-line (paragraph) break.
pub fn punctuation_pause_s(ch: char, next_is_newline: bool, cfg: &AdvancedConfig, rng: &mut PlannerRng) -> f64 {
    let base = match ch {
        '.' | '!' | '?' => 0.22 + rng.float() * 0.85,
        ',' | ':' | ';' => 0.10 + rng.float() * 0.35,
        '\n' => {
            let mut v = 0.22 + rng.float() * 0.65;
            if next_is_newline {
                v += 0.25 + rng.float() * 0.35;
            }
            v
        }
        _ => return 0.0,
    };
    base * cfg.pause_scale
}

/// Hesitation pause before a reflex correction.
pub fn reflex_pause_s(cfg: &AdvancedConfig, rng: &mut PlannerRng) -> f64 {
    let u = rng.float();
    cfg.reflex_min_s + u * (cfg.reflex_max_s - cfg.reflex_min_s)
}

/// Thinking pause at the end of a typing burst.
pub fn burst_think_pause_s(cfg: &AdvancedConfig, rng: &mut PlannerRng) -> f64 {
    let u = rng.float();
    cfg.burst_think_min_s + u * (cfg.burst_think_max_s - cfg.burst_think_min_s)
}

/// Pause before a fix session begins.
pub fn fix_session_pause_s(cfg: &AdvancedConfig, rng: &mut PlannerRng) -> f64 {
    let u = rng.float();
    (cfg.fix_pause_min_s + u * (cfg.fix_pause_max_s - cfg.fix_pause_min_s)) * cfg.pause_scale
}

/// Pause before a forced or stochastic realization correction.
pub fn realization_pause_s(cfg: &AdvancedConfig, rng: &mut PlannerRng) -> f64 {
    let u = rng.float();
    (0.12 + u * 0.38) * cfg.pause_scale
}
