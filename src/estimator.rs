use anyhow::{bail, Result};

use crate::config::TypingOptions;
use crate::planner::generate_plan;

/// Summary statistics over repeated `generate_plan` runs at varying seeds,
/// used to characterize how much a given configuration's duration wanders
/// from run to run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationEstimate {
    pub min_seconds: f64,
    pub max_seconds: f64,
    pub mean_seconds: f64,
    pub runs: u32,
}

/// Re-plans `text` under `options` at `runs` consecutive seeds starting from
/// `options.seed` (or 0 if unset) and summarizes `plan.estimated_seconds`
/// across them. Each run's own `seed` field, if set, is overridden so the
/// sweep is reproducible regardless of what the caller passed in.
pub fn estimate(text: &str, options: &TypingOptions, runs: u32) -> Result<DurationEstimate> {
    if runs == 0 {
        bail!("estimate requires at least one run");
    }
    let base = options.seed.unwrap_or(0);

    let mut min_seconds = f64::INFINITY;
    let mut max_seconds = f64::NEG_INFINITY;
    let mut total = 0.0;

    for offset in 0..runs {
        let mut run_options = options.clone();
        run_options.seed = Some(base.wrapping_add(offset));
        let plan = generate_plan(text, &run_options)?;
        min_seconds = min_seconds.min(plan.estimated_seconds);
        max_seconds = max_seconds.max(plan.estimated_seconds);
        total += plan.estimated_seconds;
    }

    Ok(DurationEstimate {
        min_seconds,
        max_seconds,
        mean_seconds: total / runs as f64,
        runs,
    })
}

/// Searches for the `speed_wpm` that makes `text` take approximately
/// `target_seconds` to type, holding every other option fixed. Duration is
/// treated as monotonically decreasing in WPM: first the bracket
/// `[lo, hi]` is widened outward (doubling `hi`, halving `lo`) up to 10
/// times until `target_seconds` falls inside it, then up to 14 bisection
/// steps narrow it down. Each evaluation averages over `eval_runs` seeds to
/// smooth out per-seed jitter.
pub fn solve_wpm(
    text: &str,
    options: &TypingOptions,
    target_seconds: f64,
    bracket: (f64, f64),
    eval_runs: u32,
) -> Result<f64> {
    if target_seconds <= 0.0 {
        bail!("target_seconds must be positive");
    }

    let mean_seconds_at = |wpm: f64| -> Result<f64> {
        let mut trial = options.clone();
        trial.speed_wpm = wpm;
        Ok(estimate(text, &trial, eval_runs.max(1))?.mean_seconds)
    };

    let (mut lo, mut hi) = bracket;
    if lo <= 0.0 {
        lo = 1.0;
    }
    if hi <= lo {
        hi = lo + 1.0;
    }

    let mut seconds_at_lo = mean_seconds_at(lo)?;
    let mut seconds_at_hi = mean_seconds_at(hi)?;

    let mut widened = 0;
    while seconds_at_lo < target_seconds && widened < 10 {
        lo = (lo / 2.0).max(1.0);
        seconds_at_lo = mean_seconds_at(lo)?;
        widened += 1;
    }
    widened = 0;
    while seconds_at_hi > target_seconds && widened < 10 {
        hi *= 2.0;
        seconds_at_hi = mean_seconds_at(hi)?;
        widened += 1;
    }

    let mut best = lo;
    let mut best_gap = (seconds_at_lo - target_seconds).abs();
    if (seconds_at_hi - target_seconds).abs() < best_gap {
        best = hi;
        best_gap = (seconds_at_hi - target_seconds).abs();
    }

    for _ in 0..14 {
        let mid = (lo + hi) / 2.0;
        let seconds_at_mid = mean_seconds_at(mid)?;
        let gap = (seconds_at_mid - target_seconds).abs();
        if gap < best_gap {
            best = mid;
            best_gap = gap;
        }

        // Duration decreases as WPM increases: too slow (duration above
        // target) means the answer lies above mid.
        if seconds_at_mid > target_seconds {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    Ok(best)
}
