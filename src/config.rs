/// Correction mode for a synonym substitution: `Live` reflex-corrects it
/// immediately; `Backtrack` defers correction to a word-ordinal-triggered
/// realization, mirroring the `Char` open-mistake mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynonymCorrectionMode {
    Live,
    Backtrack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedMode {
    Constant,
    Dynamic,
}

/// Weighted choice among the four typo constructions described in the
/// planner's mistake-kind decision. Weights need not sum to 1; they are
/// normalized at selection time.
#[derive(Debug, Clone, Copy)]
pub struct TypoWeights {
    pub nearby: f64,
    pub random: f64,
    pub double: f64,
    pub skip: f64,
}

impl Default for TypoWeights {
    fn default() -> Self {
        Self {
            nearby: 0.55,
            random: 0.15,
            double: 0.15,
            skip: 0.15,
        }
    }
}

/// Fully resolved, clamped planner settings. Every field here has already
/// passed through `AdvancedConfigOverrides::normalize` — the planner never
/// re-validates these bounds itself.
#[derive(Debug, Clone)]
pub struct AdvancedConfig {
    pub min_inter_key_s: f64,
    pub max_inter_key_s: f64,
    pub base_sigma: f64,

    pub hunt_and_peck_enabled: bool,
    pub hunt_and_peck_delay_multiplier: f64,

    pub fatigue_multiplier_max: f64,

    pub backspace_delay_s: f64,

    pub micro_pause_chance: f64,
    pub micro_pause_min_s: f64,
    pub micro_pause_max_s: f64,
    pub pause_scale: f64,
    pub sync_pause_s: f64,

    pub dynamic_mistakes: bool,
    pub typo_weights: TypoWeights,
    pub case_sensitive_typos: bool,
    pub clustering_decay_chars: usize,

    pub reflex_rate: f64,
    pub reflex_min_s: f64,
    pub reflex_max_s: f64,

    pub fix_sessions_enabled: bool,
    pub deletion_backtrack_chance: f64,
    pub fix_session_interval_words: usize,
    pub fix_session_max_fixes: usize,
    pub fix_pause_min_s: f64,
    pub fix_pause_max_s: f64,
    pub context_window_chars: usize,

    pub realization_base: f64,
    pub realization_min_delay_chars: usize,
    pub realization_max_delay_chars: usize,
    pub realization_sensitivity: f64,

    pub synonym_replace_enabled: bool,
    pub synonym_replace_chance: f64,
    pub synonym_correction_mode: SynonymCorrectionMode,
    pub min_backtrack_words: i64,
    pub max_backtrack_words: i64,
    pub allow_multi_word_synonyms: bool,

    pub drift_every_chars: usize,
    pub drift_smoothing: f64,

    pub burst_enabled: bool,
    pub burst_words_min: i64,
    pub burst_words_max: i64,
    pub burst_speed_mult: f64,
    pub burst_think_min_s: f64,
    pub burst_think_max_s: f64,
}

impl Default for AdvancedConfig {
    fn default() -> Self {
        Self {
            min_inter_key_s: 0.025,
            max_inter_key_s: 0.9,
            base_sigma: 0.28,

            hunt_and_peck_enabled: false,
            hunt_and_peck_delay_multiplier: 1.6,

            fatigue_multiplier_max: 0.28,

            backspace_delay_s: 0.09,

            micro_pause_chance: 0.05,
            micro_pause_min_s: 0.15,
            micro_pause_max_s: 0.55,
            pause_scale: 1.0,
            sync_pause_s: 0.06,

            dynamic_mistakes: true,
            typo_weights: TypoWeights::default(),
            case_sensitive_typos: true,
            clustering_decay_chars: 20,

            reflex_rate: 0.35,
            reflex_min_s: 0.08,
            reflex_max_s: 0.35,

            fix_sessions_enabled: true,
            deletion_backtrack_chance: 0.4,
            fix_session_interval_words: 8,
            fix_session_max_fixes: 3,
            fix_pause_min_s: 0.4,
            fix_pause_max_s: 1.1,
            context_window_chars: 10,

            realization_base: 0.08,
            realization_min_delay_chars: 3,
            realization_max_delay_chars: 40,
            realization_sensitivity: 0.02,

            synonym_replace_enabled: false,
            synonym_replace_chance: 0.08,
            synonym_correction_mode: SynonymCorrectionMode::Backtrack,
            min_backtrack_words: 1,
            max_backtrack_words: 4,
            allow_multi_word_synonyms: true,

            drift_every_chars: 12,
            drift_smoothing: 0.12,

            burst_enabled: true,
            burst_words_min: 3,
            burst_words_max: 9,
            burst_speed_mult: 1.25,
            burst_think_min_s: 0.5,
            burst_think_max_s: 2.2,
        }
    }
}

/// Partial configuration, as a caller would assemble it from user input.
/// Every field is optional; absent fields fall back to `AdvancedConfig`
/// defaults. This is the crate's only sanitization path: the planner
/// assumes every value it reads has already been clamped and reordered.
#[derive(Debug, Clone, Default)]
pub struct AdvancedConfigOverrides {
    pub min_inter_key_s: Option<f64>,
    pub max_inter_key_s: Option<f64>,
    pub base_sigma: Option<f64>,
    pub hunt_and_peck_enabled: Option<bool>,
    pub hunt_and_peck_delay_multiplier: Option<f64>,
    pub fatigue_multiplier_max: Option<f64>,
    pub backspace_delay_s: Option<f64>,
    pub micro_pause_chance: Option<f64>,
    pub micro_pause_min_s: Option<f64>,
    pub micro_pause_max_s: Option<f64>,
    pub pause_scale: Option<f64>,
    pub dynamic_mistakes: Option<bool>,
    pub typo_weights: Option<TypoWeights>,
    pub case_sensitive_typos: Option<bool>,
    pub clustering_decay_chars: Option<usize>,
    pub reflex_rate: Option<f64>,
    pub reflex_min_s: Option<f64>,
    pub reflex_max_s: Option<f64>,
    pub fix_sessions_enabled: Option<bool>,
    pub deletion_backtrack_chance: Option<f64>,
    pub fix_session_interval_words: Option<usize>,
    pub fix_session_max_fixes: Option<usize>,
    pub fix_pause_min_s: Option<f64>,
    pub fix_pause_max_s: Option<f64>,
    pub realization_base: Option<f64>,
    pub realization_min_delay_chars: Option<usize>,
    pub realization_max_delay_chars: Option<usize>,
    pub realization_sensitivity: Option<f64>,
    pub synonym_replace_enabled: Option<bool>,
    pub synonym_replace_chance: Option<f64>,
    pub synonym_correction_mode: Option<SynonymCorrectionMode>,
    pub min_backtrack_words: Option<i64>,
    pub max_backtrack_words: Option<i64>,
    pub allow_multi_word_synonyms: Option<bool>,
    pub burst_enabled: Option<bool>,
    pub burst_words_min: Option<i64>,
    pub burst_words_max: Option<i64>,
    pub burst_speed_mult: Option<f64>,
}

fn unit(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

fn nonneg(x: f64) -> f64 {
    x.max(0.0)
}

impl AdvancedConfigOverrides {
    /// Merges these overrides atop the defaults, clamping every field to
    /// its documented bounds and repairing `min <= max` orderings. This is
    /// the only place invalid advanced settings get sanitized.
    pub fn normalize(&self) -> AdvancedConfig {
        let mut cfg = AdvancedConfig::default();

        if let Some(v) = self.min_inter_key_s {
            cfg.min_inter_key_s = nonneg(v);
        }
        if let Some(v) = self.max_inter_key_s {
            cfg.max_inter_key_s = nonneg(v);
        }
        if cfg.min_inter_key_s > cfg.max_inter_key_s {
            std::mem::swap(&mut cfg.min_inter_key_s, &mut cfg.max_inter_key_s);
        }

        if let Some(v) = self.base_sigma {
            cfg.base_sigma = v.clamp(0.05, 1.0);
        }
        if let Some(v) = self.hunt_and_peck_enabled {
            cfg.hunt_and_peck_enabled = v;
        }
        if let Some(v) = self.hunt_and_peck_delay_multiplier {
            cfg.hunt_and_peck_delay_multiplier = v.max(1.0);
        }
        if let Some(v) = self.fatigue_multiplier_max {
            cfg.fatigue_multiplier_max = nonneg(v);
        }
        if let Some(v) = self.backspace_delay_s {
            cfg.backspace_delay_s = v.clamp(0.01, 0.35);
        }
        if let Some(v) = self.micro_pause_chance {
            cfg.micro_pause_chance = unit(v);
        }
        if let Some(v) = self.micro_pause_min_s {
            cfg.micro_pause_min_s = nonneg(v);
        }
        if let Some(v) = self.micro_pause_max_s {
            cfg.micro_pause_max_s = nonneg(v);
        }
        if cfg.micro_pause_min_s > cfg.micro_pause_max_s {
            std::mem::swap(&mut cfg.micro_pause_min_s, &mut cfg.micro_pause_max_s);
        }
        if let Some(v) = self.pause_scale {
            cfg.pause_scale = v.clamp(0.1, 5.0);
        }

        if let Some(v) = self.dynamic_mistakes {
            cfg.dynamic_mistakes = v;
        }
        if let Some(w) = self.typo_weights {
            cfg.typo_weights = TypoWeights {
                nearby: nonneg(w.nearby),
                random: nonneg(w.random),
                double: nonneg(w.double),
                skip: nonneg(w.skip),
            };
        }
        if let Some(v) = self.case_sensitive_typos {
            cfg.case_sensitive_typos = v;
        }
        if let Some(v) = self.clustering_decay_chars {
            cfg.clustering_decay_chars = v.max(1);
        }

        if let Some(v) = self.reflex_rate {
            cfg.reflex_rate = unit(v);
        }
        if let Some(v) = self.reflex_min_s {
            cfg.reflex_min_s = nonneg(v);
        }
        if let Some(v) = self.reflex_max_s {
            cfg.reflex_max_s = nonneg(v);
        }
        if cfg.reflex_min_s > cfg.reflex_max_s {
            std::mem::swap(&mut cfg.reflex_min_s, &mut cfg.reflex_max_s);
        }

        if let Some(v) = self.fix_sessions_enabled {
            cfg.fix_sessions_enabled = v;
        }
        if let Some(v) = self.deletion_backtrack_chance {
            cfg.deletion_backtrack_chance = unit(v);
        }
        if let Some(v) = self.fix_session_interval_words {
            cfg.fix_session_interval_words = v.max(1);
        }
        if let Some(v) = self.fix_session_max_fixes {
            cfg.fix_session_max_fixes = v.max(1);
        }
        if let Some(v) = self.fix_pause_min_s {
            cfg.fix_pause_min_s = nonneg(v);
        }
        if let Some(v) = self.fix_pause_max_s {
            cfg.fix_pause_max_s = nonneg(v);
        }
        if cfg.fix_pause_min_s > cfg.fix_pause_max_s {
            std::mem::swap(&mut cfg.fix_pause_min_s, &mut cfg.fix_pause_max_s);
        }

        if let Some(v) = self.realization_base {
            cfg.realization_base = unit(v);
        }
        if let Some(v) = self.realization_min_delay_chars {
            cfg.realization_min_delay_chars = v;
        }
        if let Some(v) = self.realization_max_delay_chars {
            cfg.realization_max_delay_chars = v;
        }
        if cfg.realization_min_delay_chars > cfg.realization_max_delay_chars {
            std::mem::swap(
                &mut cfg.realization_min_delay_chars,
                &mut cfg.realization_max_delay_chars,
            );
        }
        if let Some(v) = self.realization_sensitivity {
            cfg.realization_sensitivity = nonneg(v);
        }

        if let Some(v) = self.synonym_replace_enabled {
            cfg.synonym_replace_enabled = v;
        }
        if let Some(v) = self.synonym_replace_chance {
            cfg.synonym_replace_chance = unit(v);
        }
        if let Some(v) = self.synonym_correction_mode {
            cfg.synonym_correction_mode = v;
        }
        if let Some(v) = self.min_backtrack_words {
            cfg.min_backtrack_words = v.max(0);
        }
        if let Some(v) = self.max_backtrack_words {
            cfg.max_backtrack_words = v.max(0);
        }
        if cfg.min_backtrack_words > cfg.max_backtrack_words {
            std::mem::swap(&mut cfg.min_backtrack_words, &mut cfg.max_backtrack_words);
        }
        if let Some(v) = self.allow_multi_word_synonyms {
            cfg.allow_multi_word_synonyms = v;
        }

        if let Some(v) = self.burst_enabled {
            cfg.burst_enabled = v;
        }
        if let Some(v) = self.burst_words_min {
            cfg.burst_words_min = v.max(1);
        }
        if let Some(v) = self.burst_words_max {
            cfg.burst_words_max = v.max(1);
        }
        if cfg.burst_words_min > cfg.burst_words_max {
            std::mem::swap(&mut cfg.burst_words_min, &mut cfg.burst_words_max);
        }
        if let Some(v) = self.burst_speed_mult {
            cfg.burst_speed_mult = v.max(0.1);
        }

        cfg
    }
}

/// Top-level planner input, mirroring the interface described for external
/// callers: base speed, stochastic knobs, and the advanced override block.
#[derive(Debug, Clone)]
pub struct TypingOptions {
    pub speed_wpm: f64,
    pub speed_mode: SpeedMode,
    pub speed_variance: f64,
    pub mistake_rate: f64,
    pub fatigue_mode: bool,
    pub avg_word_length: f64,
    pub seed: Option<u32>,
    pub advanced: AdvancedConfigOverrides,
}

impl Default for TypingOptions {
    fn default() -> Self {
        Self {
            speed_wpm: 45.0,
            speed_mode: SpeedMode::Dynamic,
            speed_variance: 0.3,
            mistake_rate: 0.04,
            fatigue_mode: false,
            avg_word_length: 4.7,
            seed: None,
            advanced: AdvancedConfigOverrides::default(),
        }
    }
}

impl TypingOptions {
    /// Clamps the directly-exposed fields (the advanced block clamps
    /// itself in `normalize`).
    pub fn normalized(&self) -> (f64, SpeedMode, f64, f64, bool, f64, Option<u32>, AdvancedConfig) {
        (
            self.speed_wpm.clamp(10.0, 999.0),
            self.speed_mode,
            unit(self.speed_variance),
            unit(self.mistake_rate).min(0.75),
            self.fatigue_mode,
            self.avg_word_length.max(3.0),
            self.seed,
            self.advanced.normalize(),
        )
    }
}
