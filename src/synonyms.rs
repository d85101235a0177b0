use crate::rng::PlannerRng;

/// Casing classification used to reapply a word's original case to a
/// substituted alternative, generalizing the teacher's two-way
/// (all-caps / title-case) `apply_case_style` into four buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Casing {
    Lower,
    Upper,
    Title,
    Mixed,
}

pub fn classify_casing(word: &str) -> Casing {
    if word.chars().all(|c| !c.is_alphabetic() || c.is_lowercase()) {
        return Casing::Lower;
    }
    if word.chars().all(|c| !c.is_alphabetic() || c.is_uppercase()) {
        return Casing::Upper;
    }
    let mut chars = word.chars();
    let first_upper = chars.next().map(|c| c.is_uppercase()).unwrap_or(false);
    let rest_lower = chars.all(|c| !c.is_alphabetic() || c.is_lowercase());
    if first_upper && rest_lower {
        Casing::Title
    } else {
        Casing::Mixed
    }
}

pub fn apply_casing(casing: Casing, lower: &str) -> String {
    match casing {
        Casing::Lower | Casing::Mixed => lower.to_string(),
        Casing::Upper => lower.to_uppercase(),
        Casing::Title => {
            let mut out = lower.to_string();
            if let Some(first) = out.get_mut(0..1) {
                first.make_ascii_uppercase();
            }
            out
        }
    }
}

fn synonym_options(word_lower: &str) -> &'static [&'static str] {
    match word_lower {
        "important" => &["crucial", "key", "vital"],
        "help" => &["assist", "aid", "support"],
        "use" => &["utilize", "employ"],
        "show" => &["demonstrate", "display"],
        "make" => &["create", "build"],
        "start" => &["begin", "kick off"],
        "end" => &["finish", "wrap up"],
        "idea" => &["concept", "notion"],
        "quick" => &["fast", "rapid", "swift"],
        "slow" => &["sluggish", "gradual"],
        "fox" => &["vixen"],
        "happy" => &["glad", "pleased", "content"],
        "sad" => &["unhappy", "down"],
        "big" => &["large", "sizable"],
        "small" => &["little", "tiny"],
        "good" => &["great", "solid"],
        "bad" => &["poor", "weak"],
        "said" => &["stated", "mentioned"],
        "think" => &["believe", "reckon"],
        "look" => &["glance", "peek"],
        _ => &[],
    }
}

/// Picks a casing-matched alternative for `word`, if the dictionary has one
/// whose lowercase form differs from the original. `allow_multi_word`
/// filters out alternatives containing a space, per the exposed
/// `allow_multi_word_synonyms` option.
pub fn pick_alternative(word: &str, allow_multi_word: bool, rng: &mut PlannerRng) -> Option<String> {
    let word_lower = word.to_lowercase();
    let options: Vec<&&str> = synonym_options(&word_lower)
        .iter()
        .filter(|opt| allow_multi_word || !opt.contains(' '))
        .filter(|opt| **opt != word_lower)
        .collect();
    if options.is_empty() {
        return None;
    }
    let chosen = **rng.pick(&options);
    Some(apply_casing(classify_casing(word), chosen))
}
