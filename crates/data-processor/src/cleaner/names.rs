//! Column-name normalization.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static SEPARATOR_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{N}]+").expect("Invalid regex"));

/// Normalize a single column name.
///
/// Trims, lowercases and collapses every run of non-alphanumeric characters
/// (underscores included) into one `_`, then strips `_` from both ends. The
/// result may be empty; [`normalize_column_names`] handles that case.
pub fn normalize_column_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    SEPARATOR_RUNS
        .replace_all(&lowered, "_")
        .trim_matches('_')
        .to_string()
}

/// Normalize a full header row.
///
/// Empty results become `column_<n>` (1-based). A name already taken by an
/// earlier column gets `_2`, `_3`, ... until it is unique.
pub fn normalize_column_names<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::with_capacity(names.len());

    names
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let mut base = normalize_column_name(name.as_ref());
            if base.is_empty() {
                base = format!("column_{}", idx + 1);
            }

            let mut candidate = base.clone();
            let mut k = 2;
            while taken.contains(&candidate) {
                candidate = format!("{base}_{k}");
                k += 1;
            }
            taken.insert(candidate.clone());
            candidate
        })
        .collect()
}
