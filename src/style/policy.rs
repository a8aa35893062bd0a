//! Heading style classification.

use std::cmp::Ordering;

use super::{StyleKey, StyleTable};
use crate::model::HeadingLevel;

/// Decides which styles may be headings and in what order of prominence.
pub trait HeadingPolicy {
    /// Whether a style with `count` occurrences is a heading candidate.
    fn retain(&self, key: &StyleKey, count: usize) -> bool;

    /// Prominence order; `Less` means `a` is the more prominent style.
    ///
    /// Default: larger font first, then bold before regular.
    fn rank(&self, a: &StyleKey, b: &StyleKey) -> Ordering {
        b.size.cmp(&a.size).then(b.bold.cmp(&a.bold))
    }

    /// Maximum number of candidates kept after ranking.
    fn max_candidates(&self) -> usize;
}

/// Keeps styles seen at least `min_occurrence` times, plus every bold style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyBoldPolicy {
    pub min_occurrence: usize,
    pub max_candidates: usize,
}

impl FrequencyBoldPolicy {
    pub fn new(min_occurrence: usize, max_candidates: usize) -> Self {
        Self {
            min_occurrence,
            max_candidates,
        }
    }
}

impl Default for FrequencyBoldPolicy {
    fn default() -> Self {
        Self::new(3, 4)
    }
}

impl HeadingPolicy for FrequencyBoldPolicy {
    fn retain(&self, key: &StyleKey, count: usize) -> bool {
        key.bold || count >= self.min_occurrence
    }

    fn max_candidates(&self) -> usize {
        self.max_candidates
    }
}

/// Style → heading level mapping (at most one style per level).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadingStyleMap {
    entries: Vec<(StyleKey, HeadingLevel)>,
}

impl HeadingStyleMap {
    /// Assign H1, H2, H3 to the first three candidates; the rest are ignored.
    pub fn from_candidates(candidates: &[StyleKey]) -> Self {
        let entries = candidates
            .iter()
            .enumerate()
            .filter_map(|(i, key)| HeadingLevel::from_rank(i).map(|level| (*key, level)))
            .collect();
        Self { entries }
    }

    /// Level mapped to `key`, if any.
    pub fn level_of(&self, key: &StyleKey) -> Option<HeadingLevel> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, level)| *level)
    }

    /// Style mapped to `level`, if any.
    pub fn style_of(&self, level: HeadingLevel) -> Option<StyleKey> {
        self.entries
            .iter()
            .find(|(_, l)| *l == level)
            .map(|(k, _)| *k)
    }

    /// Entries from H1 downwards.
    pub fn iter(&self) -> impl Iterator<Item = (&StyleKey, HeadingLevel)> {
        self.entries.iter().map(|(k, l)| (k, *l))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Output of [`classify`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadingClassification {
    /// Ranked heading candidates, most prominent first
    pub candidates: Vec<StyleKey>,
    /// Level mapping of the top candidates
    pub map: HeadingStyleMap,
}

/// Filter, rank, and cut the style table into heading candidates.
pub fn classify(table: &StyleTable<StyleKey>, policy: &dyn HeadingPolicy) -> HeadingClassification {
    let mut candidates: Vec<StyleKey> = table
        .iter()
        .filter(|(key, count)| policy.retain(key, *count))
        .map(|(key, _)| *key)
        .collect();

    candidates.sort_by(|a, b| policy.rank(a, b));
    candidates.truncate(policy.max_candidates());

    let map = HeadingStyleMap::from_candidates(&candidates);
    log::debug!(
        "heading candidates: [{}]",
        candidates
            .iter()
            .map(|k| k.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );

    HeadingClassification { candidates, map }
}
