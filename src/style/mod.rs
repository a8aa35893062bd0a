//! Font-style clustering.
//!
//! Both pipelines infer structure from how often each text style occurs.
//! [`StyleTable`] is the single bucketing primitive: it counts spans under
//! any key produced by a key-extraction function. The outline pipeline keys
//! on [`StyleKey`] (rounded size + bold), the segmenter on rounded size only.

mod policy;

pub use policy::{classify, FrequencyBoldPolicy, HeadingClassification, HeadingPolicy, HeadingStyleMap};

use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::model::{Document, TextSpan};

/// Visual style of a span: rounded font size plus bold flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StyleKey {
    /// Font size rounded to whole points
    pub size: i32,
    /// Whether the font name marks the span as bold
    pub bold: bool,
}

impl StyleKey {
    pub fn new(size: i32, bold: bool) -> Self {
        Self { size, bold }
    }

    /// Style of a span.
    pub fn of(span: &TextSpan) -> Self {
        Self {
            size: span.rounded_size(),
            bold: span.is_bold(),
        }
    }
}

impl std::fmt::Display for StyleKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.bold {
            write!(f, "{}pt bold", self.size)
        } else {
            write!(f, "{}pt", self.size)
        }
    }
}

/// Size-only key used by the section segmenter.
pub fn size_key(span: &TextSpan) -> i32 {
    span.rounded_size()
}

/// Occurrence counts of style keys across a document.
#[derive(Debug, Clone)]
pub struct StyleTable<K> {
    counts: HashMap<K, usize>,
}

impl<K: Eq + Hash + Clone> StyleTable<K> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            counts: HashMap::new(),
        }
    }

    /// Count every span under the key produced by `key_fn`.
    pub fn from_spans<'a, I, F>(spans: I, key_fn: F) -> Self
    where
        I: IntoIterator<Item = &'a TextSpan>,
        F: Fn(&TextSpan) -> K,
    {
        let mut table = Self::new();
        for span in spans {
            table.record(key_fn(span));
        }
        table
    }

    /// Count every span of a document.
    pub fn from_document<F>(doc: &Document, key_fn: F) -> Self
    where
        F: Fn(&TextSpan) -> K,
    {
        Self::from_spans(doc.spans(), key_fn)
    }

    /// Record one occurrence of `key`.
    pub fn record(&mut self, key: K) {
        *self.counts.entry(key).or_insert(0) += 1;
    }

    /// Occurrences of `key` (0 if never seen).
    pub fn count(&self, key: &K) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Iterate over (key, count) pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, usize)> {
        self.counts.iter().map(|(k, c)| (k, *c))
    }

    /// Distinct keys seen.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.counts.keys()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total number of recorded occurrences.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

impl<K: Eq + Hash + Clone + Ord> StyleTable<K> {
    /// Largest key present, regardless of frequency.
    pub fn max_key(&self) -> Option<K> {
        self.counts.keys().max().cloned()
    }
}

impl<K: Eq + Hash + Clone> Default for StyleTable<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Bucket every span of `doc` by (rounded size, bold).
pub fn analyze_styles(doc: &Document) -> StyleTable<StyleKey> {
    let table = StyleTable::from_document(doc, StyleKey::of);
    log::debug!(
        "{}: {} spans in {} style buckets",
        doc.source_name,
        table.total(),
        table.len()
    );
    table
}
