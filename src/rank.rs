//! Relevance ranking of sections against a persona/task query.

use crate::config::HeuristicOptions;
use crate::embed::{cosine_similarity, Embedder};
use crate::error::{Error, Result};
use crate::model::{AnalysisQuery, DocumentSection, Excerpt, RankedSection};

/// Ranked sections plus the excerpt of the top one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankingResult {
    /// One entry per input section, most relevant first
    pub ranked: Vec<RankedSection>,
    /// Excerpt of the top section (empty when there are no sections)
    pub excerpts: Vec<Excerpt>,
}

/// Scores sections by cosine similarity between query and content embeddings.
pub struct RelevanceRanker<'a> {
    embedder: &'a dyn Embedder,
    excerpt_chars: usize,
    excerpt_suffix: String,
}

impl<'a> RelevanceRanker<'a> {
    pub fn new(embedder: &'a dyn Embedder, options: &HeuristicOptions) -> Self {
        Self {
            embedder,
            excerpt_chars: options.excerpt_chars,
            excerpt_suffix: options.excerpt_suffix.clone(),
        }
    }

    /// Rank `sections` by relevance to `query`.
    ///
    /// Ties keep input order. With no sections the embedder is never called.
    pub fn rank(&self, query: &AnalysisQuery, sections: &[DocumentSection]) -> Result<RankingResult> {
        if sections.is_empty() {
            log::info!("no sections to rank");
            return Ok(RankingResult::default());
        }

        let query_vector = self.embedder.embed(&query.query_text())?;
        let contents: Vec<String> = sections
            .iter()
            .map(|s| s.section.content.clone())
            .collect();
        let vectors = self.embedder.embed_batch(&contents)?;
        if vectors.len() != sections.len() {
            return Err(Error::Embedding(format!(
                "{} returned {} vectors for {} sections",
                self.embedder.name(),
                vectors.len(),
                sections.len()
            )));
        }

        let scores: Vec<f32> = vectors
            .iter()
            .map(|v| {
                let score = cosine_similarity(&query_vector, v);
                if score.is_nan() {
                    f32::NEG_INFINITY
                } else {
                    score
                }
            })
            .collect();

        let mut order: Vec<usize> = (0..sections.len()).collect();
        order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

        let ranked = order
            .iter()
            .enumerate()
            .map(|(i, &idx)| {
                let entry = &sections[idx];
                log::debug!(
                    "rank {}: {} p{} {:?} ({:.4})",
                    i + 1,
                    entry.document,
                    entry.section.start_page,
                    entry.section.title,
                    scores[idx]
                );
                RankedSection {
                    document: entry.document.clone(),
                    page: entry.section.start_page,
                    title: entry.section.title.clone(),
                    importance_rank: (i + 1) as u32,
                }
            })
            .collect();

        let top = &sections[order[0]];
        let excerpts = vec![Excerpt {
            document: top.document.clone(),
            page: top.section.start_page,
            refined_text: excerpt(&top.section.content, self.excerpt_chars, &self.excerpt_suffix),
        }];

        Ok(RankingResult { ranked, excerpts })
    }
}

/// First `max_chars` characters of `content` followed by `suffix`.
pub fn excerpt(content: &str, max_chars: usize, suffix: &str) -> String {
    let mut text: String = content.chars().take(max_chars).collect();
    text.push_str(suffix);
    text
}
