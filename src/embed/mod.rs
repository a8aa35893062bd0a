//! Text embedding collaborators.
//!
//! The ranker only needs two things from an embedding model: a vector per
//! text and a similarity between vectors. [`Embedder`] is that seam.
//! [`HashingEmbedder`] is always available and fully deterministic; the
//! `onnx` feature adds [`OnnxEmbedder`] for sentence-transformer models.

mod hashing;
#[cfg(feature = "onnx")]
mod onnx;

pub use hashing::HashingEmbedder;
#[cfg(feature = "onnx")]
pub use onnx::OnnxEmbedder;

use crate::error::Result;

/// Maps text to fixed-length vectors.
pub trait Embedder {
    /// Length of every vector this embedder returns.
    fn dimensions(&self) -> usize;

    /// Embed a single text.
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed a batch of texts; must equal calling [`Embedder::embed`] per item.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    /// Short name for logs.
    fn name(&self) -> &str {
        "embedder"
    }
}

/// Euclidean norm.
pub fn magnitude(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Dot product over the overlapping prefix of the two vectors.
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Cosine similarity in [-1, 1]; 0 when either vector has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let ma = magnitude(a);
    let mb = magnitude(b);
    if ma == 0.0 || mb == 0.0 {
        return 0.0;
    }
    (dot(a, b) / (ma * mb)).clamp(-1.0, 1.0)
}

/// Scale a vector to unit length in place (zero vectors are left alone).
pub fn l2_normalize(v: &mut [f32]) {
    let norm = magnitude(v);
    if norm > 0.0 {
        v.iter_mut().for_each(|x| *x /= norm);
    }
}
