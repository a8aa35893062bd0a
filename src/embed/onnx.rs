//! Sentence-transformer inference via tract.
//!
//! Expects a directory holding `model.onnx` (BERT-style encoder taking
//! `input_ids`, `attention_mask` and optionally `token_type_ids`) and the
//! matching `tokenizer.json`.

use std::path::Path;

use tokenizers::Tokenizer;
use tract_onnx::prelude::*;

use super::{l2_normalize, Embedder};
use crate::error::{Error, Result};

type TractModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

const MODEL_FILE: &str = "model.onnx";
const TOKENIZER_FILE: &str = "tokenizer.json";
const DEFAULT_MAX_LENGTH: usize = 256;

struct TokenizedInput {
    input_ids: Vec<i64>,
    attention_mask: Vec<i64>,
    token_type_ids: Vec<i64>,
}

/// Mean-pooled, L2-normalized embeddings from an ONNX encoder.
pub struct OnnxEmbedder {
    model: TractModel,
    tokenizer: Tokenizer,
    max_length: usize,
    input_count: usize,
    dimensions: usize,
}

impl OnnxEmbedder {
    /// Load `model.onnx` and `tokenizer.json` from `dir`.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        Self::load_with_max_length(dir, DEFAULT_MAX_LENGTH)
    }

    /// Load with an explicit token limit per text.
    pub fn load_with_max_length<P: AsRef<Path>>(dir: P, max_length: usize) -> Result<Self> {
        let dir = dir.as_ref();
        let model = tract_onnx::onnx()
            .model_for_path(dir.join(MODEL_FILE))
            .and_then(|m| m.into_optimized())
            .and_then(|m| m.into_runnable())
            .map_err(|e| Error::Embedding(format!("model load failed: {}", e)))?;
        let input_count = model.model().inputs.len();

        let tokenizer = Tokenizer::from_file(dir.join(TOKENIZER_FILE))
            .map_err(|e| Error::Embedding(format!("tokenizer load failed: {}", e)))?;

        let mut embedder = Self {
            model,
            tokenizer,
            max_length,
            input_count,
            dimensions: 0,
        };

        let probe = embedder.run(&["dimension probe".to_string()])?;
        embedder.dimensions = probe.first().map(|v| v.len()).unwrap_or(0);
        log::info!(
            "loaded ONNX embedder from {} ({} dimensions)",
            dir.display(),
            embedder.dimensions
        );
        Ok(embedder)
    }

    fn encode(&self, text: &str) -> Result<TokenizedInput> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| Error::Embedding(format!("tokenization failed: {}", e)))?;

        let take = encoding.get_ids().len().min(self.max_length);
        let widen =
            |values: &[u32]| -> Vec<i64> { values.iter().take(take).map(|&v| v as i64).collect() };

        Ok(TokenizedInput {
            input_ids: widen(encoding.get_ids()),
            attention_mask: widen(encoding.get_attention_mask()),
            token_type_ids: widen(encoding.get_type_ids()),
        })
    }

    fn run(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let encoded = texts
            .iter()
            .map(|t| self.encode(t))
            .collect::<Result<Vec<_>>>()?;
        let batch = encoded.len();
        let seq_len = encoded
            .iter()
            .map(|e| e.input_ids.len())
            .max()
            .unwrap_or(0)
            .max(1);

        let mut ids = Vec::with_capacity(batch * seq_len);
        let mut mask = Vec::with_capacity(batch * seq_len);
        let mut types = Vec::with_capacity(batch * seq_len);
        for input in &encoded {
            let pad = seq_len - input.input_ids.len();
            ids.extend(input.input_ids.iter().copied().chain(std::iter::repeat(0).take(pad)));
            mask.extend(input.attention_mask.iter().copied().chain(std::iter::repeat(0).take(pad)));
            types.extend(input.token_type_ids.iter().copied().chain(std::iter::repeat(0).take(pad)));
        }

        let tensor = |data: &[i64]| {
            Tensor::from_shape(&[batch, seq_len], data)
                .map_err(|e| Error::Embedding(format!("tensor shape error: {}", e)))
        };
        let mut inputs: TVec<TValue> = tvec![tensor(&ids)?.into(), tensor(&mask)?.into()];
        if self.input_count >= 3 {
            inputs.push(tensor(&types)?.into());
        }

        let outputs = self
            .model
            .run(inputs)
            .map_err(|e| Error::Embedding(format!("inference failed: {}", e)))?;
        let view = outputs[0]
            .to_array_view::<f32>()
            .map_err(|e| Error::Embedding(format!("unexpected output type: {}", e)))?;

        let shape = view.shape().to_vec();
        if shape.len() != 3 || shape[0] != batch {
            return Err(Error::Embedding(format!(
                "expected (batch, tokens, hidden) output, got {:?}",
                shape
            )));
        }
        let (tokens, hidden) = (shape[1], shape[2]);
        let flat: Vec<f32> = view.iter().copied().collect();

        let mut embeddings = Vec::with_capacity(batch);
        for (b, input) in encoded.iter().enumerate() {
            let mut pooled = vec![0.0f32; hidden];
            let mut count = 0.0f32;
            for t in 0..tokens.min(input.attention_mask.len()) {
                if input.attention_mask[t] == 0 {
                    continue;
                }
                let row = &flat[(b * tokens + t) * hidden..(b * tokens + t + 1) * hidden];
                pooled.iter_mut().zip(row).for_each(|(acc, v)| *acc += v);
                count += 1.0;
            }
            if count > 0.0 {
                pooled.iter_mut().for_each(|v| *v /= count);
            }
            l2_normalize(&mut pooled);
            embeddings.push(pooled);
        }
        Ok(embeddings)
    }
}

impl Embedder for OnnxEmbedder {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.run(&[text.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Embedding("empty inference result".to_string()))
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.run(texts)
    }

    fn name(&self) -> &str {
        "onnx"
    }
}
