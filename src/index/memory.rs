use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;

use super::EmbeddingIndex;
use crate::core::errors::ApiError;
use crate::corpus::RetrievableUnit;
use crate::llm::provider::LlmProvider;

struct IndexedUnit {
    unit: RetrievableUnit,
    embedding: Vec<f32>,
}

/// Brute-force cosine index held entirely in memory.
///
/// Built once at startup by embedding every corpus unit; read-only from
/// then on, so searches take no lock.
pub struct InMemoryIndex {
    provider: Arc<dyn LlmProvider>,
    model_id: String,
    entries: Vec<IndexedUnit>,
}

impl InMemoryIndex {
    pub async fn build(
        provider: Arc<dyn LlmProvider>,
        model_id: &str,
        units: Vec<RetrievableUnit>,
    ) -> Result<Self, ApiError> {
        let inputs: Vec<String> = units.iter().map(|u| u.content.clone()).collect();
        let embeddings = provider.embed(&inputs, model_id).await?;

        if embeddings.len() != units.len() {
            return Err(ApiError::Internal(format!(
                "Embedding count mismatch: {} inputs, {} vectors",
                units.len(),
                embeddings.len()
            )));
        }

        let entries = units
            .into_iter()
            .zip(embeddings)
            .map(|(unit, embedding)| IndexedUnit { unit, embedding })
            .collect();

        Ok(Self {
            provider,
            model_id: model_id.to_string(),
            entries,
        })
    }
}

#[async_trait]
impl EmbeddingIndex for InMemoryIndex {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<RetrievableUnit>, ApiError> {
        if k == 0 {
            return Err(ApiError::BadRequest("top_k must be at least 1".to_string()));
        }

        let query_embedding = self
            .provider
            .embed(&[query.to_string()], &self.model_id)
            .await
            .map_err(|err| ApiError::RetrievalUnavailable(err.to_string()))?
            .into_iter()
            .next()
            .ok_or_else(|| {
                ApiError::RetrievalUnavailable("embedding response was empty".to_string())
            })?;

        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| (idx, cosine_similarity(&query_embedding, &entry.embedding)))
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(idx, _)| self.entries[idx].unit.clone())
            .collect())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    let denom = norm_a * norm_b;

    if denom <= f32::EPSILON {
        0.0
    } else {
        dot / denom
    }
}
