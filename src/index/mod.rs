//! Semantic lookup over the FAQ corpus.

mod memory;

pub use memory::InMemoryIndex;

use async_trait::async_trait;

use crate::core::errors::ApiError;
use crate::corpus::RetrievableUnit;

/// Lookup seam between the turn pipeline and whatever holds the vectors.
/// Implementations must be safe to share across request handlers.
#[async_trait]
pub trait EmbeddingIndex: Send + Sync {
    /// Returns the `k` units most similar to `query`, most similar first.
    /// When the corpus holds fewer than `k` units, all of them come back.
    async fn search(&self, query: &str, k: usize) -> Result<Vec<RetrievableUnit>, ApiError>;

    /// Number of indexed units.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
