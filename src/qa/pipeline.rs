use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

use super::clean::ResponseCleaner;
use super::generator::AnswerGenerator;
use super::normalize::normalize;
use super::prompt::assemble;
use crate::core::errors::ApiError;
use crate::history::{ConversationLog, ConversationTurn};
use crate::index::EmbeddingIndex;

/// Runs one question through normalize, retrieve, prompt, generate and
/// clean, then appends the finished turn to the log.
///
/// Turns are serialized on `gate`: the log sees appends in submission
/// order, and only one model call is in flight at a time.
pub struct QaPipeline {
    index: Arc<dyn EmbeddingIndex>,
    generator: Arc<dyn AnswerGenerator>,
    cleaner: ResponseCleaner,
    log: ConversationLog,
    top_k: usize,
    gate: Mutex<()>,
}

impl QaPipeline {
    pub fn new(
        index: Arc<dyn EmbeddingIndex>,
        generator: Arc<dyn AnswerGenerator>,
        cleaner: ResponseCleaner,
        log: ConversationLog,
        top_k: usize,
    ) -> Self {
        Self {
            index,
            generator,
            cleaner,
            log,
            top_k,
            gate: Mutex::new(()),
        }
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    /// A failed turn leaves the log untouched; the caller surfaces the error
    /// in place of an answer and the session keeps going.
    pub async fn run_turn(&self, question: &str) -> Result<ConversationTurn, ApiError> {
        let _ordered = self.gate.lock().await;
        let turn_id = Uuid::new_v4();

        let normalized = normalize(question);
        tracing::debug!(%turn_id, normalized = %normalized, "retrieving context");

        let units = self.index.search(&normalized, self.top_k).await.map_err(|err| {
            tracing::warn!(%turn_id, "retrieval failed: {}", err);
            err
        })?;

        let prompt = assemble(&units, question);
        tracing::debug!(%turn_id, context_units = units.len(), "generating answer");

        let raw_answer = self.generator.generate(&prompt).await.map_err(|err| {
            tracing::warn!(%turn_id, "generation failed: {}", err);
            err
        })?;

        let answer = self.cleaner.clean(&raw_answer);
        let turn = ConversationTurn::now(question, &answer);
        self.log.append(turn.clone());
        tracing::info!(%turn_id, "turn completed");

        Ok(turn)
    }
}
