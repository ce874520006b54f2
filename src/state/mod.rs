use std::sync::Arc;

use serde_json::json;

use crate::core::config::{AppConfig, AppPaths};
use crate::corpus::FaqDocument;
use crate::history::ConversationLog;
use crate::index::{EmbeddingIndex, InMemoryIndex};
use crate::llm::ollama::OllamaProvider;
use crate::llm::provider::LlmProvider;
use crate::qa::clean::ResponseCleaner;
use crate::qa::generator::LlmAnswerGenerator;
use crate::qa::pipeline::QaPipeline;

pub mod error;

use error::InitializationError;

/// Global application state shared across all routes.
///
/// Holds the loaded corpus, the embedding index built from it, the provider
/// both capabilities run on, the turn pipeline and the session log.
#[derive(Clone)]
pub struct AppState {
    pub paths: Arc<AppPaths>,
    pub config: AppConfig,
    pub corpus: Arc<FaqDocument>,
    pub provider: Arc<dyn LlmProvider>,
    pub index: Arc<dyn EmbeddingIndex>,
    pub pipeline: Arc<QaPipeline>,
    pub log: ConversationLog,
}

impl AppState {
    /// Initializes the application state.
    ///
    /// Loads the FAQ corpus, embeds every unit into the in-memory index,
    /// and wires the turn pipeline. The corpus and index are immutable for
    /// the life of the process, so all of this happens exactly once.
    pub async fn initialize(
        paths: Arc<AppPaths>,
        config: AppConfig,
    ) -> Result<Arc<Self>, InitializationError> {
        let corpus_path = paths.resolve(&config.corpus.path);
        let corpus = FaqDocument::load(&corpus_path).map_err(InitializationError::Corpus)?;

        let units = corpus.to_units();
        if units.is_empty() {
            return Err(InitializationError::Corpus(anyhow::anyhow!(
                "FAQ corpus at {} contains no entries",
                corpus_path.display()
            )));
        }
        tracing::info!(
            categories = corpus.categories.len(),
            units = units.len(),
            "loaded FAQ corpus from {}",
            corpus_path.display()
        );

        let provider: Arc<dyn LlmProvider> = Arc::new(
            OllamaProvider::new(&config.ollama.base_url, config.ollama.request_timeout())
                .map_err(|e| InitializationError::Llm(e.into()))?,
        );

        match provider.health_check().await {
            Ok(true) => {}
            Ok(false) => tracing::warn!(
                "Ollama at {} is not responding; index build will fail if it stays down",
                config.ollama.base_url
            ),
            Err(err) => tracing::warn!("Ollama health check failed: {}", err),
        }

        tracing::info!(
            model = %config.ollama.embedding_model,
            "embedding {} FAQ units",
            units.len()
        );
        let index: Arc<dyn EmbeddingIndex> = Arc::new(
            InMemoryIndex::build(provider.clone(), &config.ollama.embedding_model, units)
                .await
                .map_err(|e| InitializationError::Index(e.into()))?,
        );

        let generator = Arc::new(
            LlmAnswerGenerator::new(
                provider.clone(),
                &config.ollama.chat_model,
                config.ollama.request_timeout(),
            )
            .with_sampling(config.ollama.temperature, config.ollama.max_tokens),
        );
        let cleaner = ResponseCleaner::new(&config.cleaner.open_tag, &config.cleaner.close_tag)
            .map_err(|e| InitializationError::Pipeline(e.into()))?;

        let log = ConversationLog::new();
        let pipeline = Arc::new(QaPipeline::new(
            index.clone(),
            generator,
            cleaner,
            log.clone(),
            config.retrieval.top_k,
        ));

        Ok(Arc::new(AppState {
            paths,
            config,
            corpus: Arc::new(corpus),
            provider,
            index,
            pipeline,
            log,
        }))
    }

    /// Operational snapshot served by the status route: provider health,
    /// the configured models and the resolved corpus location.
    pub async fn status_snapshot(&self) -> serde_json::Value {
        let reachable = self.provider.health_check().await.unwrap_or(false);

        json!({
            "initialized": true,
            "provider": {
                "name": self.provider.name(),
                "reachable": reachable,
            },
            "chat_model": self.config.ollama.chat_model,
            "embedding_model": self.config.ollama.embedding_model,
            "corpus_path": self.paths.resolve(&self.config.corpus.path).display().to_string(),
            "corpus_categories": self.corpus.categories.len(),
            "index_units": self.index.len(),
            "turns": self.log.len(),
        })
    }
}
