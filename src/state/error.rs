use thiserror::Error;

/// Startup-only failures. Any of these aborts the process.
#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("Failed to load FAQ corpus: {0}")]
    Corpus(#[source] anyhow::Error),

    #[error("Failed to build embedding index: {0}")]
    Index(#[source] anyhow::Error),

    #[error("Failed to initialize LLM provider: {0}")]
    Llm(#[source] anyhow::Error),

    #[error("Failed to assemble turn pipeline: {0}")]
    Pipeline(#[source] anyhow::Error),
}
