//! Question answering: the per-turn path from raw text to logged answer.

pub mod clean;
pub mod generator;
pub mod normalize;
pub mod pipeline;
pub mod prompt;

#[cfg(test)]
mod tests;

pub use clean::ResponseCleaner;
pub use generator::{AnswerGenerator, LlmAnswerGenerator};
pub use pipeline::QaPipeline;
