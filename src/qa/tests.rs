//! Turn pipeline tests with stub capabilities.
//!
//! Covers the full normalize/retrieve/prompt/generate/clean path, the
//! failure modes that must leave the log untouched, and append ordering
//! across consecutive turns.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::core::errors::ApiError;
use crate::corpus::{FaqDocument, RetrievableUnit};
use crate::history::ConversationLog;
use crate::index::EmbeddingIndex;
use crate::qa::clean::ResponseCleaner;
use crate::qa::generator::AnswerGenerator;
use crate::qa::pipeline::QaPipeline;

struct StubIndex {
    units: Vec<RetrievableUnit>,
    offline: bool,
    queries: Mutex<Vec<String>>,
}

impl StubIndex {
    fn serving(units: Vec<RetrievableUnit>) -> Self {
        Self {
            units,
            offline: false,
            queries: Mutex::new(Vec::new()),
        }
    }

    fn offline() -> Self {
        Self {
            units: Vec::new(),
            offline: true,
            queries: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl EmbeddingIndex for StubIndex {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<RetrievableUnit>, ApiError> {
        self.queries.lock().unwrap().push(query.to_string());
        if self.offline {
            return Err(ApiError::RetrievalUnavailable("index offline".to_string()));
        }
        Ok(self.units.iter().take(k).cloned().collect())
    }

    fn len(&self) -> usize {
        self.units.len()
    }
}

struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    fn new(replies: Vec<Result<String, String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn replying(reply: &str) -> Self {
        Self::new(vec![Ok(reply.to_string())])
    }
}

#[async_trait]
impl AnswerGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, ApiError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err("script exhausted".to_string()))
            .map_err(ApiError::GenerationFailed)
    }
}

fn sample_units() -> Vec<RetrievableUnit> {
    let document: FaqDocument = serde_json::from_str(
        r#"{
            "categories": [
                {
                    "title": "عمومی",
                    "faqs": [
                        {"question": "ساعت کاری چیست؟", "answer": "9 تا 17"},
                        {"question": "آدرس شما کجاست؟", "answer": "تهران"}
                    ]
                }
            ]
        }"#,
    )
    .unwrap();
    document.to_units()
}

fn pipeline_with(
    index: Arc<StubIndex>,
    generator: Arc<ScriptedGenerator>,
) -> (QaPipeline, ConversationLog) {
    let log = ConversationLog::new();
    let pipeline = QaPipeline::new(
        index,
        generator,
        ResponseCleaner::new("<think>", "</think>").unwrap(),
        log.clone(),
        10,
    );
    (pipeline, log)
}

#[tokio::test]
async fn persian_faq_turn_end_to_end() {
    let index = Arc::new(StubIndex::serving(sample_units()));
    let generator = Arc::new(ScriptedGenerator::replying("<think>x</think>9 تا 17"));
    let (pipeline, log) = pipeline_with(index.clone(), generator.clone());

    let turn = pipeline.run_turn("ساعت کاری شما چیه؟").await.unwrap();

    assert_eq!(turn.question, "ساعت کاری شما چیه؟");
    assert_eq!(turn.answer, "9 تا 17");
    assert_eq!(turn.timestamp.len(), 8);

    let turns = log.all();
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0].question, "ساعت کاری شما چیه؟");
    assert_eq!(turns[0].answer, "9 تا 17");

    let prompts = generator.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("سوال: ساعت کاری چیست؟\n9 تا 17"));
    assert!(prompts[0].contains("Question: ساعت کاری شما چیه؟"));
}

#[tokio::test]
async fn retrieval_sees_normalized_text_prompt_sees_raw() {
    let index = Arc::new(StubIndex::serving(sample_units()));
    let generator = Arc::new(ScriptedGenerator::replying("باز هستیم"));
    let (pipeline, _log) = pipeline_with(index.clone(), generator.clone());

    pipeline.run_turn("hey! ساعت کاری شما چیه؟ :)").await.unwrap();

    let queries = index.queries.lock().unwrap();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0], "ساعت کاری شما چیه؟");

    let prompts = generator.prompts.lock().unwrap();
    assert!(prompts[0].contains("Question: hey! ساعت کاری شما چیه؟ :)"));
}

#[tokio::test]
async fn failed_generation_leaves_log_empty() {
    let index = Arc::new(StubIndex::serving(sample_units()));
    let generator = Arc::new(ScriptedGenerator::new(vec![Err("boom".to_string())]));
    let (pipeline, log) = pipeline_with(index, generator);

    let err = pipeline.run_turn("ساعت کاری؟").await.unwrap_err();
    assert!(matches!(err, ApiError::GenerationFailed(_)));
    assert!(log.is_empty());
}

#[tokio::test]
async fn failed_retrieval_leaves_log_empty_and_skips_generation() {
    let index = Arc::new(StubIndex::offline());
    let generator = Arc::new(ScriptedGenerator::replying("unused"));
    let (pipeline, log) = pipeline_with(index, generator.clone());

    let err = pipeline.run_turn("ساعت کاری؟").await.unwrap_err();
    assert!(matches!(err, ApiError::RetrievalUnavailable(_)));
    assert!(log.is_empty());
    assert!(generator.prompts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn turns_append_in_submission_order_with_failures_skipped() {
    let index = Arc::new(StubIndex::serving(sample_units()));
    let generator = Arc::new(ScriptedGenerator::new(vec![
        Ok("اول".to_string()),
        Err("flaky".to_string()),
        Ok("سوم".to_string()),
    ]));
    let (pipeline, log) = pipeline_with(index, generator);

    pipeline.run_turn("سوال یک").await.unwrap();
    pipeline.run_turn("سوال دو").await.unwrap_err();
    pipeline.run_turn("سوال سه").await.unwrap();

    let turns = log.all();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].question, "سوال یک");
    assert_eq!(turns[0].answer, "اول");
    assert_eq!(turns[1].question, "سوال سه");
    assert_eq!(turns[1].answer, "سوم");
}

#[tokio::test]
async fn concurrent_turns_are_serialized() {
    let index = Arc::new(StubIndex::serving(sample_units()));
    let generator = Arc::new(ScriptedGenerator::new(vec![
        Ok("پاسخ یک".to_string()),
        Ok("پاسخ دو".to_string()),
    ]));
    let (pipeline, log) = pipeline_with(index, generator);
    let pipeline = Arc::new(pipeline);

    let first = {
        let pipeline = pipeline.clone();
        tokio::spawn(async move { pipeline.run_turn("یک").await })
    };
    let second = {
        let pipeline = pipeline.clone();
        tokio::spawn(async move { pipeline.run_turn("دو").await })
    };

    first.await.unwrap().unwrap();
    second.await.unwrap().unwrap();

    let turns = log.all();
    assert_eq!(turns.len(), 2);
    // Whichever task won the gate, both turns are whole and distinct.
    assert_ne!(turns[0].question, turns[1].question);
    assert_ne!(turns[0].answer, turns[1].answer);
}

#[tokio::test]
async fn empty_answer_after_cleaning_is_still_logged() {
    let index = Arc::new(StubIndex::serving(sample_units()));
    let generator = Arc::new(ScriptedGenerator::replying("<think>فقط فکر</think>"));
    let (pipeline, _log) = pipeline_with(index, generator);

    let turn = pipeline.run_turn("سوال").await.unwrap();
    assert_eq!(turn.answer, "");
    assert_eq!(pipeline.log().len(), 1);
}
