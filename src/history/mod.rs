use std::sync::{Arc, RwLock};

use chrono::Local;
use serde::{Deserialize, Serialize};

/// One completed question/answer exchange. Turns only exist in finished
/// form; a failed turn never produces one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub question: String,
    pub answer: String,
    /// Local wall-clock completion time, formatted HH:MM:SS.
    pub timestamp: String,
}

impl ConversationTurn {
    pub fn now(question: &str, answer: &str) -> Self {
        Self {
            question: question.to_string(),
            answer: answer.to_string(),
            timestamp: Local::now().format("%H:%M:%S").to_string(),
        }
    }
}

/// Append-only transcript for the session, shared across handlers.
///
/// Readers always observe whole turns: the only writer pushes a fully
/// populated `ConversationTurn` under the write lock. The log lives for
/// the lifetime of the process and is never persisted.
#[derive(Clone, Default)]
pub struct ConversationLog {
    turns: Arc<RwLock<Vec<ConversationTurn>>>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, turn: ConversationTurn) {
        match self.turns.write() {
            Ok(mut turns) => turns.push(turn),
            Err(poisoned) => poisoned.into_inner().push(turn),
        }
    }

    /// Snapshot of every turn, oldest first.
    pub fn all(&self) -> Vec<ConversationTurn> {
        match self.turns.read() {
            Ok(turns) => turns.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        match self.turns.read() {
            Ok(turns) => turns.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_preserve_order() {
        let log = ConversationLog::new();
        log.append(ConversationTurn::now("اول", "یک"));
        log.append(ConversationTurn::now("دوم", "دو"));

        let turns = log.all();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].question, "اول");
        assert_eq!(turns[1].question, "دوم");
    }

    #[test]
    fn clones_share_the_same_log() {
        let log = ConversationLog::new();
        let clone = log.clone();
        clone.append(ConversationTurn::now("س", "ج"));

        assert_eq!(log.len(), 1);
        assert!(!log.is_empty());
    }

    #[test]
    fn timestamps_use_wall_clock_format() {
        let turn = ConversationTurn::now("س", "ج");
        assert_eq!(turn.timestamp.len(), 8);
        assert_eq!(turn.timestamp.as_bytes()[2], b':');
        assert_eq!(turn.timestamp.as_bytes()[5], b':');
    }

    #[test]
    fn turns_serialize_for_the_transcript_endpoint() {
        let turn = ConversationTurn {
            question: "ساعت کاری شما چیه؟".to_string(),
            answer: "9 تا 17".to_string(),
            timestamp: "09:15:00".to_string(),
        };
        let value = serde_json::to_value(&turn).unwrap();
        assert_eq!(value["question"], "ساعت کاری شما چیه؟");
        assert_eq!(value["answer"], "9 تا 17");
        assert_eq!(value["timestamp"], "09:15:00");
    }
}
