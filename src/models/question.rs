// src/models/question.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A generated multiple-choice question.
/// Built per request and never persisted; the client checks the answer itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Prompt text.
    pub question: String,

    /// Distinct choice strings, already shuffled.
    pub choices: Vec<String>,

    /// Equal to exactly one entry of `choices`.
    pub answer: String,
}

impl Question {
    pub(crate) fn new(question: String, answer: String) -> Self {
        Self {
            question,
            choices: Vec::with_capacity(4),
            answer,
        }
    }

    /// Appends a choice unless an identical one is already present.
    pub(crate) fn push_choice(&mut self, choice: impl Into<String>) {
        let choice = choice.into();
        if !self.choices.contains(&choice) {
            self.choices.push(choice);
        }
    }
}

/// DTO for finishing a quiz.
#[derive(Debug, Deserialize, Validate)]
pub struct FinishQuizRequest {
    /// Points earned during the quiz.
    #[validate(range(min = 0, max = 10_000))]
    pub score: i64,
}

/// Score total and ranking window returned after a quiz.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResultResponse {
    pub score_total: i64,
    pub user_ranking: Vec<crate::models::player::RankedEntry>,
}
