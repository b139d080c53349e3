use serde::{Deserialize, Serialize};

use crate::db::models::Question;
use crate::schemas::lenient_i64;

#[derive(Debug, Deserialize)]
pub(crate) struct QuestionPayload {
    #[serde(default)]
    pub(crate) question_text: String,
    #[serde(default)]
    pub(crate) option_a: String,
    #[serde(default)]
    pub(crate) option_b: String,
    #[serde(default)]
    pub(crate) option_c: String,
    #[serde(default)]
    pub(crate) option_d: String,
    #[serde(default)]
    pub(crate) correct_answer: String,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub(crate) display_order: i64,
}

/// Question as served to students: the answer key is withheld so it can
/// never be recovered from the page source.
#[derive(Debug, Serialize)]
pub(crate) struct PublicQuestion {
    pub(crate) id: i64,
    pub(crate) lesson_id: i64,
    pub(crate) question_text: String,
    pub(crate) option_a: String,
    pub(crate) option_b: String,
    pub(crate) option_c: String,
    pub(crate) option_d: String,
    pub(crate) display_order: i64,
}

impl PublicQuestion {
    pub(crate) fn from_db(question: Question) -> Self {
        Self {
            id: question.id,
            lesson_id: question.lesson_id,
            question_text: question.question_text,
            option_a: question.option_a,
            option_b: question.option_b,
            option_c: question.option_c,
            option_d: question.option_d,
            display_order: question.display_order,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnswerCheckRequest {
    #[serde(default)]
    pub(crate) answer: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnswerCheckResponse {
    pub(crate) correct: bool,
    #[serde(rename = "correctAnswer")]
    pub(crate) correct_answer: String,
}
