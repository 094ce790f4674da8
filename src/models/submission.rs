use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 提交时刻的答题快照
///
/// 一旦生成就不可修改，之后对答题表的任何改动都不会反映到这里。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSnapshot(BTreeMap<String, String>);

impl AnswerSnapshot {
    pub fn new(entries: BTreeMap<String, String>) -> Self {
        Self(entries)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, question_id: &str) -> Option<&str> {
        self.0.get(question_id).map(String::as_str)
    }
}

/// 提交答案请求体
#[derive(Debug, Clone, Serialize)]
pub struct SubmitAnswersRequest<'a> {
    pub answers: &'a AnswerSnapshot,
}

/// 服务端对提交的确认
///
/// `score` 为空表示评分延后。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionAck {
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(rename = "correctCount", alias = "correct_count", default)]
    pub correct_count: Option<u32>,
    #[serde(rename = "totalQuestions", alias = "total_questions", default)]
    pub total_questions: Option<u32>,
    #[serde(default)]
    pub message: Option<String>,
}

impl SubmissionAck {
    pub fn is_deferred(&self) -> bool {
        self.score.is_none()
    }
}

/// 单题判分结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionOutcome {
    #[serde(rename = "questionId")]
    pub question_id: String,
    #[serde(rename = "selectedAnswer", default)]
    pub selected_answer: Option<String>,
    #[serde(rename = "isCorrect")]
    pub is_correct: bool,
}

/// 已提交测验的成绩（以服务端为准）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizResult {
    pub score: f64,
    #[serde(rename = "totalQuestions")]
    pub total_questions: u32,
    #[serde(rename = "correctAnswers")]
    pub correct_answers: u32,
    #[serde(rename = "submittedAt", default)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub answers: Vec<QuestionOutcome>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentRef {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// 排行榜条目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub student: StudentRef,
    pub score: f64,
    #[serde(rename = "totalCorrect")]
    pub total_correct: u32,
    #[serde(rename = "totalQuestions")]
    pub total_questions: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_answers_as_object() {
        let mut entries = BTreeMap::new();
        entries.insert("q1".to_string(), "Paris".to_string());
        entries.insert("q2".to_string(), "4".to_string());
        let snapshot = AnswerSnapshot::new(entries);

        let body = serde_json::to_value(SubmitAnswersRequest { answers: &snapshot }).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"answers": {"q1": "Paris", "q2": "4"}})
        );
    }

    #[test]
    fn ack_without_score_is_deferred() {
        let ack: SubmissionAck = serde_json::from_str(r#"{"message":"received"}"#).unwrap();
        assert!(ack.is_deferred());

        let ack: SubmissionAck =
            serde_json::from_str(r#"{"score":80,"correctCount":4,"totalQuestions":5}"#).unwrap();
        assert_eq!(ack.score, Some(80.0));
        assert_eq!(ack.correct_count, Some(4));
    }
}
