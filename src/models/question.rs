use serde::{Deserialize, Serialize};

/// 单道题目
///
/// 作答期间不可变。`correct_answer` 只做反序列化，不会再发送出去，
/// 也不会出现在 [`QuestionView`] 中。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(rename = "text", alias = "prompt")]
    pub prompt: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(rename = "correctAnswer", default, skip_serializing)]
    pub correct_answer: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Question {
    pub fn has_option(&self, value: &str) -> bool {
        self.options.iter().any(|o| o == value)
    }
}

/// 展示给学生的题目视图
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionView {
    /// 从 0 开始
    pub index: usize,
    pub total: usize,
    pub question_id: String,
    pub prompt: String,
    pub options: Vec<String>,
    pub selected: Option<String>,
}

impl QuestionView {
    pub fn is_last(&self) -> bool {
        self.index + 1 == self.total
    }
}
