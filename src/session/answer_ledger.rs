//! 答题表
//!
//! 一次作答内 questionId → 所选选项 的映射。没有条目表示"未作答"。

use crate::models::AnswerSnapshot;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct AnswerLedger {
    entries: HashMap<String, String>,
}

impl AnswerLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入或覆盖某题的答案，返回被覆盖的旧值
    ///
    /// 本身不做状态检查：只有会话持有答题表，
    /// 并且只在 `answering` 状态下调用它。
    pub fn select_answer(
        &mut self,
        question_id: impl Into<String>,
        option_value: impl Into<String>,
    ) -> Option<String> {
        self.entries.insert(question_id.into(), option_value.into())
    }

    pub fn answered_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_answered(&self, question_id: &str) -> bool {
        self.entries.contains_key(question_id)
    }

    pub fn answer_for(&self, question_id: &str) -> Option<&str> {
        self.entries.get(question_id).map(String::as_str)
    }

    /// 当前所有条目的不可变副本
    pub fn snapshot(&self) -> AnswerSnapshot {
        AnswerSnapshot::new(
            self.entries
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}
