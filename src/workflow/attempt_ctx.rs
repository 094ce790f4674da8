//! 作答上下文
//!
//! 封装"我正在做哪个班级的哪份测验"这一信息

use std::fmt::Display;

#[derive(Debug, Clone)]
pub struct AttemptCtx {
    /// 班级ID（仅用于日志显示和返回班级页）
    pub classroom_id: Option<String>,

    /// 测验ID
    pub quiz_id: String,
}

impl AttemptCtx {
    pub fn new(classroom_id: Option<String>, quiz_id: impl Into<String>) -> Self {
        Self {
            classroom_id,
            quiz_id: quiz_id.into(),
        }
    }
}

impl Display for AttemptCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.classroom_id {
            Some(classroom) => write!(f, "[班级 {} 测验 {}]", classroom, self.quiz_id),
            None => write!(f, "[测验 {}]", self.quiz_id),
        }
    }
}
