//! 测验后端接口
//!
//! 会话核心只依赖这组抽象的异步操作，具体传输由外层提供。

use crate::error::AppResult;
use crate::models::{
    AnswerSnapshot, ClassroomQuiz, LeaderboardEntry, Question, Quiz, QuizResult, SubmissionAck,
};
use futures::future::BoxFuture;

pub trait QuizApi: Send + Sync {
    /// 测验元数据（时长、是否激活、开放时间）
    fn fetch_quiz<'a>(&'a self, quiz_id: &'a str) -> BoxFuture<'a, AppResult<Quiz>>;

    /// 测验的有序题目列表
    fn fetch_questions<'a>(&'a self, quiz_id: &'a str) -> BoxFuture<'a, AppResult<Vec<Question>>>;

    /// 提交答题快照
    fn submit_answers<'a>(
        &'a self,
        quiz_id: &'a str,
        answers: &'a AnswerSnapshot,
    ) -> BoxFuture<'a, AppResult<SubmissionAck>>;

    /// 之前提交的成绩；尚未提交时返回 NotFound
    fn fetch_results<'a>(&'a self, quiz_id: &'a str) -> BoxFuture<'a, AppResult<QuizResult>>;

    fn fetch_leaderboard<'a>(
        &'a self,
        quiz_id: &'a str,
    ) -> BoxFuture<'a, AppResult<Vec<LeaderboardEntry>>>;

    fn list_classroom_quizzes<'a>(
        &'a self,
        classroom_id: &'a str,
    ) -> BoxFuture<'a, AppResult<Vec<ClassroomQuiz>>>;
}
