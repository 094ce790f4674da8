/// 测验 REST 客户端
///
/// 封装所有与测验后端相关的调用逻辑
use crate::clients::quiz_api::QuizApi;
use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::ApiClient;
use crate::models::{
    AnswerSnapshot, ClassroomQuiz, LeaderboardEntry, Question, Quiz, QuizResult, SubmissionAck,
    SubmitAnswersRequest,
};
use futures::future::{BoxFuture, FutureExt};
use serde::Deserialize;
use tracing::{debug, info};

/// 题目列表接口既可能直接返回数组，也可能包一层 `questions`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum QuestionsPayload {
    List(Vec<Question>),
    Wrapped { questions: Vec<Question> },
}

impl From<QuestionsPayload> for Vec<Question> {
    fn from(payload: QuestionsPayload) -> Self {
        match payload {
            QuestionsPayload::List(list) => list,
            QuestionsPayload::Wrapped { questions } => questions,
        }
    }
}

/// 测验 REST 客户端
#[derive(Clone)]
pub struct QuizClient {
    api: ApiClient,
}

impl QuizClient {
    /// 创建新的测验客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        Ok(Self {
            api: ApiClient::new(config)?,
        })
    }

    pub fn from_api(api: ApiClient) -> Self {
        Self { api }
    }

    /// 获取测验详情
    pub async fn get_quiz(&self, quiz_id: &str) -> AppResult<Quiz> {
        debug!("获取测验详情: {}", quiz_id);
        self.api.get_json(&format!("quizzes/{}", quiz_id)).await
    }

    /// 获取测验题目
    pub async fn get_questions(&self, quiz_id: &str) -> AppResult<Vec<Question>> {
        debug!("获取测验题目: {}", quiz_id);
        let payload: QuestionsPayload = self
            .api
            .get_json(&format!("questions/quiz/{}", quiz_id))
            .await?;
        Ok(payload.into())
    }

    /// 提交答案
    ///
    /// # 参数
    /// - `quiz_id`: 测验ID
    /// - `answers`: 提交时刻的答题快照
    pub async fn submit(&self, quiz_id: &str, answers: &AnswerSnapshot) -> AppResult<SubmissionAck> {
        info!("📤 提交测验 {} ({} 个答案)", quiz_id, answers.len());
        let body = SubmitAnswersRequest { answers };
        self.api
            .post_json(&format!("quizzes/{}/submit", quiz_id), &body)
            .await
    }

    /// 获取成绩
    pub async fn get_results(&self, quiz_id: &str) -> AppResult<QuizResult> {
        self.api
            .get_json(&format!("quizzes/{}/results", quiz_id))
            .await
    }

    /// 获取排行榜
    pub async fn get_leaderboard(&self, quiz_id: &str) -> AppResult<Vec<LeaderboardEntry>> {
        self.api
            .get_json(&format!("quizzes/{}/leaderboard", quiz_id))
            .await
    }

    /// 获取班级的测验列表
    pub async fn get_classroom_quizzes(&self, classroom_id: &str) -> AppResult<Vec<ClassroomQuiz>> {
        self.api
            .get_json(&format!("quizzes/classroom/{}", classroom_id))
            .await
    }
}

impl QuizApi for QuizClient {
    fn fetch_quiz<'a>(&'a self, quiz_id: &'a str) -> BoxFuture<'a, AppResult<Quiz>> {
        self.get_quiz(quiz_id).boxed()
    }

    fn fetch_questions<'a>(&'a self, quiz_id: &'a str) -> BoxFuture<'a, AppResult<Vec<Question>>> {
        self.get_questions(quiz_id).boxed()
    }

    fn submit_answers<'a>(
        &'a self,
        quiz_id: &'a str,
        answers: &'a AnswerSnapshot,
    ) -> BoxFuture<'a, AppResult<SubmissionAck>> {
        self.submit(quiz_id, answers).boxed()
    }

    fn fetch_results<'a>(&'a self, quiz_id: &'a str) -> BoxFuture<'a, AppResult<QuizResult>> {
        self.get_results(quiz_id).boxed()
    }

    fn fetch_leaderboard<'a>(
        &'a self,
        quiz_id: &'a str,
    ) -> BoxFuture<'a, AppResult<Vec<LeaderboardEntry>>> {
        self.get_leaderboard(quiz_id).boxed()
    }

    fn list_classroom_quizzes<'a>(
        &'a self,
        classroom_id: &'a str,
    ) -> BoxFuture<'a, AppResult<Vec<ClassroomQuiz>>> {
        self.get_classroom_quizzes(classroom_id).boxed()
    }
}
