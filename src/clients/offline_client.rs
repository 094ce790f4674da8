//! 离线测验后端
//!
//! 从 TOML 文件提供一套测验，用于本地练习。判分在这里完成，
//! 对会话来说它和远端服务一样是"服务端"。

use crate::clients::quiz_api::QuizApi;
use crate::error::{ApiError, AppResult};
use crate::models::{
    load_quiz_fixture, AnswerSnapshot, ClassroomQuiz, LeaderboardEntry, Question, QuestionOutcome,
    Quiz, QuizFixture, QuizResult, SubmissionAck,
};
use futures::future::{self, BoxFuture, FutureExt};
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

pub struct OfflineQuizApi {
    fixture: QuizFixture,
    results: Mutex<Vec<QuizResult>>,
}

impl OfflineQuizApi {
    pub fn new(fixture: QuizFixture) -> Self {
        Self {
            fixture,
            results: Mutex::new(Vec::new()),
        }
    }

    pub async fn from_file(path: &Path) -> AppResult<Self> {
        Ok(Self::new(load_quiz_fixture(path).await?))
    }

    pub fn quiz_id(&self) -> &str {
        &self.fixture.quiz.id
    }

    /// 已收到的提交次数
    pub fn submission_count(&self) -> usize {
        self.results.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn ensure_quiz(&self, quiz_id: &str, endpoint: &str) -> AppResult<()> {
        if quiz_id == self.fixture.quiz.id {
            Ok(())
        } else {
            Err(ApiError::NotFound {
                endpoint: endpoint.to_string(),
            }
            .into())
        }
    }

    fn grade(&self, answers: &AnswerSnapshot) -> QuizResult {
        let outcomes: Vec<QuestionOutcome> = self
            .fixture
            .questions
            .iter()
            .map(|q| {
                let selected = answers.get(&q.id).map(str::to_string);
                QuestionOutcome {
                    question_id: q.id.clone(),
                    is_correct: is_correct(q, selected.as_deref()),
                    selected_answer: selected,
                }
            })
            .collect();

        let total = outcomes.len() as u32;
        let correct = outcomes.iter().filter(|o| o.is_correct).count() as u32;
        let score = if total == 0 {
            0.0
        } else {
            f64::from(correct) * 100.0 / f64::from(total)
        };

        QuizResult {
            score,
            total_questions: total,
            correct_answers: correct,
            submitted_at: Some(chrono::Utc::now()),
            answers: outcomes,
        }
    }
}

fn is_correct(question: &Question, selected: Option<&str>) -> bool {
    match (question.correct_answer, selected) {
        (Some(idx), Some(value)) => question.options.get(idx).map(String::as_str) == Some(value),
        _ => false,
    }
}

impl QuizApi for OfflineQuizApi {
    fn fetch_quiz<'a>(&'a self, quiz_id: &'a str) -> BoxFuture<'a, AppResult<Quiz>> {
        let result = self
            .ensure_quiz(quiz_id, &format!("quizzes/{}", quiz_id))
            .map(|_| self.fixture.quiz.clone());
        future::ready(result).boxed()
    }

    fn fetch_questions<'a>(&'a self, quiz_id: &'a str) -> BoxFuture<'a, AppResult<Vec<Question>>> {
        let result = self
            .ensure_quiz(quiz_id, &format!("questions/quiz/{}", quiz_id))
            .map(|_| self.fixture.questions.clone());
        future::ready(result).boxed()
    }

    fn submit_answers<'a>(
        &'a self,
        quiz_id: &'a str,
        answers: &'a AnswerSnapshot,
    ) -> BoxFuture<'a, AppResult<SubmissionAck>> {
        let result = self
            .ensure_quiz(quiz_id, &format!("quizzes/{}/submit", quiz_id))
            .map(|_| {
                let graded = self.grade(answers);
                info!(
                    "📥 离线判分: {}/{} 正确",
                    graded.correct_answers, graded.total_questions
                );
                let ack = SubmissionAck {
                    score: Some(graded.score),
                    correct_count: Some(graded.correct_answers),
                    total_questions: Some(graded.total_questions),
                    message: Some("已在本地判分".to_string()),
                };
                self.results
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .push(graded);
                ack
            });
        future::ready(result).boxed()
    }

    fn fetch_results<'a>(&'a self, quiz_id: &'a str) -> BoxFuture<'a, AppResult<QuizResult>> {
        let endpoint = format!("quizzes/{}/results", quiz_id);
        let result = self.ensure_quiz(quiz_id, &endpoint).and_then(|_| {
            self.results
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .last()
                .cloned()
                .ok_or_else(|| ApiError::NotFound { endpoint }.into())
        });
        future::ready(result).boxed()
    }

    fn fetch_leaderboard<'a>(
        &'a self,
        quiz_id: &'a str,
    ) -> BoxFuture<'a, AppResult<Vec<LeaderboardEntry>>> {
        let result = self
            .ensure_quiz(quiz_id, &format!("quizzes/{}/leaderboard", quiz_id))
            .map(|_| Vec::new());
        future::ready(result).boxed()
    }

    fn list_classroom_quizzes<'a>(
        &'a self,
        _classroom_id: &'a str,
    ) -> BoxFuture<'a, AppResult<Vec<ClassroomQuiz>>> {
        let quiz = &self.fixture.quiz;
        let row = ClassroomQuiz {
            id: quiz.id.clone(),
            title: quiz.title.clone(),
            duration: quiz.duration,
            is_active: quiz.is_active,
            starts_on: quiz.starts_on,
        };
        future::ready(Ok(vec![row])).boxed()
    }
}
