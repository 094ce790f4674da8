//! 测验会话 - 组合层
//!
//! 把答题表、导航器、倒计时和提交协调器组合成一次完整的作答生命周期。
//! 会话独占这四个组件，全部是同步操作；唯一的异步边界（外部提交）
//! 由调用方根据 [`SubmissionRequest`] 发起，再通过 [`QuizSession::finish_submission`] 回报结果。

use crate::error::{AppError, SessionError};
use crate::models::{AnswerSnapshot, Question, QuestionView, Quiz, SubmissionAck};
use crate::session::answer_ledger::AnswerLedger;
use crate::session::coordinator::{
    SubmissionCoordinator, SubmissionOutcome, SubmissionStatus, SubmissionTicket, SubmitDecision,
    SubmitTrigger,
};
use crate::session::countdown::{CountdownTimer, TickOutcome};
use crate::session::navigator::QuestionNavigator;
use std::collections::HashSet;
use tracing::{debug, info};

/// 一次需要发往服务端的提交
#[derive(Debug, Clone)]
pub struct SubmissionRequest {
    pub ticket: SubmissionTicket,
    pub quiz_id: String,
    pub trigger: SubmitTrigger,
    pub answers: AnswerSnapshot,
}

/// 选择答案被忽略的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// 已离开作答状态，答题表冻结
    NotAnswering,
    UnknownQuestion,
    UnknownOption,
    /// 会话已销毁
    TornDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Recorded,
    Ignored(IgnoreReason),
}

/// 用户提交动作的结果
#[derive(Debug, Clone)]
pub enum SubmitStep {
    NeedsConfirmation { unanswered: usize },
    Submit(SubmissionRequest),
    Ignored,
}

/// 一次节拍对会话的影响
#[derive(Debug, Clone)]
pub enum SessionTick {
    Idle,
    Ticked { remaining: u32 },
    /// 时间到，需要立即发起自动提交
    AutoSubmit(SubmissionRequest),
    /// 时间到，但已有提交在进行中
    ExpiredWhileSubmitting,
}

pub struct QuizSession {
    quiz: Quiz,
    questions: Vec<Question>,
    navigator: QuestionNavigator,
    ledger: AnswerLedger,
    timer: CountdownTimer,
    coordinator: SubmissionCoordinator,
    torn_down: bool,
}

impl QuizSession {
    /// 创建会话并立即启动倒计时
    ///
    /// 题目必须非空、ID 唯一且每题至少两个选项。
    pub fn new(quiz: Quiz, questions: Vec<Question>) -> Result<Self, SessionError> {
        let mut seen = HashSet::new();
        for q in &questions {
            if q.options.len() < 2 {
                return Err(SessionError::TooFewOptions {
                    question_id: q.id.clone(),
                    count: q.options.len(),
                });
            }
            if !seen.insert(q.id.as_str()) {
                return Err(SessionError::DuplicateQuestion {
                    question_id: q.id.clone(),
                });
            }
        }

        let navigator = QuestionNavigator::new(questions.iter().map(|q| q.id.clone()).collect())?;
        let mut timer = CountdownTimer::new();
        timer.start(quiz.duration_seconds());

        info!(
            "📝 会话开始: {} ({} 题, {} 分钟)",
            quiz.title,
            questions.len(),
            quiz.duration
        );

        Ok(Self {
            quiz,
            questions,
            navigator,
            ledger: AnswerLedger::new(),
            timer,
            coordinator: SubmissionCoordinator::new(),
            torn_down: false,
        })
    }

    // ========== 作答 ==========

    /// 为指定题目选择答案
    ///
    /// 非作答状态下的选择被静默忽略（返回原因），答题表保持不变。
    pub fn select_answer(&mut self, question_id: &str, option_value: &str) -> SelectOutcome {
        if self.torn_down {
            return SelectOutcome::Ignored(IgnoreReason::TornDown);
        }
        if !self.coordinator.status().accepts_answers() {
            debug!(
                "答题表已冻结 (状态: {:?})，忽略题目 {} 的选择",
                self.coordinator.status(),
                question_id
            );
            return SelectOutcome::Ignored(IgnoreReason::NotAnswering);
        }
        let Some(question) = self.questions.iter().find(|q| q.id == question_id) else {
            return SelectOutcome::Ignored(IgnoreReason::UnknownQuestion);
        };
        if !question.has_option(option_value) {
            return SelectOutcome::Ignored(IgnoreReason::UnknownOption);
        }
        self.ledger.select_answer(question_id, option_value);
        SelectOutcome::Recorded
    }

    /// 为当前题目选择第 `option_index` 个选项（从 0 开始）
    pub fn select_option(&mut self, option_index: usize) -> SelectOutcome {
        let question = &self.questions[self.navigator.current_index()];
        let Some(value) = question.options.get(option_index).cloned() else {
            return SelectOutcome::Ignored(IgnoreReason::UnknownOption);
        };
        let question_id = question.id.clone();
        self.select_answer(&question_id, &value)
    }

    // ========== 导航 ==========

    pub fn next(&mut self) -> bool {
        !self.torn_down && self.navigator.next()
    }

    pub fn previous(&mut self) -> bool {
        !self.torn_down && self.navigator.previous()
    }

    pub fn jump_to(&mut self, index: usize) -> bool {
        !self.torn_down && self.navigator.jump_to(index)
    }

    // ========== 计时 ==========

    /// 推进一秒；归零时把自动提交送入协调器
    pub fn tick(&mut self) -> SessionTick {
        if self.torn_down {
            return SessionTick::Idle;
        }
        match self.timer.tick() {
            TickOutcome::Idle => SessionTick::Idle,
            TickOutcome::Ticked { remaining } => SessionTick::Ticked { remaining },
            TickOutcome::Expired => match self.submit_with(SubmitTrigger::Expired) {
                SubmitStep::Submit(request) => SessionTick::AutoSubmit(request),
                _ => SessionTick::ExpiredWhileSubmitting,
            },
        }
    }

    // ========== 提交 ==========

    /// 用户点击提交
    pub fn request_submit(&mut self) -> SubmitStep {
        self.submit_with(SubmitTrigger::Manual)
    }

    /// 用户确认带着未答题目提交
    pub fn confirm_submit(&mut self) -> SubmitStep {
        if self.torn_down {
            return SubmitStep::Ignored;
        }
        match self.coordinator.confirm() {
            SubmitDecision::Begin(ticket) => {
                SubmitStep::Submit(self.build_request(ticket, SubmitTrigger::Manual))
            }
            _ => SubmitStep::Ignored,
        }
    }

    /// 用户取消提交
    pub fn decline_submit(&mut self) -> bool {
        !self.torn_down && self.coordinator.decline()
    }

    /// 回报外部提交的结果
    ///
    /// 成功或失败都会取消倒计时：成功后会话结束，失败后避免重试期间再次自动提交。
    pub fn finish_submission(
        &mut self,
        ticket: SubmissionTicket,
        result: Result<SubmissionAck, AppError>,
    ) -> SubmissionOutcome {
        if self.torn_down {
            return SubmissionOutcome::Stale;
        }
        let outcome = self.coordinator.complete(ticket, result);
        match &outcome {
            SubmissionOutcome::Submitted(_) => {
                self.timer.cancel();
                info!("✅ 测验已提交: {}", self.quiz.title);
            }
            SubmissionOutcome::Failed { .. } => {
                self.timer.cancel();
                info!(
                    "↩️ 提交失败，返回作答 (已答 {}/{})",
                    self.ledger.answered_count(),
                    self.questions.len()
                );
            }
            SubmissionOutcome::Stale => {}
        }
        outcome
    }

    /// 离开页面：取消倒计时，丢弃会话，不触发提交
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.timer.cancel();
        self.torn_down = true;
        info!(
            "🚪 离开测验 {} (状态: {:?})",
            self.quiz.title,
            self.coordinator.status()
        );
    }

    fn submit_with(&mut self, trigger: SubmitTrigger) -> SubmitStep {
        if self.torn_down {
            return SubmitStep::Ignored;
        }
        let decision = self.coordinator.request_submit(
            trigger,
            self.answered_count(),
            self.questions.len(),
            self.timer.has_time_left(),
        );
        match decision {
            SubmitDecision::NeedsConfirmation { unanswered } => {
                SubmitStep::NeedsConfirmation { unanswered }
            }
            SubmitDecision::Begin(ticket) => SubmitStep::Submit(self.build_request(ticket, trigger)),
            SubmitDecision::Ignored => SubmitStep::Ignored,
        }
    }

    fn build_request(&self, ticket: SubmissionTicket, trigger: SubmitTrigger) -> SubmissionRequest {
        SubmissionRequest {
            ticket,
            quiz_id: self.quiz.id.clone(),
            trigger,
            answers: self.ledger.snapshot(),
        }
    }

    // ========== 只读访问 ==========

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn status(&self) -> SubmissionStatus {
        self.coordinator.status()
    }

    pub fn coordinator(&self) -> &SubmissionCoordinator {
        &self.coordinator
    }

    pub fn remaining_seconds(&self) -> Option<u32> {
        self.timer.remaining()
    }

    pub fn is_timer_running(&self) -> bool {
        self.timer.is_running()
    }

    pub fn is_low_time(&self) -> bool {
        self.timer.is_low()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn answered_count(&self) -> usize {
        self.ledger.answered_count()
    }

    pub fn is_answered(&self, question_id: &str) -> bool {
        self.ledger.is_answered(question_id)
    }

    pub fn answers(&self) -> AnswerSnapshot {
        self.ledger.snapshot()
    }

    pub fn current_index(&self) -> usize {
        self.navigator.current_index()
    }

    pub fn progress_fraction(&self) -> f64 {
        self.navigator.progress_fraction()
    }

    /// 当前题目的学生视图（不含正确答案）
    pub fn current_view(&self) -> QuestionView {
        let index = self.navigator.current_index();
        let question = &self.questions[index];
        QuestionView {
            index,
            total: self.questions.len(),
            question_id: question.id.clone(),
            prompt: question.prompt.clone(),
            options: question.options.clone(),
            selected: self.ledger.answer_for(&question.id).map(str::to_string),
        }
    }
}

impl Drop for QuizSession {
    fn drop(&mut self) {
        self.timer.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    fn quiz(minutes: u32) -> Quiz {
        Quiz {
            id: "quiz-1".to_string(),
            title: "Geography".to_string(),
            duration: minutes,
            classroom: None,
            is_active: true,
            starts_on: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn questions(n: usize) -> Vec<Question> {
        (1..=n)
            .map(|i| Question {
                id: format!("q{}", i),
                prompt: format!("Question {}", i),
                options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
                correct_answer: Some(0),
                explanation: None,
            })
            .collect()
    }

    fn server_error() -> AppError {
        AppError::Api(ApiError::BadResponse {
            endpoint: "/quizzes/quiz-1/submit".to_string(),
            status: 500,
            message: Some("boom".to_string()),
        })
    }

    #[test]
    fn construction_starts_the_countdown() {
        let session = QuizSession::new(quiz(2), questions(3)).unwrap();
        assert_eq!(session.remaining_seconds(), Some(120));
        assert!(session.is_timer_running());
        assert_eq!(session.status(), SubmissionStatus::Answering);
    }

    #[test]
    fn rejects_empty_and_malformed_question_sets() {
        assert_eq!(
            QuizSession::new(quiz(1), Vec::new()).err(),
            Some(SessionError::NoQuestions)
        );

        let mut qs = questions(2);
        qs[1].options.truncate(1);
        assert!(matches!(
            QuizSession::new(quiz(1), qs).err(),
            Some(SessionError::TooFewOptions { count: 1, .. })
        ));

        let mut qs = questions(2);
        qs[1].id = "q1".to_string();
        assert!(matches!(
            QuizSession::new(quiz(1), qs).err(),
            Some(SessionError::DuplicateQuestion { .. })
        ));
    }

    #[test]
    fn select_validates_question_and_option() {
        let mut session = QuizSession::new(quiz(1), questions(2)).unwrap();
        assert_eq!(session.select_answer("q1", "B"), SelectOutcome::Recorded);
        assert_eq!(
            session.select_answer("q9", "B"),
            SelectOutcome::Ignored(IgnoreReason::UnknownQuestion)
        );
        assert_eq!(
            session.select_answer("q2", "Z"),
            SelectOutcome::Ignored(IgnoreReason::UnknownOption)
        );
        assert_eq!(session.answered_count(), 1);
        assert_eq!(session.current_view().selected.as_deref(), Some("B"));
    }

    #[test]
    fn view_never_exposes_correct_answer() {
        let session = QuizSession::new(quiz(1), questions(2)).unwrap();
        let json = serde_json::to_string(&session.current_view()).unwrap();
        assert!(!json.contains("correct"));
    }

    #[test]
    fn ledger_frozen_outside_answering() {
        let mut session = QuizSession::new(quiz(1), questions(2)).unwrap();
        session.select_answer("q1", "A");

        // confirming 也不允许改答案
        assert!(matches!(
            session.request_submit(),
            SubmitStep::NeedsConfirmation { unanswered: 1 }
        ));
        assert_eq!(
            session.select_answer("q2", "A"),
            SelectOutcome::Ignored(IgnoreReason::NotAnswering)
        );

        let SubmitStep::Submit(request) = session.confirm_submit() else {
            panic!("expected submission");
        };
        assert_eq!(
            session.select_option(3),
            SelectOutcome::Ignored(IgnoreReason::NotAnswering)
        );
        assert_eq!(request.answers.len(), 1);
        assert_eq!(session.answers(), request.answers);
    }

    #[test]
    fn failure_cancels_timer_and_keeps_answers() {
        let mut session = QuizSession::new(quiz(1), questions(2)).unwrap();
        session.select_answer("q1", "A");
        session.select_answer("q2", "C");

        let SubmitStep::Submit(request) = session.request_submit() else {
            panic!("expected direct submission");
        };
        let outcome = session.finish_submission(request.ticket, Err(server_error()));

        assert!(matches!(outcome, SubmissionOutcome::Failed { .. }));
        assert_eq!(session.status(), SubmissionStatus::Answering);
        assert_eq!(session.answered_count(), 2);
        assert!(!session.is_timer_running());
        assert!(matches!(session.tick(), SessionTick::Idle));

        // 可以继续修改并重试
        assert_eq!(session.select_answer("q2", "D"), SelectOutcome::Recorded);
        assert!(matches!(session.request_submit(), SubmitStep::Submit(_)));
    }

    #[test]
    fn expiry_while_submitting_does_not_resubmit() {
        let mut session = QuizSession::new(quiz(1), questions(1)).unwrap();
        session.select_answer("q1", "A");
        let SubmitStep::Submit(_) = session.request_submit() else {
            panic!("expected submission");
        };

        let mut saw_expiry = false;
        for _ in 0..60 {
            match session.tick() {
                SessionTick::AutoSubmit(_) => panic!("second submission started"),
                SessionTick::ExpiredWhileSubmitting => saw_expiry = true,
                _ => {}
            }
        }
        assert!(saw_expiry);
        assert_eq!(session.coordinator().attempts(), 1);
    }

    #[test]
    fn teardown_cancels_and_blocks_everything() {
        let mut session = QuizSession::new(quiz(1), questions(2)).unwrap();
        session.teardown();
        session.teardown();

        assert!(!session.is_timer_running());
        assert!(matches!(session.tick(), SessionTick::Idle));
        assert!(matches!(session.request_submit(), SubmitStep::Ignored));
        assert!(!session.next());
        assert_eq!(
            session.select_answer("q1", "A"),
            SelectOutcome::Ignored(IgnoreReason::TornDown)
        );
        assert_eq!(session.coordinator().attempts(), 0);
    }

    #[test]
    fn result_after_teardown_is_discarded() {
        let mut session = QuizSession::new(quiz(1), questions(2)).unwrap();
        session.select_answer("q1", "A");
        session.select_answer("q2", "B");
        let SubmitStep::Submit(request) = session.request_submit() else {
            panic!("expected submission");
        };
        session.teardown();

        let outcome = session.finish_submission(request.ticket, Err(server_error()));
        assert!(matches!(outcome, SubmissionOutcome::Stale));
        assert_eq!(session.status(), SubmissionStatus::Submitting);

        let outcome = session.finish_submission(request.ticket, Ok(SubmissionAck::default()));
        assert!(matches!(outcome, SubmissionOutcome::Stale));
        assert_eq!(session.status(), SubmissionStatus::Submitting);
        assert_eq!(session.answered_count(), 2);
    }
}
