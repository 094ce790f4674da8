//! 提交协调器 - 状态机
//!
//! ```text
//! answering ──(手动提交, 有未答题且有剩余时间)──▶ confirming
//! confirming ──(取消)──▶ answering
//! confirming ──(确认 / 到期)──▶ submitting
//! answering ──(到期 / 全部已答的手动提交)──▶ submitting
//! submitting ──(成功)──▶ submitted
//! submitting ──(失败)──▶ failed ──(立即)──▶ answering
//! ```
//!
//! 同一时刻最多一个 submitting；离开 answering/confirming 之后的触发一律忽略。

use crate::error::AppError;
use crate::models::SubmissionAck;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStatus {
    Answering,
    Confirming,
    Submitting,
    Submitted,
    Failed,
}

impl SubmissionStatus {
    /// 只有作答中才允许修改答题表
    pub fn accepts_answers(self) -> bool {
        self == SubmissionStatus::Answering
    }
}

/// 提交的触发来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTrigger {
    /// 用户点击提交
    Manual,
    /// 倒计时归零，跳过确认
    Expired,
}

/// 一次提交尝试的凭据，用于把异步结果对应回发起它的那次提交
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionTicket {
    attempt: u32,
}

impl SubmissionTicket {
    pub fn attempt(&self) -> u32 {
        self.attempt
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitDecision {
    /// 需要用户确认仍有未答题目
    NeedsConfirmation { unanswered: usize },
    /// 进入 submitting，调用方应发起外部提交
    Begin(SubmissionTicket),
    /// 已在提交中或已提交，忽略本次触发
    Ignored,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    Submitted(SubmissionAck),
    /// 已回到 answering，可重试
    Failed { message: String, retryable: bool },
    /// 结果不属于当前这次提交
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: SubmissionStatus,
    pub to: SubmissionStatus,
}

#[derive(Debug)]
pub struct SubmissionCoordinator {
    status: SubmissionStatus,
    attempts: u32,
    in_flight: Option<SubmissionTicket>,
    last_failure: Option<String>,
    transitions: Vec<Transition>,
}

impl Default for SubmissionCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmissionCoordinator {
    pub fn new() -> Self {
        Self {
            status: SubmissionStatus::Answering,
            attempts: 0,
            in_flight: None,
            last_failure: None,
            transitions: Vec::new(),
        }
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// 最近一次提交失败的提示（下次成功提交后清空）
    pub fn last_failure(&self) -> Option<&str> {
        self.last_failure.as_deref()
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// 处理一次提交请求
    ///
    /// - `answered` / `total`: 已答题数 / 总题数
    /// - `time_left`: 倒计时是否仍有剩余时间
    pub fn request_submit(
        &mut self,
        trigger: SubmitTrigger,
        answered: usize,
        total: usize,
        time_left: bool,
    ) -> SubmitDecision {
        match (self.status, trigger) {
            (SubmissionStatus::Answering, SubmitTrigger::Manual) => {
                let unanswered = total.saturating_sub(answered);
                if unanswered > 0 && time_left {
                    self.transition(SubmissionStatus::Confirming);
                    SubmitDecision::NeedsConfirmation { unanswered }
                } else {
                    SubmitDecision::Begin(self.begin())
                }
            }
            (SubmissionStatus::Answering, SubmitTrigger::Expired)
            | (SubmissionStatus::Confirming, SubmitTrigger::Expired) => {
                info!("⏰ 时间到，自动提交");
                SubmitDecision::Begin(self.begin())
            }
            (status, trigger) => {
                debug!("忽略提交触发 {:?} (当前状态: {:?})", trigger, status);
                SubmitDecision::Ignored
            }
        }
    }

    /// 用户确认带着未答题目提交
    pub fn confirm(&mut self) -> SubmitDecision {
        if self.status != SubmissionStatus::Confirming {
            return SubmitDecision::Ignored;
        }
        SubmitDecision::Begin(self.begin())
    }

    /// 用户取消提交，答题表不变
    pub fn decline(&mut self) -> bool {
        if self.status != SubmissionStatus::Confirming {
            return false;
        }
        self.transition(SubmissionStatus::Answering);
        true
    }

    /// 外部提交返回后调用
    pub fn complete(
        &mut self,
        ticket: SubmissionTicket,
        result: Result<SubmissionAck, AppError>,
    ) -> SubmissionOutcome {
        if self.status != SubmissionStatus::Submitting || self.in_flight != Some(ticket) {
            warn!(
                "忽略过期的提交结果 (第 {} 次, 当前状态: {:?})",
                ticket.attempt, self.status
            );
            return SubmissionOutcome::Stale;
        }
        self.in_flight = None;

        match result {
            Ok(ack) => {
                self.last_failure = None;
                self.transition(SubmissionStatus::Submitted);
                SubmissionOutcome::Submitted(ack)
            }
            Err(e) => {
                let message = e.user_message();
                let retryable = e.is_retryable();
                warn!("❌ 第 {} 次提交失败: {}", ticket.attempt, e);
                self.last_failure = Some(message.clone());
                self.transition(SubmissionStatus::Failed);
                self.transition(SubmissionStatus::Answering);
                SubmissionOutcome::Failed { message, retryable }
            }
        }
    }

    fn begin(&mut self) -> SubmissionTicket {
        self.attempts += 1;
        let ticket = SubmissionTicket {
            attempt: self.attempts,
        };
        self.in_flight = Some(ticket);
        self.transition(SubmissionStatus::Submitting);
        ticket
    }

    fn transition(&mut self, to: SubmissionStatus) {
        debug!("提交状态: {:?} → {:?}", self.status, to);
        self.transitions.push(Transition {
            from: self.status,
            to,
        });
        self.status = to;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    fn network_error() -> AppError {
        AppError::Api(ApiError::BadResponse {
            endpoint: "/quizzes/q1/submit".to_string(),
            status: 502,
            message: None,
        })
    }

    #[test]
    fn incomplete_manual_submit_asks_for_confirmation() {
        let mut c = SubmissionCoordinator::new();
        assert_eq!(
            c.request_submit(SubmitTrigger::Manual, 2, 5, true),
            SubmitDecision::NeedsConfirmation { unanswered: 3 }
        );
        assert_eq!(c.status(), SubmissionStatus::Confirming);

        assert!(c.decline());
        assert_eq!(c.status(), SubmissionStatus::Answering);
    }

    #[test]
    fn confirm_begins_submission() {
        let mut c = SubmissionCoordinator::new();
        c.request_submit(SubmitTrigger::Manual, 0, 3, true);
        assert!(matches!(c.confirm(), SubmitDecision::Begin(_)));
        assert_eq!(c.status(), SubmissionStatus::Submitting);
        assert_eq!(c.confirm(), SubmitDecision::Ignored);
    }

    #[test]
    fn complete_manual_submit_skips_confirmation() {
        let mut c = SubmissionCoordinator::new();
        assert!(matches!(
            c.request_submit(SubmitTrigger::Manual, 3, 3, true),
            SubmitDecision::Begin(_)
        ));
    }

    #[test]
    fn no_confirmation_once_time_is_up() {
        let mut c = SubmissionCoordinator::new();
        assert!(matches!(
            c.request_submit(SubmitTrigger::Manual, 1, 3, false),
            SubmitDecision::Begin(_)
        ));
    }

    #[test]
    fn expiry_during_confirmation_submits() {
        let mut c = SubmissionCoordinator::new();
        c.request_submit(SubmitTrigger::Manual, 1, 3, true);
        assert!(matches!(
            c.request_submit(SubmitTrigger::Expired, 1, 3, false),
            SubmitDecision::Begin(_)
        ));
    }

    #[test]
    fn second_trigger_while_submitting_is_ignored() {
        let mut c = SubmissionCoordinator::new();
        let first = c.request_submit(SubmitTrigger::Manual, 3, 3, true);
        assert!(matches!(first, SubmitDecision::Begin(_)));
        assert_eq!(
            c.request_submit(SubmitTrigger::Manual, 3, 3, true),
            SubmitDecision::Ignored
        );
        assert_eq!(
            c.request_submit(SubmitTrigger::Expired, 3, 3, false),
            SubmitDecision::Ignored
        );
        assert_eq!(c.attempts(), 1);
    }

    #[test]
    fn failure_returns_to_answering_via_failed() {
        let mut c = SubmissionCoordinator::new();
        let SubmitDecision::Begin(ticket) = c.request_submit(SubmitTrigger::Manual, 3, 3, true)
        else {
            panic!("expected submission to begin");
        };

        let outcome = c.complete(ticket, Err(network_error()));
        assert!(matches!(
            outcome,
            SubmissionOutcome::Failed {
                retryable: true,
                ..
            }
        ));
        assert_eq!(c.status(), SubmissionStatus::Answering);
        assert!(c.last_failure().is_some());

        let tail: Vec<_> = c.transitions().iter().rev().take(2).map(|t| t.to).collect();
        assert_eq!(
            tail,
            vec![SubmissionStatus::Answering, SubmissionStatus::Failed]
        );
    }

    #[test]
    fn stale_result_is_ignored() {
        let mut c = SubmissionCoordinator::new();
        let SubmitDecision::Begin(first) = c.request_submit(SubmitTrigger::Manual, 3, 3, true)
        else {
            panic!("expected submission to begin");
        };
        c.complete(first, Err(network_error()));

        let SubmitDecision::Begin(second) = c.request_submit(SubmitTrigger::Manual, 3, 3, true)
        else {
            panic!("expected retry to begin");
        };
        assert_eq!(
            c.complete(first, Ok(SubmissionAck::default())),
            SubmissionOutcome::Stale
        );
        assert!(matches!(
            c.complete(second, Ok(SubmissionAck::default())),
            SubmissionOutcome::Submitted(_)
        ));
        assert_eq!(c.status(), SubmissionStatus::Submitted);
        assert!(c.last_failure().is_none());
    }
}
