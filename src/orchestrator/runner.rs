//! 会话事件循环 - 编排层
//!
//! ## 职责
//!
//! 在单个任务里驱动一次作答，`tokio::select!` 同时等待三类事件：
//!
//! 1. **节拍**：`TickScheduler` 每次只挂一个节拍，会话计时中才重新挂上
//! 2. **用户命令**：来自展示层的 [`SessionCommand`]
//! 3. **进行中的提交**：最多一个，完成后结果交回会话
//!
//! 会话的所有状态只在这里被修改，不需要锁。命令通道关闭等同于离开页面：
//! 取消倒计时、丢弃会话、不提交。

use crate::error::AppResult;
use crate::infrastructure::TickScheduler;
use crate::models::SubmissionAck;
use crate::session::{
    IgnoreReason, QuizSession, SelectOutcome, SessionTick, SubmissionOutcome, SubmissionRequest,
    SubmissionTicket, SubmitStep, SubmitTrigger,
};
use crate::workflow::attempt_flow::PendingSubmission;
use crate::workflow::AttemptFlow;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// 展示层发来的用户操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Next,
    Previous,
    /// 跳到第 n 题（从 0 开始）
    Jump(usize),
    /// 为当前题目选择第 n 个选项（从 0 开始）
    Select(usize),
    Submit,
    Confirm,
    Decline,
    Status,
    Leave,
}

/// 需要展示给用户的变化
#[derive(Debug, Clone, Copy)]
pub enum Notice<'a> {
    /// 当前题目（导航或重新渲染）
    Question,
    /// 已在第一题/最后一题
    Boundary,
    Answered,
    Ignored(IgnoreReason),
    Tick { remaining: u32 },
    TimeUp,
    ConfirmUnanswered { unanswered: usize },
    Submitting { trigger: SubmitTrigger },
    /// 已在提交中或已提交
    SubmitIgnored,
    SubmissionFailed { message: &'a str },
    Submitted(&'a SubmissionAck),
    Status,
    Left,
}

/// 展示层接口
pub trait SessionView {
    fn show(&mut self, session: &QuizSession, notice: Notice<'_>);
}

/// 一次作答的结局
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Submitted(SubmissionAck),
    Left,
}

pub struct SessionRunner<V: SessionView> {
    flow: AttemptFlow,
    view: V,
    tick_interval: Duration,
}

impl<V: SessionView> SessionRunner<V> {
    pub fn new(flow: AttemptFlow, view: V, tick_interval: Duration) -> Self {
        Self {
            flow,
            view,
            tick_interval,
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// 运行到提交成功或离开为止
    pub async fn run(
        &mut self,
        mut session: QuizSession,
        commands: &mut mpsc::Receiver<SessionCommand>,
    ) -> AppResult<RunOutcome> {
        let mut scheduler = TickScheduler::new(self.tick_interval);
        if session.is_timer_running() {
            scheduler.arm();
        }
        let mut pending: Option<PendingSubmission> = None;

        self.view.show(&session, Notice::Question);

        loop {
            tokio::select! {
                () = scheduler.fired() => {
                    match session.tick() {
                        SessionTick::Ticked { remaining } => {
                            self.view.show(&session, Notice::Tick { remaining });
                        }
                        SessionTick::AutoSubmit(request) => {
                            self.view.show(&session, Notice::TimeUp);
                            pending = Some(self.begin(&session, request));
                        }
                        SessionTick::ExpiredWhileSubmitting => {
                            self.view.show(&session, Notice::TimeUp);
                        }
                        SessionTick::Idle => {}
                    }
                    if session.is_timer_running() {
                        scheduler.arm();
                    }
                }
                (ticket, result) = wait_pending(&mut pending) => {
                    pending = None;
                    match session.finish_submission(ticket, result) {
                        SubmissionOutcome::Submitted(ack) => {
                            scheduler.cancel();
                            self.view.show(&session, Notice::Submitted(&ack));
                            return Ok(RunOutcome::Submitted(ack));
                        }
                        SubmissionOutcome::Failed { message, .. } => {
                            scheduler.cancel();
                            self.view.show(&session, Notice::SubmissionFailed { message: &message });
                        }
                        SubmissionOutcome::Stale => {}
                    }
                }
                command = commands.recv() => {
                    match command {
                        None | Some(SessionCommand::Leave) => {
                            if pending.take().is_some() {
                                warn!("离开页面，放弃进行中的提交");
                            }
                            scheduler.cancel();
                            session.teardown();
                            self.view.show(&session, Notice::Left);
                            return Ok(RunOutcome::Left);
                        }
                        Some(command) => {
                            if let Some(request) = self.apply(&mut session, command) {
                                pending = Some(self.begin(&session, request));
                            }
                        }
                    }
                }
            }
        }
    }

    fn begin(&mut self, session: &QuizSession, request: SubmissionRequest) -> PendingSubmission {
        self.view.show(
            session,
            Notice::Submitting {
                trigger: request.trigger,
            },
        );
        self.flow.start_submission(request)
    }

    /// 执行一条用户命令，需要发起提交时返回请求
    fn apply(
        &mut self,
        session: &mut QuizSession,
        command: SessionCommand,
    ) -> Option<SubmissionRequest> {
        debug!("命令: {:?}", command);
        match command {
            SessionCommand::Next => self.navigated(session, |s| s.next()),
            SessionCommand::Previous => self.navigated(session, |s| s.previous()),
            SessionCommand::Jump(index) => self.navigated(session, |s| s.jump_to(index)),
            SessionCommand::Select(option) => {
                let notice = match session.select_option(option) {
                    SelectOutcome::Recorded => Notice::Answered,
                    SelectOutcome::Ignored(reason) => Notice::Ignored(reason),
                };
                self.view.show(session, notice);
                None
            }
            SessionCommand::Submit => {
                let step = session.request_submit();
                self.submit_step(session, step)
            }
            SessionCommand::Confirm => {
                let step = session.confirm_submit();
                self.submit_step(session, step)
            }
            SessionCommand::Decline => {
                if session.decline_submit() {
                    info!("↩️ 取消提交，继续作答");
                }
                self.view.show(session, Notice::Question);
                None
            }
            SessionCommand::Status => {
                self.view.show(session, Notice::Status);
                None
            }
            // 在 run 中处理
            SessionCommand::Leave => None,
        }
    }

    fn navigated(
        &mut self,
        session: &mut QuizSession,
        step: impl FnOnce(&mut QuizSession) -> bool,
    ) -> Option<SubmissionRequest> {
        let notice = if step(session) {
            Notice::Question
        } else {
            Notice::Boundary
        };
        self.view.show(session, notice);
        None
    }

    fn submit_step(&mut self, session: &QuizSession, step: SubmitStep) -> Option<SubmissionRequest> {
        match step {
            SubmitStep::NeedsConfirmation { unanswered } => {
                self.view
                    .show(session, Notice::ConfirmUnanswered { unanswered });
                None
            }
            SubmitStep::Submit(request) => Some(request),
            SubmitStep::Ignored => {
                self.view.show(session, Notice::SubmitIgnored);
                None
            }
        }
    }
}

/// 等待进行中的提交；没有时永不完成
async fn wait_pending(
    pending: &mut Option<PendingSubmission>,
) -> (SubmissionTicket, AppResult<SubmissionAck>) {
    match pending.as_mut() {
        Some(submission) => submission.await,
        None => std::future::pending().await,
    }
}
