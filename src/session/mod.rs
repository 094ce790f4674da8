//! 会话层（Session Core）
//!
//! 一次测验作答的全部状态，纯同步、无 I/O：
//!
//! - `answer_ledger` - 答题表
//! - `navigator` - 题目导航
//! - `countdown` - 倒计时（外部节拍驱动）
//! - `coordinator` - 提交状态机
//! - `quiz_session` - 以上四者的组合

pub mod answer_ledger;
pub mod coordinator;
pub mod countdown;
pub mod navigator;
pub mod quiz_session;

pub use answer_ledger::AnswerLedger;
pub use coordinator::{
    SubmissionCoordinator, SubmissionOutcome, SubmissionStatus, SubmissionTicket, SubmitDecision,
    SubmitTrigger, Transition,
};
pub use countdown::{CountdownTimer, TickOutcome, LOW_TIME_THRESHOLD_SECS};
pub use navigator::QuestionNavigator;
pub use quiz_session::{
    IgnoreReason, QuizSession, SelectOutcome, SessionTick, SubmissionRequest, SubmitStep,
};
