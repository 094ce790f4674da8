//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责应用生命周期和事件调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 选择后端、加载作答、输出结果和作答记录
//!
//! ### `runner` - 会话事件循环
//! - 多路等待节拍、用户命令、进行中的提交
//! - 唯一修改 `QuizSession` 的地方
//!
//! ### `console` - 命令行展示
//! - 解析命令、渲染题目和提示
//!
//! ## 层次关系
//!
//! ```text
//! app (生命周期)
//!     ↓
//! runner (一次作答的事件循环)
//!     ↓
//! workflow::AttemptFlow (加载 / 提交 / 成绩)
//!     ↓
//! session (纯状态机) + clients (QuizApi)
//!     ↓
//! infrastructure (ApiClient / TickScheduler)
//! ```

pub mod app;
pub mod console;
pub mod runner;

pub use app::App;
pub use console::ConsoleView;
pub use runner::{Notice, RunOutcome, SessionCommand, SessionRunner, SessionView};
