//! # Quiz Session
//!
//! 学生端限时测验作答客户端
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源，只暴露能力
//! - `ApiClient` - 唯一的 HTTP client owner，负责鉴权和错误映射
//! - `TickScheduler` - 可重复挂载的单次节拍
//!
//! ### ② 接口层（Clients）
//! - `clients/` - `QuizApi` 抽象及其实现
//! - `QuizClient` - REST 后端
//! - `OfflineQuizApi` - 离线 TOML 测验
//!
//! ### ③ 会话层（Session）
//! - `session/` - 一次作答的纯状态机，不做 I/O
//! - 答题表、导航器、倒计时、提交协调器
//!
//! ### ④ 流程层（Workflow）
//! - `workflow/` - 加载测验 → 创建会话；提交请求 → 后端 → 结果回报
//!
//! ### ⑤ 编排层（Orchestration）
//! - `orchestrator/` - 应用生命周期和单线程事件循环
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod session;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{OfflineQuizApi, QuizApi, QuizClient};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{Question, Quiz};
pub use orchestrator::{App, RunOutcome, SessionCommand, SessionRunner};
pub use session::QuizSession;
pub use workflow::{AttemptCtx, AttemptFlow};
