//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：日志文件、选择后端（REST 或离线文件）
//! 2. **选择测验**：未配置测验ID时列出班级测验
//! 3. **加载作答**：失败时展示"测验不可用"后结束，不重试
//! 4. **运行会话**：标准输入作为命令源，交给 `SessionRunner`
//! 5. **结果页**：提交成功后从服务端获取成绩和排行榜

use crate::clients::{OfflineQuizApi, QuizApi, QuizClient};
use crate::config::Config;
use crate::error::{AppResult, ConfigError};
use crate::orchestrator::console::{self, ConsoleView, HELP};
use crate::orchestrator::runner::{RunOutcome, SessionRunner};
use crate::utils::logging::{init_log_file, log_startup, record_attempt};
use crate::workflow::{AttemptCtx, AttemptFlow};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    flow: AttemptFlow,
    /// 离线模式下文件自带的测验ID
    fixture_quiz_id: Option<String>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> AppResult<Self> {
        init_log_file(&config.output_log_file)?;
        log_startup(&config);

        let (api, fixture_quiz_id): (Arc<dyn QuizApi>, Option<String>) =
            match &config.offline_fixture {
                Some(path) => {
                    let offline = OfflineQuizApi::from_file(Path::new(path)).await?;
                    let quiz_id = offline.quiz_id().to_string();
                    (Arc::new(offline), Some(quiz_id))
                }
                None => (Arc::new(QuizClient::new(&config)?), None),
            };

        Ok(Self {
            config,
            flow: AttemptFlow::new(api),
            fixture_quiz_id,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> AppResult<()> {
        let Some(quiz_id) = self.config.quiz_id.clone().or_else(|| self.fixture_quiz_id.clone())
        else {
            return self.list_quizzes().await;
        };
        let ctx = AttemptCtx::new(self.config.classroom_id.clone(), quiz_id);

        let session = match self.flow.load(&ctx).await {
            Ok(session) => session,
            Err(e) => {
                ConsoleView::quiz_unavailable(&e);
                record_attempt(&self.config.output_log_file, &ctx, &format!("不可用: {}", e))?;
                return Ok(());
            }
        };

        println!("{}", HELP);

        let (tx, mut rx) = mpsc::channel(32);
        console::spawn_stdin_reader(tx);

        let mut runner = SessionRunner::new(
            self.flow.clone(),
            ConsoleView::new(),
            Duration::from_millis(self.config.tick_interval_ms),
        );
        let outcome = runner.run(session, &mut rx).await?;

        let summary = match &outcome {
            RunOutcome::Submitted(ack) => {
                self.show_results(&ctx, ack).await;
                if ack.is_deferred() {
                    "已提交, 成绩待公布".to_string()
                } else {
                    format!("已提交, 得分 {:.1}", ack.score.unwrap_or_default())
                }
            }
            RunOutcome::Left => "离开, 未提交".to_string(),
        };

        info!("{} 📋 {}", ctx, summary);
        record_attempt(&self.config.output_log_file, &ctx, &summary)?;
        info!("日志已保存至: {}", self.config.output_log_file);

        Ok(())
    }

    /// 未指定测验时列出班级测验
    async fn list_quizzes(&self) -> AppResult<()> {
        let Some(classroom_id) = &self.config.classroom_id else {
            return Err(ConfigError::Missing {
                key: "quiz_id".to_string(),
            }
            .into());
        };

        let quizzes = self.flow.api().list_classroom_quizzes(classroom_id).await?;
        if quizzes.is_empty() {
            warn!("⚠️ 班级 {} 暂无测验", classroom_id);
            return Ok(());
        }

        println!("班级 {} 的测验:", classroom_id);
        for quiz in &quizzes {
            println!("  - {}", quiz);
        }
        println!("设置 QUIZ_ID 后重新运行以开始作答");
        Ok(())
    }

    /// 成绩和排行榜都以服务端为准，获取失败只影响展示
    async fn show_results(&self, ctx: &AttemptCtx, ack: &crate::models::SubmissionAck) {
        let result = match self.flow.fetch_results(ctx).await {
            Ok(result) => Some(result),
            Err(e) => {
                warn!("{} ⚠️ 成绩暂不可用: {}", ctx, e);
                None
            }
        };
        let board = self.flow.fetch_leaderboard(ctx).await.unwrap_or_else(|e| {
            error!("{} 排行榜获取失败: {}", ctx, e);
            Vec::new()
        });
        ConsoleView::results(ack, result.as_ref(), &board);
    }
}
