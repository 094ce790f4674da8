//! 作答流程 - 流程层
//!
//! 核心职责：定义"一次作答"在会话之外的部分
//!
//! 流程顺序：
//! 1. 并发获取测验详情和题目 → 检查是否可作答 → 创建会话
//! 2. 会话给出提交请求 → 调用后端提交 → 结果交回会话
//! 3. 提交成功后获取成绩和排行榜（以服务端为准）

use crate::clients::QuizApi;
use crate::error::{ApiError, AppError, AppResult, LoadError};
use crate::models::{Availability, LeaderboardEntry, QuizResult, SubmissionAck};
use crate::session::{QuizSession, SubmissionRequest, SubmissionTicket};
use crate::workflow::attempt_ctx::AttemptCtx;
use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use tracing::{error, info, warn};

/// 进行中的提交，完成时带回发起它的凭据
pub type PendingSubmission = BoxFuture<'static, (SubmissionTicket, AppResult<SubmissionAck>)>;

/// 作答流程
///
/// - 不持有会话，只负责和后端打交道
/// - 只依赖 [`QuizApi`]，不关心具体传输
#[derive(Clone)]
pub struct AttemptFlow {
    api: Arc<dyn QuizApi>,
}

impl AttemptFlow {
    pub fn new(api: Arc<dyn QuizApi>) -> Self {
        Self { api }
    }

    /// 加载测验并创建会话
    pub async fn load(&self, ctx: &AttemptCtx) -> AppResult<QuizSession> {
        self.load_at(ctx, Utc::now()).await
    }

    /// 以指定时间判断开放状态并创建会话
    pub async fn load_at(&self, ctx: &AttemptCtx, now: DateTime<Utc>) -> AppResult<QuizSession> {
        info!("{} 📥 正在加载测验...", ctx);

        let (quiz, questions) = tokio::try_join!(
            self.api.fetch_quiz(&ctx.quiz_id),
            self.api.fetch_questions(&ctx.quiz_id)
        )
        .map_err(|e| {
            error!("{} ❌ 测验加载失败: {}", ctx, e);
            not_found_as_load_error(e, &ctx.quiz_id)
        })?;

        if quiz.duration == 0 {
            return Err(LoadError::InvalidDuration {
                quiz_id: ctx.quiz_id.clone(),
                duration: quiz.duration,
            }
            .into());
        }

        match quiz.availability(now) {
            Availability::Open => {}
            Availability::Inactive => {
                warn!("{} ⚠️ 测验未激活", ctx);
                return Err(LoadError::Inactive {
                    quiz_id: ctx.quiz_id.clone(),
                }
                .into());
            }
            Availability::NotYetOpen(starts_on) => {
                warn!("{} ⚠️ 测验尚未开放 ({})", ctx, starts_on);
                return Err(LoadError::NotYetOpen {
                    quiz_id: ctx.quiz_id.clone(),
                    starts_on,
                }
                .into());
            }
        }

        if questions.is_empty() {
            warn!("{} ⚠️ 测验没有题目", ctx);
            return Err(LoadError::NoQuestions {
                quiz_id: ctx.quiz_id.clone(),
            }
            .into());
        }

        info!(
            "{} ✓ 加载完成: {} ({} 题, {} 分钟)",
            ctx,
            quiz.title,
            questions.len(),
            quiz.duration
        );

        Ok(QuizSession::new(quiz, questions)?)
    }

    /// 把提交请求变成可独立轮询的 future
    ///
    /// 事件循环持有它，同时继续处理节拍和用户输入。
    pub fn start_submission(&self, request: SubmissionRequest) -> PendingSubmission {
        let api = Arc::clone(&self.api);
        async move {
            info!(
                "📤 第 {} 次提交 ({:?}, {} 个答案)",
                request.ticket.attempt(),
                request.trigger,
                request.answers.len()
            );
            let result = api
                .submit_answers(&request.quiz_id, &request.answers)
                .await;
            (request.ticket, result)
        }
        .boxed()
    }

    /// 获取成绩
    pub async fn fetch_results(&self, ctx: &AttemptCtx) -> AppResult<QuizResult> {
        self.api.fetch_results(&ctx.quiz_id).await
    }

    /// 获取排行榜
    pub async fn fetch_leaderboard(&self, ctx: &AttemptCtx) -> AppResult<Vec<LeaderboardEntry>> {
        self.api.fetch_leaderboard(&ctx.quiz_id).await
    }

    pub fn api(&self) -> &Arc<dyn QuizApi> {
        &self.api
    }
}

fn not_found_as_load_error(err: AppError, quiz_id: &str) -> AppError {
    match err {
        AppError::Api(ApiError::NotFound { .. }) => LoadError::NotFound {
            quiz_id: quiz_id.to_string(),
        }
        .into(),
        other => other,
    }
}
