//! 命令行展示层
//!
//! 按行读取用户命令，把会话变化打印到标准输出。日志走 stderr。

use crate::error::AppError;
use crate::models::{LeaderboardEntry, QuizResult, SubmissionAck};
use crate::orchestrator::runner::{Notice, SessionCommand, SessionView};
use crate::session::{IgnoreReason, QuizSession, SubmissionStatus, SubmitTrigger};
use crate::utils::logging::format_clock;
use std::io::BufRead;
use tokio::sync::mpsc;
use tracing::debug;

pub const HELP: &str = "命令: n 下一题 | p 上一题 | g <题号> 跳转 | a <选项号> 作答 | s 提交 | y 确认 | no 取消 | ? 状态 | q 离开";

/// 解析一行用户输入；题号和选项号从 1 开始
pub fn parse_command(line: &str) -> Option<SessionCommand> {
    let mut parts = line.split_whitespace();
    let head = parts.next()?.to_ascii_lowercase();
    let arg = parts.next().and_then(|v| v.parse::<usize>().ok());

    match (head.as_str(), arg) {
        ("n" | "next", _) => Some(SessionCommand::Next),
        ("p" | "prev" | "previous", _) => Some(SessionCommand::Previous),
        ("g" | "goto", Some(n)) if n > 0 => Some(SessionCommand::Jump(n - 1)),
        ("a" | "answer", Some(n)) if n > 0 => Some(SessionCommand::Select(n - 1)),
        ("s" | "submit", _) => Some(SessionCommand::Submit),
        ("y" | "yes", _) => Some(SessionCommand::Confirm),
        ("no" | "cancel", _) => Some(SessionCommand::Decline),
        ("?" | "status", _) => Some(SessionCommand::Status),
        ("q" | "quit" | "leave", _) => Some(SessionCommand::Leave),
        // 直接输入数字视为作答
        (digits, None) => digits
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .map(|n| SessionCommand::Select(n - 1)),
        _ => None,
    }
}

/// 在独立线程中读取标准输入
///
/// 标准输入结束时丢弃发送端，事件循环会把它当作离开页面。
pub fn spawn_stdin_reader(tx: mpsc::Sender<SessionCommand>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match parse_command(&line) {
                Some(command) => {
                    if tx.blocking_send(command).is_err() {
                        break;
                    }
                }
                None if line.trim().is_empty() => {}
                None => println!("{}", HELP),
            }
        }
        debug!("标准输入已结束");
    });
}

/// 选择被忽略时的提示
fn ignored_message(session: &QuizSession, reason: IgnoreReason) -> &'static str {
    match (reason, session.status()) {
        (IgnoreReason::NotAnswering, SubmissionStatus::Confirming) => "请先确认或取消提交 (y / no)",
        (IgnoreReason::NotAnswering, _) => "正在提交，答案已锁定",
        (IgnoreReason::UnknownOption, _) => "没有这个选项",
        _ => "无法作答",
    }
}

/// 终端视图
#[derive(Debug, Default)]
pub struct ConsoleView;

impl ConsoleView {
    pub fn new() -> Self {
        Self
    }

    fn print_question(&self, session: &QuizSession) {
        let view = session.current_view();
        println!();
        println!(
            "第 {}/{} 题  进度 {:.0}%  已答 {}/{}",
            view.index + 1,
            view.total,
            session.progress_fraction() * 100.0,
            session.answered_count(),
            session.question_count()
        );
        println!("{}", view.prompt);
        for (i, option) in view.options.iter().enumerate() {
            let mark = if view.selected.as_deref() == Some(option.as_str()) {
                "●"
            } else {
                "○"
            };
            println!("  {} {}. {}", mark, i + 1, option);
        }
        if view.is_last() {
            println!("(最后一题，输入 s 提交)");
        }
    }

    fn print_clock(&self, session: &QuizSession) {
        if let Some(remaining) = session.remaining_seconds() {
            let warn = if session.is_low_time() { " ⚠️" } else { "" };
            println!("⏱️ 剩余时间 {}{}", format_clock(remaining), warn);
        }
    }

    /// 加载失败时的终止展示
    pub fn quiz_unavailable(err: &AppError) {
        println!();
        println!("测验不可用");
        println!("该测验可能未激活或不存在: {}", err);
    }

    /// 结果页（以服务端成绩为准）
    pub fn results(ack: &SubmissionAck, result: Option<&QuizResult>, board: &[LeaderboardEntry]) {
        println!();
        println!("{}", "=".repeat(40));
        match (result, ack.score) {
            (Some(r), _) => {
                println!("得分: {:.1}", r.score);
                println!("正确: {}/{}", r.correct_answers, r.total_questions);
                if let Some(at) = r.submitted_at {
                    println!("提交时间: {}", at.format("%Y-%m-%d %H:%M"));
                }
            }
            (None, Some(score)) => println!("得分: {:.1}", score),
            (None, None) => println!("已提交，成绩待公布"),
        }
        if let Some(msg) = &ack.message {
            println!("{}", msg);
        }
        if !board.is_empty() {
            println!("{}", "-".repeat(40));
            println!("排行榜");
            for (i, entry) in board.iter().enumerate() {
                println!(
                    "{:>2}. {} {:.1} ({}/{})",
                    i + 1,
                    entry.student.name,
                    entry.score,
                    entry.total_correct,
                    entry.total_questions
                );
            }
        }
        println!("{}", "=".repeat(40));
    }
}

impl SessionView for ConsoleView {
    fn show(&mut self, session: &QuizSession, notice: Notice<'_>) {
        match notice {
            Notice::Question => {
                self.print_question(session);
            }
            Notice::Boundary => println!("已经到头了"),
            Notice::Answered => {
                let view = session.current_view();
                println!(
                    "✓ 已选择: {}  (已答 {}/{})",
                    view.selected.unwrap_or_default(),
                    session.answered_count(),
                    session.question_count()
                );
            }
            Notice::Ignored(reason) => println!("{}", ignored_message(session, reason)),
            Notice::Tick { remaining } => {
                // 每整分钟和最后 10 秒提示一次
                if remaining % 60 == 0 || remaining <= 10 {
                    self.print_clock(session);
                }
            }
            Notice::TimeUp => println!("⏰ 时间到！"),
            Notice::ConfirmUnanswered { unanswered } => {
                println!("还有 {} 题未作答，确定要提交吗？(y / no)", unanswered);
            }
            Notice::Submitting { trigger } => match trigger {
                SubmitTrigger::Manual => println!("提交中..."),
                SubmitTrigger::Expired => println!("自动提交中..."),
            },
            Notice::SubmitIgnored => println!("提交中，请稍候"),
            Notice::SubmissionFailed { message } => {
                println!("❌ 提交失败: {}。答案已保留，输入 s 重试。", message);
            }
            Notice::Submitted(_) => println!("✅ 提交成功！"),
            Notice::Status => {
                self.print_clock(session);
                self.print_question(session);
            }
            Notice::Left => println!("已离开测验，未提交"),
        }
    }
}
