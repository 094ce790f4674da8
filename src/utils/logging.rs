/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::workflow::AttemptCtx;
use std::fs::{self, OpenOptions};
use std::io::Write;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化 tracing 日志（输出到 stderr，终端界面使用 stdout）
///
/// 优先使用 `RUST_LOG`，否则按 `verbose` 选择 debug / info。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> AppResult<()> {
    if std::path::Path::new(log_file_path).exists() {
        return Ok(());
    }
    let log_header = format!(
        "{}\n测验作答日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header).map_err(|e| write_failed(log_file_path, e))
}

/// 追加一条作答记录
///
/// # 参数
/// - `log_file_path`: 日志文件路径
/// - `ctx`: 作答上下文
/// - `summary`: 结果摘要
pub fn record_attempt(log_file_path: &str, ctx: &AttemptCtx, summary: &str) -> AppResult<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)
        .map_err(|e| write_failed(log_file_path, e))?;

    let line = format!(
        "{} {} {}\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        ctx,
        summary
    );
    file.write_all(line.as_bytes())
        .map_err(|e| write_failed(log_file_path, e))
}

fn write_failed(path: &str, source: std::io::Error) -> AppError {
    AppError::File(crate::error::FileError::WriteFailed {
        path: path.to_string(),
        source,
    })
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 测验作答客户端");
    match &config.offline_fixture {
        Some(path) => info!("📁 离线模式: {}", path),
        None => info!("🌐 后端地址: {}", config.api_base_url),
    }
    info!("{}", "=".repeat(60));
}

/// 把秒数格式化为 `m:ss`
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
