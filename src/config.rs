use crate::error::{AppError, AppResult, ConfigError};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

/// 默认配置文件路径
pub const DEFAULT_CONFIG_FILE: &str = "quiz_client.toml";

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- 后端 API 配置 ---
    pub api_base_url: String,
    /// 登录后获得的 Bearer token
    pub auth_token: Option<String>,
    /// 请求超时（秒）
    pub request_timeout_secs: u64,
    // --- 测验选择 ---
    pub classroom_id: Option<String>,
    pub quiz_id: Option<String>,
    /// 离线题目文件（设置后不访问后端）
    pub offline_fixture: Option<String>,
    /// 倒计时节拍间隔（毫秒）
    pub tick_interval_ms: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000/api".to_string(),
            auth_token: None,
            request_timeout_secs: 15,
            classroom_id: None,
            quiz_id: None,
            offline_fixture: None,
            tick_interval_ms: 1000,
            verbose_logging: false,
            output_log_file: "quiz_attempts.log".to_string(),
        }
    }
}

impl Config {
    /// 读取配置文件（如果存在），再用环境变量覆盖
    ///
    /// 配置文件路径取自 `QUIZ_CONFIG`，默认为 `quiz_client.toml`。
    pub fn load() -> AppResult<Self> {
        let path = std::env::var("QUIZ_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let base = if Path::new(&path).exists() {
            Self::from_toml_file(&path)?
        } else {
            Self::default()
        };
        let config = base.with_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// 从 TOML 文件读取配置
    pub fn from_toml_file(path: &str) -> AppResult<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| AppError::file_read_failed(path, e))?;
        toml::from_str(&content).map_err(|e| AppError::toml_parse_failed(path, e))
    }

    /// 环境变量覆盖配置文件；无法解析的值直接报错
    fn with_env_overrides(self) -> AppResult<Self> {
        let env = |name: &str| std::env::var(name).ok();
        let timeout = parse_env("QUIZ_REQUEST_TIMEOUT_SECS", env("QUIZ_REQUEST_TIMEOUT_SECS"), "u64")?;
        let tick = parse_env("QUIZ_TICK_INTERVAL_MS", env("QUIZ_TICK_INTERVAL_MS"), "u64")?;
        let verbose = parse_env("VERBOSE_LOGGING", env("VERBOSE_LOGGING"), "bool")?;

        Ok(Self {
            api_base_url: env("QUIZ_API_BASE_URL").unwrap_or(self.api_base_url),
            auth_token: env("QUIZ_AUTH_TOKEN").or(self.auth_token),
            request_timeout_secs: timeout.unwrap_or(self.request_timeout_secs),
            classroom_id: env("QUIZ_CLASSROOM_ID").or(self.classroom_id),
            quiz_id: env("QUIZ_ID").or(self.quiz_id),
            offline_fixture: env("QUIZ_OFFLINE_FIXTURE").or(self.offline_fixture),
            tick_interval_ms: tick.unwrap_or(self.tick_interval_ms),
            verbose_logging: verbose.unwrap_or(self.verbose_logging),
            output_log_file: env("OUTPUT_LOG_FILE").unwrap_or(self.output_log_file),
        })
    }

    fn validate(&self) -> AppResult<()> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "tick_interval_ms".to_string(),
                reason: "必须大于 0".to_string(),
            }
            .into());
        }
        if self.offline_fixture.is_none() && self.api_base_url.trim().is_empty() {
            return Err(ConfigError::Missing {
                key: "api_base_url".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// 解析一个环境变量的值；未设置时返回 `None`
fn parse_env<T: FromStr>(
    var_name: &str,
    raw: Option<String>,
    expected_type: &str,
) -> AppResult<Option<T>> {
    match raw {
        None => Ok(None),
        Some(value) => match value.trim().parse() {
            Ok(parsed) => Ok(Some(parsed)),
            Err(_) => Err(ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }
            .into()),
        },
    }
}
