use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// API 调用错误
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    /// 测验加载错误
    #[error("加载错误: {0}")]
    Load(#[from] LoadError),
    /// 会话使用错误
    #[error("会话错误: {0}")]
    Session(#[from] SessionError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
}

/// API 调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络请求失败
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// API 返回错误响应
    #[error("API返回错误响应 ({endpoint}): status={status}, message={message:?}")]
    BadResponse {
        endpoint: String,
        status: u16,
        message: Option<String>,
    },
    /// 资源不存在
    #[error("资源不存在: {endpoint}")]
    NotFound { endpoint: String },
    /// 未授权（token 缺失或失效）
    #[error("未授权访问: {endpoint}")]
    Unauthorized { endpoint: String },
    /// JSON 解析失败
    #[error("JSON解析失败: {source}")]
    JsonParseFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// 测验加载错误（加载失败时展示"测验不可用"，不重试）
#[derive(Debug, Error)]
pub enum LoadError {
    /// 测验不存在
    #[error("测验不存在: {quiz_id}")]
    NotFound { quiz_id: String },
    /// 测验未激活
    #[error("测验未激活: {quiz_id}")]
    Inactive { quiz_id: String },
    /// 测验尚未开放
    #[error("测验 {quiz_id} 将于 {starts_on} 开放")]
    NotYetOpen {
        quiz_id: String,
        starts_on: chrono::DateTime<chrono::Utc>,
    },
    /// 测验没有题目
    #[error("测验 {quiz_id} 没有题目")]
    NoQuestions { quiz_id: String },
    /// 测验时长不合法
    #[error("测验 {quiz_id} 时长不合法: {duration} 分钟")]
    InvalidDuration { quiz_id: String, duration: u32 },
}

/// 会话使用错误（调用方误用）
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// 题目序列为空
    #[error("题目序列不能为空")]
    NoQuestions,
    /// 题目选项数量不足
    #[error("题目 {question_id} 只有 {count} 个选项，至少需要 2 个")]
    TooFewOptions { question_id: String, count: usize },
    /// 题目ID重复
    #[error("题目ID重复: {question_id}")]
    DuplicateQuestion { question_id: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 缺少必填配置项
    #[error("缺少配置项: {key}")]
    Missing { key: String },
    /// 配置值不合法
    #[error("配置项 {key} 不合法: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

// ========== 从常见错误类型转换 ==========

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let endpoint = err
            .url()
            .map(|u| u.path().to_string())
            .unwrap_or_default();
        if err.is_decode() {
            AppError::Api(ApiError::JsonParseFailed {
                source: Box::new(err),
            })
        } else {
            AppError::Api(ApiError::RequestFailed {
                endpoint,
                source: Box::new(err),
            })
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Api(ApiError::JsonParseFailed {
            source: Box::new(err),
        })
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::File(FileError::TomlParseFailed {
            path: String::new(), // TOML错误不包含路径信息
            source: err,
        })
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: String::new(),
            source: err,
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建API请求失败错误
    pub fn api_request_failed(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Api(ApiError::RequestFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建 TOML 解析错误
    pub fn toml_parse_failed(path: impl Into<String>, source: toml::de::Error) -> Self {
        AppError::File(FileError::TomlParseFailed {
            path: path.into(),
            source,
        })
    }

    /// 是否为可重试错误
    ///
    /// 网络失败和服务端错误可以重试；校验失败、未授权和加载错误不行。
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Api(ApiError::RequestFailed { .. }) => true,
            AppError::Api(ApiError::BadResponse { status, .. }) => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// 面向用户的简短提示
    pub fn user_message(&self) -> String {
        match self {
            AppError::Api(ApiError::BadResponse {
                message: Some(msg), ..
            }) => msg.clone(),
            AppError::Api(ApiError::Unauthorized { .. }) => "登录已失效，请重新登录".to_string(),
            AppError::Api(ApiError::RequestFailed { .. }) => "网络异常，请稍后重试".to_string(),
            other => other.to_string(),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_are_retryable() {
        let err = AppError::Api(ApiError::BadResponse {
            endpoint: "/quizzes/q1/submit".to_string(),
            status: 503,
            message: None,
        });
        assert!(err.is_retryable());
    }

    #[test]
    fn validation_errors_are_not_retryable() {
        let err = AppError::Api(ApiError::BadResponse {
            endpoint: "/quizzes/q1/submit".to_string(),
            status: 400,
            message: Some("answers missing".to_string()),
        });
        assert!(!err.is_retryable());
        assert_eq!(err.user_message(), "answers missing");
    }

    #[test]
    fn load_errors_are_not_retryable() {
        let err: AppError = LoadError::Inactive {
            quiz_id: "q1".to_string(),
        }
        .into();
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("q1"));
    }
}
