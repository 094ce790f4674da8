//! HTTP 客户端 - 基础设施层
//!
//! 持有唯一的 reqwest::Client，只暴露"带鉴权发 JSON 请求"的能力

use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// 鉴权 API 客户端
///
/// 职责：
/// - 持有唯一的 Client 资源
/// - 给每个请求附加 `Authorization: Bearer <token>`
/// - 把非 2xx 响应映射为 [`ApiError`]
/// - 不认识 Quiz / Question
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

/// 错误响应体中的提示字段
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl ApiClient {
    /// 根据配置创建客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        Self::with_settings(
            &config.api_base_url,
            config.auth_token.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn with_settings(
        base_url: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::api_request_failed(base_url, e))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET 并反序列化响应
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let request = self.client.get(self.url(path));
        self.send(path, request).await
    }

    /// POST JSON 并反序列化响应
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.client.post(self.url(path)).json(body);
        self.send(path, request).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send<T: DeserializeOwned>(&self, path: &str, request: RequestBuilder) -> AppResult<T> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(path, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::api_request_failed(path, e))?;

        debug!("{} {} → {}", status.as_u16(), path, body);

        if status.is_success() {
            return Ok(serde_json::from_str(&body)?);
        }

        Err(map_error_status(path, status, &body).into())
    }
}

fn map_error_status(path: &str, status: StatusCode, body: &str) -> ApiError {
    let endpoint = path.to_string();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized { endpoint },
        StatusCode::NOT_FOUND => ApiError::NotFound { endpoint },
        _ => {
            let message = serde_json::from_str::<ErrorBody>(body)
                .ok()
                .and_then(|b| b.message.or(b.error));
            ApiError::BadResponse {
                endpoint,
                status: status.as_u16(),
                message,
            }
        }
    }
}
