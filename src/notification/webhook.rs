//! Discord Webhook 客户端模块
//!
//! 单次同步 POST，不重试，不复用连接。

use reqwest::blocking::Client;
use reqwest::header::{CONNECTION, CONTENT_TYPE};
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use super::payload::Discord;

/// 默认请求超时
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// 投递失败原因
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// payload 无法序列化为 JSON
    #[error("failed to serialize payload: {0}")]
    Serialization(#[from] serde_json::Error),

    /// DNS / 连接 / 超时等网络错误，不含 URL
    #[error("HTTP request failed: {0}")]
    Transport(reqwest::Error),

    /// Discord 返回了非 204 状态码
    #[error("Error response from Discord [{status}] - [{body}]")]
    Provider { status: u16, body: String },
}

// webhook URL 的路径里带着 token，错误信息中去掉 URL
impl From<reqwest::Error> for DeliveryError {
    fn from(e: reqwest::Error) -> Self {
        DeliveryError::Transport(e.without_url())
    }
}

impl DeliveryError {
    /// 错误类别，用于日志字段
    pub fn kind(&self) -> &'static str {
        match self {
            DeliveryError::Serialization(_) => "serialization",
            DeliveryError::Transport(_) => "transport",
            DeliveryError::Provider { .. } => "provider",
        }
    }
}

/// Discord Webhook 客户端
#[derive(Debug, Clone)]
pub struct WebhookClient {
    webhook_url: String,
    timeout: Duration,
}

impl WebhookClient {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// 只保留 scheme 和 host，可安全写入日志
    pub fn redacted_url(&self) -> String {
        match reqwest::Url::parse(&self.webhook_url) {
            Ok(url) => match url.host_str() {
                Some(host) => match url.port() {
                    Some(port) => format!("{}://{}:{}/***", url.scheme(), host, port),
                    None => format!("{}://{}/***", url.scheme(), host),
                },
                None => "<invalid url>".to_string(),
            },
            Err(_) => "<invalid url>".to_string(),
        }
    }

    /// 发送 payload，仅 204 No Content 视为成功
    pub fn deliver(&self, payload: &Discord) -> Result<(), DeliveryError> {
        let body = serde_json::to_vec(payload)?;

        // 每次投递都新建 client，调用之间不共享连接池
        let client = Client::builder()
            .timeout(self.timeout)
            .pool_max_idle_per_host(0)
            .build()?;

        let response = client
            .post(&self.webhook_url)
            .header(CONTENT_TYPE, "application/json")
            .header(CONNECTION, "close")
            .body(body)
            .send()?;

        let status = response.status();
        let text = match response.text() {
            Ok(text) => text,
            Err(e) => {
                let e = e.without_url();
                warn!(status = status.as_u16(), error = %e, "Failed to read Discord response body");
                format!("<failed to read response body: {}>", e)
            }
        };
        debug!(status = status.as_u16(), body = %text, "Discord webhook responded");

        if status != StatusCode::NO_CONTENT {
            return Err(DeliveryError::Provider {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout() {
        let client = WebhookClient::new("https://discord.com/api/webhooks/1/abc");
        assert_eq!(client.timeout, Duration::from_secs(10));
        assert_eq!(client.webhook_url, "https://discord.com/api/webhooks/1/abc");
    }

    #[test]
    fn test_redacted_url_hides_token() {
        let client = WebhookClient::new("https://discord.com/api/webhooks/123/secret-token");
        assert_eq!(client.redacted_url(), "https://discord.com/***");

        let client = WebhookClient::new("http://127.0.0.1:8080/hook/secret-token");
        assert_eq!(client.redacted_url(), "http://127.0.0.1:8080/***");

        assert_eq!(WebhookClient::new("not a url").redacted_url(), "<invalid url>");
    }

    #[test]
    fn test_provider_error_message() {
        let err = DeliveryError::Provider {
            status: 400,
            body: "{\"message\": \"Invalid Form Body\"}".to_string(),
        };
        assert_eq!(err.kind(), "provider");
        assert_eq!(
            err.to_string(),
            "Error response from Discord [400] - [{\"message\": \"Invalid Form Body\"}]"
        );
    }

    #[test]
    fn test_invalid_url_is_transport_error() {
        let client = WebhookClient::new("not a url");
        let err = client.deliver(&Discord::default()).unwrap_err();
        assert_eq!(err.kind(), "transport");
    }
}
