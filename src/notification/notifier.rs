//! Discord 通知器 - 渲染探测结果并投递到 webhook
//!
//! 投递失败只记录日志，不向调用方传播错误；返回的 [`SendResult`] 仅供观察。

use anyhow::Result;
use tracing::{error, info};

use super::config::NotifyConfig;
use super::formatter::{render_aggregate_report, render_single_result};
use super::payload::Discord;
use super::webhook::WebhookClient;
use crate::probe::{ProbeResult, Prober};

/// 发送结果
#[derive(Debug, Clone, PartialEq)]
pub enum SendResult {
    /// 发送成功
    Sent,
    /// 跳过（dry 模式）
    Skipped(String),
    /// 发送失败
    Failed(String),
}

/// Discord 通知器
#[derive(Debug, Clone)]
pub struct DiscordNotifier {
    config: NotifyConfig,
}

impl DiscordNotifier {
    pub fn new(config: NotifyConfig) -> Self {
        Self { config }
    }

    /// 通知类型
    pub fn kind(&self) -> &'static str {
        "discord"
    }

    /// 校验配置，dry 模式下打印提示
    pub fn config(&self) -> Result<()> {
        self.config.validate()?;
        if self.config.dry {
            info!("Notification {} is running on Dry mode!", self.kind());
        }
        Ok(())
    }

    fn client(&self) -> WebhookClient {
        WebhookClient::new(self.config.webhook_url.clone()).with_timeout(self.config.timeout)
    }

    /// 单次探测结果通知
    pub fn notify(&self, result: &ProbeResult) -> SendResult {
        let discord = render_single_result(result);
        if self.config.dry {
            return self.dry_notify(&discord);
        }

        let outcome = self.send(&discord);
        if outcome == SendResult::Sent {
            info!(
                kind = self.kind(),
                "Sent the Discord notification for {} ({})!", result.name, result.endpoint
            );
        }
        outcome
    }

    /// 所有探测器的 SLA 报告
    pub fn notify_stat<P: Prober>(&self, probers: &[P]) -> SendResult {
        let discord = render_aggregate_report(probers);
        if self.config.dry {
            return self.dry_notify(&discord);
        }

        let outcome = self.send(&discord);
        if outcome == SendResult::Sent {
            info!(
                kind = self.kind(),
                probers = probers.len(),
                "Sent the Statistics to Discord Successfully!"
            );
        }
        outcome
    }

    /// 只记录将要发送的 payload
    fn dry_notify(&self, discord: &Discord) -> SendResult {
        match serde_json::to_string(discord) {
            Ok(json) => {
                info!("[{}] Dry notify - {}", self.kind(), json);
                SendResult::Skipped("dry-run".to_string())
            }
            Err(e) => {
                error!(kind = self.kind(), error = %e, "Failed to serialize dry-run payload");
                SendResult::Failed(e.to_string())
            }
        }
    }

    fn send(&self, discord: &Discord) -> SendResult {
        let client = self.client();
        match client.deliver(discord) {
            Ok(()) => SendResult::Sent,
            Err(e) => {
                error!(
                    kind = self.kind(),
                    error_kind = e.kind(),
                    webhook = %client.redacted_url(),
                    "{}",
                    e
                );
                match serde_json::to_string(discord) {
                    Ok(json) => error!("Notify[{}] - {}", self.kind(), json),
                    Err(_) => error!("Notify[{}] - {:?}", self.kind(), discord),
                }
                SendResult::Failed(e.to_string())
            }
        }
    }
}
