//! 通知配置
//!
//! 读取优先级（后者覆盖前者）：
//! 1. 配置文件 `~/.config/probe-notify.json`
//! 2. 环境变量 `PROBE_NOTIFY_WEBHOOK` / `PROBE_NOTIFY_DRY`
//! 3. 命令行参数（由 CLI 层覆盖）

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use super::webhook::DEFAULT_TIMEOUT;

pub const ENV_WEBHOOK: &str = "PROBE_NOTIFY_WEBHOOK";
pub const ENV_DRY: &str = "PROBE_NOTIFY_DRY";

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

/// Discord 通知配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Webhook URL
    #[serde(rename = "webhook", default)]
    pub webhook_url: String,
    /// Dry 模式只打印日志不发送
    #[serde(default)]
    pub dry: bool,
    /// 请求超时
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
            dry: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl NotifyConfig {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            ..Default::default()
        }
    }

    pub fn with_dry(mut self, dry: bool) -> Self {
        self.dry = dry;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// 默认配置文件路径
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".config").join("probe-notify.json"))
    }

    /// 从指定文件读取
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Cannot read config file {}", path.display()))?;
        let config: NotifyConfig = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        debug!(path = %path.display(), "Loaded notify config");
        Ok(config)
    }

    /// 自动加载：默认配置文件（不存在则使用默认值）+ 环境变量覆盖
    pub fn auto_load() -> Result<Self> {
        Self::load_with_env(None)
    }

    /// 读取指定（或默认）配置文件，再用环境变量覆盖
    pub fn load_with_env(path: Option<&Path>) -> Result<Self> {
        let mut config = Self::load_or_default(path)?;
        config.apply_env(
            std::env::var(ENV_WEBHOOK).ok().as_deref(),
            std::env::var(ENV_DRY).ok().as_deref(),
        )?;
        Ok(config)
    }

    /// 读取指定文件；未指定时读取默认文件，默认文件不存在则使用默认值
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// 用环境变量的值覆盖配置，空值忽略
    pub fn apply_env(&mut self, webhook: Option<&str>, dry: Option<&str>) -> Result<()> {
        if let Some(url) = webhook.filter(|u| !u.is_empty()) {
            debug!("Using webhook from {}", ENV_WEBHOOK);
            self.webhook_url = url.to_string();
        }
        if let Some(dry) = dry.filter(|d| !d.is_empty()) {
            self.dry = parse_bool(dry)
                .ok_or_else(|| anyhow!("{} must be a boolean, got {:?}", ENV_DRY, dry))?;
        }
        Ok(())
    }

    /// 校验配置：非 dry 模式必须有 http(s) webhook URL
    pub fn validate(&self) -> Result<()> {
        if self.dry {
            return Ok(());
        }
        if self.webhook_url.is_empty() {
            bail!("webhook URL is required unless running in dry mode");
        }
        if !(self.webhook_url.starts_with("https://") || self.webhook_url.starts_with("http://")) {
            bail!("webhook URL must start with http:// or https://, got {}", self.webhook_url);
        }
        if self.timeout.is_zero() {
            bail!("timeout must be greater than zero");
        }
        Ok(())
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
