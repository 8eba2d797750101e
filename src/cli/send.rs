//! send / report / render 命令
//!
//! 从 JSON 文件读取探测结果，渲染并发送（或 dry-run）Discord 通知。

use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};

use crate::notification::config::{ENV_DRY, ENV_WEBHOOK};
use crate::notification::{
    render_aggregate_report, render_single_result, DiscordNotifier, NotifyConfig, SendResult,
};
use crate::probe::ProbeResult;

/// 通知配置相关参数
#[derive(Args, Debug, Clone, Default)]
pub struct NotifyArgs {
    /// Discord webhook URL（覆盖配置文件和环境变量）
    #[arg(long)]
    pub webhook: Option<String>,

    /// Dry-run 模式（只打印不发送）
    #[arg(long)]
    pub dry_run: bool,

    /// 配置文件路径（默认 ~/.config/probe-notify.json）
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl NotifyArgs {
    /// 合并配置文件、环境变量和命令行参数
    pub fn resolve(&self) -> Result<NotifyConfig> {
        self.resolve_with_env(
            std::env::var(ENV_WEBHOOK).ok().as_deref(),
            std::env::var(ENV_DRY).ok().as_deref(),
        )
    }

    /// 与 `resolve` 相同，但环境变量的值由调用方给出
    pub fn resolve_with_env(
        &self,
        webhook: Option<&str>,
        dry: Option<&str>,
    ) -> Result<NotifyConfig> {
        let mut config = NotifyConfig::load_or_default(self.config.as_deref())?;
        config.apply_env(webhook, dry)?;
        if let Some(url) = &self.webhook {
            config.webhook_url = url.clone();
        }
        if self.dry_run {
            config.dry = true;
        }
        Ok(config)
    }
}

/// send 命令参数
#[derive(Args, Debug)]
pub struct SendArgs {
    /// 探测结果 JSON 文件
    #[arg(long, short)]
    pub input: PathBuf,

    #[command(flatten)]
    pub notify: NotifyArgs,
}

/// report 命令参数
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// 探测结果数组 JSON 文件
    #[arg(long, short)]
    pub input: PathBuf,

    #[command(flatten)]
    pub notify: NotifyArgs,
}

/// render 命令参数
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// 探测结果 JSON 文件
    #[arg(long, short)]
    pub input: PathBuf,

    /// 渲染 SLA 报告（输入为数组）
    #[arg(long)]
    pub report: bool,
}

pub fn read_result(path: &Path) -> Result<ProbeResult> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Cannot read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid probe result in {}", path.display()))
}

pub fn read_results(path: &Path) -> Result<Vec<ProbeResult>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Cannot read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid probe results in {}", path.display()))
}

fn build_notifier(config: NotifyConfig) -> Result<DiscordNotifier> {
    let notifier = DiscordNotifier::new(config);
    notifier.config()?;
    Ok(notifier)
}

/// 处理 send 命令
pub fn handle_send(args: SendArgs) -> Result<SendResult> {
    send_file(&args.input, args.notify.resolve()?)
}

/// 读取单个探测结果并通知
pub fn send_file(input: &Path, config: NotifyConfig) -> Result<SendResult> {
    let result = read_result(input)?;
    let notifier = build_notifier(config)?;
    Ok(notifier.notify(&result))
}

/// 处理 report 命令
pub fn handle_report(args: ReportArgs) -> Result<SendResult> {
    report_file(&args.input, args.notify.resolve()?)
}

/// 读取探测结果数组并发送 SLA 报告
pub fn report_file(input: &Path, config: NotifyConfig) -> Result<SendResult> {
    let results = read_results(input)?;
    let notifier = build_notifier(config)?;
    Ok(notifier.notify_stat(&results))
}

/// 处理 render 命令，返回格式化后的 JSON
pub fn handle_render(args: RenderArgs) -> Result<String> {
    let discord = if args.report {
        render_aggregate_report(&read_results(&args.input)?)
    } else {
        render_single_result(&read_result(&args.input)?)
    };
    Ok(serde_json::to_string_pretty(&discord)?)
}
