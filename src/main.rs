//! Probe Notify CLI
//!
//! 将探测结果渲染为 Discord 消息并发送到 webhook

use anyhow::Result;
use clap::{Parser, Subcommand};
use probe_notify::cli::{handle_render, handle_report, handle_send, RenderArgs, ReportArgs, SendArgs};
use probe_notify::SendResult;
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "probe-notify")]
#[command(about = "Probe Notify - 发送探测结果到 Discord")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 发送单次探测结果通知
    Send(SendArgs),
    /// 发送 SLA 报告
    Report(ReportArgs),
    /// 只渲染 payload 并打印，不发送
    Render(RenderArgs),
}

fn main() -> Result<()> {
    // 通过 RUST_LOG 环境变量控制日志级别，默认为 info
    // 例如: RUST_LOG=debug probe-notify send -i result.json
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("probe_notify=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Send(args) => handle_send(args)?,
        Commands::Report(args) => handle_report(args)?,
        Commands::Render(args) => {
            println!("{}", handle_render(args)?);
            return Ok(());
        }
    };

    // 投递失败已经记录过日志，这里只影响退出码
    if let SendResult::Failed(reason) = outcome {
        warn!(reason = %reason, "Notification was not delivered");
        std::process::exit(1);
    }
    Ok(())
}
