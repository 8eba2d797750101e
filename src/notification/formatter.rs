//! 消息格式化模块 - 将探测结果转换为 Discord 消息
//!
//! - 单次探测结果：一个 embed，绿色表示成功，红色表示失败/未知
//! - SLA 报告：每个探测器一个 embed，统一使用蓝色

use std::fmt::Write as _;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use tracing::warn;

use super::payload::{Discord, Embed, Footer, Thumbnail, MAX_EMBEDS};
use crate::probe::{ProbeResult, Prober};

/// 消息外观常量
pub mod style {
    pub const USERNAME: &str = "ProbeNotify";
    pub const AVATAR_URL: &str = "https://megaease.cn/favicon.png";

    /// #10a703 - green
    pub const COLOR_UP: u32 = 1091331;
    /// #a70303 - red
    pub const COLOR_DOWN: u32 = 10945283;
    /// #0000ef - blue
    pub const COLOR_REPORT: u32 = 239;

    pub const FOOTER_TEXT: &str = "Probed at";
    pub const REPORT_TITLE: &str = "**Overall SLA Report**";
}

/// 按 unit 四舍五入（半数远离零）
pub fn round_duration(d: Duration, unit: Duration) -> Duration {
    let unit_ns = unit.as_nanos();
    if unit_ns == 0 {
        return d;
    }
    let ns = d.as_nanos();
    let rem = ns % unit_ns;
    let mut rounded = ns - rem;
    if rem * 2 >= unit_ns {
        rounded += unit_ns;
    }
    // 超出 Duration 表示范围时饱和
    match u64::try_from(rounded / NANOS_PER_SEC) {
        Ok(secs) => Duration::new(secs, (rounded % NANOS_PER_SEC) as u32),
        Err(_) => Duration::MAX,
    }
}

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// `v / unit` 的十进制表示，去掉小数部分末尾的 0
fn with_fraction(v: u128, unit: u128) -> String {
    let whole = v / unit;
    let frac = v % unit;
    if frac == 0 {
        return whole.to_string();
    }
    let width = unit.to_string().len() - 1;
    let digits = format!("{:0width$}", frac, width = width);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}

/// 紧凑的时长文本：`1.234s`、`1h1m1s`、`744h0m0s`
///
/// 最大单位为小时；不足一秒时使用 ms/µs/ns。
pub fn format_duration(d: Duration) -> String {
    let ns = d.as_nanos();
    if ns == 0 {
        return "0s".to_string();
    }
    if ns < 1_000 {
        return format!("{}ns", ns);
    }
    if ns < 1_000_000 {
        return format!("{}µs", with_fraction(ns, 1_000));
    }
    if ns < NANOS_PER_SEC {
        return format!("{}ms", with_fraction(ns, 1_000_000));
    }

    let secs = ns / NANOS_PER_SEC;
    let hours = secs / 3600;
    let minutes = secs / 60 % 60;
    let sub_minute = secs % 60 * NANOS_PER_SEC + ns % NANOS_PER_SEC;
    let seconds = with_fraction(sub_minute, NANOS_PER_SEC);

    if hours > 0 {
        format!("{}h{}m{}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m{}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// RFC 3339 (UTC, `Z` 后缀)，保留原始的亚秒精度
pub fn rfc3339_utc(t: &DateTime<FixedOffset>) -> String {
    t.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// 使用调用方提供的 strftime 格式；格式非法时退回 RFC 3339
fn format_time(t: &DateTime<FixedOffset>, fmt: &str) -> String {
    let utc = t.with_timezone(&Utc);
    let mut out = String::new();
    if write!(out, "{}", utc.format(fmt)).is_err() {
        warn!(format = %fmt, "Invalid time format, falling back to RFC 3339");
        return rfc3339_utc(t);
    }
    out
}

fn new_discord(content: &str) -> Discord {
    Discord {
        username: style::USERNAME.to_string(),
        avatar_url: style::AVATAR_URL.to_string(),
        content: content.to_string(),
        embeds: Vec::new(),
    }
}

/// 单次探测结果 -> 含一个 embed 的消息
pub fn render_single_result(result: &ProbeResult) -> Discord {
    let color = if result.status.is_up() {
        style::COLOR_UP
    } else {
        style::COLOR_DOWN
    };

    let rtt = round_duration(result.round_trip_time, Duration::from_millis(1));
    let description = format!(
        "{} {} - ⏱ {}\n```{}```",
        result.status.emoji(),
        result.endpoint,
        format_duration(rtt),
        result.message
    );

    let mut discord = new_discord("");
    discord.embeds.push(Embed {
        title: result.title(),
        color,
        description,
        timestamp: rfc3339_utc(&result.start_time),
        thumbnail: Thumbnail {
            url: style::AVATAR_URL.to_string(),
        },
        footer: Footer {
            text: style::FOOTER_TEXT.to_string(),
            icon_url: style::AVATAR_URL.to_string(),
        },
        ..Default::default()
    });
    discord
}

/// SLA 报告中单个探测器的 embed
pub fn new_embed(result: &ProbeResult) -> Embed {
    let second = Duration::from_secs(1);
    let stat = &result.stat;

    let description = format!(
        "**Availability**\n>\t **Up**:  `{}`  **Down** `{}`  -  **SLA**: `{:.2} %`\
         \n**Probe Times**\n>\t**Total** : `{}` ( {} )\
         \n**Lastest Probe**\n>\t{} | {} {}\
         \n>\t`{} ` ",
        format_duration(round_duration(stat.up_time, second)),
        format_duration(round_duration(stat.down_time, second)),
        result.sla(),
        stat.total,
        stat.status_text(),
        format_time(&result.start_time, &result.time_format),
        result.status.emoji(),
        result.status,
        result.message,
    );

    Embed {
        title: format!("{} - {}", result.name, result.endpoint),
        color: style::COLOR_REPORT,
        description,
        ..Default::default()
    }
}

/// 多个探测器 -> SLA 报告消息
///
/// 超过 [`MAX_EMBEDS`] 时仍然全部渲染，由 Discord 拒绝请求。
pub fn render_aggregate_report<P: Prober>(probers: &[P]) -> Discord {
    if probers.len() > MAX_EMBEDS {
        warn!(
            count = probers.len(),
            max = MAX_EMBEDS,
            "SLA report exceeds the embed limit, Discord will reject it"
        );
    }

    let mut discord = new_discord(style::REPORT_TITLE);
    discord.embeds = probers.iter().map(|p| new_embed(p.result())).collect();
    discord
}
