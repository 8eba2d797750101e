//! 探测结果数据模型
//!
//! 上游探测引擎产出的 `ProbeResult`，通知模块只读取不修改。

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// 默认的 "最近探测" 时间格式（strftime）
pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// 探测状态
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    Up,
    Down,
    #[default]
    Unknown,
}

impl ProbeStatus {
    pub const ALL: [ProbeStatus; 3] = [ProbeStatus::Up, ProbeStatus::Down, ProbeStatus::Unknown];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeStatus::Up => "up",
            ProbeStatus::Down => "down",
            ProbeStatus::Unknown => "unknown",
        }
    }

    /// 状态对应的 emoji
    pub fn emoji(&self) -> &'static str {
        match self {
            ProbeStatus::Up => "✅",
            ProbeStatus::Down => "❌",
            ProbeStatus::Unknown => "⛔️",
        }
    }

    pub fn is_up(&self) -> bool {
        matches!(self, ProbeStatus::Up)
    }
}

impl std::fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 聚合统计
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stat {
    /// 统计起始时间
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since: Option<DateTime<FixedOffset>>,
    /// 探测总次数
    #[serde(default)]
    pub total: u64,
    /// 各状态出现次数
    #[serde(default)]
    pub status: BTreeMap<ProbeStatus, u64>,
    /// 累计在线时长
    #[serde(default, with = "humantime_serde")]
    pub up_time: Duration,
    /// 累计离线时长
    #[serde(default, with = "humantime_serde")]
    pub down_time: Duration,
}

impl Stat {
    /// SLA 百分比，没有任何在线/离线时长时视为 100%
    pub fn sla(&self) -> f64 {
        let up = self.up_time.as_secs_f64();
        let down = self.down_time.as_secs_f64();
        if up + down <= 0.0 {
            return 100.0;
        }
        up / (up + down) * 100.0
    }

    /// Markdown 格式的状态分布，如 "**up** : `8`  **down** : `2`"
    ///
    /// 次数为 0 的状态不输出。
    pub fn status_text(&self) -> String {
        ProbeStatus::ALL
            .iter()
            .filter_map(|s| {
                let count = self.status.get(s).copied().unwrap_or(0);
                (count > 0).then(|| format!("**{}** : `{}`", s, count))
            })
            .collect::<Vec<_>>()
            .join("  ")
    }
}

fn default_time_format() -> String {
    DEFAULT_TIME_FORMAT.to_string()
}

/// 单次探测结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub name: String,
    pub endpoint: String,
    #[serde(default)]
    pub status: ProbeStatus,
    /// 上一次的状态，首次探测时为 None
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_status: Option<ProbeStatus>,
    #[serde(default)]
    pub message: String,
    #[serde(default, with = "humantime_serde")]
    pub round_trip_time: Duration,
    pub start_time: DateTime<FixedOffset>,
    #[serde(default = "default_time_format")]
    pub time_format: String,
    #[serde(default)]
    pub stat: Stat,
}

impl ProbeResult {
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            status: ProbeStatus::Unknown,
            pre_status: None,
            message: String::new(),
            round_trip_time: Duration::ZERO,
            start_time: Utc::now().into(),
            time_format: default_time_format(),
            stat: Stat::default(),
        }
    }

    pub fn with_status(mut self, status: ProbeStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_pre_status(mut self, pre_status: ProbeStatus) -> Self {
        self.pre_status = Some(pre_status);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_round_trip_time(mut self, rtt: Duration) -> Self {
        self.round_trip_time = rtt;
        self
    }

    pub fn with_start_time(mut self, start_time: DateTime<FixedOffset>) -> Self {
        self.start_time = start_time;
        self
    }

    pub fn with_stat(mut self, stat: Stat) -> Self {
        self.stat = stat;
        self
    }

    /// 通知标题：首次探测为 Monitoring，失败为 Failure，其余为 Success
    pub fn title(&self) -> String {
        let t = if !self.status.is_up() {
            "Failure"
        } else if self.pre_status.is_none() {
            "Monitoring"
        } else {
            "Success"
        };
        format!("{} {}", self.name, t)
    }

    pub fn sla(&self) -> f64 {
        self.stat.sla()
    }
}

/// 可以提供最近一次探测结果的探测器句柄
pub trait Prober {
    fn result(&self) -> &ProbeResult;
}

impl Prober for ProbeResult {
    fn result(&self) -> &ProbeResult {
        self
    }
}

impl<P: Prober + ?Sized> Prober for &P {
    fn result(&self) -> &ProbeResult {
        (**self).result()
    }
}

impl<P: Prober + ?Sized> Prober for Box<P> {
    fn result(&self) -> &ProbeResult {
        (**self).result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display_and_emoji() {
        assert_eq!(ProbeStatus::Up.to_string(), "up");
        assert_eq!(ProbeStatus::Down.to_string(), "down");
        assert_eq!(ProbeStatus::Unknown.to_string(), "unknown");
        assert_ne!(ProbeStatus::Up.emoji(), ProbeStatus::Down.emoji());
    }

    #[test]
    fn test_default_status_is_unknown() {
        assert_eq!(ProbeStatus::default(), ProbeStatus::Unknown);
    }

    #[test]
    fn test_sla_without_history_is_full() {
        assert_eq!(Stat::default().sla(), 100.0);
    }

    #[test]
    fn test_sla_ratio() {
        let stat = Stat {
            up_time: Duration::from_secs(90),
            down_time: Duration::from_secs(10),
            ..Default::default()
        };
        assert!((stat.sla() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_status_text_skips_empty_counts() {
        let mut stat = Stat::default();
        stat.status.insert(ProbeStatus::Up, 8);
        stat.status.insert(ProbeStatus::Down, 2);
        stat.status.insert(ProbeStatus::Unknown, 0);
        assert_eq!(stat.status_text(), "**up** : `8`  **down** : `2`");
    }

    #[test]
    fn test_title() {
        let r = ProbeResult::new("web", "https://example.com").with_status(ProbeStatus::Up);
        assert_eq!(r.title(), "web Monitoring");

        let r = r.with_pre_status(ProbeStatus::Down);
        assert_eq!(r.title(), "web Success");

        let r = r.with_status(ProbeStatus::Down);
        assert_eq!(r.title(), "web Failure");
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{
            "name": "web",
            "endpoint": "https://example.com",
            "status": "down",
            "round_trip_time": "1ms 234us 567ns",
            "start_time": "2024-01-02T03:04:05+08:00",
            "stat": {"total": 3, "status": {"up": 2, "down": 1}, "up_time": "2m", "down_time": "30s"}
        }"#;
        let r: ProbeResult = serde_json::from_str(json).unwrap();
        assert_eq!(r.status, ProbeStatus::Down);
        assert_eq!(r.round_trip_time, Duration::from_nanos(1_234_567));
        assert_eq!(r.time_format, DEFAULT_TIME_FORMAT);
        assert_eq!(r.stat.total, 3);
        assert_eq!(r.stat.up_time, Duration::from_secs(120));
        assert!(r.pre_status.is_none());
    }
}
