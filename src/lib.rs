//! Probe Notify - 将探测结果发送到 Discord webhook

pub mod cli;
pub mod notification;
pub mod probe;

pub use notification::{DeliveryError, Discord, DiscordNotifier, NotifyConfig, SendResult, WebhookClient};
pub use probe::{ProbeResult, ProbeStatus, Prober, Stat};
