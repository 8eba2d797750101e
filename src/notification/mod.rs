//! 通知模块 - 将探测结果渲染为 Discord 消息并通过 webhook 发送
//!
//! # 使用示例
//! ```ignore
//! use probe_notify::notification::{DiscordNotifier, NotifyConfig};
//!
//! let notifier = DiscordNotifier::new(NotifyConfig::auto_load()?);
//! notifier.config()?;
//! notifier.notify(&result);
//! ```

pub mod config;
pub mod formatter;
pub mod notifier;
pub mod payload;
pub mod webhook;

pub use config::NotifyConfig;
pub use formatter::{new_embed, render_aggregate_report, render_single_result, style};
pub use notifier::{DiscordNotifier, SendResult};
pub use payload::{Author, Discord, Embed, Field, Footer, Thumbnail, MAX_EMBEDS};
pub use webhook::{DeliveryError, WebhookClient};
