//! Discord webhook 消息结构
//!
//! 参考:
//! - https://birdie0.github.io/discord-webhooks-guide/index.html
//! - https://discohook.org/ 可用于预览
//!
//! 所有字段都会序列化（包括空字符串），与 Discord 接受的格式一致。

use serde::{Deserialize, Serialize};

/// 单条消息最多包含的 embed 数量
pub const MAX_EMBEDS: usize = 10;

/// Embed 缩略图，只能设置 url
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

/// Embed 中的 name/value 字段块
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Embed 页脚，text 不支持 markdown
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Footer {
    pub text: String,
    pub icon_url: String,
}

/// Embed 作者，url 和 icon_url 都依赖 name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub url: String,
    pub icon_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    pub author: Author,
    pub title: String,
    pub url: String,
    pub color: u32,
    /// 支持 Discord markdown
    pub description: String,
    /// RFC 3339 (UTC)，为空表示不显示
    pub timestamp: String,
    pub thumbnail: Thumbnail,
    pub fields: Vec<Field>,
    pub footer: Footer,
}

/// Webhook 请求体
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Discord {
    pub username: String,
    pub avatar_url: String,
    pub content: String,
    pub embeds: Vec<Embed>,
}
