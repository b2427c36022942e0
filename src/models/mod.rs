// src/models/mod.rs

pub mod api;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, path::PathBuf};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// 番剧的一季 (ss)
    SeasonId
);
string_id!(
    /// 番剧条目 (md)
    MediaId
);
string_id!(
    /// 单集 (ep)
    EpisodeId
);
string_id!(CId);
string_id!(BvId);

/// 单集的扩展元数据，仅在请求 `--with-metadata` 时填充
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BangumiMetadata {
    pub title: String,
    pub show_title: String,
    pub thumb: String,
    pub premiered: Option<DateTime<Utc>>,
    pub website: String,
    pub original_filename: String,
}

/// 季目录中的一项，`id` 是其在完整目录中的位置 (从 1 开始)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BangumiListItem {
    pub id: usize,
    pub name: String,
    pub cid: CId,
    pub episode_id: EpisodeId,
    pub bvid: BvId,
    pub is_section: bool,
    pub is_preview: bool,
    pub metadata: Option<BangumiMetadata>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoStream {
    pub url: String,
    pub mirrors: Vec<String>,
    pub codec: String,
    pub width: u32,
    pub height: u32,
    pub quality: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioStream {
    pub url: String,
    pub mirrors: Vec<String>,
    pub codec: String,
    pub quality: u32,
}

/// 单集提取结果，交给下载环节使用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeData {
    pub episode_id: EpisodeId,
    pub name: String,
    pub path: PathBuf,
    pub videos: Vec<VideoStream>,
    pub audios: Vec<AudioStream>,
    pub metadata: Option<BangumiMetadata>,
}
