// src/models/api.rs

use serde::Deserialize;

// --- 通用响应外壳 ---

#[derive(Deserialize, Debug, Clone)]
pub struct ApiEnvelope<T> {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(alias = "data")]
    pub result: Option<T>,
}

// --- 季信息 (pgc/view/web/season) ---

#[derive(Deserialize, Debug, Clone)]
pub struct SeasonViewResult {
    pub season_id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub season_title: String,
}

// --- 番剧条目 (pgc/review/user) ---

#[derive(Deserialize, Debug, Clone)]
pub struct MediaReviewResult {
    pub media: MediaInfo,
}

#[derive(Deserialize, Debug, Clone)]
pub struct MediaInfo {
    pub season_id: i64,
    #[serde(default)]
    pub title: String,
}

// --- 剧集列表 (pgc/web/season/section) ---

#[derive(Deserialize, Debug, Clone)]
pub struct SeasonSectionResult {
    pub main_section: Section,
    #[serde(default)]
    pub section: Vec<Section>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Section {
    #[serde(default, rename = "type")]
    pub section_type: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub episodes: Vec<EpisodeItem>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct EpisodeItem {
    pub id: i64,
    pub cid: i64,
    #[serde(default)]
    pub aid: i64,
    #[serde(default)]
    pub bvid: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub long_title: String,
    #[serde(default)]
    pub badge: String,
    #[serde(default)]
    pub cover: String,
    #[serde(default)]
    pub share_url: String,
    #[serde(default)]
    pub pub_time: Option<i64>,
}

// --- 播放地址 (pgc/player/web/playurl) ---

#[derive(Deserialize, Debug, Clone)]
pub struct PlayUrlResult {
    pub dash: Option<DashInfo>,
    #[serde(default)]
    pub durl: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub is_preview: i64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct DashInfo {
    #[serde(default)]
    pub video: Vec<DashStream>,
    #[serde(default)]
    pub audio: Option<Vec<DashStream>>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct DashStream {
    pub id: u32,
    pub base_url: String,
    #[serde(default)]
    pub backup_url: Option<Vec<String>>,
    #[serde(default)]
    pub codecid: u32,
    #[serde(default)]
    pub codecs: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}
