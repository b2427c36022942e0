// src/extractor/mod.rs

pub mod bangumi_api;
pub mod bangumi_batch;
pub mod episode;
pub mod tasks;

use crate::{
    cli::Cli,
    constants,
    error::*,
    models::{BangumiListItem, EpisodeData, EpisodeId},
};
use async_trait::async_trait;
use std::collections::HashMap;

/// 批量提取所需读取的用户参数
#[derive(Debug, Clone)]
pub struct ExtractArgs {
    /// 选集表达式
    pub episodes: String,
    pub with_section: bool,
    pub with_metadata: bool,
    pub video_quality: u16,
}

impl Default for ExtractArgs {
    fn default() -> Self {
        Self {
            episodes: constants::DEFAULT_SELECTION.to_string(),
            with_section: false,
            with_metadata: false,
            video_quality: constants::DEFAULT_VIDEO_QUALITY,
        }
    }
}

impl From<&Cli> for ExtractArgs {
    fn from(args: &Cli) -> Self {
        Self {
            episodes: args.episodes.clone(),
            with_section: args.with_section,
            with_metadata: args.with_metadata,
            video_quality: args.video_quality,
        }
    }
}

/// 单集数据提取器，每个批量任务调用一次
#[async_trait]
pub trait EpisodeExtractor: Send + Sync {
    async fn extract_episode(
        &self,
        episode_id: &EpisodeId,
        item: &BangumiListItem,
        args: &ExtractArgs,
        subpath_variables: &HashMap<String, String>,
        subpath_template: &str,
    ) -> AppResult<EpisodeData>;
}
