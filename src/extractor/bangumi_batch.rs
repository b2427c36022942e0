// src/extractor/bangumi_batch.rs

use super::{
    EpisodeExtractor, ExtractArgs,
    bangumi_api::{
        get_bangumi_list, get_bangumi_title, get_season_id_by_episode_id,
        get_season_id_by_media_id,
    },
    tasks::{self, ExtractionTask},
};
use crate::{
    client::RobustClient,
    error::*,
    models::{BangumiListItem, EpisodeId, MediaId, SeasonId},
    selection,
};
use dashmap::DashMap;
use log::{debug, info};
use regex::Regex;
use std::{
    fmt,
    sync::{Arc, LazyLock},
};

static REGEX_MD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://www\.bilibili\.com/bangumi/media/md(?P<media_id>\d+)").unwrap()
});
static REGEX_SS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://www\.bilibili\.com/bangumi/play/ss(?P<season_id>\d+)").unwrap()
});
static REGEX_EP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://www\.bilibili\.com/bangumi/play/ep(?P<episode_id>\d+)").unwrap()
});

static REGEX_MD_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^md(?P<media_id>\d+)").unwrap());
static REGEX_SS_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^ss(?P<season_id>\d+)").unwrap());
static REGEX_EP_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^ep(?P<episode_id>\d+)").unwrap());

/// 链接所指向的对象
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BangumiTarget {
    Media(MediaId),
    Season(SeasonId),
    Episode(EpisodeId),
}

impl fmt::Display for BangumiTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Media(id) => write!(f, "md{}", id),
            Self::Season(id) => write!(f, "ss{}", id),
            Self::Episode(id) => write!(f, "ep{}", id),
        }
    }
}

/// 将短链接 (md/ss/ep + 数字) 展开为完整链接，不匹配时原样返回
pub fn resolve_shortcut(id: &str) -> (bool, String) {
    if let Some(caps) = REGEX_MD_ID.captures(id) {
        (true, format!("https://www.bilibili.com/bangumi/media/md{}", &caps["media_id"]))
    } else if let Some(caps) = REGEX_SS_ID.captures(id) {
        (true, format!("https://www.bilibili.com/bangumi/play/ss{}", &caps["season_id"]))
    } else if let Some(caps) = REGEX_EP_ID.captures(id) {
        (true, format!("https://www.bilibili.com/bangumi/play/ep{}", &caps["episode_id"]))
    } else {
        (false, id.to_string())
    }
}

/// 依次尝试 md、ss、ep 三种链接，先匹配者优先
pub fn match_url(url: &str) -> Option<BangumiTarget> {
    if let Some(caps) = REGEX_MD.captures(url) {
        Some(BangumiTarget::Media(MediaId::new(&caps["media_id"])))
    } else if let Some(caps) = REGEX_SS.captures(url) {
        Some(BangumiTarget::Season(SeasonId::new(&caps["season_id"])))
    } else {
        REGEX_EP
            .captures(url)
            .map(|caps| BangumiTarget::Episode(EpisodeId::new(&caps["episode_id"])))
    }
}

/// 番剧全集提取器
pub struct BangumiBatchExtractor {
    http_client: Arc<RobustClient>,
    episode_extractor: Arc<dyn EpisodeExtractor>,
    season_cache: DashMap<BangumiTarget, SeasonId>,
}

impl BangumiBatchExtractor {
    pub fn new(http_client: Arc<RobustClient>, episode_extractor: Arc<dyn EpisodeExtractor>) -> Self {
        Self {
            http_client,
            episode_extractor,
            season_cache: DashMap::new(),
        }
    }

    /// 展开短链接并匹配，无法识别时返回 `UnsupportedUrl`
    pub fn parse_target(&self, input: &str) -> AppResult<BangumiTarget> {
        let (expanded, url) = resolve_shortcut(input.trim());
        if expanded {
            debug!("短链接 '{}' 展开为 '{}'", input, url);
        }
        match_url(&url).ok_or_else(|| AppError::UnsupportedUrl(input.to_string()))
    }

    pub async fn resolve_season(&self, target: &BangumiTarget) -> AppResult<SeasonId> {
        if let Some(season_id) = self.season_cache.get(target) {
            debug!("季 ID 缓存命中: {}", target);
            return Ok(season_id.value().clone());
        }
        let season_id = match target {
            BangumiTarget::Episode(episode_id) => {
                get_season_id_by_episode_id(&self.http_client, episode_id).await?
            }
            BangumiTarget::Season(season_id) => season_id.clone(),
            BangumiTarget::Media(media_id) => {
                get_season_id_by_media_id(&self.http_client, media_id).await?
            }
        };
        self.season_cache.insert(target.clone(), season_id.clone());
        Ok(season_id)
    }

    /// 并发获取番剧标题与剧集列表，任一失败则整体失败
    pub async fn fetch_catalog(
        &self,
        season_id: &SeasonId,
        with_metadata: bool,
    ) -> AppResult<(String, Vec<BangumiListItem>)> {
        tokio::try_join!(
            get_bangumi_title(&self.http_client, season_id),
            get_bangumi_list(&self.http_client, season_id, with_metadata),
        )
    }

    /// 解析目标、获取目录并筛选，返回尚未启动的提取任务
    pub async fn extract(
        &self,
        target: &BangumiTarget,
        args: Arc<ExtractArgs>,
    ) -> AppResult<(String, Vec<ExtractionTask>)> {
        let season_id = self.resolve_season(target).await?;
        let (title, bangumi_list) = self.fetch_catalog(&season_id, args.with_metadata).await?;
        info!("番剧 '{}' (ss{}) 共 {} 项", title, season_id, bangumi_list.len());

        let bangumi_list =
            selection::filter_episodes(bangumi_list, args.with_section, &args.episodes)?;
        info!("选中 {} 集", bangumi_list.len());

        let tasks = tasks::build_tasks(&title, bangumi_list, args, self.episode_extractor.clone());
        Ok((title, tasks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_shortcut() {
        assert_eq!(
            resolve_shortcut("md28229233"),
            (true, "https://www.bilibili.com/bangumi/media/md28229233".to_string())
        );
        assert_eq!(
            resolve_shortcut("ss28770"),
            (true, "https://www.bilibili.com/bangumi/play/ss28770".to_string())
        );
        assert_eq!(
            resolve_shortcut("ep314291"),
            (true, "https://www.bilibili.com/bangumi/play/ep314291".to_string())
        );
        assert_eq!(resolve_shortcut("BV1xx411c7mD"), (false, "BV1xx411c7mD".to_string()));
        assert_eq!(resolve_shortcut("xmd123"), (false, "xmd123".to_string()));
    }

    #[test]
    fn test_match_url_kinds() {
        assert_eq!(
            match_url("https://www.bilibili.com/bangumi/media/md28229233/"),
            Some(BangumiTarget::Media(MediaId::new("28229233")))
        );
        assert_eq!(
            match_url("http://www.bilibili.com/bangumi/play/ss28770?from=search"),
            Some(BangumiTarget::Season(SeasonId::new("28770")))
        );
        assert_eq!(
            match_url("https://www.bilibili.com/bangumi/play/ep314291"),
            Some(BangumiTarget::Episode(EpisodeId::new("314291")))
        );
        assert_eq!(match_url("https://www.bilibili.com/video/BV1xx411c7mD"), None);
        assert_eq!(match_url("ss28770"), None);
    }

    #[test]
    fn test_target_display_round_trips_through_shortcut() {
        for target in [
            BangumiTarget::Media(MediaId::new("1")),
            BangumiTarget::Season(SeasonId::new("2")),
            BangumiTarget::Episode(EpisodeId::new("3")),
        ] {
            let (matched, url) = resolve_shortcut(&target.to_string());
            assert!(matched);
            assert_eq!(match_url(&url), Some(target));
        }
    }
}
