// src/extractor/bangumi_api.rs

use crate::{
    client::RobustClient,
    constants::api::{self, endpoints},
    error::*,
    models::{
        BangumiListItem, BangumiMetadata, BvId, CId, EpisodeId, MediaId, SeasonId,
        api::{EpisodeItem, MediaReviewResult, SeasonSectionResult, SeasonViewResult},
    },
};
use chrono::DateTime;
use itertools::Itertools;
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

static NUMERIC_TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d+)?$").unwrap());

pub async fn get_season_id_by_episode_id(
    client: &RobustClient,
    episode_id: &EpisodeId,
) -> AppResult<SeasonId> {
    let view: SeasonViewResult = client
        .fetch_json(endpoints::SEASON_VIEW, &[("ep_id", episode_id.as_str())])
        .await?;
    debug!("ep{} 属于 ss{}", episode_id, view.season_id);
    Ok(SeasonId::new(view.season_id.to_string()))
}

pub async fn get_season_id_by_media_id(
    client: &RobustClient,
    media_id: &MediaId,
) -> AppResult<SeasonId> {
    let review: MediaReviewResult = client
        .fetch_json(endpoints::MEDIA_REVIEW, &[("media_id", media_id.as_str())])
        .await?;
    debug!("md{} 对应 ss{}", media_id, review.media.season_id);
    Ok(SeasonId::new(review.media.season_id.to_string()))
}

pub async fn get_bangumi_title(client: &RobustClient, season_id: &SeasonId) -> AppResult<String> {
    let view: SeasonViewResult = client
        .fetch_json(endpoints::SEASON_VIEW, &[("season_id", season_id.as_str())])
        .await?;
    Ok(if view.title.is_empty() {
        view.season_title
    } else {
        view.title
    })
}

/// 获取整季剧集列表，正片在前、专区内容在后
pub async fn get_bangumi_list(
    client: &RobustClient,
    season_id: &SeasonId,
    with_metadata: bool,
) -> AppResult<Vec<BangumiListItem>> {
    let sections: SeasonSectionResult = client
        .fetch_json(endpoints::SEASON_SECTION, &[("season_id", season_id.as_str())])
        .await?;
    Ok(build_bangumi_list(sections, with_metadata))
}

pub(crate) fn build_bangumi_list(
    sections: SeasonSectionResult,
    with_metadata: bool,
) -> Vec<BangumiListItem> {
    let main_count = sections.main_section.episodes.len();
    let section_episodes = sections
        .section
        .into_iter()
        .filter(|s| s.section_type != api::SKIPPED_SECTION_TYPE)
        .flat_map(|s| s.episodes);

    sections
        .main_section
        .episodes
        .into_iter()
        .chain(section_episodes)
        .enumerate()
        .map(|(i, item)| BangumiListItem {
            id: i + 1,
            name: bangumi_episode_title(&item.title, &item.long_title),
            cid: CId::new(item.cid.to_string()),
            episode_id: EpisodeId::new(item.id.to_string()),
            bvid: BvId::new(item.bvid.clone()),
            is_section: i >= main_count,
            is_preview: item.badge == api::PREVIEW_BADGE,
            metadata: with_metadata.then(|| parse_bangumi_metadata(&item)),
        })
        .collect()
}

/// 纯数字标题视为集数，格式化为 `第N话`
pub(crate) fn bangumi_episode_title(title: &str, long_title: &str) -> String {
    let head = if NUMERIC_TITLE_RE.is_match(title) {
        format!("第{}话", title)
    } else {
        title.to_string()
    };
    [head.as_str(), long_title]
        .into_iter()
        .filter(|s| !s.is_empty())
        .join(" ")
}

fn parse_bangumi_metadata(item: &EpisodeItem) -> BangumiMetadata {
    BangumiMetadata {
        title: if item.long_title.is_empty() {
            item.title.clone()
        } else {
            item.long_title.clone()
        },
        show_title: bangumi_episode_title(&item.title, &item.long_title),
        thumb: item.cover.clone(),
        premiered: item
            .pub_time
            .filter(|t| *t > 0)
            .and_then(|t| DateTime::from_timestamp(t, 0)),
        website: item.share_url.clone(),
        original_filename: String::new(),
    }
}
