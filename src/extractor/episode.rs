// src/extractor/episode.rs

use super::{EpisodeExtractor, ExtractArgs};
use crate::{
    client::RobustClient,
    constants::api::{self, endpoints},
    error::*,
    models::{
        AudioStream, BangumiListItem, EpisodeData, EpisodeId, VideoStream,
        api::{DashStream, PlayUrlResult},
    },
    utils,
};
use async_trait::async_trait;
use log::{debug, info, warn};
use std::{cmp::Reverse, collections::HashMap, sync::Arc};

/// 通过播放地址接口获取单集的 DASH 音视频流
pub struct PlayUrlExtractor {
    http_client: Arc<RobustClient>,
}

impl PlayUrlExtractor {
    pub fn new(http_client: Arc<RobustClient>) -> Self {
        Self { http_client }
    }
}

fn video_codec_name(stream: &DashStream) -> String {
    match stream.codecid {
        7 => "avc".to_string(),
        12 => "hevc".to_string(),
        13 => "av1".to_string(),
        _ if !stream.codecs.is_empty() => stream.codecs.clone(),
        other => format!("unknown({})", other),
    }
}

/// 不超过期望清晰度的流排在前面，各组内按清晰度从高到低
fn sort_videos(videos: &mut [VideoStream], preferred_quality: u16) {
    videos.sort_by_key(|v| (v.quality > preferred_quality, Reverse(v.quality)));
}

#[async_trait]
impl EpisodeExtractor for PlayUrlExtractor {
    async fn extract_episode(
        &self,
        episode_id: &EpisodeId,
        item: &BangumiListItem,
        args: &ExtractArgs,
        subpath_variables: &HashMap<String, String>,
        subpath_template: &str,
    ) -> AppResult<EpisodeData> {
        if item.is_preview {
            warn!("'{}' 是预告内容", item.name);
        }
        let qn = args.video_quality.to_string();
        let play: PlayUrlResult = self
            .http_client
            .fetch_json(
                endpoints::PLAYURL,
                &[
                    ("ep_id", episode_id.as_str()),
                    ("cid", item.cid.as_str()),
                    ("qn", qn.as_str()),
                    ("fnval", api::FNVAL_DASH),
                    ("fourk", "1"),
                ],
            )
            .await?;

        let Some(dash) = play.dash else {
            let kind = if play.durl.is_some() { "FLV/MP4" } else { "未知" };
            return Err(AppError::UnsupportedType(format!(
                "'{}' 仅提供 {} 格式的流",
                item.name, kind
            )));
        };

        let mut videos: Vec<VideoStream> = dash
            .video
            .iter()
            .map(|v| VideoStream {
                url: v.base_url.clone(),
                mirrors: v.backup_url.clone().unwrap_or_default(),
                codec: video_codec_name(v),
                width: v.width,
                height: v.height,
                quality: u16::try_from(v.id).unwrap_or(u16::MAX),
            })
            .collect();
        sort_videos(&mut videos, args.video_quality);

        let mut audios: Vec<AudioStream> = dash
            .audio
            .unwrap_or_default()
            .into_iter()
            .map(|a| AudioStream {
                url: a.base_url,
                mirrors: a.backup_url.unwrap_or_default(),
                codec: if a.codecs.is_empty() { "mp4a".to_string() } else { a.codecs },
                quality: a.id,
            })
            .collect();
        audios.sort_by_key(|a| Reverse(a.quality));

        if videos.is_empty() && audios.is_empty() {
            return Err(AppError::UnsupportedType(format!(
                "'{}' 的 DASH 信息中没有可用的流",
                item.name
            )));
        }

        let mut variables = subpath_variables.clone();
        variables.insert("name".to_string(), item.name.clone());
        variables.insert("id".to_string(), item.id.to_string());
        let path = utils::render_subpath(subpath_template, &variables);

        debug!(
            "ep{}: {} 个视频流, {} 个音频流 -> {}",
            episode_id,
            videos.len(),
            audios.len(),
            path.display()
        );
        info!("已提取 '{}'", item.name);

        Ok(EpisodeData {
            episode_id: episode_id.clone(),
            name: item.name.clone(),
            path,
            videos,
            audios,
            metadata: item.metadata.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(quality: u16) -> VideoStream {
        VideoStream {
            url: format!("http://v/{}", quality),
            mirrors: vec![],
            codec: "avc".into(),
            width: 0,
            height: 0,
            quality,
        }
    }

    #[test]
    fn test_sort_videos_prefers_requested_quality() {
        let mut videos = vec![video(32), video(120), video(80), video(112)];
        sort_videos(&mut videos, 80);
        let order: Vec<u16> = videos.iter().map(|v| v.quality).collect();
        assert_eq!(order, vec![80, 32, 120, 112]);
    }
}
