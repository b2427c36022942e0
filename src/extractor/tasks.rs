// src/extractor/tasks.rs

use super::{EpisodeExtractor, ExtractArgs};
use crate::{
    constants,
    error::*,
    models::{BangumiListItem, EpisodeData},
};
use futures::{FutureExt, future::BoxFuture};
use log::{debug, error};
use std::{collections::HashMap, fmt, future::IntoFuture, sync::Arc};

pub type TaskFuture = BoxFuture<'static, AppResult<ExtractionOutcome>>;

/// 单集提取中允许跳过的失败类型，其余错误一律中止整个批次
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EpisodeFailure {
    NoAccessPermission(String),
    HttpStatus(String),
    UnsupportedType(String),
    NotFound(String),
}

impl fmt::Display for EpisodeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoAccessPermission(msg) => write!(f, "无访问权限: {}", msg),
            Self::HttpStatus(msg) => write!(f, "服务器返回错误: {}", msg),
            Self::UnsupportedType(msg) => write!(f, "不支持的资源类型: {}", msg),
            Self::NotFound(msg) => write!(f, "资源不存在: {}", msg),
        }
    }
}

impl TryFrom<AppError> for EpisodeFailure {
    type Error = AppError;

    fn try_from(error: AppError) -> Result<Self, Self::Error> {
        match error {
            AppError::NoAccessPermission(msg) => Ok(Self::NoAccessPermission(msg)),
            AppError::HttpStatus { status, url } => {
                Ok(Self::HttpStatus(format!("{} ({})", status, url)))
            }
            AppError::UnsupportedType(msg) => Ok(Self::UnsupportedType(msg)),
            AppError::NotFound(msg) => Ok(Self::NotFound(msg)),
            other => Err(other),
        }
    }
}

/// 一个任务的结果，`index` 是该集在筛选后列表中的位置 (从 0 开始)
#[derive(Debug)]
pub struct ExtractionOutcome {
    pub index: usize,
    pub result: Result<EpisodeData, EpisodeFailure>,
}

impl ExtractionOutcome {
    pub fn into_data(self) -> Option<(usize, EpisodeData)> {
        self.result.ok().map(|data| (self.index, data))
    }
}

/// 延迟执行的单集提取任务，在被轮询之前不会发出任何请求
pub struct ExtractionTask {
    index: usize,
    future: TaskFuture,
}

impl ExtractionTask {
    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Debug for ExtractionTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionTask")
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

impl IntoFuture for ExtractionTask {
    type Output = AppResult<ExtractionOutcome>;
    type IntoFuture = TaskFuture;

    fn into_future(self) -> Self::IntoFuture {
        self.future
    }
}

/// 为筛选后的每一集构造一个任务，任务编号按列表顺序固定
pub fn build_tasks(
    title: &str,
    episodes: Vec<BangumiListItem>,
    args: Arc<ExtractArgs>,
    extractor: Arc<dyn EpisodeExtractor>,
) -> Vec<ExtractionTask> {
    let subpath_variables = Arc::new(HashMap::from([("title".to_string(), title.to_string())]));
    debug!("为 '{}' 构造 {} 个提取任务", title, episodes.len());

    episodes
        .into_iter()
        .enumerate()
        .map(|(index, item)| ExtractionTask {
            index,
            future: extract_episode_data(
                index,
                item,
                args.clone(),
                extractor.clone(),
                subpath_variables.clone(),
            )
            .boxed(),
        })
        .collect()
}

async fn extract_episode_data(
    index: usize,
    item: BangumiListItem,
    args: Arc<ExtractArgs>,
    extractor: Arc<dyn EpisodeExtractor>,
    subpath_variables: Arc<HashMap<String, String>>,
) -> AppResult<ExtractionOutcome> {
    let result = extractor
        .extract_episode(
            &item.episode_id,
            &item,
            &args,
            &subpath_variables,
            constants::EPISODE_SUBPATH_TEMPLATE,
        )
        .await;

    match result {
        Ok(data) => Ok(ExtractionOutcome {
            index,
            result: Ok(data),
        }),
        Err(e) => {
            let failure = EpisodeFailure::try_from(e)?;
            error!("'{}' 提取失败，已跳过: {}", item.name, failure);
            Ok(ExtractionOutcome {
                index,
                result: Err(failure),
            })
        }
    }
}

/// 按任务编号恢复原始顺序，只保留成功的结果
pub fn reassemble(outcomes: Vec<ExtractionOutcome>) -> Vec<(usize, EpisodeData)> {
    let mut results: Vec<(usize, EpisodeData)> = outcomes
        .into_iter()
        .filter_map(ExtractionOutcome::into_data)
        .collect();
    results.sort_by_key(|(index, _)| *index);
    results
}
