// src/lib.rs

pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod extractor;
pub mod logger;
pub mod models;
pub mod runner;
pub mod selection;
pub mod sign;
pub mod ui;
pub mod utils;

use crate::{
    cli::Cli,
    client::RobustClient,
    config::AppConfig,
    error::{AppError, AppResult},
    extractor::{ExtractArgs, bangumi_batch::BangumiBatchExtractor, episode::PlayUrlExtractor},
    models::EpisodeData,
};
use anyhow::anyhow;
use colored::*;
use log::{debug, error, info, warn};
use std::{path::Path, sync::Arc};
use tokio_util::sync::CancellationToken;

/// 核心的执行上下文，包含所有任务所需的状态和工具
#[derive(Clone)]
pub struct BatchJobContext {
    pub config: Arc<AppConfig>,
    pub http_client: Arc<RobustClient>,
    pub extract_args: Arc<ExtractArgs>,
    pub cancellation_token: CancellationToken,
}

impl BatchJobContext {
    pub fn new(
        config: Arc<AppConfig>,
        extract_args: ExtractArgs,
        cancellation_token: CancellationToken,
    ) -> AppResult<Self> {
        let http_client = Arc::new(RobustClient::new(config.clone())?);
        Ok(Self {
            config,
            http_client,
            extract_args: Arc::new(extract_args),
            cancellation_token,
        })
    }
}

/// 库的公共入口点，由 `main.rs` 调用
pub async fn run_from_cli(args: Arc<Cli>, cancellation_token: CancellationToken) -> AppResult<()> {
    debug!("CLI 参数: {:?}", args);
    let config = Arc::new(AppConfig::new(&args)?);
    debug!("加载的应用配置: {:?}", config);

    let context = BatchJobContext::new(config, ExtractArgs::from(&*args), cancellation_token)?;

    if let Some(batch_file) = &args.batch_file {
        process_batch_tasks(batch_file, context).await
    } else if let Some(url) = &args.url {
        let results = extract_bangumi(url, &context).await?;
        let selected = results.selected;
        ui::print_episode_summary(&results.episodes, selected);
        Ok(())
    } else {
        Err(AppError::Other(anyhow!("未提供链接或批量文件")))
    }
}

/// 一次番剧提取的结果
#[derive(Debug)]
pub struct BangumiExtraction {
    pub title: String,
    /// 筛选后选中的集数
    pub selected: usize,
    /// 按原始顺序排列的成功结果
    pub episodes: Vec<(usize, EpisodeData)>,
}

/// 解析链接、获取目录、筛选并并发提取每一集
pub async fn extract_bangumi(input: &str, context: &BatchJobContext) -> AppResult<BangumiExtraction> {
    info!("开始处理: {}", input);
    let extractor = BangumiBatchExtractor::new(
        context.http_client.clone(),
        Arc::new(PlayUrlExtractor::new(context.http_client.clone())),
    );
    let target = extractor.parse_target(input)?;
    let (title, tasks) = tokio::select! {
        biased;
        _ = context.cancellation_token.cancelled() => return Err(AppError::UserInterrupt),
        extracted = extractor.extract(&target, context.extract_args.clone()) => extracted?,
    };
    ui::badge("番剧", &title);

    let selected = tasks.len();
    if selected == 0 {
        ui::info("未选中任何剧集。");
        return Ok(BangumiExtraction {
            title,
            selected,
            episodes: vec![],
        });
    }

    let episodes = runner::execute_tasks(
        tasks,
        context.config.max_workers,
        &context.cancellation_token,
    )
    .await?;
    info!("'{}': 成功 {} / 选中 {}", title, episodes.len(), selected);

    Ok(BangumiExtraction {
        title,
        selected,
        episodes,
    })
}

async fn process_batch_tasks(batch_file: &Path, context: BatchJobContext) -> AppResult<()> {
    let content = std::fs::read_to_string(batch_file).map_err(|e| {
        error!("读取批量文件 '{}' 失败: {}", batch_file.display(), e);
        AppError::from(e)
    })?;

    let tasks: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.starts_with('#'))
        .collect();
    if tasks.is_empty() {
        warn!("批量文件 '{}' 为空或不含有效行。", batch_file.display());
        ui::warn(&format!("批量文件 '{}' 为空。", batch_file.display()));
        return Ok(());
    }

    let mut success = 0;
    let mut failed = 0;
    ui::print_header(&format!(
        "开始批量处理任务 (按 {} 可随时退出)",
        *ui::CTRL_C
    ));
    for (i, task) in tasks.iter().enumerate() {
        if context.cancellation_token.is_cancelled() {
            return Err(AppError::UserInterrupt);
        }
        ui::print_sub_header(&format!(
            "批量任务 {}/{} - {}",
            i + 1,
            tasks.len(),
            utils::truncate_text(task, 60)
        ));
        match extract_bangumi(task, &context).await {
            Ok(results) => {
                success += 1;
                ui::print_episode_summary(&results.episodes, results.selected);
                ui::plain(&format!("{} '{}' 处理完成", *ui::OK, results.title));
            }
            Err(AppError::UserInterrupt) => return Err(AppError::UserInterrupt),
            Err(e) => {
                failed += 1;
                error!("批量任务 '{}' 失败: {}", task, e);
                ui::error(&format!("处理任务时发生错误: {}", e));
            }
        }
    }

    ui::print_header("批量任务报告");
    println!(
        "{} | {} | 总计: {}",
        format!("成功任务: {}", success).green(),
        format!("失败任务: {}", failed).red(),
        tasks.len()
    );
    if failed > 0 {
        Err(AppError::Other(anyhow!("{} 个批量任务执行失败。", failed)))
    } else {
        Ok(())
    }
}
