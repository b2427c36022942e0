// src/runner.rs

use crate::{
    error::*,
    extractor::tasks::{self, ExtractionOutcome, ExtractionTask},
    models::EpisodeData,
    ui,
};
use futures::{StreamExt, stream};
use log::{error, info, warn};
use std::{cmp::min, future::IntoFuture};
use tokio_util::sync::CancellationToken;

/// 以有限并发驱动一批提取任务，全部结束后按任务编号恢复顺序。
///
/// 取消时丢弃整个任务流，所有仍在进行的任务随之被取消。
pub async fn execute_tasks(
    tasks: Vec<ExtractionTask>,
    max_workers: usize,
    cancellation: &CancellationToken,
) -> AppResult<Vec<(usize, EpisodeData)>> {
    let total = tasks.len();
    let max_workers = min(max_workers.max(1), total);
    if max_workers == 0 {
        return Ok(vec![]);
    }
    info!("开始提取 {} 集 (并发数: {})", total, max_workers);

    let pbar = ui::new_tasks_progress_bar(total as u64, "提取");
    let mut pending = stream::iter(tasks)
        .map(IntoFuture::into_future)
        .buffer_unordered(max_workers);
    let mut outcomes: Vec<ExtractionOutcome> = Vec::with_capacity(total);

    loop {
        let next = tokio::select! {
            biased;
            _ = cancellation.cancelled() => {
                pbar.abandon();
                warn!("提取被取消，已完成 {}/{} 个任务", outcomes.len(), total);
                return Err(AppError::UserInterrupt);
            }
            next = pending.next() => next,
        };

        match next {
            Some(Ok(outcome)) => {
                pbar.inc(1);
                if let Err(failure) = &outcome.result {
                    pbar.println(format!("{} 第 {} 项已跳过: {}", *ui::WARN, outcome.index + 1, failure));
                }
                outcomes.push(outcome);
            }
            Some(Err(e)) => {
                pbar.abandon();
                error!("任务出现无法恢复的错误，中止整个批次: {}", e);
                return Err(e);
            }
            None => break,
        }
    }

    pbar.finish_and_clear();
    Ok(tasks::reassemble(outcomes))
}
