// src/selection.rs

use crate::{
    error::{AppError, AppResult},
    models::BangumiListItem,
};
use log::{debug, warn};
use regex::Regex;
use std::{collections::BTreeSet, sync::LazyLock};

static SELECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    let point = r"(-?\d+|\$)";
    let part = format!(r"({p}?~{p}?|{p})", p = point);
    Regex::new(&format!(r"^{part}(,{part})*$", part = part)).unwrap()
});

/// 解析选集表达式，返回选中的位置集合 (从 1 开始)。
///
/// 语法: `1,3,5~8`、`~3`、`10~`、`~` (全部)、`$` (最后一集)，负数从末尾倒数。
pub fn parse_episodes_selection(selection: &str, total: usize) -> AppResult<BTreeSet<usize>> {
    let compact: String = selection.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.eq_ignore_ascii_case("all") {
        return Ok((1..=total).collect());
    }
    if !SELECTION_RE.is_match(&compact) {
        return Err(AppError::InvalidSelection(selection.to_string()));
    }
    if total == 0 {
        warn!("剧集列表为空，无可选的剧集");
        return Ok(BTreeSet::new());
    }

    let total_i = total as i64;
    let resolve = |point: &str, default: i64| -> AppResult<i64> {
        match point {
            "" => Ok(default),
            "$" => Ok(total_i),
            n => {
                let value: i64 = n
                    .parse()
                    .map_err(|_| AppError::InvalidSelection(selection.to_string()))?;
                Ok(if value < 0 { total_i + 1 + value } else { value })
            }
        }
    };

    let mut positions = BTreeSet::new();
    for part in compact.split(',') {
        let (start, end) = match part.split_once('~') {
            Some((start, end)) => (resolve(start, 1)?, resolve(end, total_i)?),
            None => {
                let single = resolve(part, 1)?;
                (single, single)
            }
        };
        positions.extend(
            (start.max(1)..=end.min(total_i)).map(|p| p as usize),
        );
    }
    debug!("选集 '{}' (共 {} 集) -> {:?}", selection, total, positions);
    Ok(positions)
}

/// 先按专区标记过滤，再按选集表达式在过滤后的列表上挑选，保持原有顺序
pub fn filter_episodes(
    episodes: Vec<BangumiListItem>,
    with_section: bool,
    selection: &str,
) -> AppResult<Vec<BangumiListItem>> {
    let episodes: Vec<BangumiListItem> = episodes
        .into_iter()
        .filter(|item| with_section || !item.is_section)
        .collect();
    let selected = parse_episodes_selection(selection, episodes.len())?;
    Ok(episodes
        .into_iter()
        .enumerate()
        .filter(|(i, _)| selected.contains(&(i + 1)))
        .map(|(_, item)| item)
        .collect())
}
