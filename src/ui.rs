// src/ui.rs

use crate::{constants, models::EpisodeData, utils};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::{sync::LazyLock, time::Duration};

pub static OK: LazyLock<ColoredString> = LazyLock::new(|| "[OK]".green());
pub static ERROR: LazyLock<ColoredString> = LazyLock::new(|| "[X]".red());
pub static INFO: LazyLock<ColoredString> = LazyLock::new(|| "[i]".cyan());
pub static WARN: LazyLock<ColoredString> = LazyLock::new(|| "[!]".yellow());
pub static CTRL_C: LazyLock<ColoredString> = LazyLock::new(|| "Ctrl+C".yellow());

pub fn print_header(title: &str) {
    println!("\n{}", "═".repeat(constants::UI_WIDTH));
    println!(" {}", title.cyan().bold());
    println!("{}", "═".repeat(constants::UI_WIDTH));
}

pub fn print_sub_header(title: &str) {
    println!("\n--- {} ---", title.bold());
}

pub fn plain(message: &str) {
    println!("{}", message);
}

pub fn info(message: &str) {
    println!("{} {}", *INFO, message);
}

pub fn warn(message: &str) {
    println!("{} {}", *WARN, message.yellow());
}

pub fn error(message: &str) {
    eprintln!("{} {}", *ERROR, message.red());
}

pub fn badge(label: &str, text: &str) {
    println!("{} {}", format!(" {} ", label).black().on_cyan(), text.bold());
}

pub fn new_tasks_progress_bar(total: u64, prefix: &str) -> ProgressBar {
    let style = ProgressStyle::with_template(
        "{prefix:7.bold.cyan} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}/{len:3} ({percent:>3}%) [ETA: {eta}]",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("#>-");
    let pbar = ProgressBar::new(total);
    pbar.set_style(style);
    pbar.set_prefix(prefix.to_string());
    pbar.enable_steady_tick(Duration::from_millis(100));
    pbar
}

/// 打印提取结果列表
pub fn print_episode_summary(results: &[(usize, EpisodeData)], selected: usize) {
    print_sub_header("提取结果");
    for (index, data) in results {
        let best_video = data
            .videos
            .first()
            .map(|v| format!("{}p {}", v.height, v.codec))
            .unwrap_or_else(|| "无视频".to_string());
        println!(
            "  [{}] {} {}",
            format!("{:>3}", index + 1).yellow(),
            utils::truncate_text(&data.name, 40),
            format!(
                "({}, {} 个音频流) -> {}",
                best_video,
                data.audios.len(),
                data.path.display()
            )
            .dimmed()
        );
    }
    let skipped = selected.saturating_sub(results.len());
    let summary = format!(
        "{} | {}",
        format!("成功: {}", results.len()).green(),
        format!("跳过: {}", skipped).yellow()
    );
    println!("\n{}", summary);
}
