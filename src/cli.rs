// src/cli.rs

use crate::constants;
use clap::{Parser, ValueEnum, command, crate_version};
use std::path::PathBuf;

/// 定义日志输出级别
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    version = crate_version!(),
    about,
    long_about = None,
    arg_required_else_help = true,
    disable_help_flag = true,
    disable_version_flag = true,
)]
#[command(group(
    clap::ArgGroup::new("mode")
        .required(true)
        .args(&["url", "batch_file"]),
))]
pub struct Cli {
    // --- 运行模式 (Mode) ---
    /// 番剧链接或短链接 (md/ss/ep + 数字)
    #[arg(value_name = "URL", help_heading = "Mode")]
    pub url: Option<String>,
    /// 从文本文件批量处理多个链接 (每行一个)
    #[arg(short, long, value_name = "FILE", help_heading = "Mode")]
    pub batch_file: Option<PathBuf>,

    // --- 提取选项 (Options) ---
    /// 选集 (例如 '1,3,5~8', '~', '$', '-3~')
    #[arg(short = 'p', long, default_value_t = constants::DEFAULT_SELECTION.to_string(), value_name = "SELECTION", help_heading = "Options")]
    pub episodes: String,
    /// 同时提取专区 (花絮、特别篇等) 内容
    #[arg(short = 's', long, action = clap::ArgAction::SetTrue, help_heading = "Options")]
    pub with_section: bool,
    /// 获取每集的扩展元数据
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Options")]
    pub with_metadata: bool,
    /// 期望的视频清晰度代码 (如 127, 80, 64)
    #[arg(short = 'q', long, default_value_t = constants::DEFAULT_VIDEO_QUALITY, help_heading = "Options")]
    pub video_quality: u16,
    /// 设置最大并发提取数
    #[arg(short, long, value_parser = clap::value_parser!(usize), help_heading = "Options")]
    pub workers: Option<usize>,

    // --- 通用选项 (General) ---
    /// 显示此帮助信息并退出
    #[arg(short = 'h', long, action = clap::ArgAction::Help, global = true, help_heading = "General")]
    _help: Option<bool>,
    /// 显示版本信息并退出
    #[arg(short = 'V', long, action = clap::ArgAction::Version, global = true, help_heading = "General")]
    _version: Option<bool>,
    /// (隐藏参数) 设置日志文件的输出级别，用于调试
    #[arg(long, value_enum, default_value_t = LogLevel::Off, global = true, hide = true)]
    pub log_level: LogLevel,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::ExtractArgs;

    #[test]
    fn test_defaults_map_to_extract_args() {
        let cli = Cli::parse_from(["bangumi-dl", "ss28770"]);
        let args = ExtractArgs::from(&cli);
        assert_eq!(cli.url.as_deref(), Some("ss28770"));
        assert_eq!(args.episodes, "~");
        assert!(!args.with_section);
        assert!(!args.with_metadata);
        assert_eq!(args.video_quality, constants::DEFAULT_VIDEO_QUALITY);
    }

    #[test]
    fn test_flags_map_to_extract_args() {
        let cli = Cli::parse_from([
            "bangumi-dl", "ep1", "-p", "1~3,$", "-s", "--with-metadata", "-q", "80", "-w", "2",
        ]);
        let args = ExtractArgs::from(&cli);
        assert_eq!(args.episodes, "1~3,$");
        assert!(args.with_section);
        assert!(args.with_metadata);
        assert_eq!(args.video_quality, 80);
        assert_eq!(cli.workers, Some(2));
    }

    #[test]
    fn test_mode_is_required() {
        assert!(Cli::try_parse_from(["bangumi-dl", "-p", "1"]).is_err());
    }
}
