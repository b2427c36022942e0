// src/main.rs

use bangumi_dl::{cli::Cli, error::AppError, logger, run_from_cli, ui};
use clap::{CommandFactory, FromArgMatches};
use colored::*;
use std::{env, sync::Arc};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    // 为 Windows 终端启用 ANSI 颜色支持。
    #[cfg(windows)]
    {
        colored::control::set_virtual_terminal(true).ok();
    }

    let bin_name = env::var("CARGO_BIN_NAME").unwrap_or_else(|_| "bangumi-dl".to_string());
    let after_help = format!(
        "示例:\n  # 提取整季\n  {bin} https://www.bilibili.com/bangumi/play/ss28770\n\n  # 短链接 + 选集，包含专区内容\n  {bin} ep314291 -p 1~3,$ -s\n\n  # 批量处理\n  {bin} -b my_links.txt",
        bin = bin_name
    );
    let cmd = Cli::command().after_help(after_help);
    let args = match Cli::from_arg_matches(&cmd.get_matches()) {
        Ok(args) => Arc::new(args),
        Err(e) => e.exit(),
    };
    logger::init_logger(args.log_level);

    let cancellation_token = CancellationToken::new();
    let ctrl_c_token = cancellation_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\n{} 用户中断，正在取消剩余任务。", *ui::WARN);
            ctrl_c_token.cancel();
        }
    });

    match run_from_cli(args, cancellation_token).await {
        Ok(()) => {}
        Err(AppError::UserInterrupt) => std::process::exit(130),
        Err(e) => {
            eprintln!("\n{} {}", "[X]".red(), format!("程序执行出错: {}", e).red());
            std::process::exit(1);
        }
    }
}
