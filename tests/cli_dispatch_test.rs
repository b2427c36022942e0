// tests/cli_dispatch_test.rs

use assert_cmd::Command;
use mockito::{Matcher, Mock, Server};
use predicates::prelude::*;
use serde_json::json;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tempfile::{TempDir, tempdir};

// 辅助函数，隔离配置文件并把 API 指向本地
fn main_command(config_dir: &TempDir, api_base: &str) -> Command {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
    cmd.env("BANGUMI_DL_CONFIG", config_dir.path().join("config.json"))
        .env("BANGUMI_DL_API_BASE", api_base)
        .env("NO_COLOR", "1");
    cmd
}

fn write_config(dir: &Path) {
    let config = json!({
        "network": { "connect_timeout_secs": 2, "timeout_secs": 5, "max_retries": 0 },
        "url_templates": {}
    });
    std::fs::write(dir.join("config.json"), config.to_string()).unwrap();
}

fn mock_season(server: &mut Server, season_id: &str, title: &str) -> Vec<Mock> {
    let view = server
        .mock("GET", "/pgc/view/web/season")
        .match_query(Matcher::UrlEncoded("season_id".into(), season_id.into()))
        .with_body(json!({ "code": 0, "result": { "season_id": 1, "title": title } }).to_string())
        .create();
    let section = server
        .mock("GET", "/pgc/web/season/section")
        .match_query(Matcher::UrlEncoded("season_id".into(), season_id.into()))
        .with_body(
            json!({
                "code": 0,
                "result": {
                    "main_section": { "episodes": [
                        { "id": 501, "cid": 5010, "title": "1", "long_title": "序章" },
                        { "id": 502, "cid": 5020, "title": "2", "long_title": "终章" }
                    ]},
                    "section": []
                }
            })
            .to_string(),
        )
        .create();
    vec![view, section]
}

fn mock_playurl(server: &mut Server) -> Vec<Mock> {
    let ok = server
        .mock("GET", "/pgc/player/web/playurl")
        .match_query(Matcher::UrlEncoded("ep_id".into(), "501".into()))
        .with_body(
            json!({
                "code": 0,
                "result": { "dash": {
                    "video": [ { "id": 80, "base_url": "http://cdn/v.m4s", "codecid": 7, "width": 1920, "height": 1080 } ],
                    "audio": [ { "id": 30280, "base_url": "http://cdn/a.m4s" } ]
                }}
            })
            .to_string(),
        )
        .create();
    let forbidden = server
        .mock("GET", "/pgc/player/web/playurl")
        .match_query(Matcher::UrlEncoded("ep_id".into(), "502".into()))
        .with_body(json!({ "code": -10403, "message": "大会员专享限制" }).to_string())
        .create();
    vec![ok, forbidden]
}

// --- 测试基本 CLI 行为 ---

#[test]
fn test_help_flag() {
    let dir = tempdir().unwrap();
    let mut cmd = main_command(&dir, "http://127.0.0.1:9");
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("显示此帮助信息并退出"))
        .stdout(predicate::str::contains("--with-section"));
}

#[test]
fn test_missing_mode_shows_help() {
    let dir = tempdir().unwrap();
    let mut cmd = main_command(&dir, "http://127.0.0.1:9");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_url_and_batch_are_exclusive() {
    let dir = tempdir().unwrap();
    let mut cmd = main_command(&dir, "http://127.0.0.1:9");
    cmd.arg("ss1").arg("-b").arg("links.txt");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

// --- 测试核心分发逻辑 ---

#[test]
fn test_unsupported_url_fails_and_creates_config() {
    let dir = tempdir().unwrap();
    let mut cmd = main_command(&dir, "http://127.0.0.1:9");
    cmd.arg("https://www.bilibili.com/video/BV1xx411c7mD");
    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("无法识别的链接或ID"));
    assert!(dir.path().join("config.json").is_file());
}

#[test]
fn test_invalid_selection_fails() {
    let mut server = Server::new();
    let _season = mock_season(&mut server, "1", "测试番剧");
    let dir = tempdir().unwrap();
    write_config(dir.path());

    let mut cmd = main_command(&dir, &server.url());
    cmd.arg("ss1").arg("-p").arg("abc");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("选集表达式无效"));
}

#[test]
fn test_single_url_extracts_and_skips_forbidden_episode() {
    let mut server = Server::new();
    let _season = mock_season(&mut server, "1", "测试番剧");
    let _playurl = mock_playurl(&mut server);
    let dir = tempdir().unwrap();
    write_config(dir.path());

    let mut cmd = main_command(&dir, &server.url());
    cmd.arg("ss1").arg("-w").arg("2");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("测试番剧"))
        .stdout(predicate::str::contains("第1话 序章"))
        .stdout(predicate::str::contains("成功: 1"))
        .stdout(predicate::str::contains("跳过: 1"));
}

#[test]
fn test_batch_mode_reports_failed_lines() {
    let mut server = Server::new();
    let _season = mock_season(&mut server, "1", "测试番剧");
    let _playurl = mock_playurl(&mut server);
    let dir = tempdir().unwrap();
    write_config(dir.path());

    let batch_path = dir.path().join("links.txt");
    let mut file = File::create(&batch_path).unwrap();
    writeln!(file, "# 注释行").unwrap();
    writeln!(file, "ss1").unwrap();
    writeln!(file).unwrap();
    writeln!(file, "https://example.com/not-a-bangumi").unwrap();

    let mut cmd = main_command(&dir, &server.url());
    cmd.arg("-b").arg(&batch_path).arg("-p").arg("1");
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("成功任务: 1"))
        .stdout(predicate::str::contains("失败任务: 1"))
        .stdout(predicate::str::contains("总计: 2"));
}

#[test]
fn test_empty_batch_file_succeeds() {
    let dir = tempdir().unwrap();
    write_config(dir.path());
    let batch_path = dir.path().join("empty.txt");
    std::fs::write(&batch_path, "# 只有注释\n\n").unwrap();

    let mut cmd = main_command(&dir, "http://127.0.0.1:9");
    cmd.arg("--batch-file").arg(&batch_path);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("为空"));
}
