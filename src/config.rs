// src/config.rs

pub mod file;

use self::file::load_or_create_external_config;
use crate::{cli::Cli, constants, error::AppResult, sign::AppCredentials};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, time::Duration};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NetworkConfig {
    pub connect_timeout_secs: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalConfig {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub credentials: AppCredentials,
    pub url_templates: HashMap<String, String>,
}

pub(crate) fn default_url_templates(api_base: &str) -> HashMap<String, String> {
    use constants::api::endpoints::*;
    HashMap::from([
        (SEASON_VIEW.into(), format!("{}/pgc/view/web/season", api_base)),
        (MEDIA_REVIEW.into(), format!("{}/pgc/review/user", api_base)),
        (SEASON_SECTION.into(), format!("{}/pgc/web/season/section", api_base)),
        (PLAYURL.into(), format!("{}/pgc/player/web/playurl", api_base)),
    ])
}

impl ExternalConfig {
    pub(crate) fn default_app_config() -> Self {
        // 为 NetworkConfig 提供一组稳健的默认值
        let network_config = NetworkConfig {
            connect_timeout_secs: Some(10),
            timeout_secs: Some(60),
            max_retries: Some(3),
            user_agent: None,
        };

        Self {
            network: network_config,
            credentials: AppCredentials::default(),
            url_templates: default_url_templates(constants::api::DEFAULT_API_BASE),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub max_workers: usize,
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub max_retries: u32,
    pub credentials: AppCredentials,
    pub url_templates: HashMap<String, String>,
}

impl AppConfig {
    pub fn new(args: &Cli) -> AppResult<Self> {
        let external_config = load_or_create_external_config()?;
        let config = Self::from_external(external_config, args.workers);
        Ok(match file::resolve_api_base() {
            Some(base) => config.with_api_base(&base),
            None => config,
        })
    }

    pub(crate) fn from_external(external_config: ExternalConfig, workers: Option<usize>) -> Self {
        // 缺失的端点回落到默认地址，旧配置文件仍然可用
        let mut url_templates = default_url_templates(constants::api::DEFAULT_API_BASE);
        url_templates.extend(external_config.url_templates);

        Self {
            max_workers: workers.unwrap_or(constants::DEFAULT_WORKERS).max(1),
            user_agent: external_config
                .network
                .user_agent
                .unwrap_or_else(|| constants::USER_AGENT.into()),
            connect_timeout: Duration::from_secs(
                external_config.network.connect_timeout_secs.unwrap_or(10),
            ),
            timeout: Duration::from_secs(external_config.network.timeout_secs.unwrap_or(60)),
            max_retries: external_config.network.max_retries.unwrap_or(3),
            credentials: external_config.credentials,
            url_templates,
        }
    }

    /// 将所有 API 端点指向另一个服务器根地址，主要用于测试
    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.url_templates = default_url_templates(api_base.trim_end_matches('/'));
        self
    }
}

#[cfg(feature = "testing")]
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_workers: 4,
            user_agent: "test-agent/1.0".to_string(),
            connect_timeout: Duration::from_secs(5),
            timeout: Duration::from_secs(15),
            max_retries: 0,
            credentials: AppCredentials::default(),
            url_templates: default_url_templates(constants::api::DEFAULT_API_BASE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_config_merges_missing_endpoints() {
        let external: ExternalConfig = serde_json::from_str(
            r#"{
                "network": { "timeout_secs": 5 },
                "url_templates": { "PLAYURL": "http://localhost:1/playurl" }
            }"#,
        )
        .unwrap();
        let config = AppConfig::from_external(external, Some(0));

        assert_eq!(config.max_workers, 1);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.credentials, AppCredentials::default());
        assert_eq!(
            config.url_templates.get(constants::api::endpoints::PLAYURL).map(String::as_str),
            Some("http://localhost:1/playurl")
        );
        assert_eq!(
            config.url_templates.get(constants::api::endpoints::SEASON_VIEW).map(String::as_str),
            Some("https://api.bilibili.com/pgc/view/web/season")
        );
    }

    #[test]
    fn test_with_api_base_rewrites_all_endpoints() {
        let config = AppConfig::from_external(ExternalConfig::default_app_config(), None)
            .with_api_base("http://127.0.0.1:1234/");
        assert_eq!(config.max_workers, constants::DEFAULT_WORKERS);
        assert!(
            config
                .url_templates
                .values()
                .all(|url| url.starts_with("http://127.0.0.1:1234/pgc/"))
        );
    }
}
