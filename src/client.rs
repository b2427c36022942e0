// src/client.rs

use crate::{
    config::AppConfig,
    constants::api::codes,
    error::*,
    models::api::ApiEnvelope,
    sign,
};
use anyhow::anyhow;
use log::{debug, warn};
use reqwest::{Response, StatusCode};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::de::DeserializeOwned;
use std::{collections::BTreeMap, sync::Arc};
use url::Url;

/// 所有 API 请求共用的客户端，发出前统一签名
#[derive(Clone)]
pub struct RobustClient {
    pub client: ClientWithMiddleware,
    config: Arc<AppConfig>,
}

impl RobustClient {
    pub fn new(config: Arc<AppConfig>) -> AppResult<Self> {
        let retry_policy =
            ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let client = ClientBuilder::new(
            reqwest::Client::builder()
                .user_agent(config.user_agent.clone())
                .connect_timeout(config.connect_timeout)
                .timeout(config.timeout)
                .pool_max_idle_per_host(config.max_workers * 2)
                .build()?,
        )
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build();

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub async fn get(&self, url: Url) -> AppResult<Response> {
        let res = self.client.get(url.clone()).send().await?;
        match res.status() {
            StatusCode::NOT_FOUND => Err(AppError::NotFound(url.to_string())),
            status if !status.is_success() => Err(AppError::HttpStatus {
                status,
                url: url.to_string(),
            }),
            _ => Ok(res),
        }
    }

    /// 构造带签名查询参数的完整请求地址
    pub fn signed_url(&self, endpoint: &str, params: &[(&str, &str)]) -> AppResult<Url> {
        let base = self
            .config
            .url_templates
            .get(endpoint)
            .ok_or_else(|| AppError::Other(anyhow!("未配置 API 端点 '{}'", endpoint)))?;
        let params: BTreeMap<String, String> = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let signed = sign::app_sign(&params, &self.config.credentials);
        Ok(Url::parse(&format!("{}?{}", base, sign::encode_query(&signed)))?)
    }

    /// 请求一个 API 端点并解出响应外壳中的 `result`
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> AppResult<T> {
        let url = self.signed_url(endpoint, params)?;
        debug!("请求 API: {}", url);
        let body = self.get(url.clone()).await?.text().await?;
        let envelope: ApiEnvelope<T> =
            serde_json::from_str(&body).map_err(|source| AppError::ApiParseFailed {
                url: url.to_string(),
                source,
            })?;

        check_api_code(envelope.code, &envelope.message, url.as_str())?;
        envelope.result.ok_or_else(|| {
            warn!("API '{}' 响应中缺少 result 字段", url);
            AppError::Other(anyhow!("API '{}' 响应中缺少数据", url))
        })
    }
}

/// 将业务错误码映射为错误类型
pub(crate) fn check_api_code(code: i64, message: &str, url: &str) -> AppResult<()> {
    if code == codes::OK {
        return Ok(());
    }
    let detail = format!("{} ({})", message, url);
    if codes::NOT_FOUND.contains(&code) {
        Err(AppError::NotFound(detail))
    } else if codes::NO_PERMISSION.contains(&code) {
        Err(AppError::NoAccessPermission(detail))
    } else {
        Err(AppError::Api {
            code,
            message: message.to_string(),
        })
    }
}
