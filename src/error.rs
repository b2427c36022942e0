// src/error.rs

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("资源不存在: {0}")]
    NotFound(String),
    #[error("服务器返回错误状态 {status}: {url}")]
    HttpStatus { status: StatusCode, url: String },
    #[error("无访问权限: {0}")]
    NoAccessPermission(String),
    #[error("不支持的资源类型: {0}")]
    UnsupportedType(String),
    #[error("无法识别的链接或ID: '{0}'")]
    UnsupportedUrl(String),
    #[error("API 返回错误 (code {code}): {message}")]
    Api { code: i64, message: String },
    #[error("选集表达式无效: '{0}'")]
    InvalidSelection(String),
    #[error("网络请求失败: {0}")]
    Network(#[from] reqwest::Error),
    #[error("网络中间件错误: {0}")]
    NetworkMiddleware(#[from] reqwest_middleware::Error),
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON 解析错误: {0}")]
    Json(#[from] serde_json::Error),
    #[error("无法解析来自 '{url}' 的API响应: {source}")]
    ApiParseFailed {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("URL 解析错误: {0}")]
    Url(#[from] url::ParseError),
    #[error("用户中断")]
    UserInterrupt,
    #[error("未知错误: {0}")]
    Other(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;
