// src/config/file.rs

use crate::{
    config::ExternalConfig,
    constants,
    error::{AppError, AppResult},
};
use anyhow::{Context, anyhow};
use log::{debug, info};
use std::{fs, path::PathBuf};

/// 覆盖配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "BANGUMI_DL_CONFIG";
/// 覆盖 API 根地址的环境变量
pub const API_BASE_ENV: &str = "BANGUMI_DL_API_BASE";

pub(super) fn get_config_path() -> AppResult<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) && !path.is_empty() {
        debug!("使用来自环境变量 {} 的配置文件路径", CONFIG_PATH_ENV);
        return Ok(PathBuf::from(path));
    }
    let path = dirs::home_dir()
        .ok_or_else(|| AppError::Other(anyhow!("无法获取用户主目录")))?
        .join(constants::CONFIG_DIR_NAME)
        .join(constants::CONFIG_FILE_NAME);
    Ok(path)
}

pub(crate) fn load_or_create_external_config() -> AppResult<ExternalConfig> {
    let config_path = get_config_path()?;
    if config_path.is_file() {
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("读取配置文件 '{}' 失败", config_path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("解析配置文件 '{}' 失败", config_path.display()))
            .map_err(AppError::from)
    } else {
        info!("配置文件 {:?} 不存在，将创建默认配置。", config_path);
        let config = ExternalConfig::default_app_config();

        if let Some(dir) = config_path.parent() {
            fs::create_dir_all(dir)?;
        }

        let json_content = serde_json::to_string_pretty(&config)?;
        fs::write(&config_path, json_content)?;

        Ok(config)
    }
}

pub fn resolve_api_base() -> Option<String> {
    match std::env::var(API_BASE_ENV) {
        Ok(base) if !base.is_empty() => {
            debug!("使用来自环境变量 {} 的 API 地址: {}", API_BASE_ENV, base);
            Some(base)
        }
        _ => None,
    }
}
