// src/constants.rs

pub const UI_WIDTH: usize = 88;
pub const MAX_FILENAME_BYTES: usize = 200;
pub const CONFIG_DIR_NAME: &str = concat!(".", clap::crate_name!());
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const LOG_FILE_NAME: &str = "app.log";
pub const LOG_FALLBACK_FILE_NAME: &str = "fallback.log";
pub const DEFAULT_SELECTION: &str = "~";
pub const DEFAULT_VIDEO_QUALITY: u16 = 127;
pub const DEFAULT_WORKERS: usize = 8;
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// 签名协议常量
pub const APPKEY: &str = "4409e2ce8ffd12b8";
pub const APPSEC: &str = "59b43e04ad6965f34319062b478f83dd";

/// 每集输出路径的命名模板
pub const EPISODE_SUBPATH_TEMPLATE: &str = "{title}/{name}";

pub mod api {
    pub const DEFAULT_API_BASE: &str = "https://api.bilibili.com";

    pub mod endpoints {
        pub const SEASON_VIEW: &str = "SEASON_VIEW";
        pub const MEDIA_REVIEW: &str = "MEDIA_REVIEW";
        pub const SEASON_SECTION: &str = "SEASON_SECTION";
        pub const PLAYURL: &str = "PLAYURL";
    }

    pub mod codes {
        pub const OK: i64 = 0;
        pub const NOT_FOUND: &[i64] = &[-404, -10404];
        pub const NO_PERMISSION: &[i64] = &[-403, -10403, 6001];
    }

    /// section 类型为 5 的是与正片无关的推广内容
    pub const SKIPPED_SECTION_TYPE: i64 = 5;
    pub const PREVIEW_BADGE: &str = "预告";
    /// 请求 DASH 格式的 fnval
    pub const FNVAL_DASH: &str = "4048";
}
