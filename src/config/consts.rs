// src/config/consts.rs

// Net config
pub const HOST: &str = "search.ccgp.gov.cn";
pub const SEARCH_URL: &str = "http://search.ccgp.gov.cn/bxsearch?";
pub const PORTAL_ROOT: &str = "http://search.ccgp.gov.cn/";
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

// Remote service, not configurable
pub const PAGE_SIZE: u32 = 20;

// Throttle (seconds, inclusive)
pub const MIN_DELAY_SECS: u64 = 2;
pub const MAX_DELAY_SECS: u64 = 6;

// Search defaults
pub const DEFAULT_KEYWORD: &str = "公告";
pub const DEFAULT_ZONE: &str = "45"; // 广西
pub const DEFAULT_BID_TYPE: u8 = 0;

// Export
pub const DEFAULT_OUT_DIR: &str = "out";
pub const DEFAULT_PREFIX: &str = "filtered_data_";
pub const INTERRUPTED_PREFIX: &str = "interrupted_data_";
pub const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

// Tabular layout
pub const TITLE_HEADER: &str = "名称";
pub const TITLE_COLUMN: usize = 2;
pub const LEGACY_TYPE_TAG: &str = "公告";

pub const HEADERS: [&str; 9] = [
    "序号", "关键字", "名称", "日期", "采购人", "代理机构", "公告类型", "详情", "项目概况",
];
pub const LEGACY_HEADERS: [&str; 9] = [
    "序号", "类型", "名称", "日期", "招标人", "代理机构", "区域", "详情", "项目概况",
];

// Notification
pub const NOTIFY_SUBJECT: &str = "[招标公告更新提醒] 发现新数据";
