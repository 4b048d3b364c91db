// src/config/options.rs
use std::path::{ Path, PathBuf };
use std::time::Duration;

use super::consts::*;
use crate::core::sanitize::sanitize_file_prefix;
use crate::error::{ Result, ScrapeError };

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppOptions {
    pub crawl: CrawlOptions,
    pub export: ExportOptions,
    pub notify: NotifyOptions,
}

impl AppOptions {
    pub fn validate(&self) -> Result<()> {
        self.crawl.validate()
    }
}

/* ---------------- Crawl ---------------- */

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrawlOptions {
    pub min_delay_secs: u64,
    pub max_delay_secs: u64,
    pub timeout_secs: u64,
    pub search_url: String,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            min_delay_secs: MIN_DELAY_SECS,
            max_delay_secs: MAX_DELAY_SECS,
            timeout_secs: REQUEST_TIMEOUT_SECS,
            search_url: s!(SEARCH_URL),
        }
    }
}

impl CrawlOptions {
    /// No throttle at all. Tests and replays only.
    pub fn without_delay() -> Self {
        Self { min_delay_secs: 0, max_delay_secs: 0, ..Default::default() }
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_delay_secs > self.max_delay_secs {
            return Err(ScrapeError::InvalidOptions(format!(
                "min delay {}s exceeds max delay {}s",
                self.min_delay_secs, self.max_delay_secs
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ScrapeError::InvalidOptions(s!("timeout must be at least 1s")));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/* ---------------- Export ---------------- */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Tsv,
}

impl ExportFormat {
    pub fn ext(&self) -> &'static str {
        match self { ExportFormat::Csv => "csv", ExportFormat::Tsv => "tsv" }
    }
    pub fn delim(&self) -> u8 {
        match self { ExportFormat::Csv => b',', ExportFormat::Tsv => b'\t' }
    }
}

/// Which 9-column table the sinks produce.
///
/// `Keyword`: 序号,关键字,名称,日期,采购人,代理机构,公告类型,详情,项目概况
/// `Legacy`:  序号,类型,名称,日期,招标人,代理机构,区域,详情,项目概况
///
/// Columns 0–5, 7 and 8 carry the same record fields in both; only column 6
/// (announcement type vs region) and the column 1 tag differ.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HeaderLayout {
    #[default]
    Keyword,
    Legacy,
}

impl HeaderLayout {
    pub fn headers(&self) -> &'static [&'static str; 9] {
        match self {
            HeaderLayout::Keyword => &HEADERS,
            HeaderLayout::Legacy => &LEGACY_HEADERS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    pub format: ExportFormat,
    pub layout: HeaderLayout,
    pub dir: PathBuf,
    pub prefix: String,
    /// Write the filtered result without being asked.
    pub auto_save: bool,
    /// Previous output to dedupe titles against.
    pub history: Option<PathBuf>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Csv,
            layout: HeaderLayout::Keyword,
            dir: PathBuf::from(DEFAULT_OUT_DIR),
            prefix: s!(DEFAULT_PREFIX),
            auto_save: true,
            history: None,
        }
    }
}

impl ExportOptions {
    /// `<dir>/<prefix><stamp>.<ext>`
    pub fn out_path(&self, prefix: &str, stamp: &str) -> PathBuf {
        let prefix = sanitize_file_prefix(prefix);
        let name = join!(&prefix, stamp, ".", self.format.ext());
        if self.dir.as_os_str().is_empty() {
            PathBuf::from(name)
        } else {
            self.dir.join(name)
        }
    }

    pub fn set_dir(&mut self, dir: impl AsRef<Path>) {
        self.dir = dir.as_ref().to_path_buf();
    }
}

/* ---------------- Notify ---------------- */

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NotifyOptions {
    pub enabled: bool,
    /// Drop directory for rendered messages; `None` → log only.
    pub outbox: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_range_must_be_ordered() {
        let mut opts = CrawlOptions::default();
        assert!(opts.validate().is_ok());
        opts.min_delay_secs = 7;
        assert!(matches!(opts.validate(), Err(ScrapeError::InvalidOptions(_))));
    }

    #[test]
    fn out_path_joins_prefix_stamp_and_ext() {
        let mut export = ExportOptions::default();
        export.format = ExportFormat::Tsv;
        export.set_dir("runs");
        let p = export.out_path("filtered_data_", "20240101_120000");
        assert_eq!(p, Path::new("runs").join("filtered_data_20240101_120000.tsv"));

        export.set_dir("");
        let p = export.out_path("x_", "1");
        assert_eq!(p, PathBuf::from("x_1.tsv"));
    }
}
