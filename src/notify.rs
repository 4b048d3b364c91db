// src/notify.rs
//
// "New announcements" message: subject + HTML table of the records.
// Delivery is pluggable; failures are reported to the caller, who logs them.

use std::fs;
use std::path::PathBuf;

use chrono::Local;
use html_escape::{ encode_double_quoted_attribute, encode_text };

use crate::config::consts::STAMP_FORMAT;
use crate::config::options::HeaderLayout;
use crate::engine::types::Record;
use crate::error::{ Result, ScrapeError };
use crate::file::{ ensure_directory, unique_path };

/// Column of the detail link in both layouts.
const LINK_COLUMN: usize = 7;

const STYLE: &str = r#"<style>
  .data-table { width: 100%; border-collapse: collapse; font-family: Arial, sans-serif; font-size: 14px; color: #333; }
  .data-table th, .data-table td { padding: 12px; text-align: left; border-bottom: 1px solid #ddd; }
  .data-table th { background-color: #f8f9fa; font-weight: bold; color: #333; }
  .data-table tr:hover { background-color: #f1f1f1; }
  .data-table a { color: #007bff; text-decoration: none; }
  .data-table a:hover { text-decoration: underline; }
</style>"#;

pub trait Notifier {
    fn send(&self, subject: &str, html_body: &str) -> Result<()>;
}

/// HTML message body, or `None` when there is nothing to announce.
pub fn render_body(records: &[Record], layout: HeaderLayout) -> Option<String> {
    if records.is_empty() {
        return None;
    }

    let mut table = s!("<table class=\"data-table\"><tr>");
    for h in layout.headers() {
        table.push_str(&format!("<th>{h}</th>"));
    }
    table.push_str("</tr>");

    for rec in records {
        table.push_str("<tr>");
        for (i, cell) in rec.to_row(layout).iter().enumerate() {
            if i == LINK_COLUMN {
                table.push_str(&format!(
                    "<td><a href=\"{}\" target=\"_blank\">点击查看</a></td>",
                    encode_double_quoted_attribute(cell)
                ));
            } else {
                table.push_str(&format!("<td>{}</td>", encode_text(cell)));
            }
        }
        table.push_str("</tr>");
    }
    table.push_str("</table>");

    Some(format!(
        "<html>\n<head><meta charset=\"utf-8\">{STYLE}</head>\n<body>\n\
         <h3>发现 {} 条新招标公告：</h3>\n{table}\n\
         <p>请及时查看邮件内容或访问网站获取详细信息。</p>\n</body>\n</html>\n",
        records.len()
    ))
}

/// Writes each message to `<dir>/notice_<stamp>.html`.
pub struct OutboxNotifier {
    dir: PathBuf,
}

impl OutboxNotifier {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl Notifier for OutboxNotifier {
    fn send(&self, subject: &str, html_body: &str) -> Result<()> {
        ensure_directory(&self.dir).map_err(|e| ScrapeError::Notify(e.to_string()))?;
        let stamp = Local::now().format(STAMP_FORMAT);
        let path = unique_path(self.dir.join(format!("notice_{stamp}.html")));
        let doc = format!("<!-- {} -->\n{html_body}", encode_text(subject));
        fs::write(&path, doc).map_err(|e| ScrapeError::Notify(format!("{}: {e}", path.display())))?;
        logf!("Notify: '{subject}' → {}", path.display());
        Ok(())
    }
}

/// Logs the subject and body size only.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send(&self, subject: &str, html_body: &str) -> Result<()> {
        logf!("Notify: '{subject}' ({} bytes of HTML)", html_body.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_to_render_for_no_records() {
        assert!(render_body(&[], HeaderLayout::Keyword).is_none());
    }

    #[test]
    fn cells_are_escaped() {
        let rec = Record { title: s!("A<B>&C"), url: s!("http://x/?a=1&b=\"2\""), ..Default::default() };
        let body = render_body(&[rec], HeaderLayout::Keyword).unwrap();
        assert!(body.contains("A&lt;B&gt;&amp;C"));
        assert!(body.contains("href=\"http://x/?a=1&amp;b=&quot;2&quot;\""));
    }
}
