// src/file.rs

use std::{
    fs::{ self, File },
    io::{ BufWriter, Write },
    path::{ Path, PathBuf },
};

use crate::config::options::{ ExportFormat, ExportOptions };
use crate::engine::types::Record;
use crate::error::{ Result, ScrapeError };

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Sink for one finished table.
pub trait TabularWriter {
    fn write_table(&self, path: &Path, headers: &[&str], rows: &[Vec<String>]) -> Result<()>;
}

/// CSV or TSV via the `csv` crate. CSV output starts with a UTF-8 BOM so
/// spreadsheet tools open the Chinese text with the right encoding.
#[derive(Clone, Copy, Debug)]
pub struct CsvTableWriter {
    delim: u8,
    bom: bool,
}

impl CsvTableWriter {
    pub fn new(format: ExportFormat) -> Self {
        Self { delim: format.delim(), bom: format == ExportFormat::Csv }
    }
}

impl TabularWriter for CsvTableWriter {
    fn write_table(&self, path: &Path, headers: &[&str], rows: &[Vec<String>]) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                ensure_directory(parent)?;
            }
        }
        let mut out = BufWriter::new(File::create(path)?); // truncate/overwrite
        if self.bom {
            out.write_all(UTF8_BOM)?;
        }
        let mut w = csv::WriterBuilder::new()
            .delimiter(self.delim)
            .flexible(false)
            .from_writer(out);
        w.write_record(headers)?;
        for row in rows {
            w.write_record(row)?;
        }
        w.flush()?;
        Ok(())
    }
}

/// Write `records` to `<dir>/<prefix><stamp>.<ext>` in the configured layout.
/// An existing file of the same name is never overwritten; ` (N)` is added.
pub fn write_records(
    writer: &dyn TabularWriter,
    export: &ExportOptions,
    prefix: &str,
    stamp: &str,
    records: &[Record],
) -> Result<PathBuf> {
    let path = unique_path(export.out_path(prefix, stamp));
    let rows: Vec<Vec<String>> = records.iter().map(|r| r.to_row(export.layout)).collect();
    writer.write_table(&path, export.layout.headers(), &rows)?;
    logf!("Export: {} row(s) → {}", rows.len(), path.display());
    Ok(path)
}

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(ScrapeError::InvalidOptions(format!(
            "Path exists but is not a directory: {}",
            dir.display()
        )));
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}

/// First of `<stem>.ext`, `<stem> (2).ext`, `<stem> (3).ext`, … that does not exist.
pub fn unique_path(path: PathBuf) -> PathBuf {
    if !path.exists() {
        return path;
    }
    let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    let ext = path.extension().map(|s| s.to_string_lossy().into_owned());
    let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    (2..)
        .map(|n| {
            let name = match &ext {
                Some(ext) => format!("{stem} ({n}).{ext}"),
                None => format!("{stem} ({n})"),
            };
            dir.join(name)
        })
        .find(|p| !p.exists())
        .unwrap_or(path)
}
