// src/store.rs
//
// Title history from an earlier output file. Only the `名称` column is read.

use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

use calamine::{ open_workbook_auto, Reader };

use crate::config::consts::{ TITLE_COLUMN, TITLE_HEADER };
use crate::error::{ Result, ScrapeError };

/// Known titles from `.xlsx`/`.xls`/`.xlsm`/`.ods` (first sheet) or `.csv`/`.tsv`.
/// The title column is found by header; without one the third column is used.
pub fn load_titles(path: &Path) -> Result<HashSet<String>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let titles = match ext.as_str() {
        "csv" => load_delimited(path, b',')?,
        "tsv" | "txt" => load_delimited(path, b'\t')?,
        "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => load_workbook(path)?,
        other => {
            return Err(ScrapeError::InvalidOptions(format!(
                "unsupported history file type '.{other}': {}",
                path.display()
            )));
        }
    };
    logf!("History: {} known title(s) from {}", titles.len(), path.display());
    Ok(titles)
}

/// Missing file → empty history; any other failure is an error.
pub fn load_titles_or_empty(path: &Path) -> Result<HashSet<String>> {
    if !path.exists() {
        logw!("History: {} not found, treating every record as new", path.display());
        return Ok(HashSet::new());
    }
    load_titles(path)
}

fn title_index<'a>(header: impl IntoIterator<Item = &'a str>) -> usize {
    header
        .into_iter()
        .position(|h| h.trim_start_matches('\u{feff}').trim() == TITLE_HEADER)
        .unwrap_or(TITLE_COLUMN)
}

fn load_delimited(path: &Path, delim: u8) -> Result<HashSet<String>> {
    let file = File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delim)
        .flexible(true)
        .from_reader(file);

    let col = title_index(rdr.headers()?.iter());
    let mut out = HashSet::new();
    for row in rdr.records() {
        let row = row?;
        if let Some(t) = row.get(col).map(str::trim).filter(|t| !t.is_empty()) {
            out.insert(s!(t));
        }
    }
    Ok(out)
}

fn load_workbook(path: &Path) -> Result<HashSet<String>> {
    let mut wb = open_workbook_auto(path)?;
    let Some(range) = wb.worksheet_range_at(0) else {
        return Ok(HashSet::new());
    };
    let range = range?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(HashSet::new());
    };
    let names: Vec<String> = header.iter().map(|c| c.to_string()).collect();
    let col = title_index(names.iter().map(String::as_str));

    let mut out = HashSet::new();
    for row in rows {
        if let Some(cell) = row.get(col) {
            let t = cell.to_string();
            let t = t.trim();
            if !t.is_empty() {
                out.insert(s!(t));
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_falls_back_to_third_column() {
        assert_eq!(title_index(["序号", "关键字", "名称"]), 2);
        assert_eq!(title_index(["\u{feff}名称", "x"]), 0);
        assert_eq!(title_index(["a", "b"]), TITLE_COLUMN);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_titles(Path::new("history.json")).unwrap_err();
        assert!(matches!(err, ScrapeError::InvalidOptions(_)));
    }
}
