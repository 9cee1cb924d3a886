//! Spreadsheet-friendly CSV rendering of export records.

use chrono::NaiveDate;
use std::path::{Path, PathBuf};

use crate::admin::dto::ExportRecord;

pub const BOM: char = '\u{FEFF}';
pub const HEADERS: [&str; 5] = ["日時", "学生ID", "ChatID", "入力内容", "AI評価結果"];

/// Header row plus one row per record, every field quoted, BOM first.
pub fn to_csv(records: &[ExportRecord]) -> String {
    let mut csv = String::new();
    csv.push(BOM);
    csv.push_str(&HEADERS.join(","));
    csv.push('\n');

    for record in records {
        let row = [
            quote(&record.timestamp),
            quote(&record.subject_id),
            quote(&record.conversation_id),
            quote(&record.input_text),
            quote(&record.output_text),
        ];
        csv.push_str(&row.join(","));
        csv.push('\n');
    }
    csv
}

/// Wraps a field in double quotes, doubling any embedded ones.
pub fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

pub fn export_filename(date: NaiveDate) -> String {
    format!("competency_evaluation_{}.csv", date.format("%Y-%m-%d"))
}

/// Writes the CSV into `dir` and returns the file's path.
pub fn write_csv(
    dir: &Path,
    records: &[ExportRecord],
    date: NaiveDate,
) -> Result<PathBuf, std::io::Error> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
    }
    let path = dir.join(export_filename(date));
    std::fs::write(&path, to_csv(records))?;
    tracing::info!("Exported {} records to {}", records.len(), path.display());
    Ok(path)
}
