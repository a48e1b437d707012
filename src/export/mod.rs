//! Spreadsheet and HTML renditions of a result set.

pub mod html;

use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

use crate::error::Result;
use crate::models::ExportRow;

pub const EXPORT_FILE_NAME: &str = "news_data.xlsx";
pub const EXPORT_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const SHEET_NAME: &str = "Sheet1";
const HEADERS: [&str; 5] = ["Source", "Date", "Title", "URL", "Sentiment"];
const COLUMN_WIDTHS: [f64; 5] = [20.0, 12.0, 60.0, 50.0, 10.0];

/// Calendar date as an Excel date value, so the Date column sorts and
/// filters as dates.
fn excel_date(date: NaiveDate) -> Result<ExcelDateTime> {
    let year = u16::try_from(date.year())
        .map_err(|_| anyhow::anyhow!("Date out of range for export: {date}"))?;
    Ok(ExcelDateTime::from_ymd(year, date.month() as u8, date.day() as u8)?)
}

/// Serialize export rows into an in-memory `.xlsx` workbook.
pub fn to_xlsx(rows: &[ExportRow]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, (title, width)) in HEADERS.iter().zip(COLUMN_WIDTHS).enumerate() {
        let col = col as u16;
        sheet.write_string_with_format(0, col, *title, &header)?;
        sheet.set_column_width(col, width)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        sheet.write_string(r, 0, &row.source)?;
        sheet.write_date_with_format(r, 1, &excel_date(row.date)?, &date_format)?;
        sheet.write_string(r, 2, &row.title)?;
        sheet.write_string(r, 3, &row.url)?;
        if let Some(sentiment) = row.sentiment {
            sheet.write_number(r, 4, sentiment)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// Write `news_data.xlsx` into `dir` and return its path.
pub async fn write_xlsx(dir: &Path, rows: &[ExportRow]) -> Result<PathBuf> {
    let bytes = to_xlsx(rows)?;
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(EXPORT_FILE_NAME);
    tokio::fs::write(&path, bytes).await?;
    tracing::info!(path = %path.display(), rows = rows.len(), "Exported spreadsheet");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn rows() -> Vec<ExportRow> {
        vec![
            ExportRow {
                source: "BBC".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                title: "Good news".to_string(),
                url: "https://bbc.co.uk/a".to_string(),
                sentiment: Some(3.0),
            },
            ExportRow {
                source: "AP".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                title: String::new(),
                url: "https://apnews.com/b".to_string(),
                sentiment: None,
            },
        ]
    }

    #[test]
    fn test_xlsx_is_zip_payload() {
        let bytes = to_xlsx(&rows()).unwrap();
        // xlsx is a zip container
        assert!(bytes.starts_with(b"PK"));
        assert!(bytes.len() > 1000);
    }

    #[test]
    fn test_dates_become_excel_serials() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(excel_date(day).unwrap().to_excel(), 45292.0);
        let leap = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(excel_date(leap).unwrap().to_excel(), 45351.0);
    }

    #[test]
    fn test_xlsx_empty_rows_still_has_header() {
        let bytes = to_xlsx(&[]).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[tokio::test]
    async fn test_write_xlsx_creates_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("exports");
        let path = write_xlsx(&target, &rows()).await.unwrap();

        assert_eq!(path, target.join("news_data.xlsx"));
        let written = std::fs::read(&path).unwrap();
        assert!(written.starts_with(b"PK"));
    }
}
