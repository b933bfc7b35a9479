//! Excel読み込み
//!
//! calamine でワークブックを開き、1シートを文字列のグリッドに変換する。

use crate::error::{BindToolError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;
use tgml_bind_common::Sheet;

/// シート名一覧（ブック内の順）
pub fn sheet_names(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(BindToolError::FileNotFound(path.display().to_string()));
    }

    let workbook = open_workbook_auto(path)
        .map_err(|e| BindToolError::WorkbookRead(format!("{}: {}", path.display(), e)))?;
    Ok(workbook.sheet_names().to_owned())
}

/// 指定シートを読み込む（先頭行をヘッダーとする）
pub fn read_sheet(path: &Path, sheet_name: &str) -> Result<Sheet> {
    if !path.exists() {
        return Err(BindToolError::FileNotFound(path.display().to_string()));
    }

    let mut workbook = open_workbook_auto(path)
        .map_err(|e| BindToolError::WorkbookRead(format!("{}: {}", path.display(), e)))?;

    let available = workbook.sheet_names().to_owned();
    if !available.iter().any(|n| n == sheet_name) {
        return Err(BindToolError::SheetNotFound {
            name: sheet_name.to_string(),
            available,
        });
    }

    let range = workbook
        .worksheet_range(sheet_name)
        .map_err(|e| BindToolError::WorkbookRead(format!("{}: {}", sheet_name, e)))?;

    // 空行が先頭にある場合はヘッダーの行番号がずれる
    let header_row = range.start().map(|(row, _)| row as usize + 1).unwrap_or(1);

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect::<Vec<String>>());

    let Some(headers) = rows.next() else {
        return Ok(Sheet::default());
    };
    let data: Vec<Vec<String>> = rows.collect();

    tracing::debug!(sheet = sheet_name, rows = data.len(), header_row, "sheet loaded");
    Ok(Sheet::with_header_row(headers, data, header_row))
}

/// セル値を文字列に変換
///
/// 整数値の浮動小数点は小数部を付けない（12.0 → "12"）。
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(text) => text.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Int(i) => i.to_string(),
        _ => cell.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(&Data::Empty), "");
        assert_eq!(cell_to_string(&Data::String("Pump1".into())), "Pump1");
        assert_eq!(cell_to_string(&Data::Float(12.0)), "12");
        assert_eq!(cell_to_string(&Data::Float(1.5)), "1.5");
        assert_eq!(cell_to_string(&Data::Int(7)), "7");
    }

    #[test]
    fn test_missing_file() {
        let result = read_sheet(Path::new("/nonexistent/labels.xlsx"), "Sheet1");
        assert!(matches!(result, Err(BindToolError::FileNotFound(_))));
    }
}
