//! 表形式データ
//!
//! Excel等から読み込んだ1シート分のセルを文字列として保持する。
//! 読み込み自体は呼び出し側（CLI）の責務。

use serde::{Deserialize, Serialize};

/// ヘッダー行 + データ行
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sheet {
    /// 列名（前後の空白は除去済み）
    headers: Vec<String>,
    /// データ行（ヘッダー除く）
    rows: Vec<Vec<String>>,
    /// ヘッダーの行番号（1始まり、スプレッドシート上の位置）
    header_row: usize,
}

impl Sheet {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self::with_header_row(headers, rows, 1)
    }

    /// ヘッダーが1行目以外にある場合
    pub fn with_header_row(headers: Vec<String>, rows: Vec<Vec<String>>, header_row: usize) -> Self {
        let headers = headers.into_iter().map(|h| h.trim().to_string()).collect();
        Self {
            headers,
            rows,
            header_row: header_row.max(1),
        }
    }

    /// 先頭行をヘッダーとして分離
    pub fn from_grid(mut grid: Vec<Vec<String>>) -> Self {
        if grid.is_empty() {
            return Self::default();
        }
        let headers = grid.remove(0);
        Self::new(headers, grid)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// セル値。行が短い場合は空文字
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(|s| s.as_str())
            .unwrap_or("")
    }

    /// データ行インデックス → スプレッドシート上の行番号
    pub fn sheet_row_number(&self, row: usize) -> usize {
        self.header_row.max(1) + 1 + row
    }
}
