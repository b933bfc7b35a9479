//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    /// 必須列がシートに存在しない
    #[error("Schema error: column '{column}' missing in sheet")]
    Schema { column: String },

    /// 正規化後に同じラベルが2回以上現れた
    #[error("Duplicate label '{label}' at row {row} (first seen at row {first_row})")]
    DuplicateLabel {
        label: String,
        first_row: usize,
        row: usize,
    },

    /// TGMLとして解析できない
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
