use thiserror::Error;

#[derive(Error, Debug)]
pub enum BindToolError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("Excel読み込みエラー: {0}")]
    WorkbookRead(String),

    #[error("シート '{name}' がありません（候補: {}）", .available.join(", "))]
    SheetNotFound { name: String, available: Vec<String> },

    #[error("シートがありません: {0}")]
    NoSheets(String),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("出力先に書き込めません: {0}")]
    OutputPath(String),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] tgml_bind_common::Error),
}

pub type Result<T> = std::result::Result<T, BindToolError>;
