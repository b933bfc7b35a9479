//! 設定ファイル（~/.config/tgml-bind/config.json）

use crate::error::{BindToolError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 出力TGMLのファイル名接頭辞
    pub output_prefix: String,
    /// 未使用ラベル一覧のファイル名
    pub unmatched_file_name: String,
    /// 未使用ラベル一覧を出力するか
    pub export_unmatched: bool,
    /// XML宣言がない文書に宣言を付けるか
    pub ensure_declaration: bool,
    /// --sheet 省略時、ワークブックにあれば優先するシート名
    pub preferred_sheet: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_prefix: "updated_".into(),
            unmatched_file_name: "unmatched_labels.xlsx".into(),
            export_unmatched: true,
            ensure_declaration: true,
            preferred_sheet: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// ファイルがなければ既定値、項目が欠けていればその項目だけ既定値
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| BindToolError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| BindToolError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("tgml-bind").join("config.json"))
    }

    /// 出力名の接頭辞。空にすると入力ファイルを上書きしてしまうので拒否する
    pub fn set_output_prefix(&mut self, prefix: String) -> Result<()> {
        if prefix.trim().is_empty() {
            return Err(BindToolError::Config("出力接頭辞が空です".into()));
        }
        self.output_prefix = prefix;
        Ok(())
    }

    /// 空文字で解除
    pub fn set_preferred_sheet(&mut self, sheet: String) {
        let sheet = sheet.trim().to_string();
        self.preferred_sheet = if sheet.is_empty() { None } else { Some(sheet) };
    }
}
