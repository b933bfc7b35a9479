//! ラベル表モジュール
//!
//! シートの各行（最大3つのラベル表記 + Nomenclature）から、
//! 正規化ラベル → バインド値 の対応表を構築する。
//!
//! - ラベルは前後空白除去 + 小文字化で正規化
//! - 正規化後の重複は全列・全行を通してエラー
//! - 挿入順を保持（照合時の同点判定に使用）

use crate::error::{Error, Result};
use crate::sheet::Sheet;
use indexmap::IndexMap;
use serde::Serialize;

/// バインド値の列名
pub const NOMENCLATURE_COLUMN: &str = "Nomenclature";

/// ラベル列名（左から順に走査）
pub const LABEL_COLUMNS: [&str; 3] = ["First Label", "Second Label", "Third Label"];

/// ラベルを照合用キーに正規化
pub fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

/// シートの1行
#[derive(Debug, Clone, Default)]
pub struct LabelRow {
    /// スプレッドシート上の行番号
    pub row: usize,
    /// First/Second/Third Label（空欄は空文字）
    pub labels: [String; 3],
    /// Nomenclature
    pub bind: String,
}

/// 正規化ラベル1件
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelEntry {
    /// 正規化キー
    pub key: String,
    /// シート上の表記（前後空白除去のみ）
    pub label: String,
    /// 書き込むバインド値。空なら照合のみで書き換えない
    pub bind: String,
    /// 出現行
    pub row: usize,
    /// 出現列
    pub column: &'static str,
}

/// 正規化ラベル → エントリ（挿入順）
#[derive(Debug, Clone, Default)]
pub struct LabelTable {
    entries: IndexMap<String, LabelEntry>,
}

impl LabelTable {
    /// シートから構築。必須列は行の走査前にすべて確認する
    pub fn from_sheet(sheet: &Sheet) -> Result<Self> {
        let bind_col = require_column(sheet, NOMENCLATURE_COLUMN)?;
        let mut label_cols = [0usize; 3];
        for (slot, name) in label_cols.iter_mut().zip(LABEL_COLUMNS) {
            *slot = require_column(sheet, name)?;
        }

        let rows = (0..sheet.row_count()).map(|i| LabelRow {
            row: sheet.sheet_row_number(i),
            labels: label_cols.map(|c| sheet.cell(i, c).to_string()),
            bind: sheet.cell(i, bind_col).to_string(),
        });

        Self::from_rows(rows)
    }

    /// 行の並びから構築
    pub fn from_rows<I>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = LabelRow>,
    {
        let mut entries: IndexMap<String, LabelEntry> = IndexMap::new();

        for row in rows {
            let bind = row.bind.trim().to_string();

            for (label, column) in row.labels.iter().zip(LABEL_COLUMNS) {
                let label = label.trim();
                if label.is_empty() {
                    continue;
                }

                let key = normalize_label(label);
                if let Some(first) = entries.get(&key) {
                    return Err(Error::DuplicateLabel {
                        label: label.to_string(),
                        first_row: first.row,
                        row: row.row,
                    });
                }

                entries.insert(
                    key.clone(),
                    LabelEntry {
                        key,
                        label: label.to_string(),
                        bind: bind.clone(),
                        row: row.row,
                        column,
                    },
                );
            }
        }

        tracing::debug!(labels = entries.len(), "label table built");
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&LabelEntry> {
        self.entries.get(key)
    }

    /// キーに対応するバインド値
    pub fn bind_for(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|e| e.bind.as_str())
    }

    /// 全キー（挿入順）
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(|k| k.as_str())
    }

    pub fn entries(&self) -> impl Iterator<Item = &LabelEntry> + '_ {
        self.entries.values()
    }
}

fn require_column(sheet: &Sheet, name: &str) -> Result<usize> {
    sheet.column_index(name).ok_or_else(|| Error::Schema {
        column: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(rows: &[[&str; 4]]) -> Sheet {
        let headers = vec![
            "First Label".to_string(),
            "Second Label".to_string(),
            "Third Label".to_string(),
            "Nomenclature".to_string(),
        ];
        let rows = rows
            .iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect();
        Sheet::new(headers, rows)
    }

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("  Pump1 "), "pump1");
        assert_eq!(normalize_label("AHU-01\t"), "ahu-01");
        assert_eq!(normalize_label(""), "");
    }

    #[test]
    fn test_build_counts_non_blank_cells() {
        let table = LabelTable::from_sheet(&sheet(&[
            ["Pump1", "P1", "", "BIND_001"],
            ["", "", "", "BIND_002"],
            ["Valve A", "", "VA", " BIND_003 "],
        ]))
        .unwrap();

        assert_eq!(table.len(), 4);
        let keys: Vec<&str> = table.keys().collect();
        assert_eq!(keys, vec!["pump1", "p1", "valve a", "va"]);
        assert_eq!(table.bind_for("va"), Some("BIND_003"));

        let entry = table.get("valve a").unwrap();
        assert_eq!(entry.label, "Valve A");
        assert_eq!(entry.row, 4);
        assert_eq!(entry.column, "First Label");
    }

    #[test]
    fn test_empty_bind_is_kept() {
        let table = LabelTable::from_sheet(&sheet(&[["Fan", "", "", "  "]])).unwrap();
        assert_eq!(table.bind_for("fan"), Some(""));
    }

    #[test]
    fn test_duplicate_across_rows_ignores_case() {
        let err = LabelTable::from_sheet(&sheet(&[
            ["Valve-A", "", "", "B1"],
            ["Pump", "", "", "B2"],
            ["", "", " valve-a ", "B3"],
        ]))
        .unwrap_err();

        match err {
            Error::DuplicateLabel { label, first_row, row } => {
                assert_eq!(label, "valve-a");
                assert_eq!(first_row, 2);
                assert_eq!(row, 4);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_within_row() {
        let err = LabelTable::from_sheet(&sheet(&[["Fan", "FAN", "", "B1"]])).unwrap_err();
        assert!(matches!(err, Error::DuplicateLabel { first_row: 2, row: 2, .. }));
    }

    #[test]
    fn test_missing_column_reported_before_rows() {
        // 重複行があってもスキーマエラーが先
        let sheet = Sheet::new(
            vec!["First Label".into(), "Second Label".into(), "Nomenclature".into()],
            vec![
                vec!["A".into(), "A".into(), "X".into()],
            ],
        );
        let err = LabelTable::from_sheet(&sheet).unwrap_err();
        match err {
            Error::Schema { column } => assert_eq!(column, "Third Label"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_nomenclature() {
        let sheet = Sheet::new(
            LABEL_COLUMNS.iter().map(|c| c.to_string()).collect(),
            vec![],
        );
        let err = LabelTable::from_sheet(&sheet).unwrap_err();
        assert!(matches!(err, Error::Schema { ref column } if column == "Nomenclature"));
    }

    #[test]
    fn test_from_rows() {
        let table = LabelTable::from_rows(vec![LabelRow {
            row: 10,
            labels: ["A".into(), String::new(), "b".into()],
            bind: "X".into(),
        }])
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("b").unwrap().row, 10);
        assert_eq!(table.get("b").unwrap().column, "Third Label");
    }
}
