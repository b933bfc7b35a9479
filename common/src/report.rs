//! 照合結果の集計
//!
//! 全ラベルのうち、実際に書き込みに使われたもの / 使われなかったものを数える。

use crate::label_table::LabelTable;
use crate::walker::WalkSummary;
use serde::Serialize;

/// 集計結果
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reconciliation {
    /// ラベル総数
    pub total: usize,
    /// 書き込みに使われたラベル数
    pub used: usize,
    /// 使われなかったラベル数
    pub unused: usize,
    /// 使われたラベル（昇順）
    pub used_labels: Vec<String>,
    /// 使われなかったラベル（昇順）
    pub unused_labels: Vec<String>,
    /// 一致したがバインド値が空で書き込まなかったラベル（昇順）
    pub suppressed_labels: Vec<String>,
    /// どのラベルにも一致しなかった文書側のテキスト名（出現順）
    pub unmatched_names: Vec<String>,
    /// 実際に値が変わった Bind 要素の数
    pub rewritten_elements: usize,
}

impl Reconciliation {
    /// ラベル表と走査結果から集計する
    pub fn new(table: &LabelTable, summary: &WalkSummary, rewritten_elements: usize) -> Self {
        let mut used_labels = Vec::new();
        let mut unused_labels = Vec::new();
        for key in table.keys() {
            if summary.used.contains(key) {
                used_labels.push(key.to_string());
            } else {
                unused_labels.push(key.to_string());
            }
        }
        used_labels.sort();
        unused_labels.sort();

        let mut suppressed_labels: Vec<String> = summary.suppressed.iter().cloned().collect();
        suppressed_labels.sort();

        Self {
            total: table.len(),
            used: used_labels.len(),
            unused: unused_labels.len(),
            used_labels,
            unused_labels,
            suppressed_labels,
            unmatched_names: summary.unmatched_names.iter().cloned().collect(),
            rewritten_elements,
        }
    }

    /// JSON文字列に変換
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label_table::LabelRow;
    use std::collections::HashSet;

    fn table(labels: &[&str]) -> LabelTable {
        LabelTable::from_rows(labels.iter().enumerate().map(|(i, l)| LabelRow {
            row: i + 2,
            labels: [l.to_string(), String::new(), String::new()],
            bind: format!("B{}", i),
        }))
        .unwrap()
    }

    #[test]
    fn test_partition_is_complete_and_disjoint() {
        let table = table(&["zeta", "alpha", "mid", "beta"]);
        let mut summary = WalkSummary::default();
        summary.used.insert("mid".to_string());
        summary.used.insert("zeta".to_string());

        let report = Reconciliation::new(&table, &summary, 3);
        assert_eq!(report.total, 4);
        assert_eq!(report.used, 2);
        assert_eq!(report.unused, 2);
        assert_eq!(report.used_labels, vec!["mid", "zeta"]);
        assert_eq!(report.unused_labels, vec!["alpha", "beta"]);
        assert_eq!(report.rewritten_elements, 3);

        let used: HashSet<&String> = report.used_labels.iter().collect();
        let unused: HashSet<&String> = report.unused_labels.iter().collect();
        assert!(used.is_disjoint(&unused));
        let all: HashSet<String> = table.keys().map(String::from).collect();
        let union: HashSet<String> = used.union(&unused).map(|s| s.to_string()).collect();
        assert_eq!(union, all);
    }

    #[test]
    fn test_empty_table() {
        let table = LabelTable::default();
        let report = Reconciliation::new(&table, &WalkSummary::default(), 0);
        assert_eq!(report.total, 0);
        assert!(report.unused_labels.is_empty());
    }

    #[test]
    fn test_to_json_uses_camel_case() {
        let table = table(&["pump1"]);
        let report = Reconciliation::new(&table, &WalkSummary::default(), 0);
        let json = report.to_json().unwrap();
        assert!(json.contains("\"unusedLabels\""));
        assert!(json.contains("\"pump1\""));
    }
}
