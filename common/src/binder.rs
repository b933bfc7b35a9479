//! 文書へのバインド適用
//!
//! 解析済み文書の要素を文書順に状態機械へ流し、書き換えを文書に反映する。

use crate::document::TgmlDocument;
use crate::label_table::LabelTable;
use crate::report::Reconciliation;
use crate::walker::{ElementKind, Step, Walker};

/// 書き換え1件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    /// 要素インデックス（文書順）
    pub element: usize,
    pub key: String,
    pub old_value: Option<String>,
    pub new_value: String,
}

/// バインド適用結果
#[derive(Debug, Clone)]
pub struct BindOutcome {
    /// 値が変わった Bind 要素
    pub rewrites: Vec<Rewrite>,
    pub report: Reconciliation,
}

/// 文書を1回走査してバインドを書き換える
pub fn bind_document(document: &mut TgmlDocument, table: &LabelTable) -> BindOutcome {
    let mut walker = Walker::new(table);
    let mut rewrites = Vec::new();

    for index in 0..document.elements().len() {
        let element = &document.elements()[index];
        let kind = ElementKind::from_tag(&element.tag);
        let old_value = element.name.clone();

        if let Step::Rewrite { key, value } = walker.visit(kind, old_value.as_deref()) {
            if document.set_name(index, &value) {
                tracing::debug!(element = index, key = %key, value = %value, "bind rewritten");
                rewrites.push(Rewrite {
                    element: index,
                    key,
                    old_value,
                    new_value: value,
                });
            }
        }
    }

    let summary = walker.finish();
    let report = Reconciliation::new(table, &summary, rewrites.len());
    tracing::info!(
        total = report.total,
        used = report.used,
        unused = report.unused,
        rewritten = report.rewritten_elements,
        "binding finished"
    );

    BindOutcome { rewrites, report }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label_table::LabelRow;

    fn table(rows: &[(&str, &str)]) -> LabelTable {
        LabelTable::from_rows(rows.iter().enumerate().map(|(i, (label, bind))| LabelRow {
            row: i + 2,
            labels: [label.to_string(), String::new(), String::new()],
            bind: bind.to_string(),
        }))
        .unwrap()
    }

    const PUMP_DOC: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Tgml>
  <Group Name="g1">
    <Text Name="pump1">
      <Bind Name="OLD" />
    </Text>
  </Group>
</Tgml>"#;

    #[test]
    fn test_pump_scenario() {
        let table = table(&[("Pump1", "BIND_001")]);
        let mut doc = TgmlDocument::parse(PUMP_DOC).unwrap();

        let outcome = bind_document(&mut doc, &table);
        assert_eq!(outcome.report.total, 1);
        assert_eq!(outcome.report.used, 1);
        assert_eq!(outcome.report.unused, 0);
        assert_eq!(outcome.rewrites.len(), 1);
        assert_eq!(outcome.rewrites[0].old_value.as_deref(), Some("OLD"));
        assert_eq!(doc.serialize(true), PUMP_DOC.replace("\"OLD\"", "\"BIND_001\""));
    }

    #[test]
    fn test_second_run_is_idempotent() {
        let table = table(&[("Pump1", "BIND_001")]);
        let mut doc = TgmlDocument::parse(PUMP_DOC).unwrap();
        bind_document(&mut doc, &table);
        let once = doc.serialize(true);

        let mut again = TgmlDocument::parse(&once).unwrap();
        let outcome = bind_document(&mut again, &table);
        assert!(outcome.rewrites.is_empty());
        assert_eq!(outcome.report.used, 1);
        assert_eq!(again.serialize(true), once);
    }

    #[test]
    fn test_unmatched_text_left_untouched() {
        let source = r#"<Tgml><Group><Text Name="PumpX"><Bind Name="KEEP"/></Text></Group></Tgml>"#;
        let table = table(&[("Pump1", "BIND_001")]);
        let mut doc = TgmlDocument::parse(source).unwrap();

        let outcome = bind_document(&mut doc, &table);
        assert!(outcome.rewrites.is_empty());
        assert_eq!(outcome.report.unmatched_names, vec!["pumpx"]);
        assert_eq!(outcome.report.unused_labels, vec!["pump1"]);
        assert_eq!(doc.serialize(false), source);
    }

    #[test]
    fn test_empty_bind_value_not_written_nor_used() {
        let source = r#"<Tgml><Group><Text Name="Spare"><Bind Name="KEEP"/></Text></Group></Tgml>"#;
        let table = table(&[("spare", "")]);
        let mut doc = TgmlDocument::parse(source).unwrap();

        let outcome = bind_document(&mut doc, &table);
        assert!(outcome.rewrites.is_empty());
        assert_eq!(outcome.report.used, 0);
        assert_eq!(outcome.report.suppressed_labels, vec!["spare"]);
        assert_eq!(doc.serialize(false), source);
    }

    #[test]
    fn test_text_before_group_is_ignored() {
        let source = r#"<Tgml><Text Name="Pump1"><Bind Name="A"/></Text><Group/><Text Name="Pump1"><Bind Name="B"/></Text></Tgml>"#;
        let table = table(&[("Pump1", "NEW")]);
        let mut doc = TgmlDocument::parse(source).unwrap();

        let outcome = bind_document(&mut doc, &table);
        assert_eq!(outcome.rewrites.len(), 1);
        assert_eq!(outcome.rewrites[0].old_value.as_deref(), Some("B"));
        assert!(doc.serialize(false).contains(r#"<Bind Name="A"/>"#));
    }

    #[test]
    fn test_fuzzy_match_rewrites() {
        let source = r#"<Tgml><Group><Text Name=" Supply Air Tmp "><Bind Name="x"/></Text></Group></Tgml>"#;
        let table = table(&[("Supply Air Temp", "SAT")]);
        let mut doc = TgmlDocument::parse(source).unwrap();

        bind_document(&mut doc, &table);
        assert!(doc.serialize(false).contains(r#"<Bind Name="SAT"/>"#));
    }
}
