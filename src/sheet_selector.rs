//! シート選択モジュール

use crate::error::{BindToolError, Result};
use dialoguer::Select;
use std::io::IsTerminal;

/// 使用するシート名を決める
///
/// - 指定があればそれを使う（存在確認は読み込み時）
/// - 設定の優先シートがワークブックにあればそれを使う
/// - 1シートだけならそれを使う
/// - 複数シートで端末なら対話式で選択、そうでなければ先頭シート
pub fn choose_sheet(
    available: &[String],
    requested: Option<&str>,
    preferred: Option<&str>,
) -> Result<String> {
    if let Some(name) = requested {
        return Ok(name.to_string());
    }
    if let Some(name) = preferred.filter(|p| available.iter().any(|a| a == p)) {
        return Ok(name.to_string());
    }

    match available {
        [] => Err(BindToolError::NoSheets("ワークブックが空です".into())),
        [only] => Ok(only.clone()),
        _ if std::io::stdin().is_terminal() => select_sheet_interactive(available),
        [first, ..] => {
            println!("⚠ シート未指定のため先頭シート「{}」を使用します", first);
            Ok(first.clone())
        }
    }
}

/// 対話式でシートを選択
fn select_sheet_interactive(available: &[String]) -> Result<String> {
    let index = Select::new()
        .with_prompt("シートを選択してください")
        .items(available)
        .default(0)
        .interact()
        .map_err(|e| BindToolError::Prompt(e.to_string()))?;

    println!("→ {} を使用", available[index]);
    Ok(available[index].clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_requested_sheet_wins() {
        let sheet = choose_sheet(&names(&["A", "B"]), Some("B"), Some("A")).unwrap();
        assert_eq!(sheet, "B");
    }

    #[test]
    fn test_single_sheet() {
        let sheet = choose_sheet(&names(&["Labels"]), None, None).unwrap();
        assert_eq!(sheet, "Labels");
    }

    #[test]
    fn test_no_sheets() {
        let result = choose_sheet(&[], None, Some("Labels"));
        assert!(matches!(result, Err(BindToolError::NoSheets(_))));
    }

    #[test]
    fn test_preferred_sheet_used_when_present() {
        let sheet = choose_sheet(&names(&["Cover", "Labels"]), None, Some("Labels")).unwrap();
        assert_eq!(sheet, "Labels");
    }

    #[test]
    fn test_preferred_sheet_ignored_when_absent() {
        let sheet = choose_sheet(&names(&["Only"]), None, Some("Labels")).unwrap();
        assert_eq!(sheet, "Only");
    }
}
