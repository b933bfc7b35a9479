//! バインド処理の一括実行
//!
//! 1. ラベル表の読み込み・検証（列不足・重複はここで中断）
//! 2. TGMLの解析（解析不能ならここで中断）
//! 3. 走査・書き換え
//! 4. 出力（すべて生成できた場合のみ書き込む。TGML本体は最後）

use crate::error::{BindToolError, Result};
use crate::export;
use crate::workbook;
use std::path::{Path, PathBuf};
use tgml_bind_common::{bind_document, LabelTable, Reconciliation, TgmlDocument};

/// 実行オプション
#[derive(Debug, Clone)]
pub struct BindOptions {
    pub tgml: PathBuf,
    pub workbook: PathBuf,
    pub sheet: String,
    /// 出力TGML（None なら入力の隣に接頭辞付き）
    pub output: Option<PathBuf>,
    /// 未使用ラベル一覧（None なら出力の隣）
    pub unmatched: Option<PathBuf>,
    pub export_unmatched: bool,
    pub report: Option<PathBuf>,
    pub dry_run: bool,
    pub output_prefix: String,
    pub unmatched_file_name: String,
    pub ensure_declaration: bool,
}

impl BindOptions {
    pub fn new(tgml: impl Into<PathBuf>, workbook: impl Into<PathBuf>, sheet: impl Into<String>) -> Self {
        Self {
            tgml: tgml.into(),
            workbook: workbook.into(),
            sheet: sheet.into(),
            output: None,
            unmatched: None,
            export_unmatched: true,
            report: None,
            dry_run: false,
            output_prefix: "updated_".into(),
            unmatched_file_name: "unmatched_labels.xlsx".into(),
            ensure_declaration: true,
        }
    }

    fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| export::default_output_path(&self.tgml, &self.output_prefix))
    }
}

/// 実行結果
#[derive(Debug, Clone)]
pub struct BindRun {
    pub report: Reconciliation,
    /// 書き込んだTGML（ドライランでは None）
    pub output: Option<PathBuf>,
    /// 書き込んだ未使用ラベル一覧
    pub unmatched: Option<PathBuf>,
    /// 書き込んだJSONレポート
    pub report_path: Option<PathBuf>,
}

/// ラベル表を読み込んで検証
pub fn load_label_table(path: &Path, sheet: &str) -> Result<LabelTable> {
    let sheet = workbook::read_sheet(path, sheet)?;
    Ok(LabelTable::from_sheet(&sheet)?)
}

/// TGMLを読み込んで解析
pub fn load_document(path: &Path) -> Result<TgmlDocument> {
    if !path.exists() {
        return Err(BindToolError::FileNotFound(path.display().to_string()));
    }
    let bytes = std::fs::read(path)?;
    Ok(TgmlDocument::from_bytes(&bytes)?)
}

/// 一括実行
pub fn run(options: &BindOptions) -> Result<BindRun> {
    let table = load_label_table(&options.workbook, &options.sheet)?;
    tracing::info!(labels = table.len(), sheet = %options.sheet, "label table loaded");

    let mut document = load_document(&options.tgml)?;
    tracing::info!(elements = document.elements().len(), "document parsed");

    let outcome = bind_document(&mut document, &table);
    let content = document.serialize(options.ensure_declaration);

    if options.dry_run {
        return Ok(BindRun {
            report: outcome.report,
            output: None,
            unmatched: None,
            report_path: None,
        });
    }

    // 先にすべての出力を生成し、最後にまとめて書き込む
    let output = options.output_path();
    let mut outputs = export::OutputSet::new();
    outputs.document(&output, &content);

    let unmatched = if options.export_unmatched && !outcome.report.unused_labels.is_empty() {
        let path = options
            .unmatched
            .clone()
            .unwrap_or_else(|| export::default_unmatched_path(&output, &options.unmatched_file_name));
        outputs.unmatched(&path, &outcome.report.unused_labels)?;
        Some(path)
    } else {
        None
    };

    let report_path = match &options.report {
        Some(path) => {
            outputs.report(path, &outcome.report)?;
            Some(path.clone())
        }
        None => None,
    };

    outputs.commit()?;
    tracing::info!(path = %output.display(), "document written");

    Ok(BindRun {
        report: outcome.report,
        output: Some(output),
        unmatched,
        report_path,
    })
}
