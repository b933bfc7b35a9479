//! 出力ファイルの書き込み
//!
//! 出力はすべてメモリ上で生成してから `OutputSet::commit` でまとめて書き込む。
//! 各ファイルは一時ファイルに書いてから置き換え、TGML本体は最後に置く。
//! 途中で失敗した場合、TGML本体は書き込まれない。

use crate::error::{BindToolError, Result};
use std::path::{Path, PathBuf};
use tgml_bind_common::export::excel_core;
use tgml_bind_common::Reconciliation;

/// 出力TGMLの既定パス（入力と同じ場所に接頭辞付き）
pub fn default_output_path(input: &Path, prefix: &str) -> PathBuf {
    let file_name = input
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("document.tgml");
    let parent = input.parent().unwrap_or_else(|| Path::new("."));
    parent.join(format!("{}{}", prefix, file_name))
}

/// 未使用ラベル一覧の既定パス（出力TGMLと同じ場所）
pub fn default_unmatched_path(output: &Path, file_name: &str) -> PathBuf {
    let parent = output.parent().unwrap_or_else(|| Path::new("."));
    parent.join(file_name)
}

/// 書き込み待ちの出力一式
#[derive(Debug, Default)]
pub struct OutputSet {
    document: Option<(PathBuf, Vec<u8>)>,
    attachments: Vec<(PathBuf, Vec<u8>)>,
}

impl OutputSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 書き換え済みTGML
    pub fn document(&mut self, path: &Path, content: &str) {
        self.document = Some((path.to_path_buf(), content.as_bytes().to_vec()));
    }

    /// 未使用ラベル一覧（Excel）
    pub fn unmatched(&mut self, path: &Path, labels: &[String]) -> Result<()> {
        let buffer = excel_core::generate_unmatched_buffer(labels)
            .map_err(BindToolError::ExcelGeneration)?;
        self.attachments.push((path.to_path_buf(), buffer));
        Ok(())
    }

    /// 集計結果（JSON）
    pub fn report(&mut self, path: &Path, report: &Reconciliation) -> Result<()> {
        let json = report.to_json()?;
        self.attachments.push((path.to_path_buf(), json.into_bytes()));
        Ok(())
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.attachments
            .iter()
            .chain(self.document.iter())
            .map(|(path, _)| path.as_path())
    }

    /// すべて書き込む（TGML本体は最後）
    pub fn commit(self) -> Result<()> {
        let files: Vec<(PathBuf, Vec<u8>)> =
            self.attachments.into_iter().chain(self.document).collect();

        for (path, _) in &files {
            if path.is_dir() {
                return Err(BindToolError::OutputPath(format!(
                    "{} はディレクトリです",
                    path.display()
                )));
            }
        }

        let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(files.len());
        for (path, bytes) in &files {
            let temp = staging_path(path);
            if let Err(e) = write_bytes(&temp, bytes) {
                discard(&staged);
                let _ = std::fs::remove_file(&temp);
                return Err(e);
            }
            staged.push((temp, path.clone()));
        }

        for (n, (temp, path)) in staged.iter().enumerate() {
            if let Err(e) = std::fs::rename(temp, path) {
                discard(&staged[n..]);
                return Err(e.into());
            }
            tracing::debug!(path = %path.display(), "written");
        }

        Ok(())
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    path.with_file_name(format!(".{}.tmp", file_name))
}

fn discard(staged: &[(PathBuf, PathBuf)]) {
    for (temp, _) in staged {
        let _ = std::fs::remove_file(temp);
    }
}

fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path() {
        let path = default_output_path(Path::new("/work/panel.tgml"), "updated_");
        assert_eq!(path, PathBuf::from("/work/updated_panel.tgml"));
    }

    #[test]
    fn test_default_output_path_relative() {
        let path = default_output_path(Path::new("panel.tgml"), "bound_");
        assert_eq!(path, PathBuf::from("bound_panel.tgml"));
    }

    #[test]
    fn test_default_unmatched_path() {
        let path = default_unmatched_path(Path::new("/out/updated_panel.tgml"), "unmatched_labels.xlsx");
        assert_eq!(path, PathBuf::from("/out/unmatched_labels.xlsx"));
    }

    #[test]
    fn test_staging_path_is_hidden_sibling() {
        let path = staging_path(Path::new("/out/updated_panel.tgml"));
        assert_eq!(path, PathBuf::from("/out/.updated_panel.tgml.tmp"));
    }

    #[test]
    fn test_document_is_committed_last() {
        let mut outputs = OutputSet::new();
        outputs.document(Path::new("/out/panel.tgml"), "<Tgml/>");
        outputs
            .report(Path::new("/out/report.json"), &Reconciliation::default())
            .unwrap();
        let paths: Vec<&Path> = outputs.paths().collect();
        assert_eq!(paths, vec![Path::new("/out/report.json"), Path::new("/out/panel.tgml")]);
    }
}
