//! Excel生成（共通ライブラリ）
//!
//! 書き換えに使われなかったラベルの一覧を1列のシートとして出力する。

use rust_xlsxwriter::*;

/// 一覧の列見出し
pub const UNMATCHED_HEADER: &str = "Unmatched Labels";

const SHEET_NAME: &str = "Sheet1";

/// 未使用ラベル一覧のExcelをバッファに生成
///
/// # Arguments
/// * `labels` - ラベル（呼び出し側で整列済み）
pub fn generate_unmatched_buffer(labels: &[String]) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center);

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)
        .map_err(|e| format!("シート名設定エラー: {}", e))?;

    let width = labels
        .iter()
        .map(|l| l.chars().count())
        .chain(std::iter::once(UNMATCHED_HEADER.len()))
        .max()
        .unwrap_or(0);
    worksheet.set_column_width(0, (width + 2) as f64)
        .map_err(|e| format!("列幅設定エラー: {}", e))?;

    worksheet.write_string_with_format(0, 0, UNMATCHED_HEADER, &header_format)
        .map_err(|e| format!("見出し書き込みエラー: {}", e))?;

    for (i, label) in labels.iter().enumerate() {
        worksheet.write_string(i as u32 + 1, 0, label)
            .map_err(|e| format!("値書き込みエラー: {}", e))?;
    }

    workbook.save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}
