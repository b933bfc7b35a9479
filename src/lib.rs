//! tgml-bind
//!
//! Excelのラベル表（First/Second/Third Label → Nomenclature）を使って
//! TGML文書の Bind 要素の Name を書き換える。照合ロジック本体は
//! `tgml_bind_common` にあり、このクレートはファイル入出力とCLIを担う。

pub mod binding;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod sheet_selector;
pub mod workbook;
