//! TGML Bind Common Library
//!
//! ラベル表の構築、あいまい照合、文書走査による Bind 書き換え、集計。
//! ファイルの入出力を持たないので、CLI以外のフロントエンドからも使える。

pub mod error;
pub mod sheet;
pub mod label_table;
pub mod matcher;
pub mod walker;
pub mod document;
pub mod binder;
pub mod report;
pub mod export;

pub use error::{Error, Result};
pub use sheet::Sheet;
pub use label_table::{normalize_label, LabelEntry, LabelRow, LabelTable};
pub use matcher::{best_match, MatchResult, SIMILARITY_CUTOFF};
pub use walker::{ElementKind, Step, TraversalState, WalkSummary, Walker};
pub use document::TgmlDocument;
pub use binder::{bind_document, BindOutcome, Rewrite};
pub use report::Reconciliation;
