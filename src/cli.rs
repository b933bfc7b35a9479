use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tgml-bind")]
#[command(about = "ExcelのラベルからTGMLのBind名を一括書き換えるツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// TGMLのBind名をExcelのNomenclatureで書き換え
    Bind {
        /// 入力TGMLファイル
        #[arg(required = true)]
        tgml: PathBuf,

        /// ラベル表（xlsx/xls/ods）
        #[arg(required = true)]
        workbook: PathBuf,

        /// シート名（省略時は1シートならそれ、複数なら選択）
        #[arg(short, long)]
        sheet: Option<String>,

        /// 出力TGMLファイル（デフォルト: 入力と同じ場所に updated_<名前>）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 未使用ラベル一覧の出力先（デフォルト: 出力TGMLと同じ場所）
        #[arg(long)]
        unmatched: Option<PathBuf>,

        /// 未使用ラベル一覧を出力しない
        #[arg(long)]
        no_unmatched_export: bool,

        /// 集計結果をJSONで保存
        #[arg(long)]
        report: Option<PathBuf>,

        /// ドライラン（ファイルを書き込まずに集計のみ表示）
        #[arg(long)]
        dry_run: bool,
    },

    /// ワークブックのシート一覧を表示
    Sheets {
        /// ワークブック
        #[arg(required = true)]
        workbook: PathBuf,
    },

    /// 設定を表示/編集
    Config {
        /// 出力ファイル名の接頭辞を設定
        #[arg(long)]
        set_output_prefix: Option<String>,

        /// --sheet 省略時に優先するシート名を設定（空文字で解除）
        #[arg(long)]
        set_preferred_sheet: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
