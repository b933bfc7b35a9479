use clap::Parser;
use tgml_bind::{binding, cli, config, error, sheet_selector, workbook};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() {
    if let Err(e) = run() {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let env = std::env::var("RUST_LOG").ok();
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(log_filter(cli.verbose, env.as_deref()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| error::BindToolError::Config(format!("ログ初期化エラー: {}", e)))?;

    let config = Config::load()?;

    match cli.command {
        Commands::Bind { tgml, workbook: workbook_path, sheet, output, unmatched, no_unmatched_export, report, dry_run } => {
            println!("🔗 tgml-bind - Bind名書き換え\n");

            // 1. シート決定
            println!("[1/3] ラベル表を読み込み中...");
            let available = workbook::sheet_names(&workbook_path)?;
            let sheet = sheet_selector::choose_sheet(&available, sheet.as_deref(), config.preferred_sheet.as_deref())?;

            let options = binding::BindOptions {
                tgml,
                workbook: workbook_path,
                sheet,
                output,
                unmatched,
                export_unmatched: config.export_unmatched && !no_unmatched_export,
                report,
                dry_run,
                output_prefix: config.output_prefix.clone(),
                unmatched_file_name: config.unmatched_file_name.clone(),
                ensure_declaration: config.ensure_declaration,
            };
            println!("✔ シート: {}\n", options.sheet);

            // 2-3. 照合・書き換え・出力
            println!("[2/3] 照合・書き換え中...{}", if dry_run { " (ドライラン)" } else { "" });
            let result = binding::run(&options)?;
            println!("✔ 書き換え完了\n");

            println!("[3/3] 結果");
            let r = &result.report;
            println!("🔹 Excelのラベル総数: {}", r.total);
            println!("✅ 書き換えたラベル: {}", r.used);
            println!("❌ 書き換えなかったラベル: {}", r.unused);
            println!("✏ 値が変わったBind要素: {}", r.rewritten_elements);
            if !r.suppressed_labels.is_empty() {
                println!("⚠ Nomenclatureが空のため未書き換え: {}", r.suppressed_labels.join(", "));
            }
            if cli.verbose && !r.unmatched_names.is_empty() {
                println!("⚠ 一致するラベルがないテキスト:");
                for name in &r.unmatched_names {
                    println!("  - {}", name);
                }
            }

            if let Some(path) = &result.output {
                println!("\n✔ TGML出力: {}", path.display());
            }
            if let Some(path) = &result.unmatched {
                println!("✔ 未使用ラベル一覧: {}", path.display());
            }
            if let Some(path) = &result.report_path {
                println!("✔ レポート: {}", path.display());
            }

            println!("\n✅ 完了");
        }

        Commands::Sheets { workbook: workbook_path } => {
            let names = workbook::sheet_names(&workbook_path)?;
            println!("シート一覧 ({}):", workbook_path.display());
            for (i, name) in names.iter().enumerate() {
                println!("  {}) {}", i + 1, name);
            }
        }

        Commands::Config { set_output_prefix, set_preferred_sheet, show } => {
            let mut config = config;
            let changed = set_output_prefix.is_some() || set_preferred_sheet.is_some();

            if let Some(prefix) = set_output_prefix {
                config.set_output_prefix(prefix)?;
                println!("✔ 出力ファイル名の接頭辞を設定しました");
            }
            if let Some(sheet) = set_preferred_sheet {
                config.set_preferred_sheet(sheet);
                println!("✔ 優先シートを設定しました");
            }
            if changed {
                config.save()?;
            }

            if show {
                println!("設定:");
                println!("  出力接頭辞: {}", config.output_prefix);
                println!("  未使用ラベル一覧: {}", config.unmatched_file_name);
                println!("  未使用ラベル出力: {}", if config.export_unmatched { "有効" } else { "無効" });
                println!("  XML宣言の付与: {}", if config.ensure_declaration { "有効" } else { "無効" });
                println!("  優先シート: {}", config.preferred_sheet.as_deref().unwrap_or("(なし)"));
                println!("  設定ファイル: {}", Config::config_path()?.display());
            }
        }
    }

    Ok(())
}

/// --verbose なら debug、それ以外は RUST_LOG（未設定・不正なら warn）
fn log_filter(verbose: bool, env: Option<&str>) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    env.and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}
