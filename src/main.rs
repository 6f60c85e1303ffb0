//! # 多尺寸图标生成工具：命令行入口
//!
//! 本文件仅负责参数解析、日志初始化与产物落盘。
//! 业务逻辑分布在 `favicon` 子模块中，详见 `lib.rs` 架构文档。

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use favicon_generator::error::AppError;
use favicon_generator::favicon::{
    AssetBundle, FaviconConfig, FaviconService, ICO_MIME, MANIFEST_MIME, SizeSelection,
    SourceInput, ZIP_MIME,
};
use serde::Serialize;

const ARCHIVE_FILENAME: &str = "favicons.zip";

/// 从一张源图生成整套 favicon（PNG / ICO / ZIP）
#[derive(Parser, Debug)]
#[command(name = "favicon-generator", version, about, long_about = None)]
struct Cli {
    /// 源图片路径（PNG / JPEG / WebP 等）
    #[arg(required_unless_present = "list")]
    input: Option<PathBuf>,

    /// 输出目录
    #[arg(short, long, default_value = "favicons")]
    out_dir: PathBuf,

    /// 需要生成的尺寸名称，逗号分隔（默认使用目录中的默认勾选项）
    #[arg(short, long, value_delimiter = ',', conflicts_with = "all")]
    sizes: Vec<String>,

    /// 生成目录中的全部尺寸
    #[arg(long)]
    all: bool,

    /// 不生成 favicon.ico
    #[arg(long)]
    no_ico: bool,

    /// 缩放质量档位：quality / balanced / speed
    #[arg(long, default_value = "balanced")]
    profile: String,

    /// 额外生成 site.webmanifest，参数为应用名称
    #[arg(long, value_name = "APP_NAME")]
    manifest: Option<String>,

    /// 以 JSON 输出生成报告
    #[arg(long)]
    json: bool,

    /// 列出可用尺寸后退出
    #[arg(long)]
    list: bool,
}

#[derive(Debug, Serialize)]
struct OutputFile {
    filename: String,
    mime_type: &'static str,
    bytes: usize,
}

#[derive(Debug, Serialize)]
struct FailureRecord {
    filename: String,
    code: &'static str,
    stage: &'static str,
    message: String,
}

#[derive(Debug, Serialize)]
struct CliReport {
    out_dir: String,
    files: Vec<OutputFile>,
    failures: Vec<FailureRecord>,
    html: String,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let json = cli.json;

    if let Err(err) = run(cli).await {
        log::error!("❌ 生成失败（{}）：{}", err.code(), err);
        if json {
            let payload = serde_json::json!({ "code": err.code(), "error": err });
            println!("{}", payload);
        }
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let defaults = FaviconConfig::default();
    let config = FaviconConfig {
        include_ico: !cli.no_ico,
        include_web_manifest: cli.manifest.is_some(),
        app_name: cli.manifest.clone().unwrap_or(defaults.app_name.clone()),
        ..defaults
    };

    let service = FaviconService::with_config(config)?;
    service.set_quality_profile(&cli.profile)?;

    if cli.list {
        for spec in service.handler().catalog().specs() {
            println!(
                "{:<20} {:>4}x{:<4} {:<28} {}{}",
                spec.name,
                spec.width,
                spec.height,
                spec.filename,
                spec.description,
                if spec.default_selected { "（默认）" } else { "" }
            );
        }
        return Ok(());
    }

    let selection = if cli.all {
        SizeSelection::All
    } else if cli.sizes.is_empty() {
        SizeSelection::Defaults
    } else {
        SizeSelection::Names(cli.sizes.clone())
    };

    let input = cli
        .input
        .clone()
        .ok_or_else(|| AppError::InvalidArgument("缺少源图片路径".to_string()))?;
    let bundle = service
        .generate(SourceInput::FilePath(input), selection)
        .await?;

    for failure in &bundle.failures {
        log::warn!("⚠️ {} 未生成：{}", failure.filename, failure.error);
    }

    let files = write_bundle(&bundle, &cli.out_dir)?;

    if cli.json {
        let report = CliReport {
            out_dir: cli.out_dir.display().to_string(),
            files,
            failures: bundle
                .failures
                .iter()
                .map(|failure| FailureRecord {
                    filename: failure.filename.clone(),
                    code: failure.error.code(),
                    stage: failure.error.stage(),
                    message: failure.error.to_string(),
                })
                .collect(),
            html: bundle.html.clone(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        log::info!("✅ 已写入 {} 个文件到 {}", files.len(), cli.out_dir.display());
        println!("{}", bundle.html);
    }

    Ok(())
}

/// 将产物包写入输出目录。
fn write_bundle(bundle: &AssetBundle, out_dir: &Path) -> Result<Vec<OutputFile>, AppError> {
    if out_dir.exists() && !out_dir.is_dir() {
        return Err(AppError::InvalidArgument(format!(
            "输出路径不是目录：{}",
            out_dir.display()
        )));
    }
    fs::create_dir_all(out_dir)?;

    let mut files = Vec::new();
    let mut write = |filename: &str, mime_type: &'static str, bytes: &[u8]| -> Result<(), AppError> {
        fs::write(out_dir.join(filename), bytes)?;
        log::debug!("💾 {} ({}B)", filename, bytes.len());
        files.push(OutputFile {
            filename: filename.to_string(),
            mime_type,
            bytes: bytes.len(),
        });
        Ok(())
    };

    for asset in &bundle.assets {
        write(&asset.filename, asset.mime_type(), &asset.bytes)?;
    }
    if let Some((name, bytes)) = &bundle.ico {
        write(name, ICO_MIME, bytes)?;
    }
    if let Some((name, json)) = &bundle.web_manifest {
        write(name, MANIFEST_MIME, json.as_bytes())?;
    }
    write(ARCHIVE_FILENAME, ZIP_MIME, &bundle.zip)?;

    Ok(files)
}
