//! # ZIP 打包模块
//!
//! ## 设计思路
//!
//! 将生成的 PNG 与附加文件（`favicon.ico`、`site.webmanifest`）打成一个 ZIP，供一键下载。
//! 压缩包内文件名即映射键，不改名、不建目录。
//!
//! ## 实现思路
//!
//! - 写入前统一校验文件名（非空、无路径分隔符、不重复）。
//! - 整个压缩包在内存中完成，任何写入错误都直接返回 `Archive`，不返回半成品。

use std::collections::HashSet;
use std::io::{Cursor, Write};

use bytes::Bytes;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use super::{ArchiveCompression, AssetMap, FaviconError};

pub const ZIP_MIME: &str = "application/zip";

/// 压缩包内除 PNG 之外的附加条目。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub filename: String,
    pub bytes: Bytes,
}

impl ArchiveEntry {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }
}

impl From<ArchiveCompression> for CompressionMethod {
    fn from(compression: ArchiveCompression) -> Self {
        match compression {
            ArchiveCompression::Stored => CompressionMethod::Stored,
            ArchiveCompression::Deflated => CompressionMethod::Deflated,
        }
    }
}

/// 将全部生成结果与附加条目打包为 ZIP。
pub fn package_zip(
    assets: &AssetMap,
    extras: &[ArchiveEntry],
    compression: ArchiveCompression,
) -> Result<Bytes, FaviconError> {
    let entries: Vec<(&str, &[u8])> = assets
        .iter()
        .map(|asset| (asset.filename.as_str(), asset.bytes.as_ref()))
        .chain(
            extras
                .iter()
                .map(|extra| (extra.filename.as_str(), extra.bytes.as_ref())),
        )
        .collect();

    validate_entry_names(&entries)?;

    let options = SimpleFileOptions::default().compression_method(compression.into());
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    for (name, data) in &entries {
        zip.start_file(*name, options)
            .map_err(|e| FaviconError::Archive(format!("创建条目 {} 失败：{}", name, e)))?;
        zip.write_all(data)
            .map_err(|e| FaviconError::Archive(format!("写入条目 {} 失败：{}", name, e)))?;
    }

    let cursor = zip
        .finish()
        .map_err(|e| FaviconError::Archive(format!("压缩包收尾失败：{}", e)))?;
    let bytes = cursor.into_inner();

    log::info!(
        "📦 压缩包生成完成 - 条目: {} 大小: {:.1} KB",
        entries.len(),
        bytes.len() as f64 / 1024.0
    );

    Ok(Bytes::from(bytes))
}

fn validate_entry_names(entries: &[(&str, &[u8])]) -> Result<(), FaviconError> {
    let mut seen = HashSet::with_capacity(entries.len());

    for (name, _) in entries {
        if name.trim().is_empty() {
            return Err(FaviconError::Archive("条目文件名不能为空".to_string()));
        }
        if name.contains('/') || name.contains('\\') {
            return Err(FaviconError::Archive(format!("条目文件名不能包含目录：{}", name)));
        }
        if !seen.insert(*name) {
            return Err(FaviconError::Archive(format!("条目文件名重复：{}", name)));
        }
    }

    Ok(())
}
