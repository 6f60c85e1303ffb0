//! # 数据源与中间模型
//!
//! ## 设计思路
//!
//! 将“外部输入类型”和“流水线中间结果”解耦：
//! - `SourceInput` 表示外部来源语义
//! - `SourceRaster` 表示已解码、只读的源位图
//! - `GeneratedAsset` / `AssetMap` 表示单次生成的 PNG 结果
//! - `IcoImageEntry` 表示 ICO 序列化的输入
//! - `AssetBundle` 表示一次生成动作的全部产物（不持久化，下次生成整体替换）

use std::path::PathBuf;

use bytes::Bytes;
use image::RgbaImage;

use super::FaviconError;
use super::generator::GenerationFailure;

pub const PNG_MIME: &str = "image/png";

/// 源图输入来源。
pub enum SourceInput {
    /// 已在内存中的原始字节（PNG / JPEG / WebP 等）。
    Bytes(Vec<u8>),
    /// Base64（支持 Data URL 与纯 Base64 字符串）。
    Base64(String),
    /// 本地文件路径来源。
    FilePath(PathBuf),
}

/// 已解码的源位图。
///
/// 流水线只读取像素，不修改也不在单次缩放之外持有它，可以安全地跨线程共享。
#[derive(Debug, Clone)]
pub struct SourceRaster {
    pixels: RgbaImage,
    source_hint: &'static str,
}

impl SourceRaster {
    pub fn new(pixels: RgbaImage, source_hint: &'static str) -> Self {
        Self {
            pixels,
            source_hint,
        }
    }

    pub fn natural_width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn natural_height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// 来源提示（用于日志与诊断）。
    pub fn source_hint(&self) -> &'static str {
        self.source_hint
    }
}

impl From<image::DynamicImage> for SourceRaster {
    fn from(image: image::DynamicImage) -> Self {
        Self::new(image.to_rgba8(), "memory")
    }
}

/// 单个尺寸的生成结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedAsset {
    pub filename: String,
    /// 完整的 PNG 字节流。
    pub bytes: Bytes,
    pub width: u32,
    pub height: u32,
}

impl GeneratedAsset {
    pub fn mime_type(&self) -> &'static str {
        PNG_MIME
    }
}

/// 文件名 → 生成结果，保持插入顺序。
///
/// 同一次生成内文件名唯一，重复插入会被拒绝。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetMap {
    entries: Vec<GeneratedAsset>,
}

impl AssetMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, asset: GeneratedAsset) -> Result<(), FaviconError> {
        if self.contains(&asset.filename) {
            return Err(FaviconError::Precondition(format!(
                "输出文件名重复：{}",
                asset.filename
            )));
        }
        self.entries.push(asset);
        Ok(())
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.get(filename).is_some()
    }

    pub fn get(&self, filename: &str) -> Option<&GeneratedAsset> {
        self.entries.iter().find(|asset| asset.filename == filename)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GeneratedAsset> {
        self.entries.iter()
    }

    pub fn filenames(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|asset| asset.filename.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a AssetMap {
    type Item = &'a GeneratedAsset;
    type IntoIter = std::slice::Iter<'a, GeneratedAsset>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// ICO 序列化输入：边长与完整 PNG 字节流。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcoImageEntry {
    pub size: u32,
    pub bytes: Bytes,
}

impl IcoImageEntry {
    pub fn new(size: u32, bytes: impl Into<Bytes>) -> Self {
        Self {
            size,
            bytes: bytes.into(),
        }
    }
}

impl From<&GeneratedAsset> for IcoImageEntry {
    fn from(asset: &GeneratedAsset) -> Self {
        Self {
            size: asset.width,
            bytes: asset.bytes.clone(),
        }
    }
}

/// 一次生成动作的全部产物。
#[derive(Debug)]
pub struct AssetBundle {
    pub assets: AssetMap,
    /// 单个尺寸失败的诊断，不影响其他尺寸。
    pub failures: Vec<GenerationFailure>,
    /// `(文件名, ICO 字节)`。
    pub ico: Option<(String, Bytes)>,
    /// `(文件名, manifest JSON)`。
    pub web_manifest: Option<(String, String)>,
    /// 可直接粘贴到 `<head>` 的 `<link>` 片段。
    pub html: String,
    pub zip: Bytes,
}

impl AssetBundle {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(filename: &str, size: u32) -> GeneratedAsset {
        GeneratedAsset {
            filename: filename.to_string(),
            bytes: Bytes::from_static(b"png"),
            width: size,
            height: size,
        }
    }

    #[test]
    fn asset_map_keeps_insertion_order() {
        let mut map = AssetMap::new();
        map.insert(asset("b.png", 32)).expect("insert b");
        map.insert(asset("a.png", 16)).expect("insert a");

        let names: Vec<&str> = map.filenames().collect();
        assert_eq!(names, vec!["b.png", "a.png"]);
        assert_eq!(map.get("a.png").map(|a| a.width), Some(16));
    }

    #[test]
    fn asset_map_rejects_duplicate_filename() {
        let mut map = AssetMap::new();
        map.insert(asset("a.png", 16)).expect("first insert");

        let result = map.insert(asset("a.png", 32));
        assert!(matches!(result, Err(FaviconError::Precondition(_))));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("a.png").map(|a| a.width), Some(16));
    }

    #[test]
    fn ico_entry_from_asset_uses_width() {
        let entry = IcoImageEntry::from(&asset("favicon-48x48.png", 48));
        assert_eq!(entry.size, 48);
        assert_eq!(entry.bytes, Bytes::from_static(b"png"));
    }

    #[test]
    fn raster_reports_natural_size() {
        let raster = SourceRaster::from(image::DynamicImage::new_rgba8(40, 10));
        assert_eq!((raster.natural_width(), raster.natural_height()), (40, 10));
        assert_eq!(raster.source_hint(), "memory");
    }
}
