//! # ICO 容器序列化模块
//!
//! ## 设计思路
//!
//! 现代 ICO 直接内嵌完整 PNG，不再使用 BMP/DIB 数据，序列化器只负责拼装头部、目录与数据区，
//! 不解码也不重新编码 PNG。
//!
//! ## 二进制布局（小端序）
//!
//! ```text
//! ICONDIR        6 字节    reserved=0 | type=1 | count=N
//! ICONDIRENTRY  16 字节×N  width | height | colorCount=0 | reserved=0
//!                          | planes=1 | bitCount=32 | bytesInRes | imageOffset
//! 数据区                   PNG 字节按目录顺序首尾相接，无填充
//! ```
//!
//! ## 约束
//!
//! - 条目按边长升序排列，与输入顺序无关
//! - 宽高字段只有一个字节，256 写为 0
//! - 第一个数据块偏移为 `6 + 16 × N`，之后逐个累加上一块长度

use bytes::{BufMut, Bytes, BytesMut};

use super::config::MAX_ICO_DIMENSION;
use super::{AssetMap, FaviconError, IcoImageEntry};

pub const ICO_MIME: &str = "image/x-icon";

const ICONDIR_LEN: usize = 6;
const ICONDIRENTRY_LEN: usize = 16;
const RESOURCE_TYPE_ICON: u16 = 1;
const COLOR_PLANES: u16 = 1;
const BITS_PER_PIXEL: u16 = 32;

/// 将多张 PNG 序列化为单个 ICO 文件。
///
/// # 示例
/// ```rust,ignore
/// use favicon_generator::favicon::{serialize_ico, IcoImageEntry};
///
/// let ico = serialize_ico(&[IcoImageEntry::new(32, png32), IcoImageEntry::new(16, png16)])?;
/// assert_eq!(&ico[..6], &[0, 0, 1, 0, 2, 0]);
/// ```
pub fn serialize_ico(images: &[IcoImageEntry]) -> Result<Bytes, FaviconError> {
    if images.is_empty() {
        return Err(FaviconError::Precondition("ICO 至少需要一张图片".to_string()));
    }

    for image in images {
        validate_entry(image)?;
    }

    let mut sorted: Vec<&IcoImageEntry> = images.iter().collect();
    sorted.sort_by_key(|image| image.size);

    if let Some(pair) = sorted.windows(2).find(|pair| pair[0].size == pair[1].size) {
        return Err(FaviconError::Precondition(format!(
            "ICO 尺寸重复：{}x{}",
            pair[0].size, pair[0].size
        )));
    }

    let count = u16::try_from(sorted.len())
        .map_err(|_| FaviconError::Precondition(format!("ICO 条目过多：{}", sorted.len())))?;

    let header_len = ICONDIR_LEN + ICONDIRENTRY_LEN * sorted.len();
    let payload_len: usize = sorted.iter().map(|image| image.bytes.len()).sum();

    let mut out = BytesMut::with_capacity(header_len + payload_len);
    out.put_u16_le(0);
    out.put_u16_le(RESOURCE_TYPE_ICON);
    out.put_u16_le(count);

    let mut offset = u32::try_from(header_len)
        .map_err(|_| FaviconError::Precondition("ICO 目录长度溢出".to_string()))?;

    for image in &sorted {
        let bytes_in_res = u32::try_from(image.bytes.len()).map_err(|_| {
            FaviconError::Precondition(format!("{}x{} 的 PNG 数据过大", image.size, image.size))
        })?;
        let dimension = encode_dimension(image.size);

        out.put_u8(dimension);
        out.put_u8(dimension);
        out.put_u8(0);
        out.put_u8(0);
        out.put_u16_le(COLOR_PLANES);
        out.put_u16_le(BITS_PER_PIXEL);
        out.put_u32_le(bytes_in_res);
        out.put_u32_le(offset);

        offset = offset
            .checked_add(bytes_in_res)
            .ok_or_else(|| FaviconError::Precondition("ICO 文件总长度超过 4GB".to_string()))?;
    }

    for image in &sorted {
        out.put_slice(&image.bytes);
    }

    log::debug!(
        "🧱 ICO 组装完成 - 条目: {} 尺寸: {:?} 总长度: {}B",
        count,
        sorted.iter().map(|image| image.size).collect::<Vec<_>>(),
        out.len()
    );

    Ok(out.freeze())
}

/// 从生成结果中挑选打入 ICO 的条目（正方形且边长在 `sizes` 中）。
///
/// 同一边长出现多次时只保留第一个，其余跳过。
pub fn select_ico_entries(assets: &AssetMap, sizes: &[u32]) -> Vec<IcoImageEntry> {
    let mut entries: Vec<IcoImageEntry> = Vec::new();
    for asset in assets
        .iter()
        .filter(|asset| asset.width == asset.height && sizes.contains(&asset.width))
    {
        if entries.iter().any(|entry| entry.size == asset.width) {
            log::warn!(
                "⚠️ ICO 已包含 {}x{}，跳过 {}",
                asset.width,
                asset.height,
                asset.filename
            );
            continue;
        }
        entries.push(IcoImageEntry::from(asset));
    }
    entries
}

/// 目录项宽高字段编码：256 写为 0，其余按原值。
fn encode_dimension(size: u32) -> u8 {
    if size == MAX_ICO_DIMENSION { 0 } else { size as u8 }
}

fn validate_entry(image: &IcoImageEntry) -> Result<(), FaviconError> {
    if !(1..=MAX_ICO_DIMENSION).contains(&image.size) {
        return Err(FaviconError::Precondition(format!(
            "ICO 尺寸必须在 1~{} 之间：{}",
            MAX_ICO_DIMENSION, image.size
        )));
    }

    if !infer::image::is_png(&image.bytes) {
        return Err(FaviconError::Precondition(format!(
            "{}x{} 的数据不是 PNG 字节流",
            image.size, image.size
        )));
    }

    Ok(())
}
