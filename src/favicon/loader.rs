//! # 加载与校验模块
//!
//! ## 设计思路
//!
//! 统一处理不同来源（内存字节 / Base64 / 本地文件）的原始字节加载，并在“尽可能早”的阶段执行输入校验。
//! 目标是尽快失败，减少不必要内存与 CPU 消耗。
//!
//! ## 实现思路
//!
//! 1. 按来源读取原始字节（Base64 先估算体积，文件先看 metadata）
//! 2. 通过文件签名确认是图片
//! 3. 读取 header 尺寸，按像素与内存上限快速拒绝
//! 4. 完整解码并转换为 RGBA

use base64::{Engine as _, engine::general_purpose};
use image::ImageReader;
use std::io::Cursor;
use std::path::Path;

use super::{FaviconConfig, FaviconError, SourceInput, SourceRaster};

/// 按来源加载并解码源图。
pub fn load_source(input: SourceInput, config: &FaviconConfig) -> Result<SourceRaster, FaviconError> {
    let (bytes, source_hint) = match input {
        SourceInput::Bytes(bytes) => {
            check_file_size(bytes.len() as u64, config)?;
            (bytes, "bytes")
        }
        SourceInput::Base64(data) => {
            log::info!("📝 开始处理 base64 图片");
            (parse_base64_with_limit(&data, config.max_file_size)?, "base64")
        }
        SourceInput::FilePath(path) => (read_file_with_limit(&path, config)?, "file"),
    };

    validate_image_signature(&bytes)?;
    decode_source(&bytes, source_hint, config)
}

fn read_file_with_limit(path: &Path, config: &FaviconConfig) -> Result<Vec<u8>, FaviconError> {
    log::info!("📁 开始读取本地图片 - 路径: {}", path.display());

    if !path.exists() {
        return Err(FaviconError::FileSystem(format!("文件不存在：{}", path.display())));
    }

    let metadata = std::fs::metadata(path)
        .map_err(|e| FaviconError::FileSystem(format!("无法读取文件信息：{}", e)))?;
    check_file_size(metadata.len(), config)?;

    std::fs::read(path).map_err(|e| FaviconError::FileSystem(format!("无法读取图片文件：{}", e)))
}

fn check_file_size(len: u64, config: &FaviconConfig) -> Result<(), FaviconError> {
    if len > config.max_file_size {
        return Err(FaviconError::ResourceLimit(format!(
            "文件过大：{:.2} MB（限制：{:.2} MB）",
            len as f64 / 1024.0 / 1024.0,
            config.max_file_size as f64 / 1024.0 / 1024.0
        )));
    }
    Ok(())
}

fn estimate_base64_decoded_upper_bound_len(base64_data: &str) -> Result<u64, FaviconError> {
    let len = base64_data.trim().len() as u64;
    let groups = len
        .checked_add(3)
        .ok_or_else(|| FaviconError::ResourceLimit("Base64 输入长度溢出".to_string()))?
        / 4;

    groups
        .checked_mul(3)
        .ok_or_else(|| FaviconError::ResourceLimit("Base64 解码体积估算溢出".to_string()))
}

/// 解析 Base64 输入（支持 Data URL / 纯 Base64），解码前先按估算体积拒绝超限输入。
fn parse_base64_with_limit(data: &str, max_file_size: u64) -> Result<Vec<u8>, FaviconError> {
    let normalized = data.trim();

    let base64_data = if normalized.starts_with("data:") {
        let base64_start = normalized
            .find(";base64,")
            .ok_or_else(|| FaviconError::InvalidFormat("缺少 base64 标记".to_string()))?;
        &normalized[base64_start + 8..]
    } else {
        normalized
    };

    let estimated_len = estimate_base64_decoded_upper_bound_len(base64_data)?;
    if estimated_len > max_file_size {
        return Err(FaviconError::ResourceLimit(format!(
            "Base64 预计解码体积过大：{:.2} MB（限制：{:.2} MB）",
            estimated_len as f64 / 1024.0 / 1024.0,
            max_file_size as f64 / 1024.0 / 1024.0
        )));
    }

    general_purpose::STANDARD
        .decode(base64_data)
        .map_err(|e| FaviconError::Decode(format!("Base64 解码失败：{}", e)))
}

/// 通过文件签名（magic bytes）校验输入是否为图片。
fn validate_image_signature(bytes: &[u8]) -> Result<(), FaviconError> {
    if bytes.is_empty() {
        return Err(FaviconError::InvalidFormat("图片内容为空".to_string()));
    }

    let kind = infer::get(bytes)
        .ok_or_else(|| FaviconError::InvalidFormat("无法识别图片类型".to_string()))?;

    if kind.matcher_type() != infer::MatcherType::Image {
        return Err(FaviconError::InvalidFormat(format!(
            "文件签名不是图片类型：{}",
            kind.mime_type()
        )));
    }

    Ok(())
}

fn decode_source(
    bytes: &[u8],
    source_hint: &'static str,
    config: &FaviconConfig,
) -> Result<SourceRaster, FaviconError> {
    let (header_width, header_height) = inspect_dimensions_from_memory(bytes)?;
    validate_pixel_limits(config, header_width, header_height)?;
    validate_decoded_memory_limits(config, header_width, header_height)?;

    let decoded = image::load_from_memory(bytes)
        .map_err(|e| FaviconError::Decode(format!("图片解码失败：{}", e)))?;
    let pixels = decoded.to_rgba8();

    if pixels.width() == 0 || pixels.height() == 0 {
        return Err(FaviconError::Decode("解码结果为空图像".to_string()));
    }

    log::info!(
        "✅ 源图解码成功 - 来源: {} 尺寸: {}x{}",
        source_hint,
        pixels.width(),
        pixels.height()
    );

    Ok(SourceRaster::new(pixels, source_hint))
}

/// 仅通过内存中的图片头信息读取宽高。
fn inspect_dimensions_from_memory(bytes: &[u8]) -> Result<(u32, u32), FaviconError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| FaviconError::InvalidFormat(format!("无法识别图片格式：{}", e)))?;

    reader
        .into_dimensions()
        .map_err(|e| FaviconError::InvalidFormat(format!("无法读取图片尺寸：{}", e)))
}

fn validate_pixel_limits(config: &FaviconConfig, width: u32, height: u32) -> Result<(), FaviconError> {
    let pixels = (width as u64)
        .checked_mul(height as u64)
        .ok_or_else(|| FaviconError::ResourceLimit("图片像素数溢出".to_string()))?;

    if pixels > config.max_decoded_pixels {
        return Err(FaviconError::ResourceLimit(format!(
            "图片像素过大：{} 像素（限制：{} 像素）",
            pixels, config.max_decoded_pixels
        )));
    }

    Ok(())
}

fn validate_decoded_memory_limits(
    config: &FaviconConfig,
    width: u32,
    height: u32,
) -> Result<(), FaviconError> {
    let estimated = (width as u64)
        .checked_mul(height as u64)
        .and_then(|pixels| pixels.checked_mul(4))
        .ok_or_else(|| FaviconError::ResourceLimit("图片解码内存估算溢出".to_string()))?;

    if estimated > config.max_decoded_bytes {
        return Err(FaviconError::ResourceLimit(format!(
            "图片解码预计内存过大：{:.2} MB（限制：{:.2} MB）",
            estimated as f64 / 1024.0 / 1024.0,
            config.max_decoded_bytes as f64 / 1024.0 / 1024.0
        )));
    }

    Ok(())
}
