//! # 缩放模块
//!
//! ## 设计思路
//!
//! 缩放能力抽象为 `RasterResizer` trait，流水线只依赖 `resize(source, w, h) -> PNG 字节`，
//! 不绑定具体的解码器或后端，测试可以注入失败/计数用的实现。
//!
//! ## 实现思路
//!
//! - 默认实现 `ImageResizer` 优先走 `fast_image_resize` 卷积缩放，失败时回退 `image::imageops::resize`。
//! - 目标宽高比与源图不同时直接拉伸，不裁剪。
//! - 输出统一编码为 PNG，编码失败或产出为空视为 `Render` 错误。

use bytes::Bytes;
use fast_image_resize as fr;
use image::imageops::FilterType;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

use super::{FaviconError, SourceRaster};

/// 缩放能力接口。
pub trait RasterResizer: Send + Sync {
    /// 将 `source` 重采样为恰好 `width × height` 的 PNG。
    fn resize(&self, source: &SourceRaster, width: u32, height: u32) -> Result<Bytes, FaviconError>;
}

/// 基于 `fast_image_resize` + `image` 的默认缩放实现。
#[derive(Debug, Clone, Copy)]
pub struct ImageResizer {
    filter: FilterType,
}

impl Default for ImageResizer {
    fn default() -> Self {
        Self::new(FilterType::CatmullRom)
    }
}

impl ImageResizer {
    pub fn new(filter: FilterType) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> FilterType {
        self.filter
    }

    fn resize_with_fast_image_resize(
        &self,
        src: &RgbaImage,
        target_width: u32,
        target_height: u32,
    ) -> Result<RgbaImage, FaviconError> {
        let (src_width, src_height) = src.dimensions();

        let src_image = fr::images::Image::from_vec_u8(
            src_width,
            src_height,
            src.as_raw().clone(),
            fr::PixelType::U8x4,
        )
        .map_err(|e| FaviconError::Render(format!("构建源图像缓冲失败：{}", e)))?;

        let mut dst_image = fr::images::Image::new(target_width, target_height, fr::PixelType::U8x4);

        let mut resizer = fr::Resizer::new();
        let options = fr::ResizeOptions::new()
            .resize_alg(fr::ResizeAlg::Convolution(to_fast_filter(self.filter)));

        resizer
            .resize(&src_image, &mut dst_image, Some(&options))
            .map_err(|e| FaviconError::Render(format!("fast_image_resize 执行失败：{}", e)))?;

        ImageBuffer::<Rgba<u8>, Vec<u8>>::from_raw(target_width, target_height, dst_image.into_vec())
            .ok_or_else(|| FaviconError::Render("fast_image_resize 输出缓冲长度异常".to_string()))
    }
}

impl RasterResizer for ImageResizer {
    fn resize(&self, source: &SourceRaster, width: u32, height: u32) -> Result<Bytes, FaviconError> {
        if width == 0 || height == 0 {
            return Err(FaviconError::Precondition(format!(
                "目标尺寸必须大于 0：{}x{}",
                width, height
            )));
        }

        if source.natural_width() == 0 || source.natural_height() == 0 {
            return Err(FaviconError::Render(format!(
                "源图没有像素数据：{}x{}",
                source.natural_width(),
                source.natural_height()
            )));
        }

        let resized = match self.resize_with_fast_image_resize(source.pixels(), width, height) {
            Ok(resized) => resized,
            Err(err) => {
                log::warn!("⚠️ fast_image_resize 缩放失败，回退 image::imageops::resize：{}", err);
                image::imageops::resize(source.pixels(), width, height, self.filter)
            }
        };

        if resized.dimensions() != (width, height) {
            return Err(FaviconError::Render(format!(
                "缩放输出尺寸异常：期望 {}x{}，实际 {}x{}",
                width,
                height,
                resized.width(),
                resized.height()
            )));
        }

        encode_png(resized)
    }
}

/// 将 RGBA 像素编码为 PNG 字节流。
fn encode_png(pixels: RgbaImage) -> Result<Bytes, FaviconError> {
    let mut cursor = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(pixels)
        .write_to(&mut cursor, ImageFormat::Png)
        .map_err(|e| FaviconError::Render(format!("PNG 编码失败：{}", e)))?;

    let bytes = cursor.into_inner();
    if bytes.is_empty() {
        return Err(FaviconError::Render("PNG 编码未产出数据".to_string()));
    }

    Ok(Bytes::from(bytes))
}

fn to_fast_filter(filter: FilterType) -> fr::FilterType {
    match filter {
        FilterType::Nearest => fr::FilterType::Box,
        FilterType::Triangle => fr::FilterType::Bilinear,
        FilterType::CatmullRom => fr::FilterType::CatmullRom,
        FilterType::Gaussian => fr::FilterType::Mitchell,
        FilterType::Lanczos3 => fr::FilterType::Lanczos3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GenericImageView;

    fn gradient_source(width: u32, height: u32) -> SourceRaster {
        let img = ImageBuffer::from_fn(width, height, |x, y| {
            Rgba([(x % 255) as u8, (y % 255) as u8, ((x + y) % 255) as u8, 255])
        });
        SourceRaster::new(img, "test")
    }

    fn decoded_dimensions(bytes: &[u8]) -> (u32, u32) {
        image::load_from_memory_with_format(bytes, ImageFormat::Png)
            .expect("output should be a valid png")
            .dimensions()
    }

    #[test]
    fn resize_produces_exact_dimensions_for_every_catalog_size() {
        let resizer = ImageResizer::default();
        let source = gradient_source(300, 300);

        for size in [16, 32, 48, 64, 128, 180, 192, 256, 512] {
            let png = resizer.resize(&source, size, size).expect("resize should succeed");
            assert_eq!(decoded_dimensions(&png), (size, size));
        }
    }

    #[test]
    fn empty_source_is_a_render_error() {
        let resizer = ImageResizer::default();
        let empty = SourceRaster::new(RgbaImage::new(0, 0), "test");

        let result = resizer.resize(&empty, 16, 16);
        assert!(matches!(result, Err(FaviconError::Render(_))));

        let flat = SourceRaster::new(RgbaImage::new(40, 0), "test");
        assert!(matches!(resizer.resize(&flat, 16, 16), Err(FaviconError::Render(_))));
    }

    #[test]
    fn resize_stretches_instead_of_cropping() {
        let resizer = ImageResizer::default();
        let wide = gradient_source(400, 100);

        let png = resizer.resize(&wide, 64, 64).expect("resize should succeed");
        assert_eq!(decoded_dimensions(&png), (64, 64));

        let tall = resizer.resize(&wide, 10, 90).expect("non-square target should succeed");
        assert_eq!(decoded_dimensions(&tall), (10, 90));
    }

    #[test]
    fn resize_rejects_zero_dimensions() {
        let resizer = ImageResizer::default();
        let source = gradient_source(32, 32);

        assert!(matches!(resizer.resize(&source, 0, 16), Err(FaviconError::Precondition(_))));
        assert!(matches!(resizer.resize(&source, 16, 0), Err(FaviconError::Precondition(_))));
    }

    #[test]
    fn resize_does_not_touch_source() {
        let resizer = ImageResizer::new(FilterType::Lanczos3);
        let source = gradient_source(50, 20);
        let before = source.pixels().clone();

        resizer.resize(&source, 16, 16).expect("resize should succeed");

        assert_eq!(source.pixels(), &before);
        assert_eq!((source.natural_width(), source.natural_height()), (50, 20));
    }

    #[test]
    fn output_starts_with_png_signature() {
        let png = ImageResizer::default()
            .resize(&gradient_source(20, 20), 16, 16)
            .expect("resize should succeed");

        assert!(infer::image::is_png(&png));
    }

    #[test]
    fn upscaling_small_source_works() {
        let png = ImageResizer::new(FilterType::Triangle)
            .resize(&gradient_source(4, 4), 512, 512)
            .expect("upscale should succeed");

        assert_eq!(decoded_dimensions(&png), (512, 512));
    }

    #[test]
    fn fast_filter_mapping_never_uses_nearest_for_quality_filters() {
        assert!(matches!(to_fast_filter(FilterType::CatmullRom), fr::FilterType::CatmullRom));
        assert!(matches!(to_fast_filter(FilterType::Lanczos3), fr::FilterType::Lanczos3));
        assert!(matches!(to_fast_filter(FilterType::Triangle), fr::FilterType::Bilinear));
    }
}
