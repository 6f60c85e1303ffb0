//! # 配置模块
//!
//! ## 设计思路
//!
//! 将所有“可调策略”集中到 `FaviconConfig`，保证运行时行为可观测、可调整、可测试。
//! 其中质量档位（quality / balanced / speed）作为高层语义，映射到底层缩放滤镜。
//!
//! ## 实现思路
//!
//! - `Default` 提供生产可用的配置（Catmull-Rom 双三次插值）。
//! - `ResizeQuality` 负责档位字符串解析与反向输出。
//! - `apply_quality_profile` 将档位转换为具体滤镜。
//! - `infer_quality_profile` 用于从当前配置反推档位。
//! - 任何档位都不会退化为最近邻采样，小尺寸图标对锯齿非常敏感。

use image::imageops::FilterType;

use super::FaviconError;

/// ICO 目录项宽高字段只有一个字节，256 以 0 表示。
pub const MAX_ICO_DIMENSION: u32 = 256;

/// ZIP 内条目的压缩方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveCompression {
    Stored,
    Deflated,
}

/// 图标生成配置。
///
/// 字段覆盖了源图加载、缩放、ICO 组装与 ZIP 打包四个阶段。
#[derive(Debug, Clone)]
pub struct FaviconConfig {
    /// 读取源图原始字节时允许的最大体积（字节）。
    pub max_file_size: u64,
    /// 解码后的像素上限（`width * height`）。
    pub max_decoded_pixels: u64,
    /// 解码阶段允许的预计内存上限（按 RGBA 估算，字节）。
    pub max_decoded_bytes: u64,
    /// 缩放滤镜策略。
    pub resize_filter: FilterType,
    /// 打入 ICO 的尺寸列表。
    pub ico_sizes: Vec<u32>,
    /// 是否生成 ICO。
    pub include_ico: bool,
    /// ICO 在压缩包中的文件名。
    pub ico_filename: String,
    /// ZIP 压缩方式。
    pub archive_compression: ArchiveCompression,
    /// 是否额外生成 `site.webmanifest`。
    pub include_web_manifest: bool,
    /// manifest 文件名。
    pub manifest_filename: String,
    /// manifest 中的应用名称。
    pub app_name: String,
}

impl Default for FaviconConfig {
    fn default() -> Self {
        Self {
            max_file_size: 50 * 1024 * 1024,
            max_decoded_pixels: 40_000_000,
            max_decoded_bytes: 160 * 1024 * 1024,
            resize_filter: FilterType::CatmullRom,
            ico_sizes: vec![16, 32, 48],
            include_ico: true,
            ico_filename: "favicon.ico".to_string(),
            archive_compression: ArchiveCompression::Deflated,
            include_web_manifest: false,
            manifest_filename: "site.webmanifest".to_string(),
            app_name: "App".to_string(),
        }
    }
}

/// 缩放质量档位（面向用户语义）。
///
/// - `Quality`：Lanczos3，边缘最锐利
/// - `Balanced`：Catmull-Rom 双三次插值
/// - `Speed`：双线性插值
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeQuality {
    Quality,
    Balanced,
    Speed,
}

impl ResizeQuality {
    /// 从外部字符串解析档位。
    ///
    /// # 示例
    /// ```rust
    /// use favicon_generator::favicon::ResizeQuality;
    ///
    /// let p = ResizeQuality::from_str("balanced")?;
    /// assert_eq!(p.as_str(), "balanced");
    /// # Ok::<(), favicon_generator::favicon::FaviconError>(())
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(profile: &str) -> Result<Self, FaviconError> {
        match profile.trim().to_lowercase().as_str() {
            "quality" => Ok(Self::Quality),
            "balanced" => Ok(Self::Balanced),
            "speed" => Ok(Self::Speed),
            other => Err(FaviconError::InvalidFormat(format!(
                "未知质量档位：{}（可选：quality / balanced / speed）",
                other
            ))),
        }
    }

    /// 将档位输出为稳定字符串。
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quality => "quality",
            Self::Balanced => "balanced",
            Self::Speed => "speed",
        }
    }

    pub fn filter(self) -> FilterType {
        match self {
            Self::Quality => FilterType::Lanczos3,
            Self::Balanced => FilterType::CatmullRom,
            Self::Speed => FilterType::Triangle,
        }
    }
}

impl FaviconConfig {
    /// 基于当前滤镜反推质量档位。
    pub fn infer_quality_profile(&self) -> ResizeQuality {
        match self.resize_filter {
            FilterType::Lanczos3 | FilterType::Gaussian => ResizeQuality::Quality,
            FilterType::Triangle | FilterType::Nearest => ResizeQuality::Speed,
            FilterType::CatmullRom => ResizeQuality::Balanced,
        }
    }

    pub fn apply_quality_profile(&mut self, profile: ResizeQuality) {
        self.resize_filter = profile.filter();
    }

    /// 校验配置组合是否合法。
    ///
    /// ICO 尺寸必须落在 `[1, 256]` 且不重复，文件名不能为空或包含路径分隔符。
    pub fn validate(&self) -> Result<(), FaviconError> {
        if self.resize_filter == FilterType::Nearest {
            return Err(FaviconError::Precondition(
                "不支持最近邻缩放，请选择 quality / balanced / speed 档位".to_string(),
            ));
        }

        if self.include_ico && self.ico_sizes.is_empty() {
            return Err(FaviconError::Precondition("ICO 尺寸列表不能为空".to_string()));
        }

        for (idx, size) in self.ico_sizes.iter().enumerate() {
            if !(1..=MAX_ICO_DIMENSION).contains(size) {
                return Err(FaviconError::Precondition(format!(
                    "ICO 尺寸必须在 1~{} 之间：{}",
                    MAX_ICO_DIMENSION, size
                )));
            }
            if self.ico_sizes[..idx].contains(size) {
                return Err(FaviconError::Precondition(format!("ICO 尺寸重复：{}", size)));
            }
        }

        validate_flat_filename(&self.ico_filename)?;
        validate_flat_filename(&self.manifest_filename)?;

        if self.include_web_manifest && self.app_name.trim().is_empty() {
            return Err(FaviconError::Precondition("app_name 不能为空".to_string()));
        }

        Ok(())
    }
}

fn validate_flat_filename(name: &str) -> Result<(), FaviconError> {
    if name.trim().is_empty() {
        return Err(FaviconError::Precondition("文件名不能为空".to_string()));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(FaviconError::Precondition(format!("文件名不能包含路径分隔符：{}", name)));
    }
    Ok(())
}
