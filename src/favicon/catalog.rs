//! # 尺寸目录模块
//!
//! ## 设计思路
//!
//! 目录是一张不可变的配置表，显式传入生成器，而不是隐式的全局状态，
//! 这样测试可以替换为更小的目录。
//!
//! 标准目录固定为九项，文件名是对外 HTML 集成约定的一部分
//! （`<link rel="icon">` / `<link rel="apple-touch-icon">`），不能随意修改。

use once_cell::sync::Lazy;
use serde::Serialize;

use super::FaviconError;

/// 标准目录：`(name, size, filename, description, default_selected)`。
const STANDARD_ENTRIES: [(&str, u32, &str, &str, bool); 9] = [
    ("favicon-16", 16, "favicon-16x16.png", "浏览器标签页图标", true),
    ("favicon-32", 32, "favicon-32x32.png", "任务栏与高分屏标签页", true),
    ("favicon-48", 48, "favicon-48x48.png", "Windows 站点图标", true),
    ("favicon-64", 64, "favicon-64x64.png", "高分屏站点图标", false),
    ("favicon-128", 128, "favicon-128x128.png", "Chrome 应用商店", false),
    ("apple-touch-icon", 180, "apple-touch-icon.png", "iOS 主屏幕图标", true),
    ("android-chrome-192", 192, "android-chrome-192x192.png", "Android 主屏幕图标", true),
    ("favicon-256", 256, "favicon-256x256.png", "Windows 大图标", false),
    ("android-chrome-512", 512, "android-chrome-512x512.png", "Android 启动画面", true),
];

static STANDARD_CATALOG: Lazy<SizeCatalog> = Lazy::new(|| SizeCatalog {
    specs: STANDARD_ENTRIES
        .iter()
        .map(|&(name, size, filename, description, default_selected)| {
            SizeSpec::square(name, size, filename, description, default_selected)
        })
        .collect(),
});

/// 单个目标尺寸。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizeSpec {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub filename: String,
    pub description: String,
    pub default_selected: bool,
}

impl SizeSpec {
    /// 创建正方形尺寸项。
    pub fn square(
        name: &str,
        size: u32,
        filename: &str,
        description: &str,
        default_selected: bool,
    ) -> Self {
        Self {
            name: name.to_string(),
            width: size,
            height: size,
            filename: filename.to_string(),
            description: description.to_string(),
            default_selected,
        }
    }
}

/// 不可变尺寸目录。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizeCatalog {
    specs: Vec<SizeSpec>,
}

impl SizeCatalog {
    /// 从自定义尺寸项构建目录。
    ///
    /// 校验：尺寸非零且为正方形，名称与文件名各自唯一。
    pub fn new(specs: Vec<SizeSpec>) -> Result<Self, FaviconError> {
        for (idx, spec) in specs.iter().enumerate() {
            if spec.width == 0 || spec.height == 0 {
                return Err(FaviconError::Precondition(format!(
                    "尺寸项 {} 的宽高必须大于 0",
                    spec.name
                )));
            }
            if spec.width != spec.height {
                return Err(FaviconError::Precondition(format!(
                    "尺寸项 {} 必须为正方形：{}x{}",
                    spec.name, spec.width, spec.height
                )));
            }

            let earlier = &specs[..idx];
            if earlier.iter().any(|other| other.name == spec.name) {
                return Err(FaviconError::Precondition(format!("尺寸名称重复：{}", spec.name)));
            }
            if earlier.iter().any(|other| other.filename == spec.filename) {
                return Err(FaviconError::Precondition(format!(
                    "输出文件名重复：{}",
                    spec.filename
                )));
            }
        }

        Ok(Self { specs })
    }

    /// 进程内唯一的标准九项目录。
    pub fn standard() -> &'static SizeCatalog {
        &STANDARD_CATALOG
    }

    pub fn specs(&self) -> &[SizeSpec] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&SizeSpec> {
        self.specs.iter().find(|spec| spec.name == name)
    }

    /// 默认勾选的尺寸项，保持目录顺序。
    pub fn default_selection(&self) -> Vec<&SizeSpec> {
        self.specs.iter().filter(|spec| spec.default_selected).collect()
    }

    pub fn all(&self) -> Vec<&SizeSpec> {
        self.specs.iter().collect()
    }

    /// 按名称选择尺寸项，保持调用方给出的顺序。
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<&SizeSpec>, FaviconError> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref().trim();
                self.get(name).ok_or_else(|| {
                    FaviconError::Precondition(format!(
                        "未知尺寸：{}（可选：{}）",
                        name,
                        self.specs
                            .iter()
                            .map(|spec| spec.name.as_str())
                            .collect::<Vec<_>>()
                            .join(" / ")
                    ))
                })
            })
            .collect()
    }
}
