//! # 图标生成模块（favicon）
//!
//! ## 设计思路
//!
//! 该模块将“源图加载 → 多尺寸缩放 → ICO 组装 → ZIP 打包”按职责拆分为多个子模块，
//! 每个阶段只接收普通值、返回普通值或带类型的错误，不依赖任何界面状态。
//!
//! - `service`：异步入口（`spawn_blocking` 承载 CPU 密集工作）
//! - `handler`：编排整条处理流水线
//! - `loader`：负责字节/Base64/文件加载与安全校验
//! - `resizer`：缩放能力接口与默认实现
//! - `generator`：按尺寸目录批量生成，单项失败隔离
//! - `ico`：ICO 容器逐字节序列化
//! - `archive`：ZIP 打包
//! - `markup`：`<link>` 片段与 web manifest
//! - `catalog/config/error/source`：目录、配置、错误、中间数据模型
//!
//! ## 新同事快速上手
//!
//! ```text
//! CLI / 调用方
//!    ↓
//! service.rs（异步入口、尺寸选择解析）
//!    ↓
//! handler.rs（配置快照 + 阶段耗时日志）
//!    ├─ loader.rs（来源加载 + 签名/体积/像素校验）
//!    ├─ generator.rs → resizer.rs（逐尺寸缩放 + PNG 编码）
//!    ├─ ico.rs（16/32/48 → favicon.ico）
//!    ├─ markup.rs（HTML 片段 + manifest）
//!    └─ archive.rs（全部产物 → ZIP）
//!    ↓
//! AssetBundle / FaviconError
//! ```

mod archive;
mod catalog;
mod config;
mod error;
mod generator;
mod handler;
mod ico;
mod loader;
mod markup;
mod resizer;
mod service;
mod source;

pub use archive::{ArchiveEntry, ZIP_MIME, package_zip};
pub use catalog::{SizeCatalog, SizeSpec};
pub use config::{ArchiveCompression, FaviconConfig, MAX_ICO_DIMENSION, ResizeQuality};
pub use error::FaviconError;
pub use generator::{FaviconSetGenerator, GenerationFailure, GenerationReport};
pub use handler::FaviconHandler;
pub use ico::{ICO_MIME, select_ico_entries, serialize_ico};
pub use loader::load_source;
pub use markup::{IconRole, MANIFEST_MIME, html_link_tags, web_manifest};
pub use resizer::{ImageResizer, RasterResizer};
pub use service::{FaviconService, SizeSelection};
pub use source::{
    AssetBundle, AssetMap, GeneratedAsset, IcoImageEntry, PNG_MIME, SourceInput, SourceRaster,
};
