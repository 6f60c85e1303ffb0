//! # 服务层
//!
//! ## 设计思路
//!
//! 使用 `FaviconService` 作为对外入口，替代全局单例函数。
//! 好处：
//! 1. 生命周期清晰（由调用方统一管理）
//! 2. 测试可创建独立实例，减少共享状态副作用
//! 3. 缩放与编码是 CPU 密集操作，统一放到 `spawn_blocking`，不阻塞异步运行时
//!
//! ## 实现思路
//!
//! 对外仅暴露少量稳定 API：
//! - `generate`：加载源图并生成完整产物包
//! - `set_quality_profile` / `get_quality_profile`：切换与读取质量档位

use std::sync::Arc;

use super::{
    AssetBundle, FaviconConfig, FaviconError, FaviconHandler, ResizeQuality, SizeCatalog,
    SizeSpec, SourceInput,
};

/// 本次生成选择哪些尺寸。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SizeSelection {
    /// 目录中默认勾选的尺寸。
    Defaults,
    /// 目录中的全部尺寸。
    All,
    /// 按名称挑选，保持给定顺序。
    Names(Vec<String>),
}

impl SizeSelection {
    pub fn resolve<'c>(&self, catalog: &'c SizeCatalog) -> Result<Vec<&'c SizeSpec>, FaviconError> {
        match self {
            Self::Defaults => Ok(catalog.default_selection()),
            Self::All => Ok(catalog.all()),
            Self::Names(names) => catalog.select(names),
        }
    }
}

/// 图标生成服务。
pub struct FaviconService {
    handler: Arc<FaviconHandler>,
}

impl FaviconService {
    /// 使用默认配置与标准目录创建服务。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use favicon_generator::favicon::FaviconService;
    ///
    /// let service = FaviconService::new()?;
    /// # Ok::<(), favicon_generator::favicon::FaviconError>(())
    /// ```
    pub fn new() -> Result<Self, FaviconError> {
        Self::with_config(FaviconConfig::default())
    }

    /// 使用自定义配置创建服务。
    pub fn with_config(config: FaviconConfig) -> Result<Self, FaviconError> {
        Self::with_handler(FaviconHandler::with_standard_catalog(config)?)
    }

    pub fn with_handler(handler: FaviconHandler) -> Result<Self, FaviconError> {
        Ok(Self {
            handler: Arc::new(handler),
        })
    }

    pub fn handler(&self) -> &FaviconHandler {
        &self.handler
    }

    /// 执行完整处理流程：加载 → 缩放 → ICO → ZIP。
    ///
    /// 每次调用都从源图重新计算，上一次的产物由调用方丢弃。
    pub async fn generate(
        &self,
        input: SourceInput,
        selection: SizeSelection,
    ) -> Result<AssetBundle, FaviconError> {
        let handler = Arc::clone(&self.handler);

        tokio::task::spawn_blocking(move || {
            let source = handler.load_source(input)?;
            let specs = selection.resolve(handler.catalog())?;
            handler.generate_bundle(&source, &specs)
        })
        .await?
    }

    /// 设置质量档位。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use favicon_generator::favicon::FaviconService;
    ///
    /// let service = FaviconService::new()?;
    /// service.set_quality_profile("quality")?;
    /// # Ok::<(), favicon_generator::favicon::FaviconError>(())
    /// ```
    pub fn set_quality_profile(&self, profile: &str) -> Result<(), FaviconError> {
        let profile = ResizeQuality::from_str(profile)?;
        self.handler.set_quality_profile(profile)
    }

    /// 获取当前生效质量档位（字符串）。
    pub fn get_quality_profile(&self) -> Result<String, FaviconError> {
        let profile = self.handler.get_quality_profile()?;
        Ok(profile.as_str().to_string())
    }
}
