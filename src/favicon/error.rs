//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载图标生成链路中的所有错误来源，避免字符串拼接式错误处理。
//! 通过 `thiserror` 保持人类可读错误，同时让调用侧可按分支匹配。
//!
//! - `Render` / `Precondition` / `Archive` 对应缩放、调用方输入、打包三类核心错误
//! - `Internal` 表示后台任务崩溃或被取消
//! - 其余分支来自源图加载阶段

/// 图标生成统一错误类型。
///
/// 该类型会在应用层被上转为 `AppError`，最终由 CLI 输出。
#[derive(Debug, thiserror::Error)]
pub enum FaviconError {
    /// 缩放或编码没有产出数据，仅影响单个尺寸。
    #[error("渲染错误：{0}")]
    Render(String),

    /// 调用方传入了非法参数（空列表、零尺寸、超过 256 的 ICO 尺寸等）。
    #[error("参数错误：{0}")]
    Precondition(String),

    #[error("打包错误：{0}")]
    Archive(String),

    #[error("解码错误：{0}")]
    Decode(String),

    #[error("格式错误：{0}")]
    InvalidFormat(String),

    #[error("文件错误：{0}")]
    FileSystem(String),

    #[error("资源限制：{0}")]
    ResourceLimit(String),

    /// 后台任务崩溃或被取消，整次生成作废。
    #[error("内部错误：{0}")]
    Internal(String),
}

impl FaviconError {
    /// 稳定错误码，供结构化输出使用。
    pub fn code(&self) -> &'static str {
        match self {
            Self::Render(_) => "E_RENDER",
            Self::Precondition(_) => "E_PRECONDITION",
            Self::Archive(_) => "E_ARCHIVE",
            Self::Decode(_) => "E_DECODE",
            Self::InvalidFormat(_) => "E_INVALID_FORMAT",
            Self::FileSystem(_) => "E_FILE_SYSTEM",
            Self::ResourceLimit(_) => "E_RESOURCE_LIMIT",
            Self::Internal(_) => "E_INTERNAL",
        }
    }

    /// 错误发生的流水线阶段。
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Render(_) => "resize",
            Self::Precondition(_) => "validate",
            Self::Archive(_) => "archive",
            Self::Decode(_)
            | Self::InvalidFormat(_)
            | Self::FileSystem(_)
            | Self::ResourceLimit(_) => "load",
            Self::Internal(_) => "service",
        }
    }

    /// 是否只影响单个条目（批量生成时不应中断整批）。
    pub fn is_per_entry(&self) -> bool {
        matches!(self, Self::Render(_))
    }
}

impl From<tokio::task::JoinError> for FaviconError {
    fn from(error: tokio::task::JoinError) -> Self {
        Self::Internal(format!("后台任务执行失败：{}", error))
    }
}

impl From<FaviconError> for String {
    fn from(error: FaviconError) -> Self {
        error.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_and_stages_are_stable() {
        let render = FaviconError::Render("x".to_string());
        assert_eq!(render.code(), "E_RENDER");
        assert_eq!(render.stage(), "resize");
        assert!(render.is_per_entry());

        let archive = FaviconError::Archive("x".to_string());
        assert_eq!(archive.code(), "E_ARCHIVE");
        assert_eq!(archive.stage(), "archive");
        assert!(!archive.is_per_entry());

        assert_eq!(FaviconError::ResourceLimit("x".to_string()).stage(), "load");
    }

    #[tokio::test]
    async fn panicked_task_maps_to_internal_error() {
        let join_error = tokio::task::spawn_blocking(|| panic!("worker crashed"))
            .await
            .expect_err("task should panic");

        let error = FaviconError::from(join_error);
        assert!(matches!(error, FaviconError::Internal(_)));
        assert_eq!(error.code(), "E_INTERNAL");
        assert_eq!(error.stage(), "service");
        assert!(!error.is_per_entry());
    }
}
