//! # 图标集生成模块
//!
//! ## 设计思路
//!
//! 对调用方选中的每个尺寸项调用一次缩放，结果以文件名为键收集。
//! 单个尺寸失败不会中断整批：失败项以 `GenerationFailure` 记录，其余尺寸照常交付。
//!
//! ## 实现思路
//!
//! - 顺序处理，插入顺序与传入顺序一致。
//! - 同一批次内出现重复文件名时，保留第一个，后者记为参数错误且不再缩放。
//! - 每次生成都从源图重新计算，不做跨批次缓存。

use std::time::Instant;

use super::{AssetMap, FaviconError, GeneratedAsset, RasterResizer, SizeSpec, SourceRaster};

/// 单个尺寸项的失败诊断。
#[derive(Debug)]
pub struct GenerationFailure {
    pub spec_name: String,
    pub filename: String,
    pub error: FaviconError,
}

/// 一次批量生成的结果：成功集合 + 失败诊断。
#[derive(Debug, Default)]
pub struct GenerationReport {
    pub assets: AssetMap,
    pub failures: Vec<GenerationFailure>,
}

impl GenerationReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// 驱动缩放器批量生成图标。
pub struct FaviconSetGenerator<R> {
    resizer: R,
}

impl<R: RasterResizer> FaviconSetGenerator<R> {
    pub fn new(resizer: R) -> Self {
        Self { resizer }
    }

    pub fn resizer(&self) -> &R {
        &self.resizer
    }

    /// 为每个尺寸项生成一张 PNG。
    ///
    /// 空选择返回空结果，是否视为错误由调用方决定。
    pub fn generate<'s, I>(&self, source: &SourceRaster, specs: I) -> GenerationReport
    where
        I: IntoIterator<Item = &'s SizeSpec>,
    {
        let started = Instant::now();
        let mut report = GenerationReport::default();

        for spec in specs {
            if report.assets.contains(&spec.filename) {
                log::warn!("⚠️ 跳过重复文件名：{}（尺寸项 {}）", spec.filename, spec.name);
                report.failures.push(GenerationFailure {
                    spec_name: spec.name.clone(),
                    filename: spec.filename.clone(),
                    error: FaviconError::Precondition(format!(
                        "输出文件名重复：{}",
                        spec.filename
                    )),
                });
                continue;
            }

            let entry_start = Instant::now();
            match self.resizer.resize(source, spec.width, spec.height) {
                Ok(bytes) => {
                    log::debug!(
                        "🖼️ {} -> {}x{} {}B {}ms",
                        spec.filename,
                        spec.width,
                        spec.height,
                        bytes.len(),
                        entry_start.elapsed().as_millis()
                    );
                    let asset = GeneratedAsset {
                        filename: spec.filename.clone(),
                        bytes,
                        width: spec.width,
                        height: spec.height,
                    };
                    if let Err(error) = report.assets.insert(asset) {
                        report.failures.push(GenerationFailure {
                            spec_name: spec.name.clone(),
                            filename: spec.filename.clone(),
                            error,
                        });
                    }
                }
                Err(error) => {
                    if error.is_per_entry() {
                        log::warn!("⚠️ 尺寸 {} 生成失败：{}", spec.name, error);
                    } else {
                        log::error!("❌ 尺寸 {} 参数异常（{}）：{}", spec.name, error.code(), error);
                    }
                    report.failures.push(GenerationFailure {
                        spec_name: spec.name.clone(),
                        filename: spec.filename.clone(),
                        error,
                    });
                }
            }
        }

        log::info!(
            "✅ 图标集生成完成 - 源图: {}x{} 成功: {} 失败: {} 耗时: {}ms",
            source.natural_width(),
            source.natural_height(),
            report.assets.len(),
            report.failures.len(),
            started.elapsed().as_millis()
        );

        report
    }
}
