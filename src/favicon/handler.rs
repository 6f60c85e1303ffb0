//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `FaviconHandler` 只负责流程编排与配置管理，不直接与 CLI 或异步运行时绑定。
//! 处理链路固定为：
//! 1. 读取配置快照
//! 2. 批量缩放生成 PNG（单尺寸失败不中断）
//! 3. 从约定尺寸组装 ICO（失败则整体失败）
//! 4. 可选生成 manifest，并拼出 HTML 片段
//! 5. 打包 ZIP（失败则整体失败）
//!
//! ## 实现思路
//!
//! - 配置通过 `Arc<RwLock<FaviconConfig>>` 支持运行时动态切档。
//! - 单次生成内使用“同一配置快照”，避免处理中途配置漂移。
//! - 记录 `resize/ico/zip/total` 阶段耗时，便于性能诊断。

use std::sync::{Arc, RwLock};
use std::time::Instant;

use super::archive::{ArchiveEntry, package_zip};
use super::ico::{select_ico_entries, serialize_ico};
use super::markup::{html_link_tags, web_manifest};
use super::{
    AssetBundle, FaviconConfig, FaviconError, FaviconSetGenerator, ImageResizer, ResizeQuality,
    SizeCatalog, SizeSpec, SourceInput, SourceRaster, loader,
};

/// 图标生成处理器。
pub struct FaviconHandler {
    config: Arc<RwLock<FaviconConfig>>,
    catalog: SizeCatalog,
}

impl FaviconHandler {
    /// 根据初始配置与尺寸目录创建处理器。
    ///
    /// # 示例
    /// ```rust
    /// use favicon_generator::favicon::{FaviconConfig, FaviconHandler, SizeCatalog};
    ///
    /// let handler = FaviconHandler::new(FaviconConfig::default(), SizeCatalog::standard().clone())?;
    /// assert_eq!(handler.catalog().len(), 9);
    /// # Ok::<(), favicon_generator::favicon::FaviconError>(())
    /// ```
    pub fn new(config: FaviconConfig, catalog: SizeCatalog) -> Result<Self, FaviconError> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            catalog,
        })
    }

    /// 使用标准九项目录创建处理器。
    pub fn with_standard_catalog(config: FaviconConfig) -> Result<Self, FaviconError> {
        Self::new(config, SizeCatalog::standard().clone())
    }

    pub fn catalog(&self) -> &SizeCatalog {
        &self.catalog
    }

    /// 获取配置快照。
    ///
    /// 作用：保证单次生成链路使用一致参数。
    pub fn config_snapshot(&self) -> Result<FaviconConfig, FaviconError> {
        self.config
            .read()
            .map(|cfg| cfg.clone())
            .map_err(|_| FaviconError::ResourceLimit("配置读取锁已中毒".to_string()))
    }

    /// 整体替换配置，替换前校验。
    pub fn set_config(&self, config: FaviconConfig) -> Result<(), FaviconError> {
        config.validate()?;
        let mut current = self
            .config
            .write()
            .map_err(|_| FaviconError::ResourceLimit("配置写入锁已中毒".to_string()))?;
        *current = config;
        Ok(())
    }

    /// 设置缩放质量档位。
    pub fn set_quality_profile(&self, profile: ResizeQuality) -> Result<(), FaviconError> {
        let mut config = self
            .config
            .write()
            .map_err(|_| FaviconError::ResourceLimit("配置写入锁已中毒".to_string()))?;
        config.apply_quality_profile(profile);

        log::info!(
            "⚙️ 已切换缩放质量档位：{:?}（filter={:?}）",
            profile,
            config.resize_filter
        );

        Ok(())
    }

    pub fn get_quality_profile(&self) -> Result<ResizeQuality, FaviconError> {
        let config = self
            .config
            .read()
            .map_err(|_| FaviconError::ResourceLimit("配置读取锁已中毒".to_string()))?;
        Ok(config.infer_quality_profile())
    }

    /// 按当前配置加载源图。
    pub fn load_source(&self, input: SourceInput) -> Result<SourceRaster, FaviconError> {
        let config = self.config_snapshot()?;
        loader::load_source(input, &config)
    }

    /// 处理主入口：从源图生成完整产物包。
    ///
    /// 单尺寸失败记录在 `AssetBundle::failures` 中；ICO 与 ZIP 失败直接返回错误。
    pub fn generate_bundle(
        &self,
        source: &SourceRaster,
        specs: &[&SizeSpec],
    ) -> Result<AssetBundle, FaviconError> {
        let config = self.config_snapshot()?;
        let total_start = Instant::now();

        if specs.is_empty() {
            log::warn!("⚠️ 未选择任何尺寸，将生成空压缩包");
        }

        let resize_start = Instant::now();
        let generator = FaviconSetGenerator::new(ImageResizer::new(config.resize_filter));
        let report = generator.generate(source, specs.iter().copied());
        let resize_elapsed = resize_start.elapsed();

        let ico_start = Instant::now();
        let ico = if config.include_ico {
            let entries = select_ico_entries(&report.assets, &config.ico_sizes);
            if entries.is_empty() {
                log::info!("ℹ️ 未生成任何 ICO 尺寸 {:?}，跳过 ICO", config.ico_sizes);
                None
            } else {
                Some((config.ico_filename.clone(), serialize_ico(&entries)?))
            }
        } else {
            None
        };
        let ico_elapsed = ico_start.elapsed();

        let manifest = if config.include_web_manifest {
            Some((
                config.manifest_filename.clone(),
                web_manifest(&report.assets, &config.app_name)?,
            ))
        } else {
            None
        };

        let html = html_link_tags(
            &report.assets,
            ico.as_ref().map(|(name, _)| name.as_str()),
            manifest.as_ref().map(|(name, _)| name.as_str()),
        );

        let zip_start = Instant::now();
        let mut extras = Vec::new();
        if let Some((name, bytes)) = &ico {
            extras.push(ArchiveEntry::new(name.clone(), bytes.clone()));
        }
        if let Some((name, json)) = &manifest {
            extras.push(ArchiveEntry::new(name.clone(), json.clone().into_bytes()));
        }
        let zip = package_zip(&report.assets, &extras, config.archive_compression)?;
        let zip_elapsed = zip_start.elapsed();

        log::info!(
            "✅ 图标产物生成完成 - resize={}ms ico={}ms zip={}ms total={}ms",
            resize_elapsed.as_millis(),
            ico_elapsed.as_millis(),
            zip_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );

        Ok(AssetBundle {
            assets: report.assets,
            failures: report.failures,
            ico,
            web_manifest: manifest,
            html,
            zip,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};
    use std::io::{Cursor, Read};

    fn source() -> SourceRaster {
        let img = ImageBuffer::from_fn(96, 64, |x, y| Rgba([x as u8, y as u8, 128, 200]));
        SourceRaster::new(img, "test")
    }

    fn zip_names(zip_bytes: &[u8]) -> Vec<String> {
        let archive = zip::ZipArchive::new(Cursor::new(zip_bytes)).expect("valid zip");
        archive.file_names().map(str::to_string).collect()
    }

    #[test]
    fn default_bundle_contains_pngs_ico_and_zip() {
        let handler = FaviconHandler::with_standard_catalog(FaviconConfig::default()).expect("handler init failed");
        let specs = handler.catalog().default_selection();

        let bundle = handler.generate_bundle(&source(), &specs).expect("bundle should build");

        assert_eq!(bundle.assets.len(), 6);
        assert!(bundle.is_complete());

        let (ico_name, ico) = bundle.ico.as_ref().expect("ico present");
        assert_eq!(ico_name, "favicon.ico");
        assert_eq!(u16::from_le_bytes([ico[4], ico[5]]), 3);

        let mut names = zip_names(&bundle.zip);
        names.sort();
        assert_eq!(names.len(), 7);
        assert!(names.contains(&"favicon.ico".to_string()));
        assert!(names.contains(&"android-chrome-512x512.png".to_string()));

        assert!(bundle.html.contains(r#"href="/favicon.ico""#));
        assert!(bundle.web_manifest.is_none());
    }

    #[test]
    fn ico_uses_only_present_configured_sizes() {
        let handler = FaviconHandler::with_standard_catalog(FaviconConfig::default()).expect("handler init failed");
        let specs = handler
            .catalog()
            .select(&["favicon-32", "apple-touch-icon"])
            .expect("names resolve");

        let bundle = handler.generate_bundle(&source(), &specs).expect("bundle should build");
        let (_, ico) = bundle.ico.as_ref().expect("ico present");

        assert_eq!(u16::from_le_bytes([ico[4], ico[5]]), 1);
        assert_eq!(ico[6], 32);
    }

    #[test]
    fn same_size_under_two_filenames_still_builds_bundle() {
        let catalog = SizeCatalog::new(vec![
            SizeSpec::square("a", 32, "a.png", "", true),
            SizeSpec::square("b", 32, "b.png", "", true),
        ])
        .expect("catalog should build");
        let handler = FaviconHandler::new(FaviconConfig::default(), catalog).expect("handler init failed");
        let specs = handler.catalog().default_selection();

        let bundle = handler.generate_bundle(&source(), &specs).expect("bundle should build");

        assert_eq!(bundle.assets.len(), 2);
        let (_, ico) = bundle.ico.as_ref().expect("ico present");
        assert_eq!(u16::from_le_bytes([ico[4], ico[5]]), 1);
        assert_eq!(ico[6], 32);
        assert_eq!(&ico[22..], &bundle.assets.get("a.png").expect("a.png present").bytes[..]);
        assert_eq!(zip_names(&bundle.zip).len(), 3);
    }

    #[test]
    fn ico_is_skipped_when_no_small_sizes_selected() {
        let handler = FaviconHandler::with_standard_catalog(FaviconConfig::default()).expect("handler init failed");
        let specs = handler.catalog().select(&["android-chrome-192"]).expect("names resolve");

        let bundle = handler.generate_bundle(&source(), &specs).expect("bundle should build");

        assert!(bundle.ico.is_none());
        assert_eq!(zip_names(&bundle.zip), vec!["android-chrome-192x192.png".to_string()]);
    }

    #[test]
    fn ico_can_be_disabled() {
        let mut config = FaviconConfig::default();
        config.include_ico = false;
        let handler = FaviconHandler::with_standard_catalog(config).expect("handler init failed");
        let specs = handler.catalog().default_selection();

        let bundle = handler.generate_bundle(&source(), &specs).expect("bundle should build");

        assert!(bundle.ico.is_none());
        assert_eq!(zip_names(&bundle.zip).len(), 6);
    }

    #[test]
    fn manifest_is_packaged_when_enabled() {
        let mut config = FaviconConfig::default();
        config.include_web_manifest = true;
        config.app_name = "Demo".to_string();
        let handler = FaviconHandler::with_standard_catalog(config).expect("handler init failed");
        let specs = handler.catalog().default_selection();

        let bundle = handler.generate_bundle(&source(), &specs).expect("bundle should build");
        let (manifest_name, manifest_json) = bundle.web_manifest.as_ref().expect("manifest present");

        let mut archive = zip::ZipArchive::new(Cursor::new(&bundle.zip[..])).expect("valid zip");
        let mut packed = String::new();
        archive
            .by_name(manifest_name)
            .expect("manifest entry")
            .read_to_string(&mut packed)
            .expect("read manifest");

        assert_eq!(&packed, manifest_json);
        assert!(bundle.html.contains("site.webmanifest"));
    }

    #[test]
    fn empty_selection_builds_empty_bundle() {
        let handler = FaviconHandler::with_standard_catalog(FaviconConfig::default()).expect("handler init failed");

        let bundle = handler.generate_bundle(&source(), &[]).expect("bundle should build");

        assert!(bundle.assets.is_empty());
        assert!(bundle.ico.is_none());
        assert!(zip_names(&bundle.zip).is_empty());
    }

    #[test]
    fn quality_profile_switching() {
        let handler = FaviconHandler::with_standard_catalog(FaviconConfig::default()).expect("handler init failed");
        assert_eq!(handler.get_quality_profile().expect("read profile"), ResizeQuality::Balanced);

        handler.set_quality_profile(ResizeQuality::Quality).expect("set profile");
        assert_eq!(handler.get_quality_profile().expect("read profile"), ResizeQuality::Quality);
        assert_eq!(
            handler.config_snapshot().expect("snapshot").resize_filter,
            image::imageops::FilterType::Lanczos3
        );
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = FaviconConfig::default();
        config.ico_sizes = vec![512];
        assert!(matches!(
            FaviconHandler::with_standard_catalog(config),
            Err(FaviconError::Precondition(_))
        ));

        let handler = FaviconHandler::with_standard_catalog(FaviconConfig::default()).expect("handler init failed");
        let mut bad = FaviconConfig::default();
        bad.ico_filename = String::new();
        assert!(matches!(handler.set_config(bad), Err(FaviconError::Precondition(_))));
    }
}
