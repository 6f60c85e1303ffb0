//! # HTML 片段与 Web Manifest
//!
//! 生成可直接粘贴到 `<head>` 的 `<link>` 标签，以及 Android 主屏幕用的 `site.webmanifest`。
//! 角色按文件名约定识别：`apple-touch-icon*` / `android-chrome-*` / 其余 PNG 作为普通图标。

use serde::Serialize;

use super::{AssetMap, FaviconError, GeneratedAsset, PNG_MIME};

pub const MANIFEST_MIME: &str = "application/manifest+json";

/// 图标在页面集成中的角色。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconRole {
    /// `<link rel="icon">`
    Favicon,
    /// `<link rel="apple-touch-icon">`
    AppleTouch,
    /// 只出现在 manifest 中
    AndroidChrome,
}

impl IconRole {
    pub fn from_filename(filename: &str) -> Self {
        if filename.starts_with("apple-touch-icon") {
            Self::AppleTouch
        } else if filename.starts_with("android-chrome-") {
            Self::AndroidChrome
        } else {
            Self::Favicon
        }
    }
}

#[derive(Debug, Serialize)]
struct WebManifest<'a> {
    name: &'a str,
    short_name: &'a str,
    icons: Vec<ManifestIcon>,
    theme_color: &'a str,
    background_color: &'a str,
    display: &'a str,
}

#[derive(Debug, Serialize)]
struct ManifestIcon {
    src: String,
    sizes: String,
    #[serde(rename = "type")]
    mime_type: &'static str,
}

/// 生成 `<link>` 标签片段，每行一个标签。
pub fn html_link_tags(
    assets: &AssetMap,
    ico_filename: Option<&str>,
    manifest_filename: Option<&str>,
) -> String {
    let mut lines = Vec::new();

    if let Some(ico) = ico_filename {
        lines.push(format!(r#"<link rel="icon" type="image/x-icon" href="/{}">"#, ico));
    }

    for asset in assets {
        match IconRole::from_filename(&asset.filename) {
            IconRole::Favicon => lines.push(format!(
                r#"<link rel="icon" type="{}" sizes="{}" href="/{}">"#,
                PNG_MIME,
                sizes_attr(asset),
                asset.filename
            )),
            IconRole::AppleTouch => lines.push(format!(
                r#"<link rel="apple-touch-icon" sizes="{}" href="/{}">"#,
                sizes_attr(asset),
                asset.filename
            )),
            IconRole::AndroidChrome => {}
        }
    }

    if let Some(manifest) = manifest_filename {
        lines.push(format!(r#"<link rel="manifest" href="/{}">"#, manifest));
    }

    lines.join("\n")
}

/// 生成 Web App Manifest，列出全部 `android-chrome-*` 图标。
pub fn web_manifest(assets: &AssetMap, app_name: &str) -> Result<String, FaviconError> {
    let icons = assets
        .iter()
        .filter(|asset| IconRole::from_filename(&asset.filename) == IconRole::AndroidChrome)
        .map(|asset| ManifestIcon {
            src: format!("/{}", asset.filename),
            sizes: sizes_attr(asset),
            mime_type: asset.mime_type(),
        })
        .collect();

    let manifest = WebManifest {
        name: app_name,
        short_name: app_name,
        icons,
        theme_color: "#ffffff",
        background_color: "#ffffff",
        display: "standalone",
    };

    serde_json::to_string_pretty(&manifest)
        .map_err(|e| FaviconError::Render(format!("manifest 序列化失败：{}", e)))
}

fn sizes_attr(asset: &GeneratedAsset) -> String {
    format!("{}x{}", asset.width, asset.height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn assets() -> AssetMap {
        let mut map = AssetMap::new();
        for (name, size) in [
            ("favicon-16x16.png", 16u32),
            ("apple-touch-icon.png", 180),
            ("android-chrome-192x192.png", 192),
            ("android-chrome-512x512.png", 512),
        ] {
            map.insert(GeneratedAsset {
                filename: name.to_string(),
                bytes: Bytes::new(),
                width: size,
                height: size,
            })
            .expect("insert");
        }
        map
    }

    #[test]
    fn link_tags_cover_ico_png_and_apple_touch() {
        let html = html_link_tags(&assets(), Some("favicon.ico"), None);
        let lines: Vec<&str> = html.lines().collect();

        assert_eq!(
            lines,
            vec![
                r#"<link rel="icon" type="image/x-icon" href="/favicon.ico">"#,
                r#"<link rel="icon" type="image/png" sizes="16x16" href="/favicon-16x16.png">"#,
                r#"<link rel="apple-touch-icon" sizes="180x180" href="/apple-touch-icon.png">"#,
            ]
        );
    }

    #[test]
    fn manifest_link_is_last_when_requested() {
        let html = html_link_tags(&assets(), None, Some("site.webmanifest"));
        assert_eq!(html.lines().last(), Some(r#"<link rel="manifest" href="/site.webmanifest">"#));
    }

    #[test]
    fn manifest_lists_only_android_icons() {
        let json = web_manifest(&assets(), "Demo").expect("manifest");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");

        assert_eq!(value["name"], "Demo");
        let icons = value["icons"].as_array().expect("icons array");
        assert_eq!(icons.len(), 2);
        assert_eq!(icons[0]["src"], "/android-chrome-192x192.png");
        assert_eq!(icons[0]["sizes"], "192x192");
        assert_eq!(icons[1]["type"], "image/png");
    }

    #[test]
    fn roles_follow_filename_convention() {
        assert_eq!(IconRole::from_filename("apple-touch-icon.png"), IconRole::AppleTouch);
        assert_eq!(IconRole::from_filename("android-chrome-512x512.png"), IconRole::AndroidChrome);
        assert_eq!(IconRole::from_filename("favicon-48x48.png"), IconRole::Favicon);
    }
}
