//! 资源后端初始化
//!
//! 从配置构造资源来源和覆盖包注册表，组装成驱动器持有的 [`AssetCache`]。

use super::StartupError;
use crate::config::{AppConfig, AssetSourceType};
use crate::overrides::OverrideRegistry;
use crate::resources::{AssetCache, FsSource, MediaBackend, ResourceError, ResourceSource, ZipSource};
use std::sync::Arc;
use tracing::info;

/// 按配置创建基础资源来源
///
/// ZIP 模式会立即打开归档，归档损坏时启动失败。
pub fn create_source(config: &AppConfig) -> Result<Arc<dyn ResourceSource>, ResourceError> {
    match config.asset_source {
        AssetSourceType::Fs => {
            info!(assets_root = ?config.assets_root, "资源来源: 文件系统");
            Ok(Arc::new(FsSource::new(&config.assets_root)))
        }
        AssetSourceType::Zip => {
            let zip_path = config
                .zip_path
                .as_ref()
                .ok_or_else(|| ResourceError::NotFound {
                    path: "zip_path".to_string(),
                })?;
            let source = ZipSource::open(zip_path)?;
            info!(zip_path = %zip_path, entries = source.entries()?.len(), "资源来源: ZIP 文件");
            Ok(Arc::new(source))
        }
    }
}

/// 扫描覆盖包并组装资源缓存
pub fn create_asset_cache(
    config: &AppConfig,
    backend: Box<dyn MediaBackend>,
) -> Result<AssetCache, StartupError> {
    let overrides = &config.overrides;
    let registry = OverrideRegistry::discover(&overrides.root, overrides.asset_subdir.as_str())?;
    info!(
        root = ?overrides.root,
        units = registry.len(),
        enabled = registry.enabled_count(),
        "覆盖包扫描完成"
    );

    let source = create_source(config)?;
    Ok(AssetCache::new(registry, source, backend))
}
