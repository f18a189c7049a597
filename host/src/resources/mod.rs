//! # Resources 模块
//!
//! 资源缓存：按类型（纹理 / 音效 / 文本）缓存已加载的资源。
//!
//! ## 加载流程
//!
//! ```text
//! 逻辑路径 ──normalize──▶ 缓存键
//!    │ 命中 ─────────────────────────────▶ 返回已缓存的句柄
//!    │ 未命中
//!    ▼
//! OverrideRegistry::resolve
//!    ├─ Override { path } ──▶ 直接读取物理文件
//!    └─ Base(logical)     ──▶ ResourceSource::read（目录或 ZIP）
//!    ▼
//! MediaBackend::create_*  ──▶ 以逻辑路径为键插入缓存
//! ```
//!
//! 加载失败不会被缓存，下一次请求会重新尝试。

pub mod cache;
mod error;
pub mod media;
pub mod path;
pub mod source;

pub use cache::{AssetKind, CacheStats};
pub use error::ResourceError;
pub use media::{DecodingBackend, MediaBackend, Sound, SoundHandle, Texture, TextureHandle};
pub use path::normalize_logical_path;
pub use source::{FsSource, MemorySource, ResourceSource, ZipSource};

use crate::overrides::{AssetLocation, OverrideRegistry};
use cache::KindCache;
use std::fmt;
use std::fs;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 资源缓存
///
/// 持有覆盖包注册表、基础资源来源和媒体后端。每个逻辑路径每种类型最多一个条目；
/// 通过后端创建的句柄在 `unload` 或 `shutdown` 时恰好释放一次。
pub struct AssetCache {
    registry: OverrideRegistry,
    source: Arc<dyn ResourceSource>,
    backend: Box<dyn MediaBackend>,
    textures: KindCache<TextureHandle>,
    sounds: KindCache<SoundHandle>,
    texts: KindCache<String>,
    failures: u64,
}

impl fmt::Debug for AssetCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetCache")
            .field("registry", &self.registry)
            .field("textures", &self.textures.len())
            .field("sounds", &self.sounds.len())
            .field("texts", &self.texts.len())
            .field("failures", &self.failures)
            .finish()
    }
}

impl AssetCache {
    pub fn new(
        registry: OverrideRegistry,
        source: Arc<dyn ResourceSource>,
        backend: Box<dyn MediaBackend>,
    ) -> Self {
        Self {
            registry,
            source,
            backend,
            textures: KindCache::new(),
            sounds: KindCache::new(),
            texts: KindCache::new(),
            failures: 0,
        }
    }

    pub fn registry(&self) -> &OverrideRegistry {
        &self.registry
    }

    /// 可变访问注册表
    ///
    /// 通过这里修改覆盖包状态不会使已缓存的条目失效，需要调用方自行
    /// `unload`/`shutdown`；要自动失效请用 [`Self::set_override_enabled`]。
    pub fn registry_mut(&mut self) -> &mut OverrideRegistry {
        &mut self.registry
    }

    pub fn source(&self) -> &Arc<dyn ResourceSource> {
        &self.source
    }

    /// 解析逻辑路径（不加载）
    pub fn resolve(&self, logical_path: &str) -> AssetLocation {
        self.registry.resolve(logical_path)
    }

    /// 获取纹理，失败时记录警告并返回 `None`
    pub fn get_texture(&mut self, logical_path: &str) -> Option<TextureHandle> {
        self.load_texture(logical_path)
            .map_err(|e| warn!(path = %logical_path, error = %e, "纹理加载失败"))
            .ok()
    }

    /// 获取音效，失败时记录警告并返回 `None`
    pub fn get_sound(&mut self, logical_path: &str) -> Option<SoundHandle> {
        self.load_sound(logical_path)
            .map_err(|e| warn!(path = %logical_path, error = %e, "音效加载失败"))
            .ok()
    }

    /// 获取文本，失败时记录警告并返回 `None`
    pub fn get_text(&mut self, logical_path: &str) -> Option<String> {
        self.load_text(logical_path)
            .map_err(|e| warn!(path = %logical_path, error = %e, "文本加载失败"))
            .ok()
    }

    /// 加载纹理（带缓存）
    pub fn load_texture(&mut self, logical_path: &str) -> Result<TextureHandle, ResourceError> {
        let key = normalize_logical_path(logical_path);
        if let Some(texture) = self.textures.lookup(&key) {
            return Ok(Arc::clone(texture));
        }

        let result = self
            .read_resolved(&key)
            .and_then(|bytes| self.backend.create_texture(&key, &bytes));
        let texture = self.track(result)?;

        self.textures.insert(key, Arc::clone(&texture));
        Ok(texture)
    }

    /// 加载音效（带缓存）
    pub fn load_sound(&mut self, logical_path: &str) -> Result<SoundHandle, ResourceError> {
        let key = normalize_logical_path(logical_path);
        if let Some(sound) = self.sounds.lookup(&key) {
            return Ok(Arc::clone(sound));
        }

        let result = self
            .read_resolved(&key)
            .and_then(|bytes| self.backend.create_sound(&key, bytes));
        let sound = self.track(result)?;

        self.sounds.insert(key, Arc::clone(&sound));
        Ok(sound)
    }

    /// 加载 UTF-8 文本（带缓存，按值返回）
    pub fn load_text(&mut self, logical_path: &str) -> Result<String, ResourceError> {
        let key = normalize_logical_path(logical_path);
        if let Some(text) = self.texts.lookup(&key) {
            return Ok(text.clone());
        }

        let result = self.read_resolved(&key).and_then(|bytes| {
            String::from_utf8(bytes).map_err(|e| ResourceError::InvalidFormat {
                path: key.clone(),
                message: format!("不是有效的 UTF-8 文本: {}", e),
            })
        });
        let text = self.track(result)?;

        self.texts.insert(key, text.clone());
        Ok(text)
    }

    /// 预加载纹理，返回成功数量
    pub fn preload_textures<S: AsRef<str>>(&mut self, paths: &[S]) -> usize {
        paths
            .iter()
            .filter(|path| self.get_texture(path.as_ref()).is_some())
            .count()
    }

    /// 是否已缓存
    pub fn contains(&self, logical_path: &str, kind: AssetKind) -> bool {
        let key = normalize_logical_path(logical_path);
        match kind {
            AssetKind::Texture => self.textures.contains(&key),
            AssetKind::Sound => self.sounds.contains(&key),
            AssetKind::Text => self.texts.contains(&key),
        }
    }

    /// 移除并释放一个条目，返回是否存在
    pub fn unload(&mut self, logical_path: &str, kind: AssetKind) -> bool {
        let key = normalize_logical_path(logical_path);
        let removed = match kind {
            AssetKind::Texture => self
                .textures
                .remove(&key)
                .map(|texture| self.backend.release_texture(texture))
                .is_some(),
            AssetKind::Sound => self
                .sounds
                .remove(&key)
                .map(|sound| self.backend.release_sound(sound))
                .is_some(),
            AssetKind::Text => self.texts.remove(&key).is_some(),
        };

        if removed {
            debug!(path = %key, kind = %kind, "资源已卸载");
        }
        removed
    }

    /// 释放所有条目，缓存回到空状态；可重复调用
    pub fn shutdown(&mut self) {
        let released = self.release_all();
        if released > 0 {
            info!(released, "资源缓存已清空");
        }
    }

    /// 修改覆盖包启用状态并清空缓存，之后的请求会重新解析
    ///
    /// 返回是否找到该覆盖包；找不到时缓存保持不变。
    pub fn set_override_enabled(&mut self, unit_id: &str, enabled: bool) -> bool {
        if !self.registry.set_enabled(unit_id, enabled) {
            return false;
        }
        let released = self.release_all();
        debug!(unit = %unit_id, released, "覆盖包状态变化，已清空缓存");
        true
    }

    /// 统计信息
    pub fn stats(&self) -> CacheStats {
        let texture_bytes = self
            .textures
            .values()
            .map(|texture| texture.size_bytes())
            .sum();

        CacheStats {
            textures: self.textures.len(),
            sounds: self.sounds.len(),
            texts: self.texts.len(),
            hits: self.textures.hits() + self.sounds.hits() + self.texts.hits(),
            misses: self.textures.misses() + self.sounds.misses() + self.texts.misses(),
            failures: self.failures,
            texture_bytes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.textures.len() == 0 && self.sounds.len() == 0 && self.texts.len() == 0
    }

    fn read_resolved(&self, key: &str) -> Result<Vec<u8>, ResourceError> {
        match self.registry.resolve(key) {
            AssetLocation::Override { path, .. } => {
                fs::read(&path).map_err(|e| ResourceError::LoadFailed {
                    path: path.display().to_string(),
                    kind: "override".to_string(),
                    message: e.to_string(),
                })
            }
            AssetLocation::Base(logical) => {
                if !self.source.exists(&logical) {
                    return Err(ResourceError::NotFound {
                        path: self.source.full_path(&logical),
                    });
                }
                self.source.read(&logical)
            }
        }
    }

    fn track<T>(&mut self, result: Result<T, ResourceError>) -> Result<T, ResourceError> {
        if result.is_err() {
            self.failures += 1;
        }
        result
    }

    fn release_all(&mut self) -> usize {
        let mut released = 0;
        for (_, texture) in self.textures.take_all() {
            self.backend.release_texture(texture);
            released += 1;
        }
        for (_, sound) in self.sounds.take_all() {
            self.backend.release_sound(sound);
            released += 1;
        }
        released + self.texts.take_all().len()
    }
}

impl Drop for AssetCache {
    fn drop(&mut self) {
        self.release_all();
    }
}
