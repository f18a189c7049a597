//! # Kind Cache 模块
//!
//! 单一资源类型的缓存表，以及跨类型汇总的统计信息。
//!
//! 只负责"键 -> 资源"的存取与命中统计；解析、加载、释放由
//! [`super::AssetCache`] 完成。

use std::collections::HashMap;
use std::fmt;

/// 资源类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Texture,
    Sound,
    Text,
}

impl AssetKind {
    pub fn name(self) -> &'static str {
        match self {
            AssetKind::Texture => "texture",
            AssetKind::Sound => "sound",
            AssetKind::Text => "text",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 单类型缓存表
///
/// 每个逻辑路径最多一个条目。
#[derive(Debug)]
pub(crate) struct KindCache<T> {
    entries: HashMap<String, T>,
    hits: u64,
    misses: u64,
}

impl<T> Default for KindCache<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }
}

impl<T> KindCache<T> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// 查找并记录命中/未命中
    pub(crate) fn lookup(&mut self, key: &str) -> Option<&T> {
        match self.entries.get(key) {
            Some(entry) => {
                self.hits += 1;
                Some(entry)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// 插入条目，返回被替换的旧条目（正常流程下总是 `None`）
    pub(crate) fn insert(&mut self, key: String, value: T) -> Option<T> {
        self.entries.insert(key, value)
    }

    pub(crate) fn remove(&mut self, key: &str) -> Option<T> {
        self.entries.remove(key)
    }

    /// 取出全部条目，缓存变为空
    pub(crate) fn take_all(&mut self) -> Vec<(String, T)> {
        self.entries.drain().collect()
    }

    pub(crate) fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn hits(&self) -> u64 {
        self.hits
    }

    pub(crate) fn misses(&self) -> u64 {
        self.misses
    }
}

/// 缓存统计信息
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheStats {
    /// 纹理条目数量
    pub textures: usize,
    /// 音效条目数量
    pub sounds: usize,
    /// 文本条目数量
    pub texts: usize,
    /// 命中次数（所有类型）
    pub hits: u64,
    /// 未命中次数（所有类型）
    pub misses: u64,
    /// 加载失败次数
    pub failures: u64,
    /// 纹理估算占用（字节）
    pub texture_bytes: usize,
}

impl CacheStats {
    /// 命中率
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total > 0 {
            self.hits as f64 / total as f64
        } else {
            0.0
        }
    }

    /// 格式化为可读字符串
    pub fn format(&self) -> String {
        format!(
            "Cache: {} textures ({:.1}MB), {} sounds, {} texts, hit rate: {:.1}%, failures: {}",
            self.textures,
            self.texture_bytes as f64 / 1024.0 / 1024.0,
            self.sounds,
            self.texts,
            self.hit_rate() * 100.0,
            self.failures,
        )
    }
}
