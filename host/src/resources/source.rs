//! # Resource Source 模块
//!
//! 基础资源的来源抽象层：开发时直接读目录，发布时读打包好的 ZIP。
//!
//! 覆盖包（mods）里的文件不经过这里，它们总是从物理路径直接读取，
//! 见 [`crate::overrides::AssetLocation`]。

use super::ResourceError;
use super::path::{join_logical, normalize_logical_path};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use zip::ZipArchive;

/// 基础资源来源
///
/// ## 路径约定
///
/// 所有路径参数都是**逻辑路径**（相对于资源根目录，使用 `/` 分隔），
/// 实现内部会再做一次 `normalize_logical_path()`。
pub trait ResourceSource: Send + Sync {
    /// 读取资源字节
    fn read(&self, path: &str) -> Result<Vec<u8>, ResourceError>;

    /// 检查资源是否存在
    fn exists(&self, path: &str) -> bool;

    /// 获取资源的完整路径（用于日志）
    fn full_path(&self, path: &str) -> String;
}

/// 文件系统资源来源
#[derive(Debug, Clone)]
pub struct FsSource {
    /// 资源根目录
    base_path: PathBuf,
}

impl FsSource {
    /// # 参数
    /// - `base_path`: 资源根目录（如 `assets`）
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn resolve(&self, logical_path: &str) -> PathBuf {
        join_logical(&self.base_path, logical_path)
    }
}

impl ResourceSource for FsSource {
    fn read(&self, path: &str) -> Result<Vec<u8>, ResourceError> {
        let full_path = self.resolve(path);

        std::fs::read(&full_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ResourceError::NotFound {
                    path: full_path.to_string_lossy().to_string(),
                }
            } else {
                ResourceError::LoadFailed {
                    path: full_path.to_string_lossy().to_string(),
                    kind: "file".to_string(),
                    message: e.to_string(),
                }
            }
        })
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_file()
    }

    fn full_path(&self, path: &str) -> String {
        self.resolve(path).to_string_lossy().to_string()
    }
}

/// ZIP 文件资源来源
///
/// 第一次访问时打开压缩包并建立"规范化路径 -> 条目序号"索引，之后的读取复用
/// 同一个 `ZipArchive`。打包时带不带 `assets/` 根目录都能按逻辑路径找到。
pub struct ZipSource {
    zip_path: PathBuf,
    archive: Mutex<Option<IndexedArchive>>,
}

struct IndexedArchive {
    archive: ZipArchive<File>,
    index: HashMap<String, usize>,
}

impl IndexedArchive {
    fn new(mut archive: ZipArchive<File>) -> Self {
        let mut index = HashMap::new();
        for i in 0..archive.len() {
            if let Ok(entry) = archive.by_index_raw(i)
                && !entry.is_dir()
            {
                index.insert(normalize_logical_path(entry.name()), i);
            }
        }
        Self { archive, index }
    }
}

impl std::fmt::Debug for ZipSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZipSource")
            .field("zip_path", &self.zip_path)
            .finish_non_exhaustive()
    }
}

impl ZipSource {
    /// 创建 ZIP 资源来源（延迟打开）
    pub fn new(zip_path: impl Into<PathBuf>) -> Self {
        Self {
            zip_path: zip_path.into(),
            archive: Mutex::new(None),
        }
    }

    /// 创建并立即打开压缩包，压缩包不可用时报错
    pub fn open(zip_path: impl Into<PathBuf>) -> Result<Self, ResourceError> {
        let source = Self::new(zip_path);
        let archive = source.open_archive()?;
        *source.archive.lock().unwrap_or_else(PoisonError::into_inner) = Some(archive);
        Ok(source)
    }

    fn open_archive(&self) -> Result<IndexedArchive, ResourceError> {
        let display = self.zip_path.to_string_lossy().to_string();
        let file = File::open(&self.zip_path).map_err(|e| ResourceError::LoadFailed {
            path: display.clone(),
            kind: "zip".to_string(),
            message: format!("无法打开 ZIP 文件: {}", e),
        })?;

        let archive = ZipArchive::new(file).map_err(|e| ResourceError::LoadFailed {
            path: display,
            kind: "zip".to_string(),
            message: format!("无法读取 ZIP 文件: {}", e),
        })?;
        Ok(IndexedArchive::new(archive))
    }

    /// 在已打开的压缩包上执行操作
    fn with_archive<T>(
        &self,
        f: impl FnOnce(&mut IndexedArchive) -> Result<T, ResourceError>,
    ) -> Result<T, ResourceError> {
        let mut guard = self.archive.lock().unwrap_or_else(PoisonError::into_inner);
        if guard.is_none() {
            *guard = Some(self.open_archive()?);
        }
        match guard.as_mut() {
            Some(archive) => f(archive),
            None => Err(ResourceError::NotFound {
                path: self.zip_path.to_string_lossy().to_string(),
            }),
        }
    }

    /// 列出压缩包内所有文件（逻辑路径）
    pub fn entries(&self) -> Result<Vec<String>, ResourceError> {
        self.with_archive(|archive| {
            let mut names: Vec<String> = archive.index.keys().cloned().collect();
            names.sort();
            Ok(names)
        })
    }
}

impl ResourceSource for ZipSource {
    fn read(&self, path: &str) -> Result<Vec<u8>, ResourceError> {
        let entry_name = normalize_logical_path(path);

        self.with_archive(|indexed| {
            let position = *indexed
                .index
                .get(&entry_name)
                .ok_or_else(|| ResourceError::NotFound {
                    path: entry_name.clone(),
                })?;

            let mut entry =
                indexed
                    .archive
                    .by_index(position)
                    .map_err(|e| ResourceError::LoadFailed {
                        path: entry_name.clone(),
                        kind: "zip_entry".to_string(),
                        message: format!("无法读取 ZIP 条目: {}", e),
                    })?;

            let mut buffer = Vec::new();
            entry
                .read_to_end(&mut buffer)
                .map_err(|e| ResourceError::LoadFailed {
                    path: entry_name.clone(),
                    kind: "zip_read".to_string(),
                    message: format!("读取 ZIP 条目失败: {}", e),
                })?;
            Ok(buffer)
        })
    }

    fn exists(&self, path: &str) -> bool {
        let entry_name = normalize_logical_path(path);
        self.with_archive(|archive| Ok(archive.index.contains_key(&entry_name)))
            .unwrap_or(false)
    }

    fn full_path(&self, path: &str) -> String {
        format!(
            "zip://{}#{}",
            self.zip_path.display(),
            normalize_logical_path(path)
        )
    }
}

/// 内存资源来源
///
/// 用于内嵌资源和测试，键是规范化后的逻辑路径。
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加（或替换）一个文件
    pub fn insert(&mut self, path: &str, bytes: impl Into<Vec<u8>>) {
        self.files.insert(normalize_logical_path(path), bytes.into());
    }

    pub fn with_file(mut self, path: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(path, bytes);
        self
    }

    pub fn remove(&mut self, path: &str) -> Option<Vec<u8>> {
        self.files.remove(&normalize_logical_path(path))
    }
}

impl ResourceSource for MemorySource {
    fn read(&self, path: &str) -> Result<Vec<u8>, ResourceError> {
        let key = normalize_logical_path(path);
        self.files
            .get(&key)
            .cloned()
            .ok_or(ResourceError::NotFound { path: key })
    }

    fn exists(&self, path: &str) -> bool {
        self.files.contains_key(&normalize_logical_path(path))
    }

    fn full_path(&self, path: &str) -> String {
        format!("memory://{}", normalize_logical_path(path))
    }
}
