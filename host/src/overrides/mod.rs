//! # Overrides 模块
//!
//! 覆盖包（mods）的发现、排序与路径解析。
//!
//! ## 核心概念
//!
//! - **OverrideUnit**: 一个带 `mod.json` 清单的目录
//! - **OverrideRegistry**: 启动时扫描覆盖包根目录得到的、按优先级降序排好的覆盖包列表
//! - **AssetLocation**: 一次解析的结果，要么落在某个覆盖包里，要么回落到基础资源
//!
//! 解析从最高优先级开始逐个检查启用的覆盖包，第一个含有该文件的覆盖包胜出；
//! 被禁用的覆盖包直接跳过，不会遮挡低优先级的覆盖包。

mod error;
mod unit;

pub use error::{ManifestError, OverrideError};
pub use unit::{MANIFEST_FILE, OverrideManifest, OverrideUnit};

use crate::resources::path::normalize_logical_path;
use std::cmp::Reverse;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// 默认的覆盖资源子目录（镜像基础资源树）
pub const DEFAULT_ASSET_SUBDIR: &str = "assets";

/// 逻辑路径的解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetLocation {
    /// 由覆盖包提供
    Override {
        /// 覆盖包 ID（目录名）
        unit: String,
        /// 物理文件路径
        path: PathBuf,
    },
    /// 没有覆盖，使用基础资源（规范化后的逻辑路径）
    Base(String),
}

impl AssetLocation {
    pub fn is_override(&self) -> bool {
        matches!(self, AssetLocation::Override { .. })
    }
}

impl fmt::Display for AssetLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetLocation::Override { unit, path } => {
                write!(f, "{} (覆盖包 '{}')", path.display(), unit)
            }
            AssetLocation::Base(logical) => write!(f, "{}", logical),
        }
    }
}

/// 覆盖包注册表
///
/// 列表在构造时排序，之后不再增删或重排；只有单个覆盖包的启用状态可以改变。
#[derive(Debug, Clone)]
pub struct OverrideRegistry {
    root: PathBuf,
    asset_subdir: PathBuf,
    units: Vec<OverrideUnit>,
}

impl Default for OverrideRegistry {
    fn default() -> Self {
        Self::empty()
    }
}

impl OverrideRegistry {
    /// 没有任何覆盖包的注册表
    pub fn empty() -> Self {
        Self {
            root: PathBuf::new(),
            asset_subdir: PathBuf::from(DEFAULT_ASSET_SUBDIR),
            units: Vec::new(),
        }
    }

    /// 由已构造的覆盖包创建注册表（按优先级降序稳定排序）
    pub fn from_units(units: Vec<OverrideUnit>, asset_subdir: impl Into<PathBuf>) -> Self {
        let mut registry = Self {
            root: PathBuf::new(),
            asset_subdir: asset_subdir.into(),
            units,
        };
        registry.sort_units();
        registry
    }

    /// 扫描覆盖包根目录
    ///
    /// - 根目录不存在时创建空目录，返回空注册表
    /// - 只看直接子目录，按目录名排序后依次加载清单
    /// - 清单缺失/格式错误的目录被跳过（记录警告）
    /// - 最后按优先级降序稳定排序，同优先级保持目录名顺序
    pub fn discover(
        root: impl AsRef<Path>,
        asset_subdir: impl Into<PathBuf>,
    ) -> Result<Self, OverrideError> {
        let root = root.as_ref();
        let io_error = |e: std::io::Error| OverrideError::Io {
            path: root.to_path_buf(),
            message: e.to_string(),
        };

        if !root.exists() {
            fs::create_dir_all(root).map_err(io_error)?;
            info!(root = ?root, "覆盖包目录不存在，已创建空目录");
        }

        let mut dirs: Vec<PathBuf> = fs::read_dir(root)
            .map_err(io_error)?
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();
        dirs.sort();

        let mut units = Vec::new();
        for dir in dirs {
            match OverrideUnit::load(&dir) {
                Ok(unit) => {
                    info!(
                        name = %unit.name(),
                        version = %unit.version(),
                        priority = unit.priority(),
                        enabled = unit.is_enabled(),
                        "加载覆盖包"
                    );
                    units.push(unit);
                }
                Err(e) => {
                    warn!(dir = ?dir, error = %e, "跳过无效的覆盖包");
                }
            }
        }

        let mut registry = Self::from_units(units, asset_subdir);
        registry.root = root.to_path_buf();
        Ok(registry)
    }

    fn sort_units(&mut self) {
        // sort_by_key 是稳定排序
        self.units.sort_by_key(|unit| Reverse(unit.priority()));
    }

    /// 解析逻辑路径
    ///
    /// 按优先级降序检查启用的覆盖包，第一个存在该文件的覆盖包胜出；
    /// 都没有时返回规范化后的逻辑路径本身。永不失败。
    pub fn resolve(&self, logical_path: &str) -> AssetLocation {
        let logical = normalize_logical_path(logical_path);
        if logical.is_empty() {
            return AssetLocation::Base(logical);
        }

        for unit in self.units.iter().filter(|unit| unit.is_enabled()) {
            let candidate = unit.asset_path(&self.asset_subdir, &logical);
            if candidate.is_file() {
                debug!(unit = %unit.name(), path = ?candidate, "使用覆盖资源");
                return AssetLocation::Override {
                    unit: unit.id(),
                    path: candidate,
                };
            }
        }

        AssetLocation::Base(logical)
    }

    /// 按优先级降序排列的覆盖包
    pub fn units(&self) -> &[OverrideUnit] {
        &self.units
    }

    /// 按 ID（目录名）查找
    pub fn get(&self, id: &str) -> Option<&OverrideUnit> {
        self.units.iter().find(|unit| unit.id() == id)
    }

    /// 修改覆盖包启用状态，返回是否找到该覆盖包
    ///
    /// 不会使任何已缓存的资源失效，见 [`crate::resources::AssetCache::set_override_enabled`]。
    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> bool {
        match self.units.iter_mut().find(|unit| unit.id() == id) {
            Some(unit) => {
                unit.set_enabled(enabled);
                info!(unit = %id, enabled, "覆盖包启用状态已修改");
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn enabled_count(&self) -> usize {
        self.units.iter().filter(|unit| unit.is_enabled()).count()
    }

    /// 扫描的根目录（`from_units`/`empty` 构造时为空路径）
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn asset_subdir(&self) -> &Path {
        &self.asset_subdir
    }
}
