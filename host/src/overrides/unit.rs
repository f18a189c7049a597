//! # 覆盖包单元
//!
//! 一个覆盖包就是一个目录：根下放 `mod.json` 清单，`<asset_subdir>/` 下按基础资源树的
//! 相对路径放替换文件。

use super::ManifestError;
use crate::resources::path::join_logical;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 清单文件名
pub const MANIFEST_FILE: &str = "mod.json";

/// `mod.json` 的内容
///
/// 除 `enabled` 外所有字段必填，缺任何一个整个覆盖包作废。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideManifest {
    pub name: String,
    pub version: String,
    pub author: String,
    pub description: String,
    /// 优先级，越大越优先
    pub priority: i32,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl OverrideManifest {
    /// 从文件加载清单
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        if !path.is_file() {
            return Err(ManifestError::Missing {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path).map_err(|e| ManifestError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Self::parse(path, &content)
    }

    /// 解析清单文本，`path` 只用于错误信息
    pub fn parse(path: &Path, content: &str) -> Result<Self, ManifestError> {
        serde_json::from_str(content).map_err(|e| ManifestError::Malformed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// 覆盖包
///
/// 根目录是身份标识，构造后不可变；`enabled` 可以由外部工具在运行时修改。
#[derive(Debug, Clone, PartialEq)]
pub struct OverrideUnit {
    root: PathBuf,
    name: String,
    version: String,
    author: String,
    description: String,
    priority: i32,
    enabled: bool,
}

impl OverrideUnit {
    /// 读取 `root/mod.json` 构造覆盖包
    pub fn load(root: impl Into<PathBuf>) -> Result<Self, ManifestError> {
        let root = root.into();
        let manifest = OverrideManifest::load(&root.join(MANIFEST_FILE))?;
        Ok(Self::from_manifest(root, manifest))
    }

    pub fn from_manifest(root: impl Into<PathBuf>, manifest: OverrideManifest) -> Self {
        Self {
            root: root.into(),
            name: manifest.name,
            version: manifest.version,
            author: manifest.author,
            description: manifest.description,
            priority: manifest.priority,
            enabled: manifest.enabled,
        }
    }

    /// 目录名，用作工具侧的查找键
    pub fn id(&self) -> String {
        self.root
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| self.root.to_string_lossy().to_string())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// 逻辑路径在本覆盖包中对应的物理路径（不检查是否存在）
    pub fn asset_path(&self, asset_subdir: &Path, logical: &str) -> PathBuf {
        join_logical(&self.root.join(asset_subdir), logical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"{
        "name": "HD Title",
        "version": "1.2.0",
        "author": "someone",
        "description": "Sharper title screen",
        "priority": 10
    }"#;

    #[test]
    fn test_parse_full_manifest() {
        let manifest = OverrideManifest::parse(Path::new("mod.json"), FULL).unwrap();
        assert_eq!(manifest.name, "HD Title");
        assert_eq!(manifest.priority, 10);
        assert!(manifest.enabled, "enabled 缺省为 true");
    }

    #[test]
    fn test_parse_explicitly_disabled() {
        let content = r#"{"name":"a","version":"1","author":"b","description":"c","priority":-3,"enabled":false}"#;
        let manifest = OverrideManifest::parse(Path::new("mod.json"), content).unwrap();
        assert!(!manifest.enabled);
        assert_eq!(manifest.priority, -3);
    }

    #[test]
    fn test_missing_required_field_is_malformed() {
        let content = r#"{"name":"a","version":"1","author":"b","priority":1}"#;
        let result = OverrideManifest::parse(Path::new("mod.json"), content);
        match result {
            Err(ManifestError::Malformed { message, .. }) => {
                assert!(message.contains("description"));
            }
            other => panic!("期望 Malformed，实际 {:?}", other),
        }
    }

    #[test]
    fn test_wrong_type_is_malformed() {
        let content = r#"{"name":"a","version":"1","author":"b","description":"c","priority":"high"}"#;
        assert!(matches!(
            OverrideManifest::parse(Path::new("mod.json"), content),
            Err(ManifestError::Malformed { .. })
        ));
    }

    #[test]
    fn test_load_missing_manifest() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            OverrideUnit::load(dir.path()),
            Err(ManifestError::Missing { .. })
        ));
    }

    #[test]
    fn test_load_unit_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("hd_title");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join(MANIFEST_FILE), FULL).unwrap();

        let mut unit = OverrideUnit::load(&root).unwrap();
        assert_eq!(unit.id(), "hd_title");
        assert_eq!(unit.root(), root.as_path());
        assert_eq!(unit.version(), "1.2.0");
        assert_eq!(unit.author(), "someone");
        assert_eq!(unit.description(), "Sharper title screen");
        assert!(unit.is_enabled());

        unit.set_enabled(false);
        assert!(!unit.is_enabled());

        assert_eq!(
            unit.asset_path(Path::new("assets"), "title/logo.png"),
            root.join("assets").join("title").join("logo.png")
        );
    }
}
