//! # 路径规范化模块
//!
//! 提供统一的逻辑路径规范化，资源缓存的键、覆盖包查找、基础资源读取都使用此模块。
//!
//! ## 设计原则
//!
//! - 程序内部统一使用**相对于资源根目录的逻辑路径**
//! - 使用 `/` 作为路径分隔符（跨平台统一）
//! - 路径不包含 `assets/` 前缀
//! - `..` 不能越过根目录，因此覆盖包里的文件永远落在覆盖包自己的目录里

use std::path::{Path, PathBuf};

/// 规范化逻辑路径
///
/// 处理路径组件，包括：
/// - 统一使用 `/` 分隔符
/// - 处理 `..` 组件（向上级目录，最多到根）
/// - 跳过 `.` 和空组件
/// - 移除 `assets/` 前缀（如果存在）
///
/// # 示例
///
/// ```ignore
/// use orca_host::resources::path::normalize_logical_path;
///
/// assert_eq!(normalize_logical_path("sprites/../title/logo.png"), "title/logo.png");
/// assert_eq!(normalize_logical_path("assets/sounds/ring.wav"), "sounds/ring.wav");
/// ```
pub fn normalize_logical_path(path: &str) -> String {
    let unified = path.replace('\\', "/");

    let mut components: Vec<&str> = Vec::new();
    for component in unified.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                components.pop();
            }
            _ => components.push(component),
        }
    }

    if components.first() == Some(&"assets") {
        components.remove(0);
    }

    components.join("/")
}

/// 把逻辑路径拼到物理根目录下
///
/// 逻辑路径会先规范化，再逐段拼接，保证结果不会跳出 `root`。
pub fn join_logical(root: &Path, logical: &str) -> PathBuf {
    let normalized = normalize_logical_path(logical);
    let mut joined = root.to_path_buf();
    for component in normalized.split('/').filter(|c| !c.is_empty()) {
        joined.push(component);
    }
    joined
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_basic() {
        assert_eq!(normalize_logical_path("title/logo.png"), "title/logo.png");
        assert_eq!(normalize_logical_path("./title/logo.png"), "title/logo.png");
        assert_eq!(normalize_logical_path("title\\logo.png"), "title/logo.png");
        assert_eq!(normalize_logical_path("title//logo.png"), "title/logo.png");
    }

    #[test]
    fn test_normalize_with_dotdot() {
        assert_eq!(
            normalize_logical_path("levels/../title/logo.png"),
            "title/logo.png"
        );
        assert_eq!(normalize_logical_path("a/b/../../c/d.png"), "c/d.png");
        assert_eq!(normalize_logical_path("../../title/logo.png"), "title/logo.png");
        assert_eq!(normalize_logical_path(".."), "");
    }

    #[test]
    fn test_normalize_removes_assets_prefix() {
        assert_eq!(
            normalize_logical_path("assets/sounds/ring.wav"),
            "sounds/ring.wav"
        );
        assert_eq!(
            normalize_logical_path("assets\\levels\\ehz.txt"),
            "levels/ehz.txt"
        );
        // 只移除开头的 assets
        assert_eq!(
            normalize_logical_path("title/assets/logo.png"),
            "title/assets/logo.png"
        );
    }

    #[test]
    fn test_join_logical_stays_under_root() {
        let root = Path::new("mods/hd/assets");
        assert_eq!(
            join_logical(root, "title/logo.png"),
            PathBuf::from("mods/hd/assets/title/logo.png")
        );
        assert_eq!(
            join_logical(root, "../../../etc/passwd"),
            PathBuf::from("mods/hd/assets/etc/passwd")
        );
    }
}
