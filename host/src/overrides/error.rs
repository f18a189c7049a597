//! 覆盖包相关错误

use std::path::PathBuf;
use thiserror::Error;

/// 单个覆盖包清单的错误
///
/// 扫描时遇到这类错误只会跳过该覆盖包，不会让扫描整体失败。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ManifestError {
    /// 清单文件不存在
    #[error("覆盖包清单不存在: {path:?}")]
    Missing { path: PathBuf },

    /// 清单文件无法读取
    #[error("无法读取覆盖包清单: {path:?} - {message}")]
    Io { path: PathBuf, message: String },

    /// 清单格式错误或缺少必需字段
    #[error("覆盖包清单格式错误: {path:?} - {message}")]
    Malformed { path: PathBuf, message: String },
}

/// 覆盖包注册表错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OverrideError {
    /// 覆盖包根目录无法创建或遍历
    #[error("无法访问覆盖包目录: {path:?} - {message}")]
    Io { path: PathBuf, message: String },
}
