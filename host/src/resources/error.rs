//! # Resource Error 模块
//!
//! 定义资源加载相关的错误类型。

use thiserror::Error;

/// 资源加载错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResourceError {
    /// 资源读取失败
    #[error("加载 {kind} 资源失败: {path} - {message}")]
    LoadFailed {
        /// 资源路径
        path: String,
        /// 资源类型（texture, sound, text, file, zip 等）
        kind: String,
        /// 错误消息
        message: String,
    },

    /// 资源未找到
    #[error("资源未找到: {path}")]
    NotFound {
        /// 资源路径
        path: String,
    },

    /// 无法解码的资源
    #[error("无效的资源格式: {path} - {message}")]
    InvalidFormat {
        /// 资源路径
        path: String,
        /// 错误消息
        message: String,
    },
}
