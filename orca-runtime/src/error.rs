//! # Error 模块
//!
//! 定义 orca-runtime 中使用的错误类型。

use thiserror::Error;

/// 运行时错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// 无法识别的按键名
    #[error("未知按键 '{name}'")]
    UnknownKey { name: String },

    /// 目标帧率无效
    #[error("无效的目标帧率 {fps}，必须大于 0")]
    InvalidFrameRate { fps: u32 },
}

/// Result 类型别名
pub type RuntimeResult<T> = Result<T, RuntimeError>;
