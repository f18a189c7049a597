//! # State 模块
//!
//! 定义 Host 层的核心状态结构。

/// Host 层状态
///
/// 帧驱动器的运行时开关和计数。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostState {
    /// 是否正在运行
    pub running: bool,
    /// 当前是否全屏
    pub fullscreen: bool,
    /// 已完成的帧数
    pub frame: u64,
}

impl HostState {
    /// 创建新的 Host 状态（尚未运行）
    pub fn new() -> Self {
        Self {
            running: false,
            fullscreen: false,
            frame: 0,
        }
    }

    /// 停止运行
    pub fn stop(&mut self) {
        self.running = false;
    }
}

impl Default for HostState {
    fn default() -> Self {
        Self::new()
    }
}
