//! # Pacing 模块
//!
//! 固定帧率节拍：每帧结束后睡眠 `max(0, 帧预算 - 本帧耗时)`。
//!
//! 没有跳帧，也没有追帧：慢帧只会让下一帧晚开始，不会累积时间债。

use crate::error::{RuntimeError, RuntimeResult};
use std::time::Duration;

/// 默认目标帧率
pub const DEFAULT_TARGET_FPS: u32 = 60;

/// 帧节拍器
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramePacer {
    budget: Duration,
}

impl Default for FramePacer {
    fn default() -> Self {
        Self::new(Duration::from_secs(1) / DEFAULT_TARGET_FPS)
    }
}

impl FramePacer {
    /// 以帧预算创建
    pub fn new(budget: Duration) -> Self {
        Self { budget }
    }

    /// 以目标帧率创建
    pub fn from_fps(fps: u32) -> RuntimeResult<Self> {
        if fps == 0 {
            return Err(RuntimeError::InvalidFrameRate { fps });
        }
        Ok(Self::new(Duration::from_secs(1) / fps))
    }

    /// 每帧预算
    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// 根据本帧耗时计算需要睡眠的时长
    pub fn sleep_for(&self, work: Duration) -> Duration {
        self.budget.saturating_sub(work)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sleep_fills_remaining_budget() {
        let pacer = FramePacer::new(Duration::from_millis(16));
        assert_eq!(
            pacer.sleep_for(Duration::from_millis(6)),
            Duration::from_millis(10)
        );
        assert_eq!(pacer.sleep_for(Duration::ZERO), Duration::from_millis(16));
    }

    #[test]
    fn test_slow_frame_does_not_sleep() {
        let pacer = FramePacer::new(Duration::from_millis(16));
        assert_eq!(pacer.sleep_for(Duration::from_millis(16)), Duration::ZERO);
        assert_eq!(pacer.sleep_for(Duration::from_millis(40)), Duration::ZERO);
    }

    #[test]
    fn test_from_fps() {
        let pacer = FramePacer::from_fps(50).unwrap();
        assert_eq!(pacer.budget(), Duration::from_millis(20));
        assert_eq!(pacer, FramePacer::from_fps(50).unwrap());
        assert_eq!(
            FramePacer::from_fps(0),
            Err(RuntimeError::InvalidFrameRate { fps: 0 })
        );
    }

    #[test]
    fn test_default_is_sixty_fps() {
        assert_eq!(
            FramePacer::default().budget(),
            Duration::from_secs(1) / DEFAULT_TARGET_FPS
        );
    }
}
