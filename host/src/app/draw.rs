//! 渲染逻辑

use super::{DriverError, FrameDriver};
use crate::platform::{Color, Platform};

/// 清屏、让当前阶段绘制、提交
pub(super) fn draw<P: Platform>(driver: &mut FrameDriver<P>) -> Result<(), DriverError> {
    let surface = driver.surface.ok_or(DriverError::NotInitialized)?;

    driver.frame.clear(Color::BLACK);
    if let Some(phase) = &driver.phase {
        phase.render(&mut driver.frame);
    }

    driver
        .platform
        .present(surface, &driver.frame)
        .map_err(DriverError::Present)
}
