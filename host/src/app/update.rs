//! 更新逻辑：事件、输入、阶段更新与切换

use super::{DriverError, FrameDriver};
use crate::platform::{Platform, PlatformEvent};
use crate::screens::PhaseContext;
use tracing::{debug, info, warn};

/// 处理本帧所有待处理事件
pub(super) fn handle_events<P: Platform>(driver: &mut FrameDriver<P>) {
    while let Some(event) = driver.platform.poll_event() {
        match event {
            PlatformEvent::Quit => {
                info!(frame = driver.state.frame, "收到退出请求");
                driver.state.stop();
            }
            PlatformEvent::ToggleFullscreen => toggle_fullscreen(driver),
        }
    }
}

fn toggle_fullscreen<P: Platform>(driver: &mut FrameDriver<P>) {
    let Some(surface) = driver.surface else {
        return;
    };
    let fullscreen = !driver.state.fullscreen;
    match driver.platform.set_fullscreen(surface, fullscreen) {
        Ok(()) => {
            driver.state.fullscreen = fullscreen;
            info!(fullscreen, "切换显示模式");
        }
        Err(e) => warn!(error = %e, "切换显示模式失败"),
    }
}

/// 采集输入、更新当前阶段，阶段结束时切换到下一阶段
pub(super) fn update<P: Platform>(driver: &mut FrameDriver<P>) -> Result<(), DriverError> {
    let keys = driver.platform.keyboard_state();
    driver.input = driver.input.advance(keys);

    let (Some(phase), Some(assets)) = (driver.phase.as_mut(), driver.assets.as_mut()) else {
        return Err(DriverError::NotInitialized);
    };
    let mut ctx = PhaseContext {
        assets,
        delta: driver.pacer.budget(),
    };
    phase.update(&driver.input, &mut ctx);

    if phase.is_finished() {
        transition(driver)?;
    }
    Ok(())
}

/// 进入下一个阶段：先丢弃旧阶段，再构造并初始化新阶段
fn transition<P: Platform>(driver: &mut FrameDriver<P>) -> Result<(), DriverError> {
    let from = driver.sequence.current();
    let Some(next) = driver.sequence.advance() else {
        debug!(phase = %from, "终止阶段报告结束，忽略");
        return Ok(());
    };

    driver.phase = None;
    let mut phase = driver.factory.create(next);
    let assets = driver.assets.as_mut().ok_or(DriverError::NotInitialized)?;
    let mut ctx = PhaseContext {
        assets,
        delta: driver.pacer.budget(),
    };
    phase
        .initialize(&mut ctx)
        .map_err(|source| DriverError::PhaseInit {
            phase: next,
            source,
        })?;

    info!(from = %from, to = %next, frame = driver.state.frame, "阶段切换");
    driver.phase = Some(phase);
    driver.visited.push(next);
    Ok(())
}
