//! 无窗口后端
//!
//! 按帧回放预先写好的按键和事件，记录每次提交的帧和请求的睡眠时长。
//! 帧序号 = 已提交的帧数，即第一帧的序号为 0。

use super::{Color, DrawCommand, DrawList, Platform, PlatformError, PlatformEvent, SurfaceId};
use crate::resources::{DecodingBackend, MediaBackend};
use orca_runtime::{Key, KeySet};
use std::collections::{BTreeMap, VecDeque};
use std::ops::Range;
use std::time::Duration;
use tracing::debug;

/// 一次 `present` 的摘要
#[derive(Debug, Clone, PartialEq)]
pub struct PresentedFrame {
    pub surface: SurfaceId,
    pub clear_color: Color,
    /// 绘制的纹理 ID（按命令顺序）
    pub textures: Vec<u64>,
    /// 填充命令数量
    pub fills: usize,
    /// 提交时是否全屏
    pub fullscreen: bool,
}

/// 无窗口后端
#[derive(Debug, Default)]
pub struct HeadlessPlatform {
    key_script: BTreeMap<u64, KeySet>,
    event_script: BTreeMap<u64, Vec<PlatformEvent>>,
    quit_after: Option<u64>,
    realtime: bool,
    surface_failure: Option<String>,
    media_failure: Option<String>,

    pending: VecDeque<PlatformEvent>,
    queued_for: Option<u64>,
    next_surface: u32,
    live_surfaces: Vec<SurfaceId>,
    destroyed: usize,
    fullscreen: bool,
    fullscreen_changes: usize,
    frames: Vec<PresentedFrame>,
    delays: Vec<Duration>,
}

impl HeadlessPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// 在指定帧区间内按住某个键
    pub fn hold(mut self, key: Key, frames: Range<u64>) -> Self {
        for frame in frames {
            self.key_script.entry(frame).or_default().insert(key);
        }
        self
    }

    /// 在某一帧单独按下某个键（只持续一帧）
    pub fn tap(self, key: Key, frame: u64) -> Self {
        self.hold(key, frame..frame + 1)
    }

    /// 在某一帧开始时投递事件
    pub fn with_event(mut self, frame: u64, event: PlatformEvent) -> Self {
        self.event_script.entry(frame).or_default().push(event);
        self
    }

    /// 第 `frames` 帧（从 1 数起）开始时投递 `Quit`，因此恰好提交 `frames` 帧
    /// （`0` 与 `1` 效果相同）
    pub fn quit_after(mut self, frames: u64) -> Self {
        self.quit_after = Some(frames.saturating_sub(1));
        self
    }

    /// `delay` 是否真的睡眠
    pub fn realtime(mut self, realtime: bool) -> Self {
        self.realtime = realtime;
        self
    }

    /// 让 `create_surface` 失败
    pub fn fail_surface(mut self, message: impl Into<String>) -> Self {
        self.surface_failure = Some(message.into());
        self
    }

    /// 让 `create_media_backend` 失败
    pub fn fail_media_backend(mut self, message: impl Into<String>) -> Self {
        self.media_failure = Some(message.into());
        self
    }

    /// 立即投递事件（下一次 `poll_event` 返回）
    pub fn push_event(&mut self, event: PlatformEvent) {
        self.pending.push_back(event);
    }

    /// 当前帧序号
    pub fn frame_index(&self) -> u64 {
        self.frames.len() as u64
    }

    pub fn frames(&self) -> &[PresentedFrame] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&PresentedFrame> {
        self.frames.last()
    }

    /// 每帧请求的睡眠时长
    pub fn delays(&self) -> &[Duration] {
        &self.delays
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// 全屏状态实际改变的次数
    pub fn fullscreen_changes(&self) -> usize {
        self.fullscreen_changes
    }

    pub fn live_surfaces(&self) -> usize {
        self.live_surfaces.len()
    }

    pub fn destroyed_surfaces(&self) -> usize {
        self.destroyed
    }

    fn check_surface(&self, surface: SurfaceId) -> Result<(), PlatformError> {
        if self.live_surfaces.contains(&surface) {
            Ok(())
        } else {
            Err(PlatformError::InvalidSurface(surface))
        }
    }

    fn queue_frame_events(&mut self) {
        let frame = self.frame_index();
        if self.queued_for == Some(frame) {
            return;
        }
        self.queued_for = Some(frame);

        if let Some(events) = self.event_script.remove(&frame) {
            self.pending.extend(events);
        }
        if self.quit_after.is_some_and(|last| frame >= last) {
            self.pending.push_back(PlatformEvent::Quit);
        }
    }
}

impl Platform for HeadlessPlatform {
    fn create_surface(
        &mut self,
        width: u32,
        height: u32,
        title: &str,
        fullscreen: bool,
    ) -> Result<SurfaceId, PlatformError> {
        if let Some(message) = &self.surface_failure {
            return Err(PlatformError::SurfaceCreation(message.clone()));
        }

        self.next_surface += 1;
        let surface = SurfaceId(self.next_surface);
        self.live_surfaces.push(surface);
        self.fullscreen = fullscreen;
        debug!(?surface, width, height, title = %title, fullscreen, "画布已创建");
        Ok(surface)
    }

    fn create_media_backend(&mut self) -> Result<Box<dyn MediaBackend>, PlatformError> {
        match &self.media_failure {
            Some(message) => Err(PlatformError::MediaBackend(message.clone())),
            None => Ok(Box::new(DecodingBackend::new())),
        }
    }

    fn set_fullscreen(&mut self, surface: SurfaceId, fullscreen: bool) -> Result<(), PlatformError> {
        self.check_surface(surface)?;
        if self.fullscreen != fullscreen {
            self.fullscreen = fullscreen;
            self.fullscreen_changes += 1;
        }
        Ok(())
    }

    fn poll_event(&mut self) -> Option<PlatformEvent> {
        self.queue_frame_events();
        self.pending.pop_front()
    }

    fn keyboard_state(&mut self) -> KeySet {
        self.key_script
            .get(&self.frame_index())
            .copied()
            .unwrap_or_default()
    }

    fn present(&mut self, surface: SurfaceId, frame: &DrawList) -> Result<(), PlatformError> {
        self.check_surface(surface)?;

        let mut textures = Vec::new();
        let mut fills = 0;
        for command in frame.commands() {
            match command {
                DrawCommand::Texture { texture, .. } => textures.push(texture.id()),
                DrawCommand::Fill { .. } => fills += 1,
            }
        }

        self.frames.push(PresentedFrame {
            surface,
            clear_color: frame.clear_color(),
            textures,
            fills,
            fullscreen: self.fullscreen,
        });
        Ok(())
    }

    fn delay(&mut self, duration: Duration) {
        self.delays.push(duration);
        if self.realtime {
            std::thread::sleep(duration);
        }
    }

    fn destroy_surface(&mut self, surface: SurfaceId) {
        if let Some(index) = self.live_surfaces.iter().position(|s| *s == surface) {
            self.live_surfaces.remove(index);
            self.destroyed += 1;
            debug!(?surface, "画布已销毁");
        }
    }
}
