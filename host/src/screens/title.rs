//! # 主标题阶段
//!
//! 显示背景和标题 Logo，"按下开始"提示闪烁；按下开始键进入游戏。

use super::{Phase, PhaseContext, PhaseError};
use crate::platform::{DrawList, Rect};
use crate::resources::{SoundHandle, TextureHandle};
use orca_runtime::{InputSnapshot, Key, PhaseId};
use std::time::Duration;
use tracing::{debug, info};

pub const TITLE_BACKGROUND: &str = "title/background.png";
pub const TITLE_LOGO: &str = "title/logo.png";
pub const TITLE_PRESS_START: &str = "title/press_start.png";
pub const TITLE_JINGLE: &str = "sounds/title.wav";

/// 提示闪烁周期的一半
const BLINK_HALF_PERIOD: Duration = Duration::from_millis(500);

/// 主标题阶段
pub struct TitlePhase {
    start_key: Key,
    background: Option<TextureHandle>,
    logo: Option<TextureHandle>,
    press_start: Option<TextureHandle>,
    jingle: Option<SoundHandle>,
    elapsed: Duration,
    finished: bool,
}

impl TitlePhase {
    pub fn new(start_key: Key) -> Self {
        Self {
            start_key,
            background: None,
            logo: None,
            press_start: None,
            jingle: None,
            elapsed: Duration::ZERO,
            finished: false,
        }
    }

    /// 标题音乐（交给音频后端播放）
    pub fn jingle(&self) -> Option<&SoundHandle> {
        self.jingle.as_ref()
    }

    /// 提示当前是否可见
    pub fn prompt_visible(&self) -> bool {
        (self.elapsed.as_millis() / BLINK_HALF_PERIOD.as_millis()) % 2 == 0
    }
}

impl Phase for TitlePhase {
    fn id(&self) -> PhaseId {
        PhaseId::Title
    }

    fn initialize(&mut self, ctx: &mut PhaseContext<'_>) -> Result<(), PhaseError> {
        self.background = ctx.assets.get_texture(TITLE_BACKGROUND);
        self.logo = ctx.assets.get_texture(TITLE_LOGO);
        self.press_start = ctx.assets.get_texture(TITLE_PRESS_START);
        self.jingle = ctx.assets.get_sound(TITLE_JINGLE);
        debug!(
            background = self.background.is_some(),
            logo = self.logo.is_some(),
            jingle = self.jingle.is_some(),
            "标题画面资源已加载"
        );
        Ok(())
    }

    fn update(&mut self, input: &InputSnapshot, ctx: &mut PhaseContext<'_>) {
        self.elapsed += ctx.delta;
        if !self.finished && input.just_pressed(self.start_key) {
            info!(key = %self.start_key, "开始游戏");
            self.finished = true;
        }
    }

    fn render(&self, frame: &mut DrawList) {
        let (width, height) = frame.size();

        if let Some(background) = &self.background {
            frame.draw_texture(
                background,
                Rect::new(0.0, 0.0, width as f32, height as f32),
                1.0,
            );
        }
        if let Some(logo) = &self.logo {
            frame.draw_texture_centered(logo, 1.0);
        }
        if let Some(prompt) = &self.press_start {
            if self.prompt_visible() {
                let dest = Rect::new(
                    (width as f32 - prompt.width() as f32) / 2.0,
                    height as f32 * 0.75,
                    prompt.width() as f32,
                    prompt.height() as f32,
                );
                frame.draw_texture(prompt, dest, 1.0);
            }
        }
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}
