//! # 开场画面
//!
//! 免责声明、厂商 Logo、团队 Logo 三个阶段共用的计时画面：
//! 多张图片平分总时长依次显示，每张淡入 → 停留 → 淡出。
//! 时长走完或按下跳过键即结束。

use super::{Phase, PhaseContext, PhaseError};
use crate::platform::DrawList;
use crate::resources::TextureHandle;
use orca_runtime::{InputSnapshot, Key, PhaseId};
use std::time::Duration;
use tracing::debug;

/// 每张图片淡入/淡出各占的比例
const FADE_FRACTION: f32 = 0.25;

/// 计时开场画面
pub struct SplashPhase {
    id: PhaseId,
    images: Vec<String>,
    textures: Vec<Option<TextureHandle>>,
    duration: Duration,
    elapsed: Duration,
    skip_key: Key,
    finished: bool,
}

impl SplashPhase {
    pub fn new(id: PhaseId, images: &[&str], duration: Duration, skip_key: Key) -> Self {
        Self {
            id,
            images: images.iter().map(|path| path.to_string()).collect(),
            textures: Vec::new(),
            duration,
            elapsed: Duration::ZERO,
            skip_key,
            finished: false,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// 每张图片分到的时长
    fn slot(&self) -> Duration {
        match u32::try_from(self.images.len()) {
            Ok(count) if count > 0 => self.duration / count,
            _ => self.duration,
        }
    }

    /// 当前显示的图片序号
    pub fn current_image(&self) -> usize {
        let slot = self.slot();
        if slot.is_zero() || self.images.is_empty() {
            return 0;
        }
        let index = (self.elapsed.as_secs_f64() / slot.as_secs_f64()) as usize;
        index.min(self.images.len() - 1)
    }

    /// 当前图片的不透明度
    pub fn alpha(&self) -> f32 {
        let slot = self.slot().as_secs_f32();
        if slot <= 0.0 {
            return 1.0;
        }
        let local = self.elapsed.as_secs_f32() - slot * self.current_image() as f32;
        let fade = slot * FADE_FRACTION;

        let alpha = if local < fade {
            local / fade
        } else if local > slot - fade {
            (slot - local) / fade
        } else {
            1.0
        };
        alpha.clamp(0.0, 1.0)
    }
}

impl Phase for SplashPhase {
    fn id(&self) -> PhaseId {
        self.id
    }

    fn initialize(&mut self, ctx: &mut PhaseContext<'_>) -> Result<(), PhaseError> {
        // 缺图只是不画，不影响流程
        self.textures = self
            .images
            .iter()
            .map(|path| ctx.assets.get_texture(path))
            .collect();
        debug!(
            phase = %self.id,
            loaded = self.textures.iter().flatten().count(),
            total = self.images.len(),
            "开场画面资源已加载"
        );
        Ok(())
    }

    fn update(&mut self, input: &InputSnapshot, ctx: &mut PhaseContext<'_>) {
        if self.finished {
            return;
        }
        self.elapsed += ctx.delta;

        if input.just_pressed(self.skip_key) {
            debug!(phase = %self.id, "跳过开场画面");
            self.finished = true;
        } else if self.elapsed >= self.duration {
            self.finished = true;
        }
    }

    fn render(&self, frame: &mut DrawList) {
        if let Some(Some(texture)) = self.textures.get(self.current_image()) {
            frame.draw_texture_centered(texture, self.alpha());
        }
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}
