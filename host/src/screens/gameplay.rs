//! # 游戏阶段
//!
//! 终止阶段：加载关卡文本后一直运行，永不结束。关卡本身的模拟不在这里。

use super::{Phase, PhaseContext, PhaseError};
use crate::platform::{Color, DrawList, Rect};
use orca_runtime::{InputSnapshot, PhaseId};
use tracing::info;

const SKY: Color = Color::rgba(0.2, 0.4, 0.9, 1.0);

/// 游戏阶段
pub struct GameplayPhase {
    level_path: String,
    level: Option<String>,
    frames: u64,
}

impl GameplayPhase {
    pub fn new(level_path: impl Into<String>) -> Self {
        Self {
            level_path: level_path.into(),
            level: None,
            frames: 0,
        }
    }

    pub fn level_path(&self) -> &str {
        &self.level_path
    }

    /// 已加载的关卡文本
    pub fn level(&self) -> Option<&str> {
        self.level.as_deref()
    }

    /// 已运行的帧数
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Phase for GameplayPhase {
    fn id(&self) -> PhaseId {
        PhaseId::Gameplay
    }

    fn initialize(&mut self, ctx: &mut PhaseContext<'_>) -> Result<(), PhaseError> {
        let level = ctx
            .assets
            .load_text(&self.level_path)
            .map_err(|source| PhaseError::MissingAsset {
                phase: PhaseId::Gameplay,
                path: self.level_path.clone(),
                source,
            })?;

        info!(level = %self.level_path, rows = level.lines().count(), "关卡已加载");
        self.level = Some(level);
        Ok(())
    }

    fn update(&mut self, _input: &InputSnapshot, _ctx: &mut PhaseContext<'_>) {
        self.frames += 1;
    }

    fn render(&self, frame: &mut DrawList) {
        let (width, height) = frame.size();
        frame.fill(Rect::new(0.0, 0.0, width as f32, height as f32), SKY);
    }

    fn is_finished(&self) -> bool {
        false
    }
}
