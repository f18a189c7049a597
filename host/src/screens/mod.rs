//! # 阶段模块
//!
//! 开场到游戏的各个阶段（Disclaimer → Logos → TeamLogo → Title → Gameplay）。
//!
//! 每个阶段只实现统一的生命周期：`initialize` → 每帧 `update` + `render` →
//! `is_finished`。阶段不知道下一个阶段是谁，转换由帧驱动器按固定顺序完成。

pub mod gameplay;
pub mod splash;
pub mod title;

pub use gameplay::GameplayPhase;
pub use splash::SplashPhase;
pub use title::TitlePhase;

use crate::config::PhaseConfig;
use crate::platform::DrawList;
use crate::resources::{AssetCache, ResourceError};
use orca_runtime::{InputSnapshot, PhaseId};
use std::time::Duration;
use thiserror::Error;

/// 阶段可用的运行时上下文
pub struct PhaseContext<'a> {
    /// 资源缓存
    pub assets: &'a mut AssetCache,
    /// 本帧时长（固定步长，等于帧预算）
    pub delta: Duration,
}

/// 阶段错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhaseError {
    /// 阶段必需的资源无法加载
    #[error("阶段 {phase} 缺少必需资源 {path}: {source}")]
    MissingAsset {
        phase: PhaseId,
        path: String,
        #[source]
        source: ResourceError,
    },

    /// 其他初始化失败
    #[error("阶段 {phase} 初始化失败: {message}")]
    Failed { phase: PhaseId, message: String },
}

/// 阶段生命周期
pub trait Phase {
    /// 阶段标识
    fn id(&self) -> PhaseId;

    /// 进入阶段时调用一次，失败即致命
    fn initialize(&mut self, ctx: &mut PhaseContext<'_>) -> Result<(), PhaseError>;

    /// 每帧调用一次
    fn update(&mut self, input: &InputSnapshot, ctx: &mut PhaseContext<'_>);

    /// 向本帧绘制列表追加命令
    fn render(&self, frame: &mut DrawList);

    /// 是否已结束（驱动器据此进入下一阶段）
    fn is_finished(&self) -> bool;
}

/// 按阶段标识构造阶段
pub trait PhaseFactory {
    fn create(&mut self, id: PhaseId) -> Box<dyn Phase>;
}

impl<F> PhaseFactory for F
where
    F: FnMut(PhaseId) -> Box<dyn Phase>,
{
    fn create(&mut self, id: PhaseId) -> Box<dyn Phase> {
        self(id)
    }
}

/// 免责声明图片
pub const DISCLAIMER_IMAGES: &[&str] = &["disclaimer/disclaimer.png"];
/// 厂商 Logo 图片（依次显示）
pub const LOGO_IMAGES: &[&str] = &["logos/sega.png", "logos/sonicteam.png"];
/// 团队 Logo 图片
pub const TEAM_LOGO_IMAGES: &[&str] = &["logos/team.png"];

/// 默认的阶段集合
#[derive(Debug, Clone, Default)]
pub struct StandardPhases {
    config: PhaseConfig,
}

impl StandardPhases {
    pub fn new(config: PhaseConfig) -> Self {
        Self { config }
    }

    fn splash(&self, id: PhaseId, images: &[&str]) -> Box<dyn Phase> {
        let duration = self.config.splash_duration(id).unwrap_or_default();
        Box::new(SplashPhase::new(id, images, duration, self.config.skip_key))
    }
}

impl PhaseFactory for StandardPhases {
    fn create(&mut self, id: PhaseId) -> Box<dyn Phase> {
        match id {
            PhaseId::Disclaimer => self.splash(id, DISCLAIMER_IMAGES),
            PhaseId::Logos => self.splash(id, LOGO_IMAGES),
            PhaseId::TeamLogo => self.splash(id, TEAM_LOGO_IMAGES),
            PhaseId::Title => Box::new(TitlePhase::new(self.config.skip_key)),
            PhaseId::Gameplay => Box::new(GameplayPhase::new(self.config.level.clone())),
        }
    }
}
