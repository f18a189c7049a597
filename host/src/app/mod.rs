//! # App 模块
//!
//! 帧驱动器：持有后端、资源缓存和当前阶段，跑固定步长的主循环。
//!
//! ## 每帧流程
//!
//! ```text
//! poll_event ─▶ keyboard_state ─▶ Phase::update ─▶ 结束? ─▶ 切换阶段
//!                                                     │
//! delay(budget - work) ◀── present ◀── Phase::render ◀┘
//! ```
//!
//! 没有跳帧也没有追帧：工作超出预算时本帧不睡眠，下一帧照常开始。

mod draw;
mod init;
mod update;

pub use init::{create_asset_cache, create_source};

use crate::config::{AppConfig, ConfigError};
use crate::overrides::OverrideError;
use crate::platform::{DrawList, Platform, PlatformError, SurfaceId};
use crate::resources::{AssetCache, CacheStats, ResourceError};
use crate::screens::{Phase, PhaseContext, PhaseError, PhaseFactory};
use crate::state::HostState;
use orca_runtime::{FramePacer, InputSnapshot, PhaseId, PhaseSequence, RuntimeError};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};

/// 启动失败（任何一种都让进程以非零状态退出）
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("配置无效: {0}")]
    Config(#[from] ConfigError),

    #[error("帧率设置无效: {0}")]
    FrameRate(#[from] RuntimeError),

    #[error("显示初始化失败: {0}")]
    Display(#[source] PlatformError),

    #[error("媒体后端初始化失败: {0}")]
    Backend(#[source] PlatformError),

    #[error("覆盖包扫描失败: {0}")]
    Overrides(#[from] OverrideError),

    #[error("资源来源初始化失败: {0}")]
    Resources(#[from] ResourceError),

    #[error("初始阶段初始化失败: {0}")]
    Phase(#[from] PhaseError),
}

/// 运行期错误
#[derive(Error, Debug)]
pub enum DriverError {
    /// 没有先调用 `initialize()`（或已经 `shutdown()`）
    #[error("帧驱动器尚未初始化")]
    NotInitialized,

    /// 运行中切换到的阶段初始化失败
    #[error("阶段 {phase} 初始化失败: {source}")]
    PhaseInit {
        phase: PhaseId,
        #[source]
        source: PhaseError,
    },

    /// 提交帧失败
    #[error("提交帧失败: {0}")]
    Present(#[source] PlatformError),
}

/// 一次运行的摘要
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// 完成的帧数
    pub frames: u64,
    /// 依次进入过的阶段（含初始阶段）
    pub visited: Vec<PhaseId>,
    /// 结束时所处阶段
    pub final_phase: PhaseId,
    /// 结束时的缓存统计
    pub cache: CacheStats,
}

/// 帧驱动器
pub struct FrameDriver<P: Platform> {
    platform: P,
    config: AppConfig,
    factory: Box<dyn PhaseFactory>,
    assets: Option<AssetCache>,
    surface: Option<SurfaceId>,
    sequence: PhaseSequence,
    phase: Option<Box<dyn Phase>>,
    visited: Vec<PhaseId>,
    input: InputSnapshot,
    pacer: FramePacer,
    state: HostState,
    frame: DrawList,
}

impl<P: Platform> FrameDriver<P> {
    pub fn new(platform: P, config: AppConfig, factory: impl PhaseFactory + 'static) -> Self {
        let frame = DrawList::new(config.window.width, config.window.height);
        Self {
            platform,
            config,
            factory: Box::new(factory),
            assets: None,
            surface: None,
            sequence: PhaseSequence::new(),
            phase: None,
            visited: Vec::new(),
            input: InputSnapshot::new(),
            pacer: FramePacer::default(),
            state: HostState::new(),
            frame,
        }
    }

    /// 使用已经构造好的资源缓存（跳过覆盖包扫描和资源来源创建）
    pub fn with_assets(mut self, assets: AssetCache) -> Self {
        self.assets = Some(assets);
        self
    }

    /// 按顺序初始化：显示 → 资源后端 → 预加载 → 初始阶段
    ///
    /// 任一步失败都会释放已获取的资源并返回错误。已初始化时什么也不做。
    pub fn initialize(&mut self) -> Result<(), StartupError> {
        if self.phase.is_some() {
            debug!("帧驱动器已初始化，忽略重复调用");
            return Ok(());
        }

        let result = self.try_initialize();
        if let Err(e) = &result {
            warn!(error = %e, "启动失败，释放已获取的资源");
            self.shutdown();
        }
        result
    }

    fn try_initialize(&mut self) -> Result<(), StartupError> {
        self.config.validate()?;
        self.pacer = FramePacer::from_fps(self.config.frame.target_fps)?;

        // 1. 显示
        let window = &self.config.window;
        let surface = self
            .platform
            .create_surface(window.width, window.height, &window.title, window.fullscreen)
            .map_err(StartupError::Display)?;
        self.surface = Some(surface);
        self.state.fullscreen = window.fullscreen;
        info!(
            width = window.width,
            height = window.height,
            fullscreen = window.fullscreen,
            "画布已创建"
        );

        // 2. 资源后端
        let assets = match &mut self.assets {
            Some(assets) => assets,
            empty => {
                let backend = self
                    .platform
                    .create_media_backend()
                    .map_err(StartupError::Backend)?;
                empty.insert(create_asset_cache(&self.config, backend)?)
            }
        };

        // 3. 预加载（都不是必需的）
        let preload = &self.config.resources.preload_textures;
        if !preload.is_empty() {
            let loaded = assets.preload_textures(preload);
            info!(loaded, total = preload.len(), "纹理预加载完成");
        }

        // 4. 初始阶段
        let id = self.sequence.current();
        let mut phase = self.factory.create(id);
        let mut ctx = PhaseContext {
            assets,
            delta: self.pacer.budget(),
        };
        phase.initialize(&mut ctx)?;
        info!(phase = %id, "初始阶段已进入");

        self.phase = Some(phase);
        self.visited.push(id);
        self.state.running = true;
        Ok(())
    }

    /// 主循环，直到收到退出请求或发生致命错误
    pub fn run(&mut self) -> Result<RunSummary, DriverError> {
        if self.phase.is_none() {
            return Err(DriverError::NotInitialized);
        }

        info!(budget_ms = self.pacer.budget().as_secs_f64() * 1000.0, "主循环开始");
        while self.state.running {
            if let Err(e) = self.run_frame() {
                self.state.stop();
                return Err(e);
            }
        }

        let summary = self.summary();
        info!(
            frames = summary.frames,
            phase = %summary.final_phase,
            "主循环结束: {}",
            summary.cache.format()
        );
        Ok(summary)
    }

    /// 跑一帧
    pub fn run_frame(&mut self) -> Result<(), DriverError> {
        let started = Instant::now();

        update::handle_events(self);
        update::update(self)?;
        draw::draw(self)?;

        let work = started.elapsed();
        let sleep = self.pacer.sleep_for(work);
        if !sleep.is_zero() {
            self.platform.delay(sleep);
        }
        self.state.frame += 1;
        debug!(frame = self.state.frame, work_us = work.as_micros() as u64, "帧完成");
        Ok(())
    }

    /// 按获取的逆序释放：阶段 → 资源缓存 → 画布。可重复调用。
    pub fn shutdown(&mut self) {
        self.state.stop();
        self.phase = None;

        if let Some(mut assets) = self.assets.take() {
            let stats = assets.stats();
            assets.shutdown();
            info!("资源缓存已释放: {}", stats.format());
        }

        if let Some(surface) = self.surface.take() {
            self.platform.destroy_surface(surface);
            info!("画布已销毁");
        }
    }

    fn summary(&self) -> RunSummary {
        RunSummary {
            frames: self.state.frame,
            visited: self.visited.clone(),
            final_phase: self.sequence.current(),
            cache: self.assets.as_ref().map(AssetCache::stats).unwrap_or_default(),
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn state(&self) -> &HostState {
        &self.state
    }

    pub fn assets(&self) -> Option<&AssetCache> {
        self.assets.as_ref()
    }

    pub fn assets_mut(&mut self) -> Option<&mut AssetCache> {
        self.assets.as_mut()
    }

    pub fn current_phase(&self) -> PhaseId {
        self.sequence.current()
    }

    /// 依次进入过的阶段
    pub fn visited(&self) -> &[PhaseId] {
        &self.visited
    }

    pub fn input(&self) -> &InputSnapshot {
        &self.input
    }

    pub fn pacer(&self) -> FramePacer {
        self.pacer
    }
}

impl<P: Platform> Drop for FrameDriver<P> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
