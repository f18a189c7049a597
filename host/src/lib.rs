//! # Host 层
//!
//! Orca 运行时的宿主层实现：资源、覆盖包、阶段和帧驱动。
//!
//! ## 架构说明
//!
//! Host 层负责：
//! - 覆盖包（mods）的发现与路径解析
//! - 按类型缓存的资源加载
//! - 开场到游戏的阶段状态机
//! - 固定步长的主循环
//!
//! 窗口、渲染和输入后端通过 [`platform::Platform`] 接入，
//! 纯逻辑部分（按键、阶段顺序、帧预算）在 `orca-runtime` 中。

pub mod app;
pub mod config;
pub mod overrides;
pub mod platform;
pub mod resources;
pub mod screens;
pub mod state;

pub use app::{DriverError, FrameDriver, RunSummary, StartupError};
pub use config::{AppConfig, AssetSourceType, ConfigError, OverrideConfig, WindowConfig};
pub use overrides::{AssetLocation, ManifestError, OverrideError, OverrideRegistry, OverrideUnit};
pub use platform::{DrawList, HeadlessPlatform, Platform, PlatformError, PlatformEvent};
pub use resources::{
    AssetCache, AssetKind, CacheStats, DecodingBackend, FsSource, MediaBackend, MemorySource,
    ResourceError, ResourceSource, ZipSource,
};
pub use screens::{Phase, PhaseContext, PhaseError, PhaseFactory, StandardPhases};
pub use state::HostState;
