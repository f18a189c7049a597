//! # Config 模块
//!
//! 运行时配置管理，集中管理所有配置项。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高）
//! 2. 配置文件 (config.json)
//! 3. 默认值（最低）

use orca_runtime::{DEFAULT_TARGET_FPS, Key, PhaseId};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// 资源来源类型
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AssetSourceType {
    /// 文件系统（开发模式）
    #[default]
    Fs,
    /// ZIP 文件（发布模式）
    Zip,
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 资源根目录（仅 Fs 模式使用）
    #[serde(default = "default_assets_root")]
    pub assets_root: PathBuf,

    /// 资源来源类型（fs/zip）
    #[serde(default)]
    pub asset_source: AssetSourceType,

    /// ZIP 文件路径（仅 Zip 模式使用）
    #[serde(default)]
    pub zip_path: Option<String>,

    /// 覆盖包配置
    #[serde(default)]
    pub overrides: OverrideConfig,

    /// 窗口配置
    #[serde(default)]
    pub window: WindowConfig,

    /// 帧率配置
    #[serde(default)]
    pub frame: FrameConfig,

    /// 开场阶段配置
    #[serde(default)]
    pub phases: PhaseConfig,

    /// 资源缓存配置
    #[serde(default)]
    pub resources: ResourceConfig,
}

/// 覆盖包配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverrideConfig {
    /// 覆盖包根目录，不存在时启动会自动创建
    #[serde(default = "default_overrides_root")]
    pub root: PathBuf,

    /// 覆盖包内镜像基础资源树的子目录
    #[serde(default = "default_asset_subdir")]
    pub asset_subdir: String,
}

/// 窗口配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// 窗口宽度
    #[serde(default = "default_window_width")]
    pub width: u32,

    /// 窗口高度
    #[serde(default = "default_window_height")]
    pub height: u32,

    /// 窗口标题
    #[serde(default = "default_window_title")]
    pub title: String,

    /// 是否以全屏启动
    #[serde(default = "default_fullscreen")]
    pub fullscreen: bool,
}

/// 帧率配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameConfig {
    /// 目标帧率，每帧预算 = 1s / target_fps
    #[serde(default = "default_target_fps")]
    pub target_fps: u32,
}

/// 开场阶段配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseConfig {
    /// 免责声明停留时间（秒）
    #[serde(default = "default_splash_secs")]
    pub disclaimer_secs: f32,

    /// 厂商 Logo 停留时间（秒）
    #[serde(default = "default_splash_secs")]
    pub logos_secs: f32,

    /// 团队 Logo 停留时间（秒）
    #[serde(default = "default_splash_secs")]
    pub team_logo_secs: f32,

    /// 跳过开场 / 离开标题画面的按键
    #[serde(default = "default_skip_key")]
    pub skip_key: Key,

    /// 游戏阶段加载的关卡文本（逻辑路径）
    #[serde(default = "default_level")]
    pub level: String,
}

/// 资源缓存配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// 启动时预加载的纹理（逻辑路径），失败只记录警告
    #[serde(default)]
    pub preload_textures: Vec<String>,
}

// 默认值函数
fn default_assets_root() -> PathBuf {
    PathBuf::from("assets")
}

fn default_overrides_root() -> PathBuf {
    PathBuf::from("mods")
}

fn default_asset_subdir() -> String {
    crate::overrides::DEFAULT_ASSET_SUBDIR.to_string()
}

fn default_window_width() -> u32 {
    1280
}

fn default_window_height() -> u32 {
    720
}

fn default_window_title() -> String {
    "Orca".to_string()
}

fn default_fullscreen() -> bool {
    true
}

fn default_target_fps() -> u32 {
    DEFAULT_TARGET_FPS
}

fn default_splash_secs() -> f32 {
    3.0
}

fn default_skip_key() -> Key {
    Key::Enter
}

fn default_level() -> String {
    "levels/ehz.txt".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            assets_root: default_assets_root(),
            asset_source: AssetSourceType::default(),
            zip_path: None,
            overrides: OverrideConfig::default(),
            window: WindowConfig::default(),
            frame: FrameConfig::default(),
            phases: PhaseConfig::default(),
            resources: ResourceConfig::default(),
        }
    }
}

impl Default for OverrideConfig {
    fn default() -> Self {
        Self {
            root: default_overrides_root(),
            asset_subdir: default_asset_subdir(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_window_width(),
            height: default_window_height(),
            title: default_window_title(),
            fullscreen: default_fullscreen(),
        }
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            target_fps: default_target_fps(),
        }
    }
}

impl Default for PhaseConfig {
    fn default() -> Self {
        Self {
            disclaimer_secs: default_splash_secs(),
            logos_secs: default_splash_secs(),
            team_logo_secs: default_splash_secs(),
            skip_key: default_skip_key(),
            level: default_level(),
        }
    }
}

impl PhaseConfig {
    /// 计时开场阶段的总时长；非计时阶段返回 `None`
    pub fn splash_duration(&self, phase: PhaseId) -> Option<Duration> {
        let secs = match phase {
            PhaseId::Disclaimer => self.disclaimer_secs,
            PhaseId::Logos => self.logos_secs,
            PhaseId::TeamLogo => self.team_logo_secs,
            PhaseId::Title | PhaseId::Gameplay => return None,
        };
        Some(Duration::try_from_secs_f32(secs).unwrap_or(Duration::ZERO))
    }
}

impl AppConfig {
    /// 加载配置文件
    ///
    /// 如果文件不存在或解析失败，返回默认配置并记录警告。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            warn!(path = ?path, "配置文件不存在，使用默认配置");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => {
                    info!(path = ?path, "配置文件加载成功");
                    config
                }
                Err(e) => {
                    warn!(error = %e, "配置文件解析失败，使用默认配置");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(error = %e, "配置文件读取失败，使用默认配置");
                Self::default()
            }
        }
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?;

        fs::write(path, json).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.asset_source == AssetSourceType::Zip {
            let zip_path = self.zip_path.as_ref().ok_or_else(|| {
                ConfigError::ValidationFailed("Zip 模式必须配置 zip_path".to_string())
            })?;

            if !Path::new(zip_path).exists() {
                return Err(ConfigError::ValidationFailed(format!(
                    "ZIP 文件不存在: {}",
                    zip_path
                )));
            }
        }

        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::ValidationFailed(
                "窗口宽高必须大于 0".to_string(),
            ));
        }

        if self.frame.target_fps == 0 {
            return Err(ConfigError::ValidationFailed(
                "目标帧率必须大于 0".to_string(),
            ));
        }

        if self.overrides.asset_subdir.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "overrides.asset_subdir 不能为空".to_string(),
            ));
        }

        for (name, secs) in [
            ("disclaimer_secs", self.phases.disclaimer_secs),
            ("logos_secs", self.phases.logos_secs),
            ("team_logo_secs", self.phases.team_logo_secs),
        ] {
            if Duration::try_from_secs_f32(secs).is_err() {
                return Err(ConfigError::ValidationFailed(format!(
                    "{} 必须是非负数且不能超出时长范围",
                    name
                )));
            }
        }

        Ok(())
    }
}

/// 配置错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// 序列化失败
    #[error("配置序列化失败: {0}")]
    SerializationFailed(String),
    /// IO 错误
    #[error("配置 IO 错误: {0}")]
    IoError(String),
    /// 验证失败
    #[error("配置验证失败: {0}")]
    ValidationFailed(String),
}
