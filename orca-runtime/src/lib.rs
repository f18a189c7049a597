//! # Orca Runtime
//!
//! 游戏运行时的纯逻辑核心。
//!
//! ## 架构概述
//!
//! `orca-runtime` 不依赖任何 IO、窗口或渲染后端，只描述：
//!
//! - 顶层阶段（Phase）的固定推进表
//! - 按键集合与逐帧输入快照
//! - 固定帧率的节拍计算
//!
//! 宿主层（host）负责采集按键、调用阶段、睡眠到下一帧：
//!
//! ```text
//! Host                                   Runtime
//!   │                                       │
//!   │── KeySet ───────────────────────────►│ InputSnapshot::advance()
//!   │── is_finished == true ──────────────►│ PhaseSequence::advance()
//!   │◄─ Option<PhaseId> ───────────────────│
//!   │── 本帧耗时 ─────────────────────────►│ FramePacer::sleep_for()
//!   │◄─ 需要睡眠的时长 ─────────────────────│
//! ```
//!
//! ## 模块结构
//!
//! - [`phase`]：阶段标识与推进表
//! - [`input`]：按键、按键集合、输入快照
//! - [`pacing`]：帧预算与睡眠计算
//! - [`error`]：错误类型定义

pub mod error;
pub mod input;
pub mod pacing;
pub mod phase;

// 重导出核心类型
pub use error::{RuntimeError, RuntimeResult};
pub use input::{InputSnapshot, Key, KeySet};
pub use pacing::{DEFAULT_TARGET_FPS, FramePacer};
pub use phase::{PHASE_ORDER, PhaseId, PhaseSequence};
