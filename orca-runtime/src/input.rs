//! # Input 模块
//!
//! 定义被追踪的按键、按键集合以及逐帧的输入快照。
//!
//! ## 设计说明
//!
//! - 只追踪固定的 8 个按键，`KeySet` 是这 8 个键上的位集合
//! - `InputSnapshot` 是值对象：每帧由宿主调用 `advance()` 产生新快照，
//!   然后显式传给当前阶段的 `update()`，不存在全局按键状态
//! - 每帧开始时先把"上一帧"替换成旧的"当前帧"，再写入新的"当前帧"

use crate::error::RuntimeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 被追踪的按键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    Z,
    X,
    C,
    Enter,
    Up,
    Down,
    Left,
    Right,
}

impl Key {
    /// 所有被追踪的按键（位序）
    pub const ALL: [Key; 8] = [
        Key::Z,
        Key::X,
        Key::C,
        Key::Enter,
        Key::Up,
        Key::Down,
        Key::Left,
        Key::Right,
    ];

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }

    /// 按键名（小写）
    pub fn name(self) -> &'static str {
        match self {
            Key::Z => "z",
            Key::X => "x",
            Key::C => "c",
            Key::Enter => "enter",
            Key::Up => "up",
            Key::Down => "down",
            Key::Left => "left",
            Key::Right => "right",
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Key {
    type Err = RuntimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Key::ALL
            .into_iter()
            .find(|key| key.name() == lower || (lower == "return" && *key == Key::Enter))
            .ok_or_else(|| RuntimeError::UnknownKey {
                name: s.to_string(),
            })
    }
}

/// 按键集合（位集合）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct KeySet(u8);

impl KeySet {
    /// 空集合
    pub const EMPTY: KeySet = KeySet(0);

    /// 由若干按键构造集合
    pub fn from_keys(keys: impl IntoIterator<Item = Key>) -> Self {
        keys.into_iter().collect()
    }

    pub fn insert(&mut self, key: Key) {
        self.0 |= key.bit();
    }

    pub fn remove(&mut self, key: Key) {
        self.0 &= !key.bit();
    }

    pub fn contains(&self, key: Key) -> bool {
        self.0 & key.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// 按位序遍历集合中的按键
    pub fn iter(&self) -> impl Iterator<Item = Key> + '_ {
        Key::ALL.into_iter().filter(|key| self.contains(*key))
    }

    /// 原始位表示
    pub fn bits(&self) -> u8 {
        self.0
    }
}

impl FromIterator<Key> for KeySet {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        let mut set = KeySet::EMPTY;
        for key in iter {
            set.insert(key);
        }
        set
    }
}

/// 输入快照
///
/// 双缓冲的按键状态：`current` 是本帧按下的键，`previous` 是上一帧按下的键。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    current: KeySet,
    previous: KeySet,
}

impl InputSnapshot {
    /// 创建空快照（没有任何按键按下）
    pub fn new() -> Self {
        Self::default()
    }

    /// 推进到下一帧
    ///
    /// 旧的 `current` 成为新的 `previous`，`now` 成为新的 `current`。
    pub fn advance(&self, now: KeySet) -> Self {
        Self {
            previous: self.current,
            current: now,
        }
    }

    /// 本帧是否按住
    pub fn is_down(&self, key: Key) -> bool {
        self.current.contains(key)
    }

    /// 本帧刚刚按下（本帧按住，上一帧没有）
    pub fn just_pressed(&self, key: Key) -> bool {
        self.current.contains(key) && !self.previous.contains(key)
    }

    /// 本帧刚刚松开（上一帧按住，本帧没有）
    pub fn just_released(&self, key: Key) -> bool {
        self.previous.contains(key) && !self.current.contains(key)
    }

    pub fn current(&self) -> KeySet {
        self.current
    }

    pub fn previous(&self) -> KeySet {
        self.previous
    }
}
