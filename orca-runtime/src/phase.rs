//! # Phase 模块
//!
//! 顶层阶段标识与固定推进表。
//!
//! 阶段本身不知道下一个阶段是谁。推进表只存在于这里，由宿主层的帧驱动器
//! 在当前阶段报告完成时调用 [`PhaseSequence::advance`]。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 顶层阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PhaseId {
    /// 免责声明
    #[default]
    Disclaimer,
    /// 厂商 Logo
    Logos,
    /// 制作组 Logo
    TeamLogo,
    /// 标题画面
    Title,
    /// 游戏进行中（终态）
    Gameplay,
}

/// 阶段推进顺序
pub const PHASE_ORDER: [PhaseId; 5] = [
    PhaseId::Disclaimer,
    PhaseId::Logos,
    PhaseId::TeamLogo,
    PhaseId::Title,
    PhaseId::Gameplay,
];

impl PhaseId {
    /// 启动时的阶段
    pub const INITIAL: PhaseId = PhaseId::Disclaimer;

    /// 推进表：当前阶段完成后进入的阶段
    ///
    /// `Gameplay` 是终态，返回 `None`。
    pub fn next(self) -> Option<PhaseId> {
        match self {
            PhaseId::Disclaimer => Some(PhaseId::Logos),
            PhaseId::Logos => Some(PhaseId::TeamLogo),
            PhaseId::TeamLogo => Some(PhaseId::Title),
            PhaseId::Title => Some(PhaseId::Gameplay),
            PhaseId::Gameplay => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }

    pub fn name(self) -> &'static str {
        match self {
            PhaseId::Disclaimer => "disclaimer",
            PhaseId::Logos => "logos",
            PhaseId::TeamLogo => "team_logo",
            PhaseId::Title => "title",
            PhaseId::Gameplay => "gameplay",
        }
    }
}

impl fmt::Display for PhaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 阶段序列
///
/// 记录当前处于哪个阶段以及已经发生的切换次数。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseSequence {
    current: PhaseId,
    transitions: usize,
}

impl Default for PhaseSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseSequence {
    pub fn new() -> Self {
        Self {
            current: PhaseId::INITIAL,
            transitions: 0,
        }
    }

    /// 获取当前阶段
    pub fn current(&self) -> PhaseId {
        self.current
    }

    /// 按推进表前进一步
    ///
    /// 返回新的当前阶段；已经处于终态时返回 `None` 且状态不变。
    pub fn advance(&mut self) -> Option<PhaseId> {
        let next = self.current.next()?;
        self.current = next;
        self.transitions += 1;
        Some(next)
    }

    /// 已发生的切换次数
    pub fn transitions(&self) -> usize {
        self.transitions
    }

    pub fn is_terminal(&self) -> bool {
        self.current.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_visits_every_phase_in_order() {
        let mut sequence = PhaseSequence::new();
        let mut visited = vec![sequence.current()];

        // 多发几次"完成"信号，终态之后不应再有切换
        for _ in 0..8 {
            if let Some(next) = sequence.advance() {
                visited.push(next);
            }
        }

        insta::assert_debug_snapshot!(visited, @r"
        [
            Disclaimer,
            Logos,
            TeamLogo,
            Title,
            Gameplay,
        ]
        ");
        assert_eq!(sequence.transitions(), 4);
        assert_eq!(sequence.current(), PhaseId::Gameplay);
    }

    #[test]
    fn test_gameplay_is_terminal() {
        assert!(PhaseId::Gameplay.is_terminal());
        assert_eq!(PhaseId::Gameplay.next(), None);

        let mut sequence = PhaseSequence::new();
        while sequence.advance().is_some() {}
        assert!(sequence.is_terminal());
        assert_eq!(sequence.advance(), None);
        assert_eq!(sequence.current(), PhaseId::Gameplay);
    }

    #[test]
    fn test_order_matches_transition_table() {
        for pair in PHASE_ORDER.windows(2) {
            assert_eq!(pair[0].next(), Some(pair[1]));
        }
        assert_eq!(PHASE_ORDER[0], PhaseId::INITIAL);
        assert_eq!(PhaseId::default(), PhaseId::INITIAL);
    }

    #[test]
    fn test_phase_names() {
        assert_eq!(PhaseId::TeamLogo.to_string(), "team_logo");
        assert_eq!(PhaseId::Disclaimer.name(), "disclaimer");
    }
}
