//! # 帧驱动器集成测试
//!
//! 用无窗口后端驱动完整主循环：阶段顺序、启动/运行期失败、退出、全屏、帧预算、输入边沿。

use orca_host::app::{DriverError, FrameDriver, StartupError};
use orca_host::config::AppConfig;
use orca_host::overrides::OverrideRegistry;
use orca_host::platform::{DrawList, HeadlessPlatform, PlatformEvent};
use orca_host::resources::{AssetCache, DecodingBackend, MemorySource};
use orca_host::screens::{Phase, PhaseContext, PhaseError, StandardPhases};
use orca_runtime::{InputSnapshot, Key, PHASE_ORDER, PhaseId};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

/// 可编排的测试阶段
struct ScriptedPhase {
    id: PhaseId,
    finish_after: Option<u32>,
    fail_init: bool,
    work: Duration,
    updates: u32,
    edges: Rc<RefCell<Edges>>,
}

#[derive(Default)]
struct Edges {
    pressed: Vec<u32>,
    released: Vec<u32>,
}

impl ScriptedPhase {
    fn new(id: PhaseId) -> Self {
        Self {
            id,
            finish_after: None,
            fail_init: false,
            work: Duration::ZERO,
            updates: 0,
            edges: Rc::default(),
        }
    }

    fn finish_after(mut self, updates: u32) -> Self {
        self.finish_after = Some(updates);
        self
    }
}

impl Phase for ScriptedPhase {
    fn id(&self) -> PhaseId {
        self.id
    }

    fn initialize(&mut self, _ctx: &mut PhaseContext<'_>) -> Result<(), PhaseError> {
        if self.fail_init {
            return Err(PhaseError::Failed {
                phase: self.id,
                message: "scripted failure".to_string(),
            });
        }
        Ok(())
    }

    fn update(&mut self, input: &InputSnapshot, _ctx: &mut PhaseContext<'_>) {
        let mut edges = self.edges.borrow_mut();
        if input.just_pressed(Key::Z) {
            edges.pressed.push(self.updates);
        }
        if input.just_released(Key::Z) {
            edges.released.push(self.updates);
        }
        self.updates += 1;
        if !self.work.is_zero() {
            std::thread::sleep(self.work);
        }
    }

    fn render(&self, _frame: &mut DrawList) {}

    fn is_finished(&self) -> bool {
        self.finish_after.is_some_and(|n| self.updates >= n)
    }
}

fn memory_cache(source: MemorySource) -> AssetCache {
    AssetCache::new(
        OverrideRegistry::empty(),
        Arc::new(source),
        Box::new(DecodingBackend::new()),
    )
}

/// 开场阶段全部零时长，标题画面等 Enter
fn quick_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.phases.disclaimer_secs = 0.0;
    config.phases.logos_secs = 0.0;
    config.phases.team_logo_secs = 0.0;
    config.phases.level = "levels/test.txt".to_string();
    config
}

#[test]
fn test_scripted_phases_visit_in_order() {
    let platform = HeadlessPlatform::new().quit_after(20);
    let factory = |id: PhaseId| -> Box<dyn Phase> { Box::new(ScriptedPhase::new(id).finish_after(2)) };
    let mut driver = FrameDriver::new(platform, AppConfig::default(), factory)
        .with_assets(memory_cache(MemorySource::new()));

    driver.initialize().unwrap();
    let summary = driver.run().unwrap();

    assert_eq!(summary.visited, PHASE_ORDER.to_vec());
    assert_eq!(summary.final_phase, PhaseId::Gameplay);
    assert_eq!(summary.frames, 20);
    assert_eq!(driver.platform().frames().len(), 20);
}

#[test]
fn test_standard_phases_reach_gameplay() {
    let platform = HeadlessPlatform::new().tap(Key::Enter, 5).quit_after(8);
    let config = quick_config();
    let phases = StandardPhases::new(config.phases.clone());
    let source = MemorySource::new().with_file("levels/test.txt", "row\n");
    let mut driver = FrameDriver::new(platform, config, phases).with_assets(memory_cache(source));

    driver.initialize().unwrap();
    assert_eq!(driver.current_phase(), PhaseId::Disclaimer);

    let summary = driver.run().unwrap();
    assert_eq!(summary.visited, PHASE_ORDER.to_vec());
    assert_eq!(summary.cache.texts, 1);
}

#[test]
fn test_title_holds_without_input() {
    let platform = HeadlessPlatform::new().quit_after(30);
    let config = quick_config();
    let phases = StandardPhases::new(config.phases.clone());
    let mut driver = FrameDriver::new(platform, config, phases)
        .with_assets(memory_cache(MemorySource::new()));

    driver.initialize().unwrap();
    let summary = driver.run().unwrap();
    assert_eq!(summary.final_phase, PhaseId::Title);
    assert_eq!(
        summary.visited,
        vec![
            PhaseId::Disclaimer,
            PhaseId::Logos,
            PhaseId::TeamLogo,
            PhaseId::Title
        ]
    );
}

#[test]
fn test_mid_run_phase_failure_is_fatal() {
    // 关卡文本缺失：进入游戏阶段时初始化失败
    let platform = HeadlessPlatform::new().tap(Key::Enter, 5).quit_after(50);
    let config = quick_config();
    let phases = StandardPhases::new(config.phases.clone());
    let mut driver = FrameDriver::new(platform, config, phases)
        .with_assets(memory_cache(MemorySource::new()));

    driver.initialize().unwrap();
    match driver.run() {
        Err(DriverError::PhaseInit { phase, source }) => {
            assert_eq!(phase, PhaseId::Gameplay);
            assert!(matches!(source, PhaseError::MissingAsset { .. }));
        }
        other => panic!("期望 PhaseInit，实际 {:?}", other),
    }
    assert!(!driver.state().running);
    assert!(driver.platform().frames().len() < 50);

    driver.shutdown();
    assert_eq!(driver.platform().destroyed_surfaces(), 1);
}

#[test]
fn test_startup_fails_without_display() {
    let platform = HeadlessPlatform::new().fail_surface("no display");
    let factory = |id: PhaseId| -> Box<dyn Phase> { Box::new(ScriptedPhase::new(id)) };
    let mut driver = FrameDriver::new(platform, AppConfig::default(), factory)
        .with_assets(memory_cache(MemorySource::new()));

    assert!(matches!(driver.initialize(), Err(StartupError::Display(_))));
    assert_eq!(driver.platform().live_surfaces(), 0);
    assert!(matches!(driver.run(), Err(DriverError::NotInitialized)));
}

#[test]
fn test_startup_fails_without_media_backend() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = AppConfig::default();
    config.overrides.root = dir.path().join("mods");

    let platform = HeadlessPlatform::new().fail_media_backend("no gpu");
    let factory = |id: PhaseId| -> Box<dyn Phase> { Box::new(ScriptedPhase::new(id)) };
    let mut driver = FrameDriver::new(platform, config, factory);

    assert!(matches!(driver.initialize(), Err(StartupError::Backend(_))));
    // 已创建的画布被释放
    assert_eq!(driver.platform().destroyed_surfaces(), 1);
    assert_eq!(driver.platform().live_surfaces(), 0);
}

#[test]
fn test_startup_fails_when_initial_phase_fails() {
    let platform = HeadlessPlatform::new();
    let factory = |id: PhaseId| -> Box<dyn Phase> {
        let mut phase = ScriptedPhase::new(id);
        phase.fail_init = true;
        Box::new(phase)
    };
    let mut driver = FrameDriver::new(platform, AppConfig::default(), factory)
        .with_assets(memory_cache(MemorySource::new()));

    assert!(matches!(driver.initialize(), Err(StartupError::Phase(_))));
    assert_eq!(driver.platform().destroyed_surfaces(), 1);
    assert!(driver.assets().is_none());
}

#[test]
fn test_startup_rejects_invalid_config() {
    let mut config = AppConfig::default();
    config.frame.target_fps = 0;
    let factory = |id: PhaseId| -> Box<dyn Phase> { Box::new(ScriptedPhase::new(id)) };
    let mut driver = FrameDriver::new(HeadlessPlatform::new(), config, factory);

    assert!(matches!(driver.initialize(), Err(StartupError::Config(_))));
    assert_eq!(driver.platform().live_surfaces(), 0);
}

#[test]
fn test_quit_still_completes_the_frame() {
    let platform = HeadlessPlatform::new().quit_after(3);
    let factory = |id: PhaseId| -> Box<dyn Phase> { Box::new(ScriptedPhase::new(id)) };
    let mut driver = FrameDriver::new(platform, AppConfig::default(), factory)
        .with_assets(memory_cache(MemorySource::new()));

    driver.initialize().unwrap();
    let summary = driver.run().unwrap();
    assert_eq!(summary.frames, 3);
    assert_eq!(driver.platform().frames().len(), 3);
    assert_eq!(summary.final_phase, PhaseId::Disclaimer);
}

#[test]
fn test_fullscreen_toggle_events() {
    let platform = HeadlessPlatform::new()
        .with_event(2, PlatformEvent::ToggleFullscreen)
        .with_event(4, PlatformEvent::ToggleFullscreen)
        .quit_after(6);
    let factory = |id: PhaseId| -> Box<dyn Phase> { Box::new(ScriptedPhase::new(id)) };
    let mut driver = FrameDriver::new(platform, AppConfig::default(), factory)
        .with_assets(memory_cache(MemorySource::new()));

    driver.initialize().unwrap();
    driver.run().unwrap();

    let fullscreen: Vec<bool> = driver
        .platform()
        .frames()
        .iter()
        .map(|frame| frame.fullscreen)
        .collect();
    assert_eq!(fullscreen, vec![true, true, false, false, true, true]);
    assert_eq!(driver.platform().fullscreen_changes(), 2);
    assert!(driver.state().fullscreen);
}

#[test]
fn test_sleep_never_exceeds_budget() {
    let platform = HeadlessPlatform::new().quit_after(10);
    let factory = |id: PhaseId| -> Box<dyn Phase> { Box::new(ScriptedPhase::new(id)) };
    let mut config = AppConfig::default();
    config.frame.target_fps = 30;
    let mut driver = FrameDriver::new(platform, config, factory)
        .with_assets(memory_cache(MemorySource::new()));

    driver.initialize().unwrap();
    driver.run().unwrap();

    let budget = driver.pacer().budget();
    let delays = driver.platform().delays();
    assert!(delays.len() <= 10);
    assert!(delays.iter().all(|d| !d.is_zero() && *d <= budget));
}

#[test]
fn test_over_budget_frames_do_not_sleep() {
    let platform = HeadlessPlatform::new().quit_after(5);
    let factory = |id: PhaseId| -> Box<dyn Phase> {
        let mut phase = ScriptedPhase::new(id);
        phase.work = Duration::from_millis(5);
        Box::new(phase)
    };
    let mut config = AppConfig::default();
    config.frame.target_fps = 1000;
    let mut driver = FrameDriver::new(platform, config, factory)
        .with_assets(memory_cache(MemorySource::new()));

    driver.initialize().unwrap();
    let summary = driver.run().unwrap();

    assert_eq!(summary.frames, 5);
    assert!(driver.platform().delays().is_empty());
}

#[test]
fn test_input_edges_reach_the_phase() {
    let edges = Rc::new(RefCell::new(Edges::default()));
    let shared = Rc::clone(&edges);
    let factory = move |id: PhaseId| -> Box<dyn Phase> {
        let mut phase = ScriptedPhase::new(id);
        phase.edges = Rc::clone(&shared);
        Box::new(phase)
    };
    let platform = HeadlessPlatform::new().hold(Key::Z, 2..5).quit_after(8);
    let mut driver = FrameDriver::new(platform, AppConfig::default(), factory)
        .with_assets(memory_cache(MemorySource::new()));

    driver.initialize().unwrap();
    driver.run().unwrap();

    let edges = edges.borrow();
    assert_eq!(edges.pressed, vec![2]);
    assert_eq!(edges.released, vec![5]);
}

#[test]
fn test_shutdown_is_idempotent() {
    let platform = HeadlessPlatform::new().quit_after(2);
    let factory = |id: PhaseId| -> Box<dyn Phase> { Box::new(ScriptedPhase::new(id)) };
    let mut driver = FrameDriver::new(platform, AppConfig::default(), factory)
        .with_assets(memory_cache(MemorySource::new()));

    driver.initialize().unwrap();
    driver.run().unwrap();

    driver.shutdown();
    driver.shutdown();
    assert_eq!(driver.platform().destroyed_surfaces(), 1);
    assert!(driver.assets().is_none());
    assert!(matches!(driver.run(), Err(DriverError::NotInitialized)));
}

#[test]
fn test_repeated_initialize_keeps_one_surface() {
    let platform = HeadlessPlatform::new().quit_after(3);
    let factory = |id: PhaseId| -> Box<dyn Phase> { Box::new(ScriptedPhase::new(id)) };
    let mut driver = FrameDriver::new(platform, AppConfig::default(), factory)
        .with_assets(memory_cache(MemorySource::new()));

    driver.initialize().unwrap();
    driver.initialize().unwrap();
    assert_eq!(driver.platform().live_surfaces(), 1);
    assert_eq!(driver.visited(), &[PhaseId::Disclaimer]);

    driver.run().unwrap();
    driver.shutdown();
    assert_eq!(driver.platform().live_surfaces(), 0);
    assert_eq!(driver.platform().destroyed_surfaces(), 1);
}
