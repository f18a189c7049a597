//! Orca - Host 入口
//!
//! 读取配置、扫描覆盖包、跑主循环。当前入口使用无窗口后端，
//! `--frames` 指定运行的帧数。

use anyhow::Context;
use clap::Parser;
use orca_host::{AppConfig, FrameDriver, HeadlessPlatform, RunSummary, StandardPhases};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Level, error, info};

#[derive(Parser)]
#[command(name = "orca")]
#[command(about = "Orca 运行时")]
#[command(version)]
struct Cli {
    /// 配置文件（默认：config.json）
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// 运行指定帧数后退出
    #[arg(short, long)]
    frames: Option<u64>,

    /// 覆盖包根目录（覆盖配置中的 overrides.root）
    #[arg(short, long)]
    mods: Option<PathBuf>,

    /// 输出调试日志
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<RunSummary> {
    let mut config = AppConfig::load(&cli.config);
    if let Some(mods) = cli.mods {
        config.overrides.root = mods;
    }

    let mut platform = HeadlessPlatform::new().realtime(true);
    if let Some(frames) = cli.frames {
        platform = platform.quit_after(frames);
    }

    let phases = StandardPhases::new(config.phases.clone());
    let mut driver = FrameDriver::new(platform, config, phases);
    driver.initialize().context("启动失败")?;
    let summary = driver.run().context("运行中止")?;
    driver.shutdown();
    Ok(summary)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(summary) => {
            info!(
                frames = summary.frames,
                phase = %summary.final_phase,
                "正常退出"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
