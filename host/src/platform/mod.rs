//! # Platform 模块
//!
//! 窗口/渲染/输入后端的能力边界。
//!
//! 帧驱动器只通过 [`Platform`] 与后端打交道：创建画布、轮询事件、读取键盘状态、
//! 提交一帧绘制命令、按预算睡眠。真实后端（SDL、winit 等）在 crate 外实现该 trait；
//! crate 内自带 [`HeadlessPlatform`]，供测试和无窗口运行使用。

mod headless;

pub use headless::{HeadlessPlatform, PresentedFrame};

use crate::resources::{MediaBackend, TextureHandle};
use orca_runtime::KeySet;
use std::time::Duration;
use thiserror::Error;

/// 画布句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u32);

/// 后端事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformEvent {
    /// 关闭窗口 / 请求退出
    Quit,
    /// 切换全屏（默认绑定 F11）
    ToggleFullscreen,
}

/// 屏幕矩形（像素）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// 在 `outer` 中居中放置一个 `width x height` 的矩形
    pub fn centered(outer_width: u32, outer_height: u32, width: u32, height: u32) -> Self {
        Self::new(
            (outer_width as f32 - width as f32) / 2.0,
            (outer_height as f32 - height as f32) / 2.0,
            width as f32,
            height as f32,
        )
    }
}

/// RGBA 颜色
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// 单条绘制命令
#[derive(Debug, Clone)]
pub enum DrawCommand {
    /// 绘制纹理
    Texture {
        texture: TextureHandle,
        dest: Rect,
        /// 不透明度 (0.0 - 1.0)
        alpha: f32,
    },
    /// 纯色填充
    Fill { rect: Rect, color: Color },
}

/// 一帧的绘制命令列表
///
/// 每帧开始时清空为背景色，阶段在 `render` 中追加命令，最后整体交给后端提交。
#[derive(Debug, Clone)]
pub struct DrawList {
    clear_color: Color,
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            clear_color: Color::BLACK,
            width,
            height,
            commands: Vec::new(),
        }
    }

    /// 清空命令并设置背景色
    pub fn clear(&mut self, color: Color) {
        self.clear_color = color;
        self.commands.clear();
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// 绘制纹理，`alpha` 会被限制在 0.0 - 1.0
    pub fn draw_texture(&mut self, texture: &TextureHandle, dest: Rect, alpha: f32) {
        self.push(DrawCommand::Texture {
            texture: TextureHandle::clone(texture),
            dest,
            alpha: alpha.clamp(0.0, 1.0),
        });
    }

    /// 居中绘制纹理（原始尺寸）
    pub fn draw_texture_centered(&mut self, texture: &TextureHandle, alpha: f32) {
        let dest = Rect::centered(self.width, self.height, texture.width(), texture.height());
        self.draw_texture(texture, dest, alpha);
    }

    pub fn fill(&mut self, rect: Rect, color: Color) {
        self.push(DrawCommand::Fill { rect, color });
    }

    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    /// 画布尺寸
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// 后端错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlatformError {
    /// 无法创建窗口/画布
    #[error("无法创建画布: {0}")]
    SurfaceCreation(String),

    /// 无法初始化媒体后端
    #[error("无法初始化媒体后端: {0}")]
    MediaBackend(String),

    /// 画布句柄无效
    #[error("无效的画布: {0:?}")]
    InvalidSurface(SurfaceId),

    /// 提交帧失败
    #[error("提交帧失败: {0}")]
    PresentFailed(String),
}

/// 窗口/渲染/输入后端
pub trait Platform {
    /// 创建画布
    fn create_surface(
        &mut self,
        width: u32,
        height: u32,
        title: &str,
        fullscreen: bool,
    ) -> Result<SurfaceId, PlatformError>;

    /// 创建与画布配套的媒体后端（纹理上传、音频解码）
    fn create_media_backend(&mut self) -> Result<Box<dyn MediaBackend>, PlatformError>;

    /// 切换全屏 / 窗口模式
    fn set_fullscreen(&mut self, surface: SurfaceId, fullscreen: bool) -> Result<(), PlatformError>;

    /// 取出一个待处理事件，没有时返回 `None`
    fn poll_event(&mut self) -> Option<PlatformEvent>;

    /// 当前按下的按键
    fn keyboard_state(&mut self) -> KeySet;

    /// 清屏并提交一帧
    fn present(&mut self, surface: SurfaceId, frame: &DrawList) -> Result<(), PlatformError>;

    /// 阻塞等待
    fn delay(&mut self, duration: Duration);

    /// 销毁画布
    fn destroy_surface(&mut self, surface: SurfaceId);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::Texture;
    use std::sync::Arc;

    #[test]
    fn test_rect_centered() {
        let rect = Rect::centered(1280, 720, 200, 100);
        assert_eq!(rect, Rect::new(540.0, 310.0, 200.0, 100.0));
    }

    #[test]
    fn test_draw_list_clear_and_alpha_clamp() {
        let texture: TextureHandle = Arc::new(Texture::new(1, 10, 10, vec![0; 400]));
        let mut list = DrawList::new(100, 100);
        list.draw_texture_centered(&texture, 1.5);
        list.fill(Rect::new(0.0, 0.0, 1.0, 1.0), Color::WHITE);
        assert_eq!(list.len(), 2);

        match &list.commands()[0] {
            DrawCommand::Texture { dest, alpha, .. } => {
                assert_eq!(*alpha, 1.0);
                assert_eq!(*dest, Rect::new(45.0, 45.0, 10.0, 10.0));
            }
            other => panic!("期望纹理命令，实际 {:?}", other),
        }

        list.clear(Color::WHITE);
        assert!(list.is_empty());
        assert_eq!(list.clear_color(), Color::WHITE);
        assert_eq!(list.size(), (100, 100));
    }
}
