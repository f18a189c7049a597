//! # Media 模块
//!
//! 把原始字节转换成可渲染/可播放的句柄，并在缓存驱逐时释放它们。
//!
//! 资源缓存只和 [`MediaBackend`] 打交道；真正的 GPU/音频后端可以实现该 trait，
//! 默认的 [`DecodingBackend`] 用 `image` 解码为 RGBA8 像素，用 `rodio` 校验音频。

use super::ResourceError;
use std::io::Cursor;
use std::sync::Arc;
use tracing::debug;

/// 纹理句柄
pub type TextureHandle = Arc<Texture>;

/// 音效句柄
pub type SoundHandle = Arc<Sound>;

/// 已上传（或已解码）的纹理
#[derive(Debug)]
pub struct Texture {
    id: u64,
    width: u32,
    height: u32,
    /// RGBA8 像素
    pixels: Vec<u8>,
}

impl Texture {
    pub fn new(id: u64, width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            id,
            width,
            height,
            pixels,
        }
    }

    /// 后端分配的 ID
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// 估算的显存占用（字节）
    pub fn size_bytes(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

/// 已校验过的音效数据（保持编码形式，播放时再解码）
#[derive(Debug)]
pub struct Sound {
    id: u64,
    data: Arc<[u8]>,
}

impl Sound {
    pub fn new(id: u64, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            id,
            data: data.into(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// 编码后的音频字节
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// 媒体后端
///
/// `create_*` 成功后得到的句柄归缓存所有，缓存在 `unload`/`shutdown` 时
/// 对每个句柄恰好调用一次 `release_*`。
pub trait MediaBackend {
    /// 由图片字节创建纹理
    fn create_texture(&mut self, path: &str, bytes: &[u8]) -> Result<TextureHandle, ResourceError>;

    /// 由音频字节创建音效
    fn create_sound(&mut self, path: &str, bytes: Vec<u8>) -> Result<SoundHandle, ResourceError>;

    /// 释放纹理
    fn release_texture(&mut self, texture: TextureHandle);

    /// 释放音效
    fn release_sound(&mut self, sound: SoundHandle);
}

/// 默认媒体后端：CPU 端解码
#[derive(Debug, Default)]
pub struct DecodingBackend {
    next_id: u64,
    live_textures: usize,
    live_sounds: usize,
}

impl DecodingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// 尚未释放的纹理数量
    pub fn live_textures(&self) -> usize {
        self.live_textures
    }

    /// 尚未释放的音效数量
    pub fn live_sounds(&self) -> usize {
        self.live_sounds
    }
}

impl MediaBackend for DecodingBackend {
    fn create_texture(&mut self, path: &str, bytes: &[u8]) -> Result<TextureHandle, ResourceError> {
        let image = image::load_from_memory(bytes).map_err(|e| ResourceError::InvalidFormat {
            path: path.to_string(),
            message: format!("无法解码图片: {}", e),
        })?;

        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        let texture = Texture::new(self.allocate_id(), width, height, rgba.into_raw());

        self.live_textures += 1;
        debug!(path = %path, width, height, id = texture.id(), "纹理已创建");
        Ok(Arc::new(texture))
    }

    fn create_sound(&mut self, path: &str, bytes: Vec<u8>) -> Result<SoundHandle, ResourceError> {
        let data: Arc<[u8]> = bytes.into();

        // 只校验能否识别格式，解码出的 Source 立刻丢弃
        rodio::Decoder::new(Cursor::new(Arc::clone(&data))).map_err(|e| {
            ResourceError::InvalidFormat {
                path: path.to_string(),
                message: format!("无法解码音频: {}", e),
            }
        })?;

        let sound = Sound::new(self.allocate_id(), data);
        self.live_sounds += 1;
        debug!(path = %path, id = sound.id(), "音效已创建");
        Ok(Arc::new(sound))
    }

    fn release_texture(&mut self, texture: TextureHandle) {
        self.live_textures = self.live_textures.saturating_sub(1);
        debug!(id = texture.id(), "纹理已释放");
    }

    fn release_sound(&mut self, sound: SoundHandle) {
        self.live_sounds = self.live_sounds.saturating_sub(1);
        debug!(id = sound.id(), "音效已释放");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, Rgba([255, 0, 0, 255]));
        let mut cursor = Cursor::new(Vec::new());
        image.write_to(&mut cursor, ImageFormat::Png).unwrap();
        cursor.into_inner()
    }

    #[test]
    fn test_decode_png_texture() {
        let mut backend = DecodingBackend::new();
        let texture = backend
            .create_texture("title/logo.png", &png_bytes(3, 2))
            .unwrap();

        assert_eq!(texture.width(), 3);
        assert_eq!(texture.height(), 2);
        assert_eq!(texture.pixels().len(), 3 * 2 * 4);
        assert_eq!(texture.size_bytes(), 24);
        assert_eq!(&texture.pixels()[..4], &[255, 0, 0, 255]);
        assert_eq!(backend.live_textures(), 1);

        backend.release_texture(texture);
        assert_eq!(backend.live_textures(), 0);
    }

    #[test]
    fn test_texture_ids_are_unique() {
        let mut backend = DecodingBackend::new();
        let a = backend.create_texture("a.png", &png_bytes(1, 1)).unwrap();
        let b = backend.create_texture("b.png", &png_bytes(1, 1)).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_invalid_image_is_rejected() {
        let mut backend = DecodingBackend::new();
        let result = backend.create_texture("broken.png", b"not an image");
        assert!(matches!(result, Err(ResourceError::InvalidFormat { .. })));
        assert_eq!(backend.live_textures(), 0);
    }

    #[test]
    fn test_invalid_sound_is_rejected() {
        let mut backend = DecodingBackend::new();
        let result = backend.create_sound("sounds/broken.wav", b"definitely not audio".to_vec());
        assert!(matches!(result, Err(ResourceError::InvalidFormat { .. })));
        assert_eq!(backend.live_sounds(), 0);
    }
}
