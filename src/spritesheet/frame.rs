use crate::error::{Error, Result};

/// 源像素的内存排布
///
/// 每个像素占 `stride` 个字节，前三个字节依次是红、绿、蓝，
/// `alpha_offset` 指向作为透明度来源的那个字节。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PixelLayout {
    pub stride: usize,
    pub alpha_offset: usize,
}

impl PixelLayout {
    /// 紧密排列的 RGBA，解码器输出的就是这种格式
    pub const RGBA: PixelLayout = PixelLayout {
        stride: 4,
        alpha_offset: 3,
    };

    /// 每像素五个字节，第五个字节是透明度
    pub const RGBAX: PixelLayout = PixelLayout {
        stride: 5,
        alpha_offset: 4,
    };
}

/// 解码后的一帧动画，尺寸和画布相同
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    /// 帧持续时间，毫秒
    pub duration: u32,
    pixels: Vec<u8>,
    layout: PixelLayout,
}

impl Frame {
    pub fn new(
        width: u32,
        height: u32,
        duration: u32,
        pixels: Vec<u8>,
        layout: PixelLayout,
    ) -> Result<Frame> {
        if layout.stride < 4 || layout.alpha_offset >= layout.stride {
            return Err(Error::InvalidPixelLayout {
                stride: layout.stride,
                alpha_offset: layout.alpha_offset,
            });
        }
        let expected = width as usize * height as usize * layout.stride;
        if pixels.len() != expected {
            return Err(Error::PixelBufferLength {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Frame {
            width,
            height,
            duration,
            pixels,
            layout,
        })
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn layout(&self) -> PixelLayout {
        self.layout
    }
}
