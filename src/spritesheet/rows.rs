use super::Frame;
use crate::error::{Error, Result};

/// 每个输出像素的字节数
pub const RGBA_BYTES: usize = 4;

/// 透明度处理方式
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum AlphaPolicy {
    /// 透明度固定为 255
    #[default]
    Opaque,
    /// 原样复制源像素的透明度
    Transparent,
}

/// 可复用的行缓冲区，`height` 行，每行 `width * 4` 字节
///
/// 整个转换过程只分配一次，每一帧都会覆盖它的全部内容，
/// 离开作用域时释放。
#[derive(Debug)]
pub struct RowBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RowBuffer {
    pub fn new(width: u32, height: u32) -> RowBuffer {
        let len = width as usize * RGBA_BYTES * height as usize;
        RowBuffer {
            width,
            height,
            data: vec![0; len],
        }
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// 每行的字节数
    pub fn row_len(&self) -> usize {
        self.width as usize * RGBA_BYTES
    }

    /// 从上到下遍历所有行
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        // 宽度为 0 时 chunks_exact 会 panic
        let len = self.row_len().max(1);
        self.data.chunks_exact(len)
    }

    fn rows_mut(&mut self) -> std::slice::ChunksExactMut<'_, u8> {
        let len = self.row_len().max(1);
        self.data.chunks_exact_mut(len)
    }

    /// 整块数据，行与行之间没有间隔
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// 把一帧转换成 RGBA 写入缓冲区
    ///
    /// 每一行的每个字节都恰好写一次，不会分配内存。
    pub fn fill(&mut self, frame: &Frame, alpha: AlphaPolicy) -> Result<()> {
        if frame.width != self.width || frame.height != self.height {
            return Err(Error::FrameSizeMismatch {
                frame_width: frame.width,
                frame_height: frame.height,
                width: self.width,
                height: self.height,
            });
        }

        let layout = frame.layout();
        let src_row_len = self.width as usize * layout.stride;
        let pixels = frame.pixels();

        for (dst, src) in self.rows_mut().zip(pixels.chunks_exact(src_row_len.max(1))) {
            for (out, px) in dst
                .chunks_exact_mut(RGBA_BYTES)
                .zip(src.chunks_exact(layout.stride))
            {
                out[0] = px[0];
                out[1] = px[1];
                out[2] = px[2];
                out[3] = match alpha {
                    AlphaPolicy::Opaque => 0xFF,
                    AlphaPolicy::Transparent => px[layout.alpha_offset],
                };
            }
        }

        Ok(())
    }
}
