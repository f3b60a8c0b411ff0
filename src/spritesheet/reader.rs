use super::{Frame, PixelLayout};
use crate::error::{Error, Result};
use gif::{ColorOutput, DecodeOptions};
use rgb::ComponentBytes;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// gif 帧延时的单位是 1/100 秒
const DELAY_TO_MILLIS: u32 = 10;

/// 已完整解码到内存中的 gif
///
/// 每一帧都已按处置方式合成到整张画布上，尺寸等于画布尺寸，
/// 帧可以按显示顺序重复遍历。
#[derive(Debug)]
pub struct GifSource {
    width: u32,
    height: u32,
    frames: Vec<Frame>,
}

impl GifSource {
    /// 打开并解码 gif 文件
    pub fn open(path: &Path) -> Result<GifSource> {
        let file = File::open(path).map_err(|_| Error::InputNotFound(path.to_path_buf()))?;
        GifSource::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<GifSource> {
        let mut options = DecodeOptions::new();
        // 合成画布需要调色板索引
        options.set_color_output(ColorOutput::Indexed);
        let mut decoder = options.read_info(reader)?;
        let mut screen = gif_dispose::Screen::new_decoder(&decoder);

        let width = u32::from(decoder.width());
        let height = u32::from(decoder.height());
        let mut frames = vec![];

        while let Some(frame) = decoder.read_next_frame()? {
            screen.blit_frame(frame)?;

            let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
            for row in screen.pixels_rgba().rows() {
                pixels.extend_from_slice(row.as_bytes());
            }

            let duration = u32::from(frame.delay) * DELAY_TO_MILLIS;
            frames.push(Frame::new(
                width,
                height,
                duration,
                pixels,
                PixelLayout::RGBA,
            )?);
        }

        if frames.is_empty() {
            return Err(Error::NoFrames);
        }

        Ok(GifSource {
            width,
            height,
            frames,
        })
    }

    /// 画布宽度
    pub fn width(&self) -> u32 {
        self.width
    }

    /// 画布高度
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// 按显示顺序排列的帧
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }
}
