use super::RowBuffer;
use crate::error::{Error, Result};
use png::{BitDepth, ColorType, Compression, StreamWriter};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// png 允许的最大边长
const MAX_DIMENSION: u32 = i32::MAX as u32;

/// 已经打开、还没写入文件头的 png 输出
#[derive(Debug)]
pub struct PendingSheet {
    file: File,
}

impl PendingSheet {
    /// 以二进制写入方式创建输出文件
    pub fn open(path: &Path) -> Result<PendingSheet> {
        let file = File::create(path)?;
        Ok(PendingSheet { file })
    }

    /// 写入 png 文件头：8 位 RGBA，不交错
    ///
    /// `height` 是整张竖条的总高度，即单帧高度乘以帧数。
    pub fn write_header(
        self,
        width: u32,
        height: u32,
        compression: Compression,
    ) -> Result<SheetEncoder> {
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(Error::InvalidDimensions {
                width: width.into(),
                height: height.into(),
            });
        }

        let mut encoder = png::Encoder::new(self.file, width, height);
        encoder.set_color(ColorType::Rgba);
        encoder.set_depth(BitDepth::Eight);
        encoder.set_compression(compression);

        let writer = encoder.write_header()?;
        let stream = writer.into_stream_writer()?;

        Ok(SheetEncoder {
            stream,
            row_len: width as usize * 4,
            expected: height,
            written: 0,
        })
    }
}

/// 逐行写入的 png 编码会话
///
/// 行按帧顺序从上到下写入，必须恰好写满文件头声明的高度后再 `finish`。
pub struct SheetEncoder {
    stream: StreamWriter<'static, File>,
    row_len: usize,
    expected: u32,
    written: u32,
}

impl SheetEncoder {
    /// 追加一行
    pub fn write_row(&mut self, row: &[u8]) -> Result<()> {
        if row.len() != self.row_len {
            return Err(Error::RowLength {
                expected: self.row_len,
                actual: row.len(),
            });
        }
        if self.written >= self.expected {
            return Err(Error::RowCount {
                expected: self.expected,
                written: self.written + 1,
            });
        }
        self.stream.write_all(row)?;
        self.written += 1;
        Ok(())
    }

    /// 把缓冲区里的一帧逐行写入
    pub fn write_rows(&mut self, rows: &RowBuffer) -> Result<()> {
        for row in rows.rows() {
            self.write_row(row)?;
        }
        Ok(())
    }

    /// 一次性写入缓冲区里的整帧
    pub fn write_image(&mut self, rows: &RowBuffer) -> Result<()> {
        if rows.row_len() != self.row_len {
            return Err(Error::RowLength {
                expected: self.row_len,
                actual: rows.row_len(),
            });
        }
        let remaining = self.expected - self.written;
        if rows.height() > remaining {
            return Err(Error::RowCount {
                expected: self.expected,
                written: self.written + rows.height(),
            });
        }
        self.stream.write_all(rows.as_bytes())?;
        self.written += rows.height();
        Ok(())
    }

    /// 结束编码，写入文件尾
    pub fn finish(self) -> Result<()> {
        if self.written != self.expected {
            return Err(Error::RowCount {
                expected: self.expected,
                written: self.written,
            });
        }
        self.stream.finish()?;
        Ok(())
    }
}
