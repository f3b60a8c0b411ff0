use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// 输入文件不存在时的退出码
pub const EXIT_INPUT_NOT_FOUND: i32 = -1;
/// 其它失败的退出码
pub const EXIT_FAILURE: i32 = 1;
/// 参数错误的退出码，和 clap 一致
pub const EXIT_USAGE: i32 = 2;

#[derive(Debug, Error)]
pub enum Error {
    /// 输入的 gif 文件无法打开
    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("usage: {0}")]
    Usage(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to decode gif: {0}")]
    Decode(#[from] gif::DecodingError),

    /// gif 帧合成到画布时出错
    #[error("failed to composite gif frame: {0}")]
    Dispose(#[from] gif_dispose::Error),

    #[error("failed to encode png: {0}")]
    Encode(#[from] png::EncodingError),

    /// png 头的宽高不合法（为 0 或溢出）
    #[error("invalid png dimensions {width}x{height}")]
    InvalidDimensions { width: u64, height: u64 },

    #[error("gif contains no frames")]
    NoFrames,

    /// 帧尺寸和行缓冲区尺寸不一致
    #[error("frame is {frame_width}x{frame_height} but the canvas is {width}x{height}")]
    FrameSizeMismatch {
        frame_width: u32,
        frame_height: u32,
        width: u32,
        height: u32,
    },

    #[error("pixel layout with stride {stride} cannot read alpha at offset {alpha_offset}")]
    InvalidPixelLayout { stride: usize, alpha_offset: usize },

    /// 像素数据长度和帧尺寸不匹配
    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    PixelBufferLength { expected: usize, actual: usize },

    #[error("row holds {actual} bytes, expected {expected}")]
    RowLength { expected: usize, actual: usize },

    /// 关闭 png 时写入的行数不等于图像高度
    #[error("png expects {expected} rows but {written} were written")]
    RowCount { expected: u32, written: u32 },
}

impl Error {
    /// 进程退出码
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InputNotFound(_) => EXIT_INPUT_NOT_FOUND,
            Error::Usage(_) => EXIT_USAGE,
            _ => EXIT_FAILURE,
        }
    }
}
