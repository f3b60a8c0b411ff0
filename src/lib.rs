//! 把 gif 动图转换成竖向排列的 png 精灵图和 `.png.mcmeta` 动画描述。

pub mod command;
pub mod error;
pub mod progress;
pub mod spritesheet;

pub use error::{Error, Result};
