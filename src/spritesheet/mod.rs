mod convert;
mod encoder;
mod frame;
mod metadata;
mod reader;
mod rows;

pub use convert::{Conversion, Options, Outputs, TestType};
pub use encoder::{PendingSheet, SheetEncoder};
pub use frame::{Frame, PixelLayout};
pub use metadata::{ticks, AnimationMetadata, FrameEntry, TICK_MILLIS};
pub use reader::GifSource;
pub use rows::{AlphaPolicy, RowBuffer, RGBA_BYTES};
