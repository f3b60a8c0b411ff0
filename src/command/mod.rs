mod args_handle;

pub use args_handle::{args_handle, parse_options, USAGE_HINT};
