use crate::error::Result;
use crate::progress::Verbosity;
use crate::spritesheet::{Conversion, Options, Outputs, TestType};
use clap::error::ErrorKind;
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// 缺少必填参数时的提示
pub const USAGE_HINT: &str =
    "Make sure to include -i INPUT_FILE.gif, -o OUTPUT_TEXTURE_ID, and -d OUTPUT_DIRECTORY!";

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Compression {
    Default,
    Fast,
    Best,
}

/// `--test-type` 的取值
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TestTypeArg {
    /// 空字符串，正常输出全部帧
    All,
    FirstFrame,
    RowedFf,
}

fn parse_test_type(value: &str) -> std::result::Result<TestTypeArg, String> {
    match value {
        "" => Ok(TestTypeArg::All),
        "first-frame" | "firstFrame" => Ok(TestTypeArg::FirstFrame),
        "rowed-ff" | "rowedFF" => Ok(TestTypeArg::RowedFf),
        other => Err(format!(
            "unknown test type {:?}, expected first-frame, rowed-ff or an empty string",
            other
        )),
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short = 'i', long, help = "要转换的 gif 文件")]
    input: PathBuf,

    #[arg(
        short = 'o',
        long,
        help = "输出纹理 ID，作为输出文件名并写入 mcmeta 注释"
    )]
    output_id: String,

    #[arg(short = 'd', long, help = "输出目录，不存在时自动创建")]
    directory: PathBuf,

    #[arg(
        long,
        value_parser = parse_test_type,
        help = "调试模式：first-frame 一次写入第一帧，rowed-ff 逐行写入第一帧，空字符串输出全部帧"
    )]
    test_type: Option<TestTypeArg>,

    #[arg(long, help = "在 mcmeta 中开启帧间插值")]
    interp: bool,

    #[arg(
        short = 'c',
        long,
        help = "png 压缩等级，三种类型 default、fast、best，默认 default"
    )]
    compression: Option<Compression>,

    #[arg(short = 'q', long, conflicts_with = "verbose", help = "不输出进度")]
    quiet: bool,

    #[arg(short = 'v', long, help = "输出每一帧和生成的 mcmeta")]
    verbose: bool,
}

impl Args {
    fn into_options(self) -> Options {
        let mut options = Options::new(self.input, self.output_id, self.directory);
        options.test_type = match self.test_type {
            Some(TestTypeArg::FirstFrame) => Some(TestType::FirstFrame),
            Some(TestTypeArg::RowedFf) => Some(TestType::RowedFrame),
            Some(TestTypeArg::All) | None => None,
        };
        options.interpolate = self.interp;
        options.compression = match self.compression {
            Some(Compression::Fast) => png::Compression::Fast,
            Some(Compression::Best) => png::Compression::Best,
            _ => png::Compression::Default,
        };
        options.verbosity = if self.quiet {
            Verbosity::Quiet
        } else if self.verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };
        options
    }
}

/// 把旧的单横线长参数 `-tt`、`-interp` 换成 clap 能识别的写法
fn normalize_legacy_flags<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(|arg| {
            let arg = arg.into();
            match arg.to_str() {
                Some("-tt") => OsString::from("--test-type"),
                Some("-interp") => OsString::from("--interp"),
                _ => arg,
            }
        })
        .collect()
}

/// 解析命令行参数，参数错误时由 clap 输出信息并退出进程
pub fn parse_options<I, T>(args: I) -> Options
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    match Args::try_parse_from(normalize_legacy_flags(args)) {
        Ok(args) => args.into_options(),
        Err(err) => {
            if err.kind() == ErrorKind::MissingRequiredArgument {
                println!("{}", USAGE_HINT);
            }
            err.exit()
        }
    }
}

/// 处理命令行参数并执行转换
pub fn args_handle() -> Result<Outputs> {
    let options = parse_options(std::env::args_os());
    Conversion::new(&options).run()
}
