use colored::Colorize;
use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;

/// 进度条格数
const BAR_CELLS: usize = 20;
/// 毫秒转秒
const SECOND_CONSTANT: f64 = 1000.00;

/// 终端输出的详细程度
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Verbosity {
    /// 不输出进度和结果
    Quiet,
    #[default]
    Normal,
    /// 额外输出每一帧和生成的 mcmeta
    Verbose,
}

/// 转换过程中的终端输出
#[derive(Debug)]
pub struct Reporter {
    verbosity: Verbosity,
    filled: String,
    empty: String,
    start: Instant,
}

impl Reporter {
    pub fn new(verbosity: Verbosity) -> Reporter {
        Reporter {
            verbosity,
            filled: "\u{25A0}".repeat(BAR_CELLS),
            empty: "-".repeat(BAR_CELLS),
            start: Instant::now(),
        }
    }

    /// 一帧写入完成
    pub fn frame_written(&self, index: usize, total: usize) {
        match self.verbosity {
            Verbosity::Quiet => {}
            Verbosity::Normal => self.update_progress_bar(index + 1, total),
            Verbosity::Verbose => println!("frame: {} written", index + 1),
        }
    }

    /// 输出生成的 mcmeta 内容
    pub fn metadata(&self, text: &str) {
        if self.verbosity == Verbosity::Verbose {
            println!("Finished writing png, creating JSON:");
            println!("{}", text);
        }
    }

    /// 输出总耗时和生成的文件
    pub fn finished(&self, png: &Path, mcmeta: &Path) {
        if self.verbosity == Verbosity::Quiet {
            return;
        }
        if self.verbosity == Verbosity::Normal {
            println!();
        }
        let second = self.start.elapsed().as_millis() as f64 / SECOND_CONSTANT;
        println!("Total time: {}s", second);
        println!("{} {}", "Wrote".green(), png.display());
        println!("{} {}", "Wrote".green(), mcmeta.display());
    }

    /// 更新进度条
    fn update_progress_bar(&self, done: usize, total: usize) {
        let perc = if total == 0 {
            1.0
        } else {
            done as f64 / total as f64
        };
        let lpad = ((perc * BAR_CELLS as f64).floor() as usize).min(BAR_CELLS);

        print!(
            "\rWriting frames: {}{} {}%",
            &self.filled[0..'\u{25A0}'.len_utf8() * lpad],
            &self.empty[0..BAR_CELLS - lpad],
            (perc * 100.0).trunc()
        );
        // 刷新失败只影响进度显示
        let _ = io::stdout().flush();
    }
}
