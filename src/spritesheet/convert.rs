use super::{AlphaPolicy, AnimationMetadata, GifSource, PendingSheet, RowBuffer};
use crate::error::{Error, Result};
use crate::progress::{Reporter, Verbosity};
use png::Compression;
use std::fs;
use std::path::{Path, PathBuf};

/// 只输出第一帧的调试模式
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TestType {
    /// 一次写入整帧
    FirstFrame,
    /// 逐行写入
    RowedFrame,
}

/// 一次转换的全部参数
#[derive(Clone, Debug)]
pub struct Options {
    pub input: PathBuf,
    /// 输出文件名，同时写入 mcmeta 的注释
    pub output_id: String,
    pub directory: PathBuf,
    pub test_type: Option<TestType>,
    pub interpolate: bool,
    pub compression: Compression,
    pub verbosity: Verbosity,
}

impl Options {
    pub fn new(
        input: impl Into<PathBuf>,
        output_id: impl Into<String>,
        directory: impl Into<PathBuf>,
    ) -> Options {
        Options {
            input: input.into(),
            output_id: output_id.into(),
            directory: directory.into(),
            test_type: None,
            interpolate: false,
            compression: Compression::Default,
            verbosity: Verbosity::Normal,
        }
    }

    /// 检查不依赖文件系统的参数
    pub fn validate(&self) -> Result<()> {
        if self.output_id.is_empty() {
            return Err(Error::Usage("output id must not be empty".to_string()));
        }
        if self.output_id.contains(['/', '\\']) {
            return Err(Error::Usage(format!(
                "output id {:?} must not contain path separators",
                self.output_id
            )));
        }
        Ok(())
    }

    pub fn png_path(&self) -> PathBuf {
        self.directory.join(format!("{}.png", self.output_id))
    }

    pub fn mcmeta_path(&self) -> PathBuf {
        self.directory.join(format!("{}.png.mcmeta", self.output_id))
    }
}

/// 转换结果
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Outputs {
    pub png: PathBuf,
    pub mcmeta: PathBuf,
    pub frame_count: usize,
    pub width: u32,
    /// 输出 png 的总高度
    pub height: u32,
}

/// gif 转竖向精灵图
pub struct Conversion<'a> {
    options: &'a Options,
    reporter: Reporter,
}

impl<'a> Conversion<'a> {
    pub fn new(options: &'a Options) -> Conversion<'a> {
        Conversion {
            options,
            reporter: Reporter::new(options.verbosity),
        }
    }

    /// 解码 gif，写出 png 和 mcmeta
    ///
    /// 失败时删除本次已经创建的输出文件。
    pub fn run(&mut self) -> Result<Outputs> {
        let options = self.options;
        options.validate()?;
        // 先确认输入可读，再碰输出目录
        let gif = GifSource::open(&options.input)?;

        let mut guard = OutputGuard::default();
        guard.create_dir_all(&options.directory)?;
        let png_path = options.png_path();
        let mcmeta_path = options.mcmeta_path();

        let sheet = guard.track(&png_path, PendingSheet::open(&png_path))?;

        let width = gif.width();
        let frame_height = gif.height();
        let height = match options.test_type {
            Some(_) => frame_height,
            None => u32::try_from(gif.frame_count())
                .ok()
                .and_then(|count| frame_height.checked_mul(count))
                .ok_or(Error::InvalidDimensions {
                    width: width.into(),
                    height: u64::from(frame_height) * gif.frame_count() as u64,
                })?,
        };

        let mut sheet = sheet.write_header(width, height, options.compression)?;
        let mut rows = RowBuffer::new(width, frame_height);
        let total = gif.frame_count();

        let durations = match options.test_type {
            None => {
                let mut durations = Vec::with_capacity(total);
                for (index, frame) in gif.frames().iter().enumerate() {
                    rows.fill(frame, AlphaPolicy::Opaque)?;
                    sheet.write_rows(&rows)?;
                    durations.push(frame.duration);
                    self.reporter.frame_written(index, total);
                }
                durations
            }
            Some(test_type) => {
                let first = &gif.frames()[0];
                rows.fill(first, AlphaPolicy::Transparent)?;
                match test_type {
                    TestType::FirstFrame => sheet.write_image(&rows)?,
                    TestType::RowedFrame => sheet.write_rows(&rows)?,
                }
                self.reporter.frame_written(0, 1);
                gif.frames().iter().map(|frame| frame.duration).collect()
            }
        };
        drop(rows);
        sheet.finish()?;

        let metadata =
            AnimationMetadata::from_durations(&durations, width, frame_height, options.interpolate)?;
        let text = metadata.to_mcmeta(&options.output_id);
        self.reporter.metadata(&text);
        guard.track(&mcmeta_path, fs::write(&mcmeta_path, text).map_err(Error::from))?;

        guard.commit();
        self.reporter.finished(&png_path, &mcmeta_path);

        Ok(Outputs {
            png: png_path,
            mcmeta: mcmeta_path,
            frame_count: total,
            width,
            height,
        })
    }
}

/// 记录本次创建的文件和目录，未提交就被丢弃时删除它们
#[derive(Debug, Default)]
struct OutputGuard {
    paths: Vec<PathBuf>,
    /// 本次新建的最外层目录
    created_dir: Option<PathBuf>,
    committed: bool,
}

impl OutputGuard {
    /// 创建输出目录，记下原本不存在的最外层目录
    fn create_dir_all(&mut self, dir: &Path) -> Result<()> {
        let created = dir
            .ancestors()
            .take_while(|ancestor| !ancestor.as_os_str().is_empty() && !ancestor.exists())
            .last()
            .map(Path::to_path_buf);
        fs::create_dir_all(dir)?;
        self.created_dir = created;
        Ok(())
    }

    /// 文件可能已经部分写入，所以失败时也要记录
    fn track<T>(&mut self, path: &Path, result: Result<T>) -> Result<T> {
        self.paths.push(path.to_path_buf());
        result
    }

    fn commit(&mut self) {
        self.committed = true;
    }
}

impl Drop for OutputGuard {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        for path in &self.paths {
            let _ = fs::remove_file(path);
        }
        if let Some(dir) = &self.created_dir {
            let _ = fs::remove_dir_all(dir);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_paths_use_output_id() {
        let options = Options::new("in.gif", "fire", "out");
        assert_eq!(options.png_path(), Path::new("out").join("fire.png"));
        assert_eq!(options.mcmeta_path(), Path::new("out").join("fire.png.mcmeta"));
    }

    #[test]
    fn output_id_is_validated() {
        assert!(Options::new("in.gif", "fire", "out").validate().is_ok());
        for id in ["", "a/b", "a\\b"] {
            let err = Options::new("in.gif", id, "out").validate().unwrap_err();
            assert!(matches!(err, Error::Usage(_)));
        }
    }

    #[test]
    fn guard_removes_uncommitted_files() {
        let dir = tempfile::tempdir().unwrap();
        let kept = dir.path().join("kept.png");
        let removed = dir.path().join("removed.png");

        {
            let mut guard = OutputGuard::default();
            guard.track(&kept, fs::write(&kept, b"x").map_err(Error::from)).unwrap();
            guard.commit();
        }
        {
            let mut guard = OutputGuard::default();
            guard
                .track(&removed, fs::write(&removed, b"x").map_err(Error::from))
                .unwrap();
        }

        assert!(kept.exists());
        assert!(!removed.exists());
    }

    #[test]
    fn guard_removes_directories_it_created() {
        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().join("existing");
        fs::create_dir(&existing).unwrap();
        let nested = existing.join("a").join("b");

        {
            let mut guard = OutputGuard::default();
            guard.create_dir_all(&nested).unwrap();
            assert!(nested.is_dir());
            let png = nested.join("tex.png");
            guard.track(&png, fs::write(&png, b"x").map_err(Error::from)).unwrap();
        }
        assert!(!existing.join("a").exists());
        assert!(existing.is_dir());

        {
            let mut guard = OutputGuard::default();
            guard.create_dir_all(&existing).unwrap();
        }
        assert!(existing.is_dir());

        {
            let mut guard = OutputGuard::default();
            guard.create_dir_all(&nested).unwrap();
            guard.commit();
        }
        assert!(nested.is_dir());
    }

    #[test]
    fn missing_input_touches_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let mut options = Options::new(dir.path().join("missing.gif"), "tex", &out);
        options.verbosity = Verbosity::Quiet;

        let err = Conversion::new(&options).run().unwrap_err();
        assert!(matches!(err, Error::InputNotFound(_)));
        assert_eq!(err.exit_code(), -1);
        assert!(!out.exists());
    }
}
