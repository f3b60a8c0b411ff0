use crate::error::{Error, Result};
use std::fmt::{self, Write};

/// 一个刻（tick）的毫秒数，动画时间以 1/20 秒为单位
pub const TICK_MILLIS: f64 = 50.0;

/// 把毫秒换算成刻，向上取整
pub fn ticks(millis: u32) -> u32 {
    (f64::from(millis) / TICK_MILLIS).ceil() as u32
}

/// 帧列表中的一项
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FrameEntry {
    /// 使用默认帧时长
    Index(usize),
    /// 单独指定帧时长
    Timed { index: usize, time: u32 },
}

impl fmt::Display for FrameEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            FrameEntry::Index(index) => write!(f, "{}", index),
            FrameEntry::Timed { index, time } => {
                write!(f, r#"{{"index": {}, "time": {}}}"#, index, time)
            }
        }
    }
}

/// `.png.mcmeta` 动画描述
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AnimationMetadata {
    pub width: u32,
    pub height: u32,
    pub interpolate: bool,
    /// 默认帧时长，由第一帧决定
    pub frametime: u32,
    pub frames: Vec<FrameEntry>,
}

impl AnimationMetadata {
    /// 根据每帧的毫秒时长生成动画描述
    ///
    /// 默认帧时长取第一帧，和它不同的帧写成 `{index, time}`，其余只写序号。
    pub fn from_durations(
        durations: &[u32],
        width: u32,
        height: u32,
        interpolate: bool,
    ) -> Result<AnimationMetadata> {
        let first = durations.first().ok_or(Error::NoFrames)?;
        let frametime = ticks(*first);

        let frames = durations
            .iter()
            .enumerate()
            .map(|(index, &millis)| {
                let time = ticks(millis);
                if time != frametime {
                    FrameEntry::Timed { index, time }
                } else {
                    FrameEntry::Index(index)
                }
            })
            .collect();

        Ok(AnimationMetadata {
            width,
            height,
            interpolate,
            frametime,
            frames,
        })
    }

    /// 生成 `.png.mcmeta` 文本
    pub fn to_mcmeta(&self, texture_id: &str) -> String {
        let comment = format!(
            "Generated texture.png and texture.png.mcmeta from gif using png_stuff by gamma_02. Texture ID: {}",
            texture_id
        );
        // serde_json 负责转义
        let comment = serde_json::Value::String(comment).to_string();

        let frames = self
            .frames
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");

        let mut out = String::new();
        self.write_mcmeta(&mut out, &comment, &frames)
            .expect("writing to a String cannot fail");
        out
    }

    fn write_mcmeta(&self, out: &mut impl Write, comment: &str, frames: &str) -> fmt::Result {
        writeln!(out, "{{")?;
        writeln!(out, "\t\"__comment\": {},", comment)?;
        writeln!(out, "\t\"animation\": {{")?;
        if self.interpolate {
            writeln!(out, "\t\t\"interpolate\": true,")?;
        }
        writeln!(out, "\t\t\"width\": {},", self.width)?;
        writeln!(out, "\t\t\"height\": {},", self.height)?;
        writeln!(out, "\t\t\"frametime\": {},", self.frametime)?;
        writeln!(out, "\t\t\"frames\": [{}]", frames)?;
        writeln!(out, "\t}}")?;
        writeln!(out, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn ticks_round_up() {
        assert_eq!(ticks(0), 0);
        assert_eq!(ticks(1), 1);
        assert_eq!(ticks(50), 1);
        assert_eq!(ticks(51), 2);
        assert_eq!(ticks(100), 2);
        assert_eq!(ticks(200), 4);
    }

    #[test]
    fn uniform_durations_use_bare_indices() {
        let meta = AnimationMetadata::from_durations(&[70; 4], 16, 16, false).unwrap();
        assert_eq!(meta.frametime, 2);
        assert_eq!(
            meta.frames,
            (0..4).map(FrameEntry::Index).collect::<Vec<_>>()
        );
    }

    #[test]
    fn differing_frame_gets_override() {
        let meta = AnimationMetadata::from_durations(&[100, 100, 200], 8, 4, false).unwrap();
        assert_eq!(meta.frametime, 2);
        assert_eq!(
            meta.frames,
            vec![
                FrameEntry::Index(0),
                FrameEntry::Index(1),
                FrameEntry::Timed { index: 2, time: 4 },
            ]
        );

        let text = meta.to_mcmeta("tex");
        assert!(text.contains("\t\t\"frames\": [0, 1, {\"index\": 2, \"time\": 4}]\n"));
    }

    #[test]
    fn default_comes_from_first_frame_only() {
        let meta = AnimationMetadata::from_durations(&[200, 100, 100], 1, 1, false).unwrap();
        assert_eq!(meta.frametime, 4);
        assert_eq!(
            meta.frames,
            vec![
                FrameEntry::Index(0),
                FrameEntry::Timed { index: 1, time: 2 },
                FrameEntry::Timed { index: 2, time: 2 },
            ]
        );
    }

    #[test]
    fn single_frame() {
        let meta = AnimationMetadata::from_durations(&[30], 1, 1, false).unwrap();
        assert_eq!(meta.frames, vec![FrameEntry::Index(0)]);
        assert!(meta.to_mcmeta("one").contains("\"frames\": [0]\n"));
    }

    #[test]
    fn empty_durations_fail() {
        assert!(matches!(
            AnimationMetadata::from_durations(&[], 1, 1, false),
            Err(Error::NoFrames)
        ));
    }

    #[test]
    fn mcmeta_layout() {
        let meta = AnimationMetadata::from_durations(&[100, 150], 32, 16, false).unwrap();
        let expected = "{\n\
\t\"__comment\": \"Generated texture.png and texture.png.mcmeta from gif using png_stuff by gamma_02. Texture ID: fire\",\n\
\t\"animation\": {\n\
\t\t\"width\": 32,\n\
\t\t\"height\": 16,\n\
\t\t\"frametime\": 2,\n\
\t\t\"frames\": [0, {\"index\": 1, \"time\": 3}]\n\
\t}\n\
}\n";
        assert_eq!(meta.to_mcmeta("fire"), expected);
    }

    #[test]
    fn interpolate_adds_exactly_one_line() {
        let plain = AnimationMetadata::from_durations(&[100, 100], 4, 4, false).unwrap();
        let interp = AnimationMetadata::from_durations(&[100, 100], 4, 4, true).unwrap();

        let plain = plain.to_mcmeta("x");
        let interp = interp.to_mcmeta("x");
        let removed = interp.replace("\t\t\"interpolate\": true,\n", "");
        assert_ne!(plain, interp);
        assert_eq!(plain, removed);
    }

    #[test]
    fn output_is_valid_json() {
        let meta = AnimationMetadata::from_durations(&[100, 40, 100], 2, 3, true).unwrap();
        let value: Value = serde_json::from_str(&meta.to_mcmeta("a \"quoted\" id")).unwrap();

        assert_eq!(
            value["animation"],
            json!({
                "interpolate": true,
                "width": 2,
                "height": 3,
                "frametime": 2,
                "frames": [0, {"index": 1, "time": 1}, 2]
            })
        );
        assert!(value["__comment"]
            .as_str()
            .unwrap()
            .ends_with("Texture ID: a \"quoted\" id"));
    }
}
