//! 歌词工程文件 (`lyrics-data.json`) 的读写与整理。

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    error::{LyricsTimerError, Result},
    model::{
        LyricLine, StyleSettings,
        lyric::{CONFIDENCE_CONFIRMED, CONFIDENCE_LOW},
        style::TextPosition,
    },
    timing::text::preview_text,
};

/// 视频合成默认使用的帧率。
pub const DEFAULT_FPS: u32 = 30;
/// 补全缺失时间时，与上一行之间留出的间隔（秒）。
pub const FILL_GAP_SECS: f64 = 0.1;
/// 补全缺失结束时间时使用的默认显示时长（秒）。
pub const FILL_DURATION_SECS: f64 = 3.0;

/// 一个完整的歌词工程：带时间轴的歌词行加字幕样式。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LyricsProject {
    /// 歌词行
    #[serde(default)]
    pub lyrics: Vec<LyricLine>,
    /// 字幕样式
    #[serde(default)]
    pub style: StyleSettings,
}

/// 从 JSON 文件读取工程。未知字段会被忽略。
pub fn load_project(path: &Path) -> Result<LyricsProject> {
    let content = fs::read_to_string(path)?;
    let project: LyricsProject = serde_json::from_str(&content)?;
    info!("已从 {:?} 读取 {} 行歌词。", path, project.lyrics.len());
    Ok(project)
}

/// 将工程以格式化 JSON 写入文件。
pub fn save_project(path: &Path, project: &LyricsProject) -> Result<()> {
    let content = serde_json::to_string_pretty(project)?;
    fs::write(path, content)?;
    info!("已将 {} 行歌词保存到 {:?}。", project.lyrics.len(), path);
    Ok(())
}

fn round_millis(secs: f64) -> f64 {
    (secs * 1000.0).round() / 1000.0
}

/// 按总时长均分歌词行，生成一个新的工程。
///
/// 每行的时长为 `duration_secs / N`，时间保留三位小数，视为用户指定的时间轴。
/// 提供 `existing_style` 时沿用已有样式。
pub fn generate_even_project(
    lines: &[String],
    duration_secs: f64,
    existing_style: Option<StyleSettings>,
) -> Result<LyricsProject> {
    if lines.is_empty() {
        return Err(LyricsTimerError::InvalidInput("歌词为空".to_string()));
    }
    if !duration_secs.is_finite() || duration_secs <= 0.0 {
        return Err(LyricsTimerError::InvalidInput(format!(
            "音频时长必须为正数，当前为 {duration_secs}"
        )));
    }

    let per_line = duration_secs / lines.len() as f64;
    let lyrics = lines
        .iter()
        .enumerate()
        .map(|(i, text)| {
            LyricLine::new(
                text.trim(),
                round_millis(i as f64 * per_line),
                round_millis((i + 1) as f64 * per_line),
                CONFIDENCE_CONFIRMED,
            )
        })
        .collect();

    info!(
        "已生成 {} 行歌词，每行约 {:.1} 秒。",
        lines.len(),
        per_line
    );

    Ok(LyricsProject {
        lyrics,
        style: existing_style.unwrap_or_default(),
    })
}

/// 为开始时间缺失（为 0）的行补全时间。
///
/// 第一行保持不变；之后开始时间为 0 的行从上一行结束后 0.1 秒开始，
/// 若结束时间缺失或不晚于开始时间，则显示 3 秒。补全的行使用低置信度。
///
/// # 返回
/// 被补全的行数。
pub fn fill_unset_timings(project: &mut LyricsProject) -> usize {
    let mut last_end_time = 0.0;
    let mut filled = 0;

    for (index, line) in project.lyrics.iter_mut().enumerate() {
        if index > 0 && line.start_time == 0.0 {
            line.start_time = last_end_time + FILL_GAP_SECS;
            if line.end_time <= line.start_time {
                line.end_time = line.start_time + FILL_DURATION_SECS;
            }
            line.confidence = CONFIDENCE_LOW;
            filled += 1;
            info!(
                "第 {} 行 \"{}\" 的开始时间已设为 {:.2} 秒",
                index + 1,
                preview_text(&line.text, 20),
                line.start_time
            );
        }
        last_end_time = line.end_time;
    }

    filled
}

/// 修正位于底部但偏移过大的字幕位置。
///
/// # 返回
/// 是否做了修改。
pub fn normalize_style_offset(style: &mut StyleSettings) -> bool {
    if style.position == TextPosition::Bottom && style.y_offset < -200.0 {
        warn!("Y 偏移 {}px 过大，已调整为 -80px", style.y_offset);
        style.y_offset = -80.0;
        return true;
    }
    false
}

/// 计算给定时长在指定帧率下需要的帧数（向上取整）。
#[must_use]
pub fn frames_for_duration(duration_secs: f64, fps: u32) -> u64 {
    if !duration_secs.is_finite() || duration_secs <= 0.0 {
        return 0;
    }
    (duration_secs * f64::from(fps)).ceil() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_generate_even_project_rounds_to_millis() {
        let project = generate_even_project(&texts(&["a", "b", "c"]), 10.0, None).unwrap();

        assert_eq!(project.lyrics[0].start_time, 0.0);
        assert_eq!(project.lyrics[0].end_time, 3.333);
        assert_eq!(project.lyrics[1].start_time, 3.333);
        assert_eq!(project.lyrics[2].end_time, 10.0);
        assert!(project.lyrics.iter().all(LyricLine::is_confirmed));
        assert_eq!(project.style, StyleSettings::default());
    }

    #[test]
    fn test_generate_keeps_existing_style() {
        let style = StyleSettings {
            font_size: 72,
            ..Default::default()
        };
        let project = generate_even_project(&texts(&["a"]), 5.0, Some(style.clone())).unwrap();
        assert_eq!(project.style, style);
        assert!(generate_even_project(&[], 5.0, None).is_err());
        assert!(generate_even_project(&texts(&["a"]), 0.0, None).is_err());
    }

    #[test]
    fn test_fill_unset_timings() {
        let mut project = LyricsProject {
            lyrics: vec![
                LyricLine::new("a", 1.0, 4.0, 1.0),
                LyricLine::new("b", 0.0, 0.0, 0.0),
                LyricLine::new("c", 0.0, 9.0, 0.0),
                LyricLine::new("d", 12.0, 14.0, 1.0),
            ],
            style: StyleSettings::default(),
        };

        let filled = fill_unset_timings(&mut project);

        assert_eq!(filled, 2);
        assert!((project.lyrics[1].start_time - 4.1).abs() < 1e-9);
        assert!((project.lyrics[1].end_time - 7.1).abs() < 1e-9);
        assert!((project.lyrics[2].start_time - 7.2).abs() < 1e-9);
        assert_eq!(project.lyrics[2].end_time, 9.0);
        assert_eq!(project.lyrics[1].confidence, CONFIDENCE_LOW);
        assert_eq!(project.lyrics[3].start_time, 12.0);
    }

    #[test]
    fn test_normalize_style_offset() {
        let mut style = StyleSettings {
            y_offset: -300.0,
            ..Default::default()
        };
        assert!(normalize_style_offset(&mut style));
        assert_eq!(style.y_offset, -80.0);
        assert!(!normalize_style_offset(&mut style));
    }

    #[test]
    fn test_frames_for_duration() {
        assert_eq!(frames_for_duration(180.0, DEFAULT_FPS), 5400);
        assert_eq!(frames_for_duration(1.01, DEFAULT_FPS), 31);
        assert_eq!(frames_for_duration(0.0, DEFAULT_FPS), 0);
    }
}
