//! # LRC 格式解析器
//!
//! 把已有的逐行 LRC 歌词导入为带时间轴的歌词行。
//! 元数据标签会被跳过，同一时间戳下的后续行视为翻译并丢弃。

use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::{
    converter::{types::ConvertError, utils::ms_to_secs},
    model::{LyricLine, lyric::CONFIDENCE_CONFIRMED},
    timing::text::normalize_text_whitespace,
};

/// 最后一行没有后续行可参照时使用的默认时长（毫秒）。
const LAST_LINE_DURATION_MS: u64 = 10_000;

/// 用于匹配一个完整的 LRC 歌词行，捕获时间戳部分和文本部分
static LRC_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^((?:\[\d{2,}:\d{2}[.:]\d{2,3}\])+)(.*)$").expect("未能编译 LRC_LINE_REGEX")
});

/// 用于从一个时间戳组中提取出单个时间戳
static LRC_TIMESTAMP_EXTRACT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(\d{2,}):(\d{2})[.:](\d{2,3})\]").expect("未能编译 LRC_TIMESTAMP_EXTRACT_REGEX")
});

/// 用于匹配 [key:value] 格式的元数据标签
static LRC_METADATA_TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[([a-zA-Z_][a-zA-Z0-9_]*):(.*?)\]$").expect("未能编译 LRC_METADATA_TAG_REGEX")
});

struct TimedEntry {
    timestamp_ms: u64,
    text: String,
}

fn parse_timestamp(caps: &regex::Captures<'_>, line_num: usize) -> Result<u64, ConvertError> {
    let raw = caps.get(0).map_or("", |m| m.as_str());
    let invalid = || ConvertError::InvalidTime(format!("第 {line_num} 行的时间戳 '{raw}'"));

    let minutes = caps
        .get(1)
        .map_or("", |m| m.as_str())
        .parse::<u64>()
        .map_err(|_| invalid())?;
    let seconds = caps
        .get(2)
        .map_or("", |m| m.as_str())
        .parse::<u64>()
        .map_err(|_| invalid())?;
    let fraction_str = caps.get(3).map_or("", |m| m.as_str());
    let fraction = fraction_str.parse::<u64>().map_err(|_| invalid())?;
    let milliseconds = if fraction_str.len() == 2 {
        fraction * 10
    } else {
        fraction
    };

    if seconds >= 60 {
        return Err(invalid());
    }
    minutes
        .checked_mul(60_000)
        .and_then(|ms| ms.checked_add(seconds * 1000 + milliseconds))
        .ok_or_else(invalid)
}

/// 解析 LRC 格式内容为歌词行列表。
///
/// 行按时间排序。每行的结束时间为下一行的开始时间，最后一行显示 10 秒。
/// 导入的时间由人工制作，置信度为 1.0。
///
/// 无法识别的行和无效的时间戳会被跳过并记录警告；
/// 如果整份内容中没有任何带时间的歌词，则返回 `InvalidLyricFormat`。
pub fn parse_lrc(content: &str) -> Result<Vec<LyricLine>, ConvertError> {
    let mut entries: Vec<TimedEntry> = Vec::new();

    for (line_num_zero_based, line_str_raw) in content.lines().enumerate() {
        let line_num = line_num_zero_based + 1;
        let line_str = line_str_raw.trim();

        if line_str.is_empty() {
            continue;
        }

        if LRC_METADATA_TAG_REGEX.is_match(line_str) {
            debug!("[LrcParser] 跳过第 {line_num} 行的元数据标签");
            continue;
        }

        let Some(line_caps) = LRC_LINE_REGEX.captures(line_str) else {
            warn!("[LrcParser] 第 {line_num} 行无法识别: '{line_str}'");
            continue;
        };

        let all_timestamps = line_caps.get(1).map_or("", |m| m.as_str());
        let text = normalize_text_whitespace(line_caps.get(2).map_or("", |m| m.as_str()));

        for ts_caps in LRC_TIMESTAMP_EXTRACT_REGEX.captures_iter(all_timestamps) {
            match parse_timestamp(&ts_caps, line_num) {
                Ok(timestamp_ms) => entries.push(TimedEntry {
                    timestamp_ms,
                    text: text.clone(),
                }),
                Err(e) => warn!("[LrcParser] {e}"),
            }
        }
    }

    // 稳定排序：同一时间戳下带文本的行在前，原文在翻译之前
    entries.sort_by_key(|e| (e.timestamp_ms, e.text.is_empty()));
    entries.dedup_by_key(|e| e.timestamp_ms);
    let starts: Vec<u64> = entries.iter().map(|e| e.timestamp_ms).collect();

    let lines: Vec<LyricLine> = entries
        .iter()
        .enumerate()
        // 纯时间戳行只是上一行的结束标记
        .filter(|(_, e)| !e.text.is_empty())
        .map(|(i, e)| {
            let end_ms = starts
                .get(i + 1)
                .copied()
                .unwrap_or(e.timestamp_ms.saturating_add(LAST_LINE_DURATION_MS))
                .max(e.timestamp_ms.saturating_add(1));
            LyricLine::new(
                e.text.clone(),
                ms_to_secs(e.timestamp_ms),
                ms_to_secs(end_ms),
                CONFIDENCE_CONFIRMED,
            )
        })
        .collect();

    if lines.is_empty() {
        return Err(ConvertError::InvalidLyricFormat(
            "没有找到带时间戳的歌词行".to_string(),
        ));
    }

    debug!("[LrcParser] 已导入 {} 行歌词", lines.len());
    Ok(lines)
}
