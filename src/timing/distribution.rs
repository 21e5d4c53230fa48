//! 将歌词行分配到人声区间上。

use tracing::{debug, warn};

use crate::{
    model::{EnergySegment, LyricLine},
    timing::types::{DistributionMode, TimingError, TimingOptions},
};

/// 将 `gap` 限制在槽位时长的一半以内，保证行尾始终晚于行首。
fn effective_gap(slot_secs: f64, gap: f64) -> f64 {
    gap.min(slot_secs * 0.5)
}

/// 将歌词行按顺序分配到时间轴上。
///
/// 没有人声区间时按总时长均分，使用低置信度；否则按顺序把
/// `ceil(N / 区间数)` 行分给同一个区间，并在区间内均分，使用中置信度。
///
/// # 参数
/// * `lines` - 歌词文本，顺序即输出顺序。
/// * `segments` - 检测到的人声区间，可以为空。
/// * `duration_secs` - 音频总时长。
/// * `options` - 间隙与置信度配置。
pub fn distribute_lines(
    lines: &[String],
    segments: &[EnergySegment],
    duration_secs: f64,
    options: &TimingOptions,
) -> Result<(Vec<LyricLine>, DistributionMode), TimingError> {
    if lines.is_empty() {
        return Err(TimingError::InvalidInput("没有需要对齐的歌词行".to_string()));
    }

    if segments.is_empty() {
        warn!("[Distribution] 未检测到人声区间，将按总时长均分 {} 行", lines.len());
        let result = distribute_evenly(lines, duration_secs, options)?;
        return Ok((result, DistributionMode::Even));
    }

    Ok((
        distribute_over_segments(lines, segments, options),
        DistributionMode::Segments,
    ))
}

/// 将所有行均匀分布在 `[0, duration_secs]` 上。
pub fn distribute_evenly(
    lines: &[String],
    duration_secs: f64,
    options: &TimingOptions,
) -> Result<Vec<LyricLine>, TimingError> {
    if !duration_secs.is_finite() || duration_secs <= 0.0 {
        return Err(TimingError::InvalidInput(format!(
            "总时长必须为正数，当前为 {duration_secs}"
        )));
    }

    let interval = duration_secs / lines.len() as f64;
    let gap = effective_gap(interval, options.even_gap_secs);

    Ok(lines
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let start_time = i as f64 * interval;
            LyricLine::new(
                text.clone(),
                start_time,
                (i + 1) as f64 * interval - gap,
                options.low_confidence,
            )
        })
        .collect())
}

/// 按人声区间分配歌词行，调用方须保证 `segments` 非空。
fn distribute_over_segments(
    lines: &[String],
    segments: &[EnergySegment],
    options: &TimingOptions,
) -> Vec<LyricLine> {
    let line_count = lines.len();
    let lines_per_segment = line_count.div_ceil(segments.len());
    let last_segment = segments.len() - 1;

    debug!(
        "[Distribution] {} 行分配到 {} 个区间，每个区间 {} 行",
        line_count,
        segments.len(),
        lines_per_segment
    );

    lines
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let group = i / lines_per_segment;
            let segment = &segments[group.min(last_segment)];

            // 溢出到最后一个区间的行会与该区间原有的行共享时长
            let group_start = group.min(last_segment) * lines_per_segment;
            let lines_in_segment = if group >= last_segment {
                line_count - last_segment * lines_per_segment
            } else {
                lines_per_segment.min(line_count - group_start)
            };
            let index_in_segment = i - group_start;

            let slot = segment.duration() / lines_in_segment as f64;
            let gap = effective_gap(slot, options.segment_gap_secs);
            let start_time = segment.start + index_in_segment as f64 * slot;
            let end_time = segment.start + (index_in_segment + 1) as f64 * slot - gap;

            LyricLine::new(text.clone(), start_time, end_time, options.medium_confidence)
        })
        .collect()
}
