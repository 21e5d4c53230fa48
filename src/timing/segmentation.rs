//! 基于能量阈值的人声区间检测。

use tracing::debug;

use crate::{
    model::{EnergyFrame, EnergySegment},
    timing::types::{ThresholdPolicy, TimingOptions},
};

/// 取升序排列后位于 `percentile` 处的值并乘以 `multiplier`。
///
/// 每次都基于当前输入重新计算，不依赖任何全局校准状态。
/// 空输入返回 0。
pub fn percentile_threshold(values: &[f64], percentile: f64, multiplier: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let index = ((sorted.len() as f64 * percentile).floor() as usize).min(sorted.len() - 1);
    sorted[index] * multiplier
}

/// 按给定策略求出能量阈值。
pub fn resolve_threshold(frames: &[EnergyFrame], policy: ThresholdPolicy) -> f64 {
    match policy {
        ThresholdPolicy::Fixed(value) => value,
        ThresholdPolicy::Dynamic {
            percentile,
            multiplier,
        } => {
            let energies: Vec<f64> = frames.iter().map(|f| f.energy).collect();
            percentile_threshold(&energies, percentile, multiplier)
        }
    }
}

/// 将能量包络切分为人声区间。
///
/// 单次前向扫描：能量超过阈值时开始一个区间；处于区间内时若能量回落到阈值及以下，
/// 查看从当前帧开始的 `lookahead_frames` 帧，只有其中至少 `min_silent_frames`
/// 帧也处于静音时才在当前时间点结束区间，以过滤乐句中的短暂停顿。
/// 扫描结束时仍处于区间内，则在最后一帧的时间点结束。
///
/// 时长为零的区间会被丢弃，保证每个区间都可以分到正的时长。
pub fn detect_vocal_segments(
    frames: &[EnergyFrame],
    threshold: f64,
    options: &TimingOptions,
) -> Vec<EnergySegment> {
    let mut segments = Vec::new();
    let mut in_speech = false;
    let mut start = 0.0;

    for (i, frame) in frames.iter().enumerate() {
        if !in_speech {
            if frame.energy > threshold {
                start = frame.timestamp;
                in_speech = true;
            }
            continue;
        }

        if frame.energy <= threshold {
            let silent_count = frames
                .iter()
                .skip(i)
                .take(options.lookahead_frames)
                .filter(|f| f.energy <= threshold)
                .count();

            if silent_count >= options.min_silent_frames {
                push_segment(&mut segments, start, frame.timestamp);
                in_speech = false;
            }
        }
    }

    if in_speech && let Some(last) = frames.last() {
        push_segment(&mut segments, start, last.timestamp);
    }

    debug!(
        "[Segmentation] 阈值 {:.6}，检测到 {} 个人声区间",
        threshold,
        segments.len()
    );

    segments
}

fn push_segment(segments: &mut Vec<EnergySegment>, start: f64, end: f64) {
    if end > start {
        segments.push(EnergySegment { start, end });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames_from(energies: &[f64]) -> Vec<EnergyFrame> {
        energies
            .iter()
            .enumerate()
            .map(|(i, &energy)| EnergyFrame {
                timestamp: i as f64 * 0.1,
                energy,
            })
            .collect()
    }

    #[test]
    fn test_percentile_threshold() {
        let values: Vec<f64> = (0..10).map(f64::from).collect();
        // floor(10 * 0.3) = 3，对应值 3.0
        assert_eq!(percentile_threshold(&values, 0.3, 1.5), 4.5);
        assert_eq!(percentile_threshold(&values, 1.0, 1.0), 9.0);
        assert_eq!(percentile_threshold(&[], 0.3, 1.5), 0.0);
    }

    #[test]
    fn test_threshold_is_recomputed_per_input() {
        let quiet = frames_from(&[0.01, 0.02, 0.03, 0.04]);
        let loud = frames_from(&[0.1, 0.2, 0.3, 0.4]);
        let policy = ThresholdPolicy::default();
        assert!(resolve_threshold(&quiet, policy) < resolve_threshold(&loud, policy));
        assert_eq!(resolve_threshold(&quiet, ThresholdPolicy::Fixed(0.02)), 0.02);
    }

    #[test]
    fn test_brief_dip_does_not_split_segment() {
        // 第 4 帧的短暂回落之后能量立刻恢复，前瞻窗口内只有 1 个静音帧
        let frames = frames_from(&[
            0.0, 1.0, 1.0, 1.0, 0.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0,
        ]);
        let segments = detect_vocal_segments(&frames, 0.5, &TimingOptions::default());

        assert_eq!(segments.len(), 1);
        assert!((segments[0].start - 0.1).abs() < 1e-9);
        assert!((segments[0].end - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_two_silent_frames_in_lookahead_keep_segment_open() {
        // 第 3 帧起的 5 帧窗口为 [0, 0, 1, 1, 1]，只有 2 个静音帧
        let frames = frames_from(&[
            0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0,
        ]);
        let segments = detect_vocal_segments(&frames, 0.5, &TimingOptions::default());

        assert_eq!(segments.len(), 1);
        assert!((segments[0].start - 0.1).abs() < 1e-9);
        assert!((segments[0].end - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_three_silent_frames_in_lookahead_end_segment() {
        // 第 3 帧起的 5 帧窗口为 [0, 0, 1, 0, 1]，正好 3 个静音帧
        let frames = frames_from(&[
            0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0,
        ]);
        let segments = detect_vocal_segments(&frames, 0.5, &TimingOptions::default());

        assert_eq!(segments.len(), 2);
        assert!((segments[0].start - 0.1).abs() < 1e-9);
        assert!((segments[0].end - 0.3).abs() < 1e-9);
        assert!((segments[1].start - 0.5).abs() < 1e-9);
        assert!((segments[1].end - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_two_separated_bursts() {
        let frames = frames_from(&[
            0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0,
        ]);
        let segments = detect_vocal_segments(&frames, 0.5, &TimingOptions::default());

        assert_eq!(segments.len(), 2);
        assert!(segments[0].end <= segments[1].start);
    }

    #[test]
    fn test_open_segment_is_closed_at_last_timestamp() {
        let frames = frames_from(&[0.0, 0.0, 1.0, 1.0, 1.0]);
        let segments = detect_vocal_segments(&frames, 0.5, &TimingOptions::default());

        assert_eq!(segments.len(), 1);
        assert!((segments[0].end - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_silence_yields_no_segments() {
        let frames = frames_from(&[0.0; 20]);
        let threshold = resolve_threshold(&frames, ThresholdPolicy::default());
        assert!(detect_vocal_segments(&frames, threshold, &TimingOptions::default()).is_empty());
    }

    #[test]
    fn test_zero_length_tail_segment_is_dropped() {
        let frames = frames_from(&[0.0, 0.0, 0.0, 1.0]);
        assert!(detect_vocal_segments(&frames, 0.5, &TimingOptions::default()).is_empty());
    }
}
