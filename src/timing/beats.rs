//! 简易节拍检测，以及把歌词行吸附到节拍上。

use tracing::debug;

use crate::{
    model::{EnergyFrame, LyricLine},
    timing::{segmentation::percentile_threshold, types::ThresholdPolicy},
};

/// 从能量包络中检测节拍。
///
/// 对相邻帧的能量差做峰值检测：差值需要超过阈值，并且大于左右两侧的差值。
/// 节拍时间取能量上升后的那一帧。
///
/// 动态策略对正差值套用与人声检测相同的百分位规则；固定策略的值直接作为能量差的阈值。
///
/// # 返回
/// 按时间递增排列的节拍时间点（秒）。
pub fn detect_beats(frames: &[EnergyFrame], policy: ThresholdPolicy) -> Vec<f64> {
    if frames.len() < 3 {
        return Vec::new();
    }

    let diffs: Vec<f64> = frames.windows(2).map(|w| w[1].energy - w[0].energy).collect();

    let rising: Vec<f64> = diffs.iter().copied().filter(|d| *d > 0.0).collect();
    if rising.is_empty() {
        return Vec::new();
    }
    let threshold = match policy {
        // 作用于差值，而不是能量本身
        ThresholdPolicy::Fixed(value) => value,
        ThresholdPolicy::Dynamic {
            percentile,
            multiplier,
        } => percentile_threshold(&rising, percentile, multiplier),
    };

    let beats: Vec<f64> = (1..diffs.len().saturating_sub(1))
        .filter(|&i| diffs[i] > threshold && diffs[i] > diffs[i - 1] && diffs[i] > diffs[i + 1])
        .map(|i| frames[i + 1].timestamp)
        .collect();

    debug!("[Beats] 阈值 {:.6}，检测到 {} 个节拍", threshold, beats.len());
    beats
}

/// 将未确认的行吸附到离其开始时间最近的节拍上，结束时间随之平移。
///
/// 已由用户确认的行保持不变。没有节拍时不做任何修改。
///
/// # 返回
/// 被移动的行数。
pub fn snap_to_beats(lines: &mut [LyricLine], beats: &[f64]) -> usize {
    if beats.is_empty() {
        return 0;
    }

    let mut snapped = 0;
    for line in lines.iter_mut().filter(|l| !l.is_confirmed()) {
        let Some(&beat) = beats
            .iter()
            .min_by(|a, b| (*a - line.start_time).abs().total_cmp(&(*b - line.start_time).abs()))
        else {
            continue;
        };

        let offset = beat - line.start_time;
        if offset != 0.0 {
            line.start_time = beat;
            line.end_time += offset;
            snapped += 1;
        }
    }
    snapped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::lyric::{CONFIDENCE_CONFIRMED, CONFIDENCE_MEDIUM};

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
    fn test_detects_energy_attacks() {
        // 底噪带有轻微起伏，三处明显的能量上升
        let mut energies: Vec<f64> = (0..30).map(|i| 0.1 + 0.01 * f64::from(i % 2)).collect();
        energies[5] = 0.9;
        energies[15] = 0.8;
        energies[25] = 1.0;
        let beats = detect_beats(&frames_from(&energies), ThresholdPolicy::default());

        assert_eq!(beats.len(), 3);
        assert!((beats[0] - 0.5).abs() < 1e-9);
        assert!((beats[1] - 1.5).abs() < 1e-9);
        assert!((beats[2] - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_fixed_threshold_applies_to_rises() {
        // 能量从 0.5 升到 0.8，差值 0.3 低于固定阈值 0.4
        let frames = frames_from(&[0.5, 0.5, 0.8, 0.8, 0.8, 1.0, 1.0, 1.0]);
        assert!(detect_beats(&frames, ThresholdPolicy::Fixed(0.4)).is_empty());

        let beats = detect_beats(&frames, ThresholdPolicy::Fixed(0.25));
        assert_eq!(beats.len(), 1);
        assert!((beats[0] - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_flat_envelope_has_no_beats() {
        assert!(detect_beats(&frames_from(&[0.2; 10]), ThresholdPolicy::default()).is_empty());
        assert!(detect_beats(&frames_from(&[0.2, 0.3]), ThresholdPolicy::default()).is_empty());
    }

    #[test]
    fn test_snap_moves_estimated_lines_only() {
        let mut lines = vec![
            LyricLine::new("a", 0.9, 2.0, CONFIDENCE_MEDIUM),
            LyricLine::new("b", 2.9, 4.0, CONFIDENCE_CONFIRMED),
            LyricLine::new("c", 4.2, 5.0, CONFIDENCE_MEDIUM),
        ];
        let beats = [1.0, 3.0, 4.0];

        let snapped = snap_to_beats(&mut lines, &beats);

        assert_eq!(snapped, 2);
        assert_eq!(lines[0].start_time, 1.0);
        assert!((lines[0].end_time - 2.1).abs() < 1e-9);
        assert_eq!(lines[1].start_time, 2.9);
        assert_eq!(lines[2].start_time, 4.0);
        assert!((lines[2].end_time - 4.8).abs() < 1e-9);
    }

    #[test]
    fn test_snap_without_beats_is_noop() {
        let mut lines = vec![LyricLine::new("a", 0.9, 2.0, CONFIDENCE_MEDIUM)];
        assert_eq!(snap_to_beats(&mut lines, &[]), 0);
        assert_eq!(lines[0].start_time, 0.9);
    }
}
