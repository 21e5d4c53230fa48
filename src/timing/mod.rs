//! 歌词时间轴估计核心模块
//!
//! 整个流程是一个纯函数：能量包络 → 人声区间 → 行分配，
//! 之后可以叠加用户的手动校正。

pub mod adjustment;
pub mod beats;
pub mod distribution;
pub mod envelope;
pub mod segmentation;
pub mod text;
pub mod types;

use rayon::prelude::*;
use tracing::info;

pub use types::{
    DistributionMode, ThresholdPolicy, TimingCorrection, TimingCorrections, TimingError, TimingJob,
    TimingOptions, TimingReport,
};

use crate::{
    model::{AudioBuffer, LyricLine},
    timing::text::preview_text,
};

// ==========================================================
//  顶级估计入口
// ==========================================================

/// 根据音频为歌词行估计时间轴。
///
/// # 参数
///
/// * `audio` - 已解码的单声道音频，分析期间只读借用。
/// * `lines` - 按顺序排列的歌词文本，每行都不能是空字符串。只含空白的行原样保留。
/// * `options` - 窗口、阈值、间隙与置信度配置。
///
/// # 返回
///
/// * `Result<TimingReport, TimingError>` - 成功时返回与 `lines` 等长、同序的歌词行
///   及检测过程的诊断信息。
pub fn estimate_timing(
    audio: &AudioBuffer<'_>,
    lines: &[String],
    options: &TimingOptions,
) -> Result<TimingReport, TimingError> {
    options.validate()?;
    validate_lines(lines)?;

    let frames = envelope::compute_energy_envelope(audio, options)?;
    let threshold = segmentation::resolve_threshold(&frames, options.threshold);
    let segments = segmentation::detect_vocal_segments(&frames, threshold, options);

    let duration_secs = audio.duration_secs();
    let (timed_lines, mode) =
        distribution::distribute_lines(lines, &segments, duration_secs, options)?;

    info!(
        "[Timing] 已为 {} 行歌词估计时间轴（{:?}），时长 {:.2} 秒，首行: \"{}\"",
        timed_lines.len(),
        mode,
        duration_secs,
        preview_text(&lines[0], 20)
    );

    Ok(TimingReport {
        lines: timed_lines,
        segments,
        threshold,
        mode,
        duration_secs,
    })
}

/// [`estimate_timing`] 的简化版本，只返回歌词行。
pub fn estimate_lines(
    samples: &[f32],
    sample_rate: u32,
    lines: &[String],
    options: &TimingOptions,
) -> Result<Vec<LyricLine>, TimingError> {
    estimate_timing(&AudioBuffer::new(samples, sample_rate), lines, options).map(|r| r.lines)
}

/// 并行处理多个互不相关的估计任务，结果顺序与输入一致。
pub fn estimate_batch(
    jobs: &[TimingJob],
    options: &TimingOptions,
) -> Vec<Result<TimingReport, TimingError>> {
    jobs.par_iter()
        .map(|job| {
            estimate_timing(
                &AudioBuffer::new(&job.samples, job.sample_rate),
                &job.lines,
                options,
            )
        })
        .collect()
}

fn validate_lines(lines: &[String]) -> Result<(), TimingError> {
    if lines.is_empty() {
        return Err(TimingError::InvalidInput("没有需要对齐的歌词行".to_string()));
    }
    if let Some(index) = lines.iter().position(|l| l.is_empty()) {
        return Err(TimingError::InvalidInput(format!("第 {index} 行歌词为空")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test_log::test]
    fn test_input_errors_are_reported_before_analysis() {
        let options = TimingOptions::default();
        let samples = vec![0.0_f32; 100];

        assert!(matches!(
            estimate_lines(&samples, 44100, &[], &options),
            Err(TimingError::InvalidInput(_))
        ));
        assert!(matches!(
            estimate_lines(&[], 44100, &texts(&["a"]), &options),
            Err(TimingError::InvalidInput(_))
        ));
        assert!(matches!(
            estimate_lines(&samples, 0, &texts(&["a"]), &options),
            Err(TimingError::InvalidInput(_))
        ));
        assert!(matches!(
            estimate_lines(&samples, 44100, &texts(&["a", ""]), &options),
            Err(TimingError::InvalidInput(_))
        ));
    }

    #[test_log::test]
    fn test_whitespace_line_is_timed_verbatim() {
        let samples = vec![0.0_f32; 44_100 * 3];
        let lines = texts(&["a", " ", "c"]);

        let timed = estimate_lines(&samples, 44_100, &lines, &TimingOptions::default()).unwrap();

        assert_eq!(timed.len(), 3);
        assert_eq!(timed[1].text, " ");
        assert_eq!(timed[1].start_time, 1.0);
        assert!(timed[1].end_time > timed[1].start_time);
    }

    #[test_log::test]
    fn test_batch_keeps_job_order() {
        let silence = TimingJob {
            samples: vec![0.0; 44100],
            sample_rate: 44100,
            lines: texts(&["a", "b"]),
        };
        let invalid = TimingJob {
            samples: Vec::new(),
            sample_rate: 44100,
            lines: texts(&["a"]),
        };

        let results = estimate_batch(
            &[silence.clone(), invalid, silence],
            &TimingOptions::default(),
        );

        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert_eq!(results[0], results[2]);
    }
}
