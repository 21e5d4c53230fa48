//! 短时能量包络提取。

use tracing::debug;

use crate::{
    model::{AudioBuffer, EnergyFrame},
    timing::types::{TimingError, TimingOptions},
};

/// 计算音频的短时能量包络。
///
/// 将样本切分为互不重叠的窗口，每个窗口的能量为其平均绝对振幅。
/// 最后一个不完整的窗口按实际样本数求平均，不做填充。
///
/// # 参数
/// * `audio` - 待分析的单声道音频。
/// * `options` - 时间轴选项，这里只用到窗口长度。
///
/// # 返回
/// 按时间递增排列的能量帧，长度为 `ceil(样本数 / 窗口样本数)`。
pub fn compute_energy_envelope(
    audio: &AudioBuffer<'_>,
    options: &TimingOptions,
) -> Result<Vec<EnergyFrame>, TimingError> {
    if audio.sample_rate == 0 {
        return Err(TimingError::InvalidInput("采样率必须大于 0".to_string()));
    }
    if audio.samples.is_empty() {
        return Err(TimingError::InvalidInput("没有可供分析的音频样本".to_string()));
    }

    let window_size = options.window_size_samples(audio.sample_rate);
    let window_secs = window_size as f64 / f64::from(audio.sample_rate);

    let frames: Vec<EnergyFrame> = audio
        .samples
        .chunks(window_size)
        .enumerate()
        .map(|(index, window)| {
            let sum: f64 = window.iter().map(|s| f64::from(s.abs())).sum();
            EnergyFrame {
                timestamp: index as f64 * window_secs,
                energy: sum / window.len() as f64,
            }
        })
        .collect();

    debug!(
        "[Envelope] 样本数 {}，窗口 {} 样本，共 {} 帧",
        audio.samples.len(),
        window_size,
        frames.len()
    );

    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_count_and_timestamps() {
        let samples = vec![0.5_f32; 10_500];
        let audio = AudioBuffer::new(&samples, 10_000);
        let frames = compute_energy_envelope(&audio, &TimingOptions::default()).unwrap();

        // 每帧 1000 个样本，10500 个样本向上取整为 11 帧
        assert_eq!(frames.len(), 11);
        assert_eq!(frames[0].timestamp, 0.0);
        assert!((frames[10].timestamp - 1.0).abs() < 1e-9);
        assert!(frames.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[test]
    fn test_partial_window_uses_true_sample_count() {
        let mut samples = vec![0.0_f32; 1000];
        samples.extend([0.8_f32, -0.8, 0.8, -0.8]);
        let audio = AudioBuffer::new(&samples, 10_000);
        let frames = compute_energy_envelope(&audio, &TimingOptions::default()).unwrap();

        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].energy, 0.0);
        assert!((frames[1].energy - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_energy_is_mean_absolute_amplitude() {
        let samples: Vec<f32> = [0.25_f32, -0.75].repeat(500);
        let audio = AudioBuffer::new(&samples, 10_000);
        let frames = compute_energy_envelope(&audio, &TimingOptions::default()).unwrap();

        assert_eq!(frames.len(), 1);
        assert!((frames[0].energy - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_empty_samples_and_zero_rate() {
        let options = TimingOptions::default();
        assert!(matches!(
            compute_energy_envelope(&AudioBuffer::new(&[], 44100), &options),
            Err(TimingError::InvalidInput(_))
        ));
        assert!(matches!(
            compute_energy_envelope(&AudioBuffer::new(&[0.1], 0), &options),
            Err(TimingError::InvalidInput(_))
        ));
    }
}
