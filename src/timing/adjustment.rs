//! 手动校正与整体时间调整。

use tracing::{debug, warn};

use crate::{
    model::{LyricLine, lyric::CONFIDENCE_CONFIRMED},
    timing::types::{TimingCorrection, TimingCorrections, TimingError},
};

/// 整体调整后，一行至少保留的显示时长（秒）。
pub const MIN_LINE_DURATION_SECS: f64 = 0.01;

/// 将用户的手动校正合并到歌词行中。
///
/// 被校正的行使用新的边界（未提供的边界保持原值），置信度强制设为 1.0。
/// 超出范围的行号会被忽略并记录警告。所有校正先全部校验，
/// 只要有一条会产生无效时间轴，就不修改任何行。
///
/// 对同一组校正重复调用得到的结果相同。
///
/// # 返回
/// 实际应用的校正数量。
pub fn apply_corrections(
    lines: &mut [LyricLine],
    corrections: &TimingCorrections,
) -> Result<usize, TimingError> {
    let mut indices: Vec<usize> = corrections.keys().copied().collect();
    indices.sort_unstable();

    let mut resolved = Vec::with_capacity(indices.len());
    for index in indices {
        let Some(line) = lines.get(index) else {
            warn!(
                "[Adjustment] 忽略超出范围的校正：第 {} 行，共 {} 行",
                index,
                lines.len()
            );
            continue;
        };
        let (start_time, end_time) = resolve_bounds(index, line, &corrections[&index])?;
        resolved.push((index, start_time, end_time));
    }

    for &(index, start_time, end_time) in &resolved {
        let line = &mut lines[index];
        line.start_time = start_time;
        line.end_time = end_time;
        line.confidence = CONFIDENCE_CONFIRMED;
    }

    debug!("[Adjustment] 已应用 {} 条校正", resolved.len());
    Ok(resolved.len())
}

fn resolve_bounds(
    index: usize,
    line: &LyricLine,
    correction: &TimingCorrection,
) -> Result<(f64, f64), TimingError> {
    let start_time = correction.start_time.unwrap_or(line.start_time);
    let end_time = correction.end_time.unwrap_or(line.end_time);

    let invalid = |reason: String| TimingError::InvalidCorrection { index, reason };

    if !start_time.is_finite() || !end_time.is_finite() {
        return Err(invalid("时间必须为有限值".to_string()));
    }
    if start_time < 0.0 {
        return Err(invalid(format!("开始时间 {start_time} 不能为负")));
    }
    if start_time >= end_time {
        return Err(invalid(format!(
            "开始时间 {start_time} 必须早于结束时间 {end_time}"
        )));
    }
    Ok((start_time, end_time))
}

/// 对所有行应用 `t * speed + offset` 的线性变换。
///
/// 结果中的负时间被截断为 0，且结束时间至少比开始时间晚
/// [`MIN_LINE_DURATION_SECS`]。置信度保持不变。
///
/// # 参数
/// * `lines` - 要修改的歌词行。
/// * `offset_secs` - 偏移量（秒），正数表示延后，负数表示提前。
/// * `speed` - 速度倍率，必须为正数。
pub fn retime(lines: &mut [LyricLine], offset_secs: f64, speed: f64) -> Result<(), TimingError> {
    if !speed.is_finite() || speed <= 0.0 {
        return Err(TimingError::InvalidInput(format!(
            "速度倍率必须为正数，当前为 {speed}"
        )));
    }
    if !offset_secs.is_finite() {
        return Err(TimingError::InvalidInput("偏移量必须为有限值".to_string()));
    }
    if offset_secs == 0.0 && speed == 1.0 {
        return Ok(());
    }

    for line in lines.iter_mut() {
        let start_time = (line.start_time * speed + offset_secs).max(0.0);
        let end_time =
            (line.end_time * speed + offset_secs).max(start_time + MIN_LINE_DURATION_SECS);
        line.start_time = start_time;
        line.end_time = end_time;
    }
    Ok(())
}

/// 将所有行整体平移 `offset_secs` 秒。
pub fn shift(lines: &mut [LyricLine], offset_secs: f64) -> Result<(), TimingError> {
    retime(lines, offset_secs, 1.0)
}
