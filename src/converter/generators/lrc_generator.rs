//! LRC 格式生成器

use std::fmt::Write as FmtWrite;

use crate::{
    converter::{
        types::{ConvertError, LrcEndTimeOutputMode, LrcGenerationOptions},
        utils::secs_to_ms,
    },
    model::LyricLine,
};

/// LRC 生成的主入口函数。
pub fn generate_lrc(
    lines: &[LyricLine],
    options: &LrcGenerationOptions,
) -> Result<String, ConvertError> {
    let mut lrc_output = String::with_capacity(lines.len() * 50);

    if let Some(title) = &options.title {
        writeln!(lrc_output, "[ti:{}]", title.trim())?;
    }
    if let Some(artist) = &options.artist {
        writeln!(lrc_output, "[ar:{}]", artist.trim())?;
    }

    for (i, line) in lines.iter().enumerate() {
        let start_ms = secs_to_ms(line.start_time)?;
        let end_ms = secs_to_ms(line.end_time)?;

        if !line.text.trim().is_empty() {
            writeln!(lrc_output, "{}{}", format_lrc_time_ms(start_ms), line.text)?;
        }

        let next_line_start_ms = lines
            .get(i + 1)
            .map(|l| secs_to_ms(l.start_time))
            .transpose()?;
        handle_end_time_output(
            &mut lrc_output,
            end_ms,
            options.end_time_output_mode,
            next_line_start_ms,
        )?;
    }

    let trimmed_output = lrc_output.trim_end();
    Ok(format!("{trimmed_output}\n"))
}

/// 根据选项处理是否输出行结束时间戳。
fn handle_end_time_output(
    output: &mut String,
    current_end_ms: u64,
    mode: LrcEndTimeOutputMode,
    next_line_start_ms: Option<u64>,
) -> Result<(), std::fmt::Error> {
    if current_end_ms == 0 {
        return Ok(());
    }

    match mode {
        LrcEndTimeOutputMode::Never => {}
        LrcEndTimeOutputMode::Always => {
            writeln!(output, "{}", format_lrc_time_ms(current_end_ms))?;
        }
        LrcEndTimeOutputMode::OnLongPause { threshold_ms } => {
            if let Some(next_start) = next_line_start_ms {
                if next_start.saturating_sub(current_end_ms) > threshold_ms {
                    writeln!(output, "{}", format_lrc_time_ms(current_end_ms))?;
                }
            } else {
                // 最后一行总是输出结束标记
                writeln!(output, "{}", format_lrc_time_ms(current_end_ms))?;
            }
        }
    }
    Ok(())
}

/// 将毫秒时间格式化为 LRC 时间标签 `[mm:ss.xxx]`。
pub fn format_lrc_time_ms(ms: u64) -> String {
    let minutes = ms / 60000;
    let seconds = (ms % 60000) / 1000;
    let milliseconds = ms % 1000;
    format!("[{minutes:02}:{seconds:02}.{milliseconds:03}]")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_lines() -> Vec<LyricLine> {
        vec![
            LyricLine::new("守りたいものが増えていくのに", 0.5, 2.4, 0.7),
            LyricLine::new("思考のスピードに", 2.5, 4.0, 0.7),
            LyricLine::new("追いつけない", 9.0, 75.25, 1.0),
        ]
    }

    #[test]
    fn test_format_lrc_time_ms() {
        assert_eq!(format_lrc_time_ms(0), "[00:00.000]");
        assert_eq!(format_lrc_time_ms(75_250), "[01:15.250]");
        assert_eq!(format_lrc_time_ms(6_000_001), "[100:00.001]");
    }

    #[test]
    fn test_generate_without_end_times() {
        let output = generate_lrc(&sample_lines(), &LrcGenerationOptions::default()).unwrap();
        insta::assert_snapshot!(output, @r"
        [00:00.500]守りたいものが増えていくのに
        [00:02.500]思考のスピードに
        [00:09.000]追いつけない
        ");
    }

    #[test]
    fn test_generate_with_long_pause_markers() {
        let options = LrcGenerationOptions {
            end_time_output_mode: LrcEndTimeOutputMode::OnLongPause { threshold_ms: 1000 },
            title: Some("Song".to_string()),
            artist: None,
        };
        let output = generate_lrc(&sample_lines(), &options).unwrap();
        insta::assert_snapshot!(output, @r"
        [ti:Song]
        [00:00.500]守りたいものが増えていくのに
        [00:02.500]思考のスピードに
        [00:04.000]
        [00:09.000]追いつけない
        [01:15.250]
        ");
    }

    #[test]
    fn test_generate_always_writes_every_end() {
        let options = LrcGenerationOptions {
            end_time_output_mode: LrcEndTimeOutputMode::Always,
            ..Default::default()
        };
        let output = generate_lrc(&sample_lines()[..1], &options).unwrap();
        assert_eq!(output, "[00:00.500]守りたいものが増えていくのに\n[00:02.400]\n");
    }

    #[test]
    fn test_non_finite_time_is_rejected() {
        let lines = vec![LyricLine::new("a", f64::INFINITY, 1.0, 0.3)];
        assert!(matches!(
            generate_lrc(&lines, &LrcGenerationOptions::default()),
            Err(ConvertError::InvalidTime(_))
        ));
    }
}
