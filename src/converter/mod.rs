//! 歌词导入导出模块

pub mod generators;
pub mod parsers;
pub mod types;
pub mod utils;

pub use types::{
    AssGenerationOptions, ConvertError, ExportFormat, ExportOptions, LrcEndTimeOutputMode,
    LrcGenerationOptions,
};

use tracing::debug;

use crate::{
    converter::generators::{ass_generator, lrc_generator},
    model::LyricLine,
};

// ==========================================================
//  顶级导出入口
// ==========================================================

/// 将带时间轴的歌词行导出为指定格式的文本。
///
/// # 参数
///
/// * `lines` - 需要导出的歌词行，按原有顺序输出。
/// * `format` - 目标格式。
/// * `options` - 各格式的生成选项，ASS 还会用到其中的样式。
///
/// # 返回
///
/// * `Result<String, ConvertError>` - 成功时返回生成的文件内容。
pub fn export(
    lines: &[LyricLine],
    format: ExportFormat,
    options: &ExportOptions,
) -> Result<String, ConvertError> {
    let output = match format {
        ExportFormat::Lrc => lrc_generator::generate_lrc(lines, &options.lrc)?,
        ExportFormat::Ass => ass_generator::generate_ass(lines, &options.style, &options.ass)?,
    };
    debug!(
        "[Converter] 已将 {} 行歌词导出为 {}，共 {} 字节",
        lines.len(),
        format,
        output.len()
    );
    Ok(output)
}

/// 从 LRC 文本导入歌词行。
pub fn import_lrc(content: &str) -> Result<Vec<LyricLine>, ConvertError> {
    parsers::lrc_parser::parse_lrc(content)
}
