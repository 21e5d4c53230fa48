//! 浏览器编辑器使用的 WASM 绑定。

use std::collections::HashMap;

use crate::{
    LyricsTimer,
    converter::{ExportFormat, ExportOptions},
    model::LyricLine,
    timing::{TimingCorrection, TimingCorrections, TimingOptions, text::parse_lyrics_text},
};
use wasm_bindgen::prelude::*;

/// 模块加载时安装 panic 钩子和日志输出。
#[wasm_bindgen(start)]
pub fn main_js() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
    Ok(())
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// 暴露给 JS 的时间轴工具。
#[wasm_bindgen]
pub struct WasmLyricsTimer {
    timer: LyricsTimer,
}

#[wasm_bindgen]
impl WasmLyricsTimer {
    /// 创建实例。`options_js` 为 `undefined` 时使用默认选项。
    #[wasm_bindgen(constructor)]
    pub fn new(options_js: JsValue) -> Result<WasmLyricsTimer, JsValue> {
        let timer = if options_js.is_undefined() || options_js.is_null() {
            LyricsTimer::new()
        } else {
            let options: TimingOptions = serde_wasm_bindgen::from_value(options_js)?;
            LyricsTimer::with_options(options).map_err(to_js_error)?
        };
        Ok(Self { timer })
    }

    /// 为歌词数组估计时间轴。
    #[wasm_bindgen(js_name = estimateTiming)]
    pub fn estimate_timing(
        &self,
        samples: &js_sys::Float32Array,
        sample_rate: u32,
        lines_js: JsValue,
    ) -> Result<JsValue, JsValue> {
        let lines: Vec<String> = serde_wasm_bindgen::from_value(lines_js)?;
        let samples = samples.to_vec();

        let result = self
            .timer
            .estimate(&samples, sample_rate, &lines)
            .map_err(to_js_error)?;

        Ok(serde_wasm_bindgen::to_value(&result)?)
    }

    /// 拆分整段歌词文本后估计时间轴。
    #[wasm_bindgen(js_name = estimateFromText)]
    pub fn estimate_from_text(
        &self,
        samples: &js_sys::Float32Array,
        sample_rate: u32,
        text: &str,
    ) -> Result<JsValue, JsValue> {
        let lines = parse_lyrics_text(text);
        let result = self
            .timer
            .estimate(&samples.to_vec(), sample_rate, &lines)
            .map_err(to_js_error)?;

        Ok(serde_wasm_bindgen::to_value(&result)?)
    }

    /// 合并以行号为键的手动校正，返回更新后的歌词行。
    #[wasm_bindgen(js_name = applyCorrections)]
    pub fn apply_corrections(
        &self,
        lines_js: JsValue,
        corrections_js: JsValue,
    ) -> Result<JsValue, JsValue> {
        let mut lines: Vec<LyricLine> = serde_wasm_bindgen::from_value(lines_js)?;
        // JS 对象的键总是字符串
        let raw: HashMap<String, TimingCorrection> =
            serde_wasm_bindgen::from_value(corrections_js)?;
        let corrections = raw
            .into_iter()
            .map(|(key, correction)| {
                key.trim()
                    .parse::<usize>()
                    .map(|index| (index, correction))
                    .map_err(|_| JsValue::from_str(&format!("无效的行号: {key}")))
            })
            .collect::<Result<TimingCorrections, JsValue>>()?;

        self.timer
            .apply_corrections(&mut lines, &corrections)
            .map_err(to_js_error)?;

        Ok(serde_wasm_bindgen::to_value(&lines)?)
    }

    /// 导出为 `lrc` 或 `ass` 文本。
    #[wasm_bindgen(js_name = exportLyrics)]
    pub fn export_lyrics(
        &self,
        lines_js: JsValue,
        format: &str,
        options_js: JsValue,
    ) -> Result<String, JsValue> {
        let lines: Vec<LyricLine> = serde_wasm_bindgen::from_value(lines_js)?;
        let format: ExportFormat = format.parse().map_err(to_js_error)?;
        let options: ExportOptions = if options_js.is_undefined() || options_js.is_null() {
            ExportOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options_js)?
        };

        self.timer
            .export(&lines, format, &options)
            .map_err(to_js_error)
    }
}
