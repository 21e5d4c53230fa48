//! 负责处理应用的持久化配置。

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use tracing::info;

use crate::{error::Result, timing::TimingOptions};

/// 保存时间轴选项的文件名。
pub const TIMING_OPTIONS_FILE: &str = "timing_options.json";

/// 获取应用配置目录下指定文件的完整路径。
///
/// # 参数
/// * `filename` - 目标配置文件的名称，例如 "timing_options.json"。
pub fn get_config_file_path(filename: &str) -> Result<PathBuf> {
    let config_dir = dirs::config_dir().ok_or_else(|| anyhow!("无法找到用户配置目录"))?;
    config_file_in(config_dir.join("lyrics-timer"), filename)
}

/// 确保 `dir` 存在，并返回其中 `filename` 的路径。
fn config_file_in(dir: PathBuf, filename: &str) -> Result<PathBuf> {
    fs::create_dir_all(&dir).with_context(|| format!("无法创建配置目录 {dir:?}"))?;
    Ok(dir.join(filename))
}

/// 从指定文件加载时间轴选项。
///
/// 文件不存在时写入一份默认选项并返回默认值。
pub fn load_timing_options_from(path: &Path) -> Result<TimingOptions> {
    match fs::read_to_string(path) {
        Ok(content) => {
            let options: TimingOptions = serde_json::from_str(&content)?;
            options.validate()?;
            info!("已从 {:?} 加载时间轴选项。", path);
            Ok(options)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!("时间轴选项文件不存在，将创建默认配置。");
            let options = TimingOptions::default();
            save_timing_options_to(path, &options)?;
            Ok(options)
        }
        Err(e) => Err(e.into()),
    }
}

/// 将时间轴选项序列化为 JSON 并保存到指定文件。
pub fn save_timing_options_to(path: &Path, options: &TimingOptions) -> Result<()> {
    options.validate()?;
    let content = serde_json::to_string_pretty(options)?;
    fs::write(path, content)?;
    info!("时间轴选项已保存到 {:?}。", path);
    Ok(())
}

/// 从用户配置目录加载时间轴选项。
pub fn load_timing_options() -> Result<TimingOptions> {
    load_timing_options_from(&get_config_file_path(TIMING_OPTIONS_FILE)?)
}

/// 将时间轴选项保存到用户配置目录。
pub fn save_timing_options(options: &TimingOptions) -> Result<()> {
    save_timing_options_to(&get_config_file_path(TIMING_OPTIONS_FILE)?, options)
}
