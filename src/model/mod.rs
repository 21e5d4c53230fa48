//! 定义了整个库通用的核心数据模型。

pub mod audio;
pub mod lyric;
pub mod style;

pub use audio::{AudioBuffer, EnergyFrame, EnergySegment};
pub use lyric::{LyricLine, TimingState, active_line_at};
pub use style::StyleSettings;
