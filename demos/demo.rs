//! 用于演示 `lyrics-timer` 库的核心功能。
//!
//! ## 如何运行
//!
//! ```bash
//! cargo run --package lyrics_timer_rs --example demo
//! ```

use std::collections::HashMap;

use lyrics_timer_rs::{
    LyricsTimer,
    converter::{ExportFormat, ExportOptions},
    error::Result,
    store::LyricsStore,
    timing::{TimingCorrection, adjustment},
};

use tracing::{Level, info, warn};

const SAMPLE_RATE: u32 = 44_100;

const LYRICS: &str = "
夜明けの街を歩いて
知らない歌を口ずさむ

風が少し冷たくて
それでも前を向いた
";

/// 这里用合成的音频代替解码后的歌曲：四段人声，中间隔着静音。
fn synthesize_track() -> Vec<f32> {
    let second = SAMPLE_RATE as usize;
    let voiced = [false, true, true, false, true, true, false, true, false, true, true, false];
    let mut samples = Vec::with_capacity(second * voiced.len());
    for (index, &is_voiced) in voiced.iter().enumerate() {
        for i in 0..second {
            let t = (index * second + i) as f32 / SAMPLE_RATE as f32;
            let value = if is_voiced {
                0.4 * (t * 330.0 * std::f32::consts::TAU).sin()
            } else {
                0.0
            };
            samples.push(value);
        }
    }
    samples
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let timer = LyricsTimer::new();
    let samples = synthesize_track();

    let store = LyricsStore::default();
    let mut receiver = store.subscribe();
    let watcher = tokio::spawn(async move {
        while receiver.changed().await.is_ok() {
            let state = receiver.borrow_and_update().clone();
            info!("编辑器收到更新：{} 行歌词", state.lyrics.len());
        }
    });

    info!("正在估计时间轴...");
    let timed = timer.estimate_text(&samples, SAMPLE_RATE, LYRICS)?;
    for line in &timed {
        info!(
            "[{:>6.2} - {:>6.2}] ({:.1}) {}",
            line.start_time, line.end_time, line.confidence, line.text
        );
    }
    store.set_lyrics(timed);

    info!("用户把第二行的开始时间改为 2.4 秒，并整体延后 0.2 秒");
    let mut corrections = HashMap::new();
    corrections.insert(1, TimingCorrection::start(2.4));
    store.update(|state| {
        if let Err(e) = timer.apply_corrections(&mut state.lyrics, &corrections) {
            warn!("校正未能应用: {e}");
        }
        if let Err(e) = adjustment::shift(&mut state.lyrics, 0.2) {
            warn!("整体平移失败: {e}");
        }
    });

    let snapshot = store.snapshot();
    let lrc = timer.export(&snapshot.lyrics, ExportFormat::Lrc, &ExportOptions::default())?;
    println!("\n{lrc}");

    drop(store);
    let _ = watcher.await;
    Ok(())
}
