use anyhow::Context;
use calibcore::format_detection_line;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// Size gates applied by the vision pipeline before it reports a target.
const MIN_WIDTH: u32 = 4;
const MAX_WIDTH: u32 = 250;
const MIN_HEIGHT: u32 = 5;
const MAX_HEIGHT: u32 = 250;
const FRAME_WIDTH: u32 = 640;
const FRAME_HEIGHT: u32 = 480;

/// Configuration for generating a synthetic logcat capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub detections: usize,
    pub noise_lines: usize,
    pub seed: u64,
    pub tag: String,
    pub pid: u32,
    pub tid: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            detections: 32,
            noise_lines: 16,
            seed: 0,
            tag: "JNIpart".into(),
            pid: 19128,
            tid: 19155,
        }
    }
}

enum Entry {
    Detection,
    Noise,
}

fn noise_message(rng: &mut StdRng) -> String {
    match rng.gen_range(0..3) {
        0 => format!(
            "Rejecting target due to shape: proportions = {:.2}",
            rng.gen_range(0.05..9.0)
        ),
        1 => format!(
            "Rejected target due to fullness: {:.2}",
            rng.gen_range(0.1..0.7)
        ),
        _ => format!(
            "Altitude Err: {:.2}, {:.2}",
            rng.gen_range(0.0..0.5),
            rng.gen_range(0.0..0.5)
        ),
    }
}

fn detection_message(rng: &mut StdRng) -> String {
    let width = rng.gen_range(MIN_WIDTH..=MAX_WIDTH);
    let height = rng.gen_range(MIN_HEIGHT..=MAX_HEIGHT);
    let x = rng.gen_range(0..FRAME_WIDTH);
    let y = rng.gen_range(0..FRAME_HEIGHT);
    let ratio = rng.gen_range(0.5..1.5);
    format_detection_line(x, y, width, height, ratio)
}

/// Builds capture lines in logcat's `MM-DD HH:MM:SS.mmm PID TID LEVEL TAG : msg` layout.
pub fn build_capture(config: &GeneratorConfig) -> anyhow::Result<Vec<String>> {
    let total = config
        .detections
        .checked_add(config.noise_lines)
        .context("overflow computing capture length")?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut entries: Vec<Entry> = std::iter::repeat_with(|| Entry::Detection)
        .take(config.detections)
        .chain(std::iter::repeat_with(|| Entry::Noise).take(config.noise_lines))
        .collect();
    entries.shuffle(&mut rng);

    let mut lines = Vec::with_capacity(total);
    let mut millis: u64 = 0;
    for entry in entries {
        millis += rng.gen_range(30..70);
        let (level, message) = match entry {
            Entry::Detection => ('E', detection_message(&mut rng)),
            Entry::Noise => ('D', noise_message(&mut rng)),
        };
        lines.push(format!(
            "03-23 {:02}:{:02}:{:02}.{:03} {} {} {} {} : {}",
            11 + millis / 3_600_000 % 13,
            millis / 60_000 % 60,
            millis / 1000 % 60,
            millis % 1000,
            config.pid,
            config.tid,
            level,
            config.tag,
            message
        ));
    }

    Ok(lines)
}

pub fn write_capture(config: &GeneratorConfig, path: &Path) -> anyhow::Result<usize> {
    let lines = build_capture(config)?;
    let mut contents = lines.join("\n");
    contents.push('\n');
    fs::write(path, contents).with_context(|| format!("writing capture {}", path.display()))?;
    Ok(lines.len())
}
