use crate::gfx::anim::Ease;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_fps_cap")]
    pub fps_cap: u32,

    /// 0 runs until interrupted.
    #[serde(default)]
    pub run_seconds: f64,

    #[serde(default = "default_columns")]
    pub columns: usize,

    /// Pixels per terminal cell; item widths and speeds are in pixels.
    #[serde(default = "default_cell_px")]
    pub cell_px: f64,

    #[serde(default)]
    pub lag_smoothing: LagSettings,

    #[serde(default = "default_rows")]
    pub rows: Vec<RowConfig>,

    #[serde(default)]
    pub cursor: CursorSettings,

    #[serde(default)]
    pub particles: ParticleSettings,
}

/// How one marquee strip moves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopSettings {
    /// Multiplier on 100 px/s.
    pub speed: f64,
    pub reversed: bool,
    /// Space after the last item before the first one comes round again.
    pub padding_right: f64,
    pub paused: bool,
    /// Extra cycles after the first; negative repeats forever.
    pub repeat: i32,
    /// Pixel grid for transform values; 0 disables snapping.
    pub snap: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowConfig {
    pub items: Vec<String>,

    /// Blank cells after every item.
    #[serde(default = "default_gap")]
    pub gap: u32,

    #[serde(default)]
    pub motion: LoopSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LagSettings {
    pub threshold: f64,
    pub adjusted: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorSettings {
    pub size: f64,
    pub gelly: bool,
    pub gelly_amount: f64,
    pub follow_duration: f64,
    pub magnetic_amount: f64,
    pub magnetic_duration: f64,
    pub size_duration: f64,
    pub color_duration: f64,
    pub text_duration: f64,
    pub background_image_duration: f64,
    pub background: String,
    pub exclusion_background: String,
    pub inner_color: String,
    /// Shapes trailing the pointer; 0 disables the trail.
    pub trail_shapes: usize,
    /// Delay between consecutive trail shapes, last shape first.
    pub trail_stagger: f64,
    pub trail_duration: f64,
}

/// A field of items drifting from `y_start` to `y_end`, each on its own
/// repeating path with a random length and start offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleSettings {
    /// Number of items; 0 disables the field.
    pub count: usize,
    /// Canvas rows the terminal host gives the field.
    pub rows: usize,
    /// Wait for the host to report the field on screen before playing.
    pub observable: bool,
    /// Re-sync with the host layout each time the field comes into view.
    pub refresh_on_visible: bool,
    /// Extra cycles after the first; negative repeats forever.
    pub repeat: i32,
    pub time_scale: f64,
    /// Seconds skipped at start so an endless field is already populated.
    pub initial_seek: f64,
    /// 0 disables the fade.
    pub fade_in_duration: f64,
    pub fade_in_ease: Ease,
    /// 0 disables the fade.
    pub fade_out_duration: f64,
    pub fade_out_ease: Ease,
    pub y_start: f64,
    pub y_end: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_start: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_end: Option<f64>,
    pub ease: Ease,
    /// Inclusive range each item's pass length is drawn from, in seconds.
    pub duration: [f64; 2],
    /// Inclusive range each item's start offset is drawn from, in seconds.
    pub offset: [f64; 2],
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fps_cap: default_fps_cap(),
            run_seconds: 0.0,
            columns: default_columns(),
            cell_px: default_cell_px(),
            lag_smoothing: LagSettings::default(),
            rows: default_rows(),
            cursor: CursorSettings::default(),
            particles: ParticleSettings::default(),
        }
    }
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            speed: 1.0,
            reversed: false,
            padding_right: 0.0,
            paused: false,
            repeat: -1,
            snap: 1.0,
        }
    }
}

impl LoopSettings {
    pub fn pixels_per_second(&self) -> f64 {
        self.speed * 100.0
    }

    pub fn repeats_forever(&self) -> bool {
        self.repeat < 0
    }
}

impl Default for LagSettings {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            adjusted: 0.033,
        }
    }
}

impl Default for CursorSettings {
    fn default() -> Self {
        Self {
            size: 10.0,
            gelly: true,
            gelly_amount: 50.0,
            follow_duration: 0.5,
            magnetic_amount: 0.1,
            magnetic_duration: 0.7,
            size_duration: 0.8,
            color_duration: 0.5,
            text_duration: 1.0,
            background_image_duration: 0.0,
            background: "#000".to_string(),
            exclusion_background: "#fff".to_string(),
            inner_color: "#fff".to_string(),
            trail_shapes: 5,
            trail_stagger: 0.1,
            trail_duration: 0.5,
        }
    }
}

impl Default for ParticleSettings {
    fn default() -> Self {
        Self {
            count: 0,
            rows: 4,
            observable: true,
            refresh_on_visible: true,
            repeat: -1,
            time_scale: 1.5,
            initial_seek: 3000.0,
            fade_in_duration: 0.0,
            fade_in_ease: Ease::Power1Out,
            fade_out_duration: 1.0,
            fade_out_ease: Ease::Power4Out,
            y_start: 350.0,
            y_end: -500.0,
            x_start: None,
            x_end: None,
            ease: Ease::None,
            duration: [5.0, 10.0],
            offset: [0.0, 20.0],
        }
    }
}

impl ParticleSettings {
    pub fn repeats_forever(&self) -> bool {
        self.repeat < 0
    }
}

fn default_fps_cap() -> u32 {
    60
}

fn default_columns() -> usize {
    80
}

fn default_cell_px() -> f64 {
    10.0
}

fn default_gap() -> u32 {
    6
}

// Each row runs a little faster than the one above it and starts reversed.
fn default_rows() -> Vec<RowConfig> {
    let rows: [&[&str]; 3] = [
        &["Frontend", "Systems", "Parsers", "Tooling", "Animation"],
        &["Responsive Apps", "Component Libraries", "API Integration", "Performance"],
        &["Version Control", "Bundlers", "Linters", "Deployment"],
    ];
    rows.iter()
        .enumerate()
        .map(|(i, items)| RowConfig {
            items: items.iter().map(|s| s.to_string()).collect(),
            gap: default_gap(),
            motion: LoopSettings {
                speed: 0.7 + i as f64 * 0.1,
                reversed: true,
                ..LoopSettings::default()
            },
        })
        .collect()
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join("marquee").join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        let config_path = Self::default_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Config::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Config =
            toml::from_str(&contents).with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}
