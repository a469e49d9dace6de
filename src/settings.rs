//! Runtime settings
//!
//! Every field has a default, so a settings file only needs the values it
//! changes. Command-line flags are applied on top by the binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use color_eyre::{Result, eyre::WrapErr};
use serde::{Deserialize, Serialize};

use crate::assets::CellSize;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Simulation ticks (and rendered frames) per second
    pub frame_rate: u32,
    /// Pixel footprint of one terminal cell
    pub cell_width: f32,
    pub cell_height: f32,
    /// Directory holding `img/` and `sounds/`
    pub assets_dir: PathBuf,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
    /// Log output; stdout belongs to the terminal UI
    pub log_file: PathBuf,
    /// Used when RUST_LOG is not set
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            frame_rate: 60,
            cell_width: 8.0,
            cell_height: 16.0,
            assets_dir: PathBuf::from("assets"),
            sfx_volume: 0.2,
            muted: false,
            log_file: PathBuf::from("debug.log"),
            log_filter: "info".to_string(),
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read settings from {}", path.display()))?;
        Self::from_json(&json)
            .wrap_err_with(|| format!("invalid settings in {}", path.display()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    /// Clamp values that would stall the loop or blow out the speakers
    fn sanitize(&mut self) {
        self.frame_rate = self.frame_rate.clamp(1, 240);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        if self.cell_width <= 0.0 {
            self.cell_width = Self::default().cell_width;
        }
        if self.cell_height <= 0.0 {
            self.cell_height = Self::default().cell_height;
        }
    }

    /// Wall-clock time budget of one frame
    pub fn frame_budget(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.frame_rate.max(1) as f64)
    }

    pub fn cell_size(&self) -> CellSize {
        CellSize {
            width: self.cell_width,
            height: self.cell_height,
        }
    }

    /// Effective volume, zero when muted
    pub fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.sfx_volume }
    }
}
