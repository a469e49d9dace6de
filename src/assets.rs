//! Sprite loading
//!
//! Both sprites are raster images read with the `image` crate at startup.
//! Their scaled pixel size becomes the entity's collision size, and the image
//! itself is pre-rasterised into half-block terminal cells (two vertical
//! pixels per cell) so the renderer only copies cells each frame.

use std::path::{Path, PathBuf};

use color_eyre::{Result, eyre::WrapErr};
use glam::Vec2;
use image::{DynamicImage, GenericImageView, imageops::FilterType};
use ratatui::style::Color;

use crate::consts::{ENEMY_SCALE, PLAYER_SCALE};
use crate::world::SpriteSizes;

pub const PLAYER_IMAGE: &str = "img/player.png";
pub const ENEMY_IMAGE: &str = "img/enemy.png";

/// Pixels below this alpha are treated as transparent
const ALPHA_CUTOFF: u8 = 128;

/// Pixel footprint of one terminal cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellSize {
    pub width: f32,
    pub height: f32,
}

/// One non-empty terminal cell of a sprite
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteCell {
    pub dx: u16,
    pub dy: u16,
    pub symbol: &'static str,
    pub fg: Color,
    pub bg: Option<Color>,
}

#[derive(Debug, Clone)]
pub struct Sprite {
    /// Scaled size in playfield pixels
    pub size: Vec2,
    pub columns: u16,
    pub rows: u16,
    pub cells: Vec<SpriteCell>,
}

impl Sprite {
    /// Scales the image by `scale` and rasterises it for the given cell size
    pub fn from_image(image: &DynamicImage, scale: f32, cell: CellSize) -> Self {
        let (width, height) = image.dimensions();
        let size = Vec2::new(width as f32 * scale, height as f32 * scale);

        let columns = ((size.x / cell.width).round() as u16).max(1);
        let rows = ((size.y / cell.height).round() as u16).max(1);

        let pixels = image
            .resize_exact(columns as u32, rows as u32 * 2, FilterType::Triangle)
            .to_rgba8();

        let mut cells = Vec::new();
        for dy in 0..rows {
            for dx in 0..columns {
                let top = pixels.get_pixel(dx as u32, dy as u32 * 2).0;
                let bottom = pixels.get_pixel(dx as u32, dy as u32 * 2 + 1).0;
                if let Some(cell) = half_block(dx, dy, top, bottom) {
                    cells.push(cell);
                }
            }
        }

        Self {
            size,
            columns,
            rows,
            cells,
        }
    }

    pub fn load(path: &Path, scale: f32, cell: CellSize) -> Result<Self> {
        let image = image::open(path)
            .wrap_err_with(|| format!("failed to load sprite {}", path.display()))?;
        Ok(Self::from_image(&image, scale, cell))
    }
}

fn half_block(dx: u16, dy: u16, top: [u8; 4], bottom: [u8; 4]) -> Option<SpriteCell> {
    let rgb = |p: [u8; 4]| Color::Rgb(p[0], p[1], p[2]);
    let (symbol, fg, bg) = match (top[3] >= ALPHA_CUTOFF, bottom[3] >= ALPHA_CUTOFF) {
        (false, false) => return None,
        (true, false) => ("▀", rgb(top), None),
        (false, true) => ("▄", rgb(bottom), None),
        (true, true) => ("▀", rgb(top), Some(rgb(bottom))),
    };

    Some(SpriteCell {
        dx,
        dy,
        symbol,
        fg,
        bg,
    })
}

/// The two sprites the game cannot run without
#[derive(Debug, Clone)]
pub struct Assets {
    pub player: Sprite,
    pub enemy: Sprite,
}

impl Assets {
    /// Loads every sprite under `dir`. Any failure is fatal to startup.
    pub fn load(dir: &Path, cell: CellSize) -> Result<Self> {
        let player = Sprite::load(&dir.join(PLAYER_IMAGE), PLAYER_SCALE, cell)?;
        let enemy = Sprite::load(&dir.join(ENEMY_IMAGE), ENEMY_SCALE, cell)?;

        log::info!(
            "loaded sprites from {}: player {}x{}, enemy {}x{}",
            dir.display(),
            player.size.x,
            player.size.y,
            enemy.size.x,
            enemy.size.y
        );

        Ok(Self { player, enemy })
    }

    pub fn sizes(&self) -> SpriteSizes {
        SpriteSizes {
            player: self.player.size,
            enemy: self.enemy.size,
        }
    }
}

/// Assets bundled with the crate, for tests and as the fallback search path
pub fn bundled_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("assets")
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    const CELL: CellSize = CellSize {
        width: 8.0,
        height: 16.0,
    };

    #[test]
    fn test_bundled_assets_load_with_scaled_sizes() {
        let assets = Assets::load(&bundled_dir(), CELL).unwrap();
        // 250px * 0.20 and 300px * 0.10
        assert_eq!(assets.player.size, Vec2::new(50.0, 50.0));
        assert_eq!(assets.enemy.size, Vec2::new(30.0, 30.0));
        assert_eq!(assets.sizes().player, assets.player.size);
        assert!(!assets.player.cells.is_empty());
        assert!(!assets.enemy.cells.is_empty());
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let err = Assets::load(Path::new("/definitely/not/here"), CELL).unwrap_err();
        assert!(format!("{err}").contains("failed to load sprite"));
    }

    #[test]
    fn test_transparent_image_has_no_cells() {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(80, 80, Rgba([0, 0, 0, 0])));
        let sprite = Sprite::from_image(&image, 1.0, CELL);
        assert_eq!(sprite.columns, 10);
        assert_eq!(sprite.rows, 5);
        assert!(sprite.cells.is_empty());
    }

    #[test]
    fn test_opaque_image_fills_every_cell() {
        let image =
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(16, 32, Rgba([200, 10, 10, 255])));
        let sprite = Sprite::from_image(&image, 1.0, CELL);
        assert_eq!(sprite.size, Vec2::new(16.0, 32.0));
        assert_eq!(sprite.cells.len(), 4);
        assert!(sprite.cells.iter().all(|c| c.symbol == "▀" && c.bg.is_some()));
    }

    #[test]
    fn test_tiny_image_still_gets_one_cell() {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 255])));
        let sprite = Sprite::from_image(&image, 1.0, CELL);
        assert_eq!((sprite.columns, sprite.rows), (1, 1));
    }

    #[test]
    fn test_half_block_picks_visible_half() {
        let solid = [10, 20, 30, 255];
        let clear = [0, 0, 0, 0];
        assert!(half_block(0, 0, clear, clear).is_none());

        let top = half_block(1, 2, solid, clear).unwrap();
        assert_eq!(top.symbol, "▀");
        assert_eq!(top.fg, Color::Rgb(10, 20, 30));
        assert_eq!((top.dx, top.dy), (1, 2));

        let bottom = half_block(0, 0, clear, solid).unwrap();
        assert_eq!(bottom.symbol, "▄");
        assert_eq!(bottom.bg, None);
    }
}
