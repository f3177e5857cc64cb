use crate::error::QuantizeError;
use crate::palette::Palette;
use crate::pixel::Color32;
use crate::strategy::{PassMode, QuantizeStrategy};

/// BT.601 luma weights in thousandths: `Y = 0.299 R + 0.587 G + 0.114 B`.
pub const LUMA_WEIGHTS: [u32; 3] = [299, 587, 114];

/// Rounded BT.601 luminance of a pixel, alpha ignored.
#[inline]
pub fn luminance(pixel: Color32) -> u8 {
    let [wr, wg, wb] = LUMA_WEIGHTS;
    let y = wr * pixel.r as u32 + wg * pixel.g as u32 + wb * pixel.b as u32;
    ((y + 500) / 1000) as u8
}

/// Single-pass strategy that buckets luminance into evenly spaced gray levels.
#[derive(Debug)]
pub struct GrayscaleStrategy {
    levels: u32,
}

impl GrayscaleStrategy {
    /// `levels` gray entries from black to white, 2..=256.
    pub fn new(levels: u32) -> Result<Self, QuantizeError> {
        if !(2..=256).contains(&levels) {
            return Err(QuantizeError::InvalidLevels(levels));
        }
        Ok(Self { levels })
    }

    pub fn levels(&self) -> u32 {
        self.levels
    }

    fn level_gray(&self, level: u32) -> u8 {
        let steps = self.levels - 1;
        ((level * 255 + steps / 2) / steps) as u8
    }
}

impl Default for GrayscaleStrategy {
    fn default() -> Self {
        Self { levels: 256 }
    }
}

impl QuantizeStrategy for GrayscaleStrategy {
    fn pass_mode(&self) -> PassMode {
        PassMode::Single
    }

    fn build_palette(&mut self, previous: Palette) -> Palette {
        let mut entries = previous.into_entries();
        entries.clear();
        entries.extend((0..self.levels).map(|level| Color32::gray(self.level_gray(level))));
        Palette::new(entries)
    }

    fn map(&self, pixel: Color32) -> u8 {
        let y = luminance(pixel) as u32;
        ((y * (self.levels - 1) + 127) / 255) as u8
    }
}
