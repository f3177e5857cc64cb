use crate::error::QuantizeError;
use crate::palette::{Palette, MAX_PALETTE_LEN};
use crate::pixel::Color32;
use crate::strategy::{PassMode, QuantizeStrategy};

/// Single-pass strategy mapping each pixel to the nearest entry of a palette
/// chosen up front (a web-safe table, a previous frame's palette, ...).
#[derive(Debug)]
pub struct FixedPaletteStrategy {
    palette: Palette,
}

impl FixedPaletteStrategy {
    pub fn new(palette: Palette) -> Result<Self, QuantizeError> {
        if palette.is_empty() {
            return Err(QuantizeError::EmptyPalette);
        }
        if palette.len() > MAX_PALETTE_LEN {
            return Err(QuantizeError::PaletteOverflow(palette.len()));
        }
        if let Some(t) = palette.transparent_index() {
            if t as usize >= palette.len() {
                return Err(QuantizeError::IndexOutOfPalette {
                    index: t,
                    len: palette.len(),
                });
            }
        }
        Ok(Self { palette })
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }
}

impl QuantizeStrategy for FixedPaletteStrategy {
    fn pass_mode(&self) -> PassMode {
        PassMode::Single
    }

    fn build_palette(&mut self, _previous: Palette) -> Palette {
        self.palette.clone()
    }

    fn map(&self, pixel: Color32) -> u8 {
        match self.palette.transparent_index() {
            Some(t) if pixel.a == 0 => t,
            _ => self.palette.nearest(pixel),
        }
    }
}
