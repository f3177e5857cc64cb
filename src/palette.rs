use alloc::vec::Vec;

use crate::error::QuantizeError;
use crate::pixel::Color32;

/// Largest palette an 8-bit indexed image can address.
pub const MAX_PALETTE_LEN: usize = 256;

/// An ordered color table addressed by the bytes of an indexed image.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Palette {
    entries: Vec<Color32>,
    /// Transparent index, if any.
    transparent_index: Option<u8>,
}

impl Palette {
    pub fn new(entries: Vec<Color32>) -> Self {
        Self {
            entries,
            transparent_index: None,
        }
    }

    /// Build a palette whose entry `index` stands for fully transparent pixels.
    pub fn with_transparent(entries: Vec<Color32>, index: u8) -> Self {
        Self {
            entries,
            transparent_index: Some(index),
        }
    }

    /// Fail if the palette cannot be addressed by one byte per pixel.
    pub fn validate(&self) -> Result<(), QuantizeError> {
        if self.entries.len() > MAX_PALETTE_LEN {
            return Err(QuantizeError::PaletteOverflow(self.entries.len()));
        }
        Ok(())
    }

    pub fn entries(&self) -> &[Color32] {
        &self.entries
    }

    /// Take the entry storage, e.g. to refill it for a new palette.
    pub fn into_entries(self) -> Vec<Color32> {
        self.entries
    }

    pub fn get(&self, index: u8) -> Option<Color32> {
        self.entries.get(index as usize).copied()
    }

    pub fn transparent_index(&self) -> Option<u8> {
        self.transparent_index
    }

    /// Number of palette entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Nearest entry by squared RGB distance, skipping the transparent entry.
    /// Ties resolve to the lower index.
    pub fn nearest(&self, color: Color32) -> u8 {
        let mut best_idx = 0usize;
        let mut best_dist = u32::MAX;

        for (i, entry) in self.entries.iter().enumerate() {
            if Some(i as u8) == self.transparent_index && self.entries.len() > 1 {
                continue;
            }
            let d = color.distance_sq(*entry);
            if d < best_dist {
                best_dist = d;
                best_idx = i;
                if d == 0 {
                    break;
                }
            }
        }

        best_idx as u8
    }

    /// Flat `[r, g, b, r, g, b, ...]` table, the layout GIF color tables use.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.entries.iter().flat_map(|c| [c.r, c.g, c.b]).collect()
    }

    pub fn to_rgba(&self) -> Vec<rgb::RGBA8> {
        self.entries.iter().map(|&c| c.into()).collect()
    }
}
