//! Drives a [`QuantizeStrategy`] over a source image.

use crate::buffer::{IndexedBuffer, PixelView};
use crate::error::{ImageDefect, QuantizeError};
use crate::palette::Palette;
use crate::strategy::{PassMode, QuantizeStrategy};

/// Work counters for one quantization run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuantizeStats {
    /// Calls to [`QuantizeStrategy::map`], the seed pixel included.
    pub map_calls: usize,
    /// Pixels that reused the previous pixel's index.
    pub cache_hits: usize,
}

/// Indexed pixels plus the palette they index into.
#[derive(Debug, Clone)]
pub struct QuantizeResult {
    pixels: IndexedBuffer,
    palette: Palette,
    stats: QuantizeStats,
}

impl QuantizeResult {
    pub fn pixels(&self) -> &IndexedBuffer {
        &self.pixels
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn width(&self) -> usize {
        self.pixels.width()
    }

    pub fn height(&self) -> usize {
        self.pixels.height()
    }

    /// Number of colors in the palette.
    pub fn palette_len(&self) -> usize {
        self.palette.len()
    }

    pub fn transparent_index(&self) -> Option<u8> {
        self.palette.transparent_index()
    }

    pub fn stats(&self) -> QuantizeStats {
        self.stats
    }

    pub fn into_parts(self) -> (IndexedBuffer, Palette) {
        (self.pixels, self.palette)
    }
}

/// Quantize `source` with `strategy`.
///
/// Runs the build pass if the strategy asks for one, builds the palette, then
/// maps every pixel in row-major order. A pixel whose packed value equals its
/// predecessor's reuses that index without calling [`QuantizeStrategy::map`].
pub fn quantize<S: QuantizeStrategy>(
    source: &PixelView<'_>,
    mut strategy: S,
) -> Result<QuantizeResult, QuantizeError> {
    let (width, height) = (source.width(), source.height());
    if width == 0 || height == 0 {
        return Err(ImageDefect::ZeroDimension.into());
    }

    let mut pixels = IndexedBuffer::new(width, height)?;
    let pass_mode = strategy.pass_mode();
    log::debug!("quantizing {width}x{height}, {pass_mode:?}");

    if pass_mode == PassMode::TwoPass {
        for y in 0..height {
            for pixel in source.row(y)? {
                strategy.observe(pixel);
            }
        }
    }

    let palette = strategy.build_palette(Palette::default());
    palette.validate()?;

    // Frozen from here on.
    let strategy = &strategy;
    let checked_map = |pixel| {
        let index = strategy.map(pixel);
        if index as usize >= palette.len() {
            return Err(QuantizeError::IndexOutOfPalette {
                index,
                len: palette.len(),
            });
        }
        Ok(index)
    };

    let mut stats = QuantizeStats::default();
    let mut previous = source.read(0, 0)?;
    let mut index = checked_map(previous)?;
    stats.map_calls += 1;
    pixels.write(0, 0, index)?;

    for y in 0..height {
        let first_x = if y == 0 { 1 } else { 0 };
        for x in first_x..width {
            let pixel = source.read(x, y)?;
            if pixel.argb() == previous.argb() {
                stats.cache_hits += 1;
            } else {
                index = checked_map(pixel)?;
                stats.map_calls += 1;
                previous = pixel;
            }
            pixels.write(x, y, index)?;
        }
    }

    log::debug!(
        "quantized {width}x{height}: {} colors, {} map calls, {} cache hits",
        palette.len(),
        stats.map_calls,
        stats.cache_hits
    );

    Ok(QuantizeResult {
        pixels,
        palette,
        stats,
    })
}

/// Quantize raw BGRA bytes laid out with `stride` bytes per row.
pub fn quantize_bgra<S: QuantizeStrategy>(
    data: &[u8],
    width: usize,
    height: usize,
    stride: usize,
    strategy: S,
) -> Result<QuantizeResult, QuantizeError> {
    let source = PixelView::new(data, width, height, stride)?;
    quantize(&source, strategy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grayscale::GrayscaleStrategy;
    use crate::pixel::Color32;
    use alloc::vec::Vec;

    fn bgra(pixels: &[Color32]) -> Vec<u8> {
        pixels.iter().flat_map(|p| p.to_bgra_bytes()).collect()
    }

    #[test]
    fn single_pixel_runs_seed_only() {
        let data = bgra(&[Color32::gray(10)]);
        let result = quantize_bgra(&data, 1, 1, 4, GrayscaleStrategy::default()).unwrap();
        assert_eq!(result.pixels().to_packed(), [10]);
        assert_eq!(
            result.stats(),
            QuantizeStats {
                map_calls: 1,
                cache_hits: 0
            }
        );
    }

    #[test]
    fn runs_hit_the_cache() {
        let data = bgra(&[
            Color32::gray(1),
            Color32::gray(1),
            Color32::gray(2),
            Color32::gray(2),
            Color32::gray(1),
            Color32::gray(1),
        ]);
        let result = quantize_bgra(&data, 3, 2, 12, GrayscaleStrategy::default()).unwrap();
        assert_eq!(result.pixels().to_packed(), [1, 1, 2, 2, 1, 1]);
        assert_eq!(result.stats().map_calls, 3);
        assert_eq!(result.stats().cache_hits, 3);
    }

    #[test]
    fn destination_padding_stays_zero() {
        let data = bgra(&[Color32::gray(200); 6]);
        let result = quantize_bgra(&data, 3, 2, 12, GrayscaleStrategy::default()).unwrap();
        assert_eq!(result.pixels().as_bytes(), &[200, 200, 200, 0, 200, 200, 200, 0]);
    }
}
