//! The contract between the pipeline and a palette-selection algorithm.

use alloc::boxed::Box;

use crate::palette::Palette;
use crate::pixel::Color32;

/// Whether a strategy needs to see the image before it can map pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassMode {
    /// Map pixels directly; the build pass is skipped.
    Single,
    /// Observe every pixel first, then build the palette, then map.
    TwoPass,
}

/// A palette-selection algorithm driven by [`crate::quantize`].
///
/// Call order for one image:
/// 1. [`observe`](Self::observe) once per pixel in row-major order, only for
///    [`PassMode::TwoPass`] strategies;
/// 2. [`build_palette`](Self::build_palette) exactly once;
/// 3. [`map`](Self::map) for each pixel that differs from its predecessor.
///
/// After `build_palette` the pipeline only holds `&self`, so `map` sees
/// frozen state. Every index `map` returns must be below the palette length.
///
/// The pipeline consumes the strategy, so each image gets a fresh instance.
pub trait QuantizeStrategy {
    fn pass_mode(&self) -> PassMode;

    /// Accumulate one source pixel during the build pass.
    fn observe(&mut self, _pixel: Color32) {}

    /// Produce the final palette. `previous` is the palette being replaced;
    /// implementations may reuse its storage.
    fn build_palette(&mut self, previous: Palette) -> Palette;

    /// Palette index for `pixel`. Must be deterministic.
    fn map(&self, pixel: Color32) -> u8;
}

impl<S: QuantizeStrategy + ?Sized> QuantizeStrategy for Box<S> {
    fn pass_mode(&self) -> PassMode {
        (**self).pass_mode()
    }

    fn observe(&mut self, pixel: Color32) {
        (**self).observe(pixel)
    }

    fn build_palette(&mut self, previous: Palette) -> Palette {
        (**self).build_palette(previous)
    }

    fn map(&self, pixel: Color32) -> u8 {
        (**self).map(pixel)
    }
}
