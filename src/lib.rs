//! Palette quantization of 32-bit BGRA images for GIF and other indexed formats.
//!
//! A [`QuantizeStrategy`] decides the palette; [`quantize`] drives it over a
//! [`PixelView`] in up to two row-major passes and returns an
//! [`IndexedBuffer`] with the [`Palette`] it indexes into.
//!
//! ```
//! use gifquant::{quantize, Color32, GrayscaleStrategy, PixelView};
//!
//! let data: Vec<u8> = [Color32::opaque(255, 255, 255), Color32::opaque(0, 0, 0)]
//!     .iter()
//!     .flat_map(|p| p.to_bgra_bytes())
//!     .collect();
//! let source = PixelView::packed(&data, 2, 1)?;
//! let result = quantize(&source, GrayscaleStrategy::default())?;
//! assert_eq!(result.pixels().to_packed(), [255, 0]);
//! # Ok::<(), gifquant::QuantizeError>(())
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod buffer;
pub mod error;
pub mod fixed;
pub mod grayscale;
pub mod octree;
pub mod palette;
pub mod pipeline;
pub mod pixel;
pub mod quality;
pub mod strategy;

#[cfg(feature = "gif")]
pub mod gif_backend;

pub use buffer::{IndexedBuffer, PixelView};
pub use error::{ImageDefect, QuantizeError};
pub use fixed::FixedPaletteStrategy;
pub use grayscale::GrayscaleStrategy;
pub use octree::OctreeStrategy;
pub use palette::{Palette, MAX_PALETTE_LEN};
pub use pipeline::{quantize, quantize_bgra, QuantizeResult, QuantizeStats};
pub use pixel::Color32;
pub use quality::GifQuality;
pub use strategy::{PassMode, QuantizeStrategy};
