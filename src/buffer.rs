//! Stride-aware access to the source pixels and the indexed destination.
//!
//! Rows may carry padding past the last pixel. Both types address a pixel as
//! `y * stride + x * pixel_size` internally and only hand out pixels or row
//! slices, never offsets.

use alloc::vec;
use alloc::vec::Vec;

use crate::error::{ImageDefect, QuantizeError};
use crate::pixel::Color32;

/// Read-only view over 32-bit BGRA pixels.
#[derive(Debug, Clone, Copy)]
pub struct PixelView<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a> PixelView<'a> {
    /// Wrap `data` as a `width` x `height` image whose rows start `stride` bytes apart.
    ///
    /// The last row only needs to hold its pixels, not the trailing padding.
    pub fn new(
        data: &'a [u8],
        width: usize,
        height: usize,
        stride: usize,
    ) -> Result<Self, QuantizeError> {
        if width == 0 || height == 0 {
            return Err(ImageDefect::ZeroDimension.into());
        }
        let row_len = width
            .checked_mul(Color32::SIZE)
            .ok_or(ImageDefect::StrideTooSmall {
                stride,
                min: usize::MAX,
            })?;
        if stride < row_len {
            return Err(ImageDefect::StrideTooSmall {
                stride,
                min: row_len,
            }
            .into());
        }
        let required = (height - 1)
            .checked_mul(stride)
            .and_then(|n| n.checked_add(row_len))
            .unwrap_or(usize::MAX);
        if data.len() < required {
            return Err(ImageDefect::BufferTooSmall {
                len: data.len(),
                required,
            }
            .into());
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Tightly packed rows (`stride == width * 4`).
    pub fn packed(data: &'a [u8], width: usize, height: usize) -> Result<Self, QuantizeError> {
        Self::new(data, width, height, width.saturating_mul(Color32::SIZE))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Read the pixel at column `x` of row `y`.
    #[inline]
    pub fn read(&self, x: usize, y: usize) -> Result<Color32, QuantizeError> {
        if x >= self.width || y >= self.height {
            return Err(QuantizeError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        let offset = y * self.stride + x * Color32::SIZE;
        let bytes = &self.data[offset..offset + Color32::SIZE];
        Ok(Color32::from_bgra_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Iterate the pixels of row `y`, left to right. Row padding is skipped.
    pub fn row(&self, y: usize) -> Result<impl Iterator<Item = Color32> + 'a, QuantizeError> {
        if y >= self.height {
            return Err(QuantizeError::OutOfBounds {
                x: 0,
                y,
                width: self.width,
                height: self.height,
            });
        }
        let data: &'a [u8] = self.data;
        let start = y * self.stride;
        let row = &data[start..start + self.width * Color32::SIZE];
        Ok(row
            .chunks_exact(Color32::SIZE)
            .map(|c| Color32::from_bgra_bytes([c[0], c[1], c[2], c[3]])))
    }

    /// Copy the pixels out as tightly packed RGBA bytes.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.width * self.height * 4);
        for y in 0..self.height {
            let start = y * self.stride;
            for c in self.data[start..start + self.width * Color32::SIZE].chunks_exact(4) {
                out.extend_from_slice(&[c[2], c[1], c[0], c[3]]);
            }
        }
        out
    }
}

/// Owned one-byte-per-pixel buffer of palette indices.
///
/// Rows are padded to a multiple of four bytes, like 8-bpp bitmaps. Padding
/// bytes are always zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedBuffer {
    data: Vec<u8>,
    width: usize,
    height: usize,
    stride: usize,
}

impl IndexedBuffer {
    pub fn new(width: usize, height: usize) -> Result<Self, QuantizeError> {
        if width == 0 || height == 0 {
            return Err(ImageDefect::ZeroDimension.into());
        }
        let stride = width.div_ceil(4) * 4;
        Ok(Self {
            data: vec![0u8; stride * height],
            width,
            height,
            stride,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    fn check(&self, x: usize, y: usize) -> Result<(), QuantizeError> {
        if x >= self.width || y >= self.height {
            return Err(QuantizeError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    #[inline]
    pub fn write(&mut self, x: usize, y: usize, index: u8) -> Result<(), QuantizeError> {
        self.check(x, y)?;
        self.data[y * self.stride + x] = index;
        Ok(())
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Result<u8, QuantizeError> {
        self.check(x, y)?;
        Ok(self.data[y * self.stride + x])
    }

    /// Indices of row `y`, without padding.
    pub fn row(&self, y: usize) -> Result<&[u8], QuantizeError> {
        if y >= self.height {
            return Err(QuantizeError::OutOfBounds {
                x: 0,
                y,
                width: self.width,
                height: self.height,
            });
        }
        let start = y * self.stride;
        Ok(&self.data[start..start + self.width])
    }

    /// Raw rows including padding.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Indices with the row padding removed, `width * height` bytes.
    pub fn to_packed(&self) -> Vec<u8> {
        if self.stride == self.width {
            return self.data.clone();
        }
        let mut out = Vec::with_capacity(self.width * self.height);
        for row in self.data.chunks_exact(self.stride) {
            out.extend_from_slice(&row[..self.width]);
        }
        out
    }
}
