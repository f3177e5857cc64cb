//! GIF output through the `gif` crate.
//!
//! Quantized results become indexed frames with a local color table and,
//! when the strategy reserves one, a transparent index. [`GifQuality::Default`]
//! skips this crate's quantizers and lets the encoder reduce true color itself.
//!
//! ```rust,no_run
//! use gifquant::gif_backend::AnimatedGifWriter;
//! use gifquant::{GifQuality, PixelView};
//!
//! # let frames: Vec<Vec<u8>> = vec![];
//! let file = std::fs::File::create("out.gif")?;
//! // 33 ms per frame, loop forever.
//! let mut gif = AnimatedGifWriter::new(file, 64, 64, 33, 0)?;
//! for bgra in &frames {
//!     let view = PixelView::packed(bgra, 64, 64)?;
//!     gif.add_frame(&view, None, GifQuality::Bit8)?;
//! }
//! gif.finish()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::io::Write;

use gif::{Encoder, Frame, Repeat};

use crate::buffer::PixelView;
use crate::error::{ImageDefect, QuantizeError};
use crate::pipeline::{quantize, QuantizeResult};
use crate::quality::GifQuality;

/// Encoder effort for [`GifQuality::Default`] frames (1 = best, 30 = fastest).
const PASSTHROUGH_SPEED: i32 = 10;

fn gif_dimensions(width: usize, height: usize) -> Result<(u16, u16), QuantizeError> {
    match (u16::try_from(width), u16::try_from(height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(ImageDefect::TooLargeForGif { width, height }.into()),
    }
}

/// Milliseconds to GIF centiseconds, rounded.
fn delay_centis(ms: u32) -> u16 {
    u16::try_from(ms.saturating_add(5) / 10).unwrap_or(u16::MAX)
}

/// Indexed frame with the result's palette as its local color table.
pub fn frame_from_result(result: &QuantizeResult) -> Result<Frame<'static>, QuantizeError> {
    let (width, height) = gif_dimensions(result.width(), result.height())?;
    Ok(Frame::from_palette_pixels(
        width,
        height,
        result.pixels().to_packed(),
        result.palette().to_rgb_bytes(),
        result.transparent_index(),
    ))
}

/// Build one frame from `source` at the given quality.
pub fn frame_for(
    source: &PixelView<'_>,
    quality: GifQuality,
) -> Result<Frame<'static>, QuantizeError> {
    match quality.strategy() {
        Some(strategy) => frame_from_result(&quantize(source, strategy)?),
        None => {
            let (width, height) = gif_dimensions(source.width(), source.height())?;
            let mut rgba = source.to_rgba_bytes();
            Ok(Frame::from_rgba_speed(width, height, &mut rgba, PASSTHROUGH_SPEED))
        }
    }
}

/// Encode `source` as a single-image GIF into `writer` and hand the writer back.
pub fn encode_gif<W: Write>(
    source: &PixelView<'_>,
    quality: GifQuality,
    writer: W,
) -> Result<W, QuantizeError> {
    let (width, height) = gif_dimensions(source.width(), source.height())?;
    let frame = frame_for(source, quality)?;
    let mut encoder = Encoder::new(writer, width, height, &[])?;
    encoder.write_frame(&frame)?;
    Ok(encoder.into_inner().map_err(gif::EncodingError::from)?)
}

/// Writes an animated GIF one frame at a time.
pub struct AnimatedGifWriter<W: Write> {
    encoder: Encoder<W>,
    width: u16,
    height: u16,
    default_delay: u16,
    frames: usize,
}

impl<W: Write> AnimatedGifWriter<W> {
    /// Start an animation on a `width` x `height` canvas. `repeat` is the loop
    /// count, 0 meaning forever.
    pub fn new(
        writer: W,
        width: usize,
        height: usize,
        default_delay_ms: u32,
        repeat: u16,
    ) -> Result<Self, QuantizeError> {
        if width == 0 || height == 0 {
            return Err(ImageDefect::ZeroDimension.into());
        }
        let (w, h) = gif_dimensions(width, height)?;
        let mut encoder = Encoder::new(writer, w, h, &[])?;
        encoder.set_repeat(match repeat {
            0 => Repeat::Infinite,
            n => Repeat::Finite(n),
        })?;
        Ok(Self {
            encoder,
            width: w,
            height: h,
            default_delay: delay_centis(default_delay_ms),
            frames: 0,
        })
    }

    /// Append a frame. `delay_ms` of `None` uses the writer's default delay.
    pub fn add_frame(
        &mut self,
        source: &PixelView<'_>,
        delay_ms: Option<u32>,
        quality: GifQuality,
    ) -> Result<(), QuantizeError> {
        if source.width() != self.width as usize || source.height() != self.height as usize {
            return Err(QuantizeError::FrameSizeMismatch {
                width: source.width(),
                height: source.height(),
                canvas_width: self.width as usize,
                canvas_height: self.height as usize,
            });
        }
        let mut frame = frame_for(source, quality)?;
        frame.delay = delay_ms.map_or(self.default_delay, delay_centis);
        self.encoder.write_frame(&frame)?;
        self.frames += 1;
        log::debug!(
            "gif frame {} written ({quality:?}, {} cs)",
            self.frames,
            frame.delay
        );
        Ok(())
    }

    /// Frames written so far.
    pub fn frame_count(&self) -> usize {
        self.frames
    }

    /// Write the trailer and return the underlying writer.
    pub fn finish(self) -> Result<W, QuantizeError> {
        Ok(self.encoder.into_inner().map_err(gif::EncodingError::from)?)
    }
}
