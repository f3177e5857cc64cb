use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gifquant::{
    quantize, quantize_bgra, Color32, FixedPaletteStrategy, GifQuality, GrayscaleStrategy,
    ImageDefect, OctreeStrategy, Palette, PassMode, PixelView, QuantizeError, QuantizeStrategy,
};

fn bgra(pixels: &[Color32]) -> Vec<u8> {
    pixels.iter().flat_map(|p| p.to_bgra_bytes()).collect()
}

fn gradient(width: usize, height: usize) -> Vec<Color32> {
    let mut pixels = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let r = (x * 255 / width) as u8;
            let g = (y * 255 / height) as u8;
            pixels.push(Color32::opaque(r, g, 128));
        }
    }
    pixels
}

/// Counts `map` calls; maps everything to index 0 of a one-entry palette.
struct CountingStrategy {
    mode: PassMode,
    observed: Rc<Cell<usize>>,
    mapped: Rc<Cell<usize>>,
}

impl QuantizeStrategy for CountingStrategy {
    fn pass_mode(&self) -> PassMode {
        self.mode
    }

    fn observe(&mut self, _pixel: Color32) {
        self.observed.set(self.observed.get() + 1);
    }

    fn build_palette(&mut self, _previous: Palette) -> Palette {
        Palette::new(vec![Color32::BLACK])
    }

    fn map(&self, _pixel: Color32) -> u8 {
        self.mapped.set(self.mapped.get() + 1);
        0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Event {
    Observe(u8, u8),
    Palette,
    Map(u8, u8),
}

/// Records the coordinates encoded in each pixel's red/green channels.
struct RecordingStrategy {
    events: Rc<RefCell<Vec<Event>>>,
}

impl QuantizeStrategy for RecordingStrategy {
    fn pass_mode(&self) -> PassMode {
        PassMode::TwoPass
    }

    fn observe(&mut self, pixel: Color32) {
        self.events.borrow_mut().push(Event::Observe(pixel.r, pixel.g));
    }

    fn build_palette(&mut self, _previous: Palette) -> Palette {
        self.events.borrow_mut().push(Event::Palette);
        Palette::new(vec![Color32::BLACK])
    }

    fn map(&self, pixel: Color32) -> u8 {
        self.events.borrow_mut().push(Event::Map(pixel.r, pixel.g));
        0
    }
}

struct OversizedPalette;

impl QuantizeStrategy for OversizedPalette {
    fn pass_mode(&self) -> PassMode {
        PassMode::Single
    }

    fn build_palette(&mut self, _previous: Palette) -> Palette {
        Palette::new(vec![Color32::BLACK; 257])
    }

    fn map(&self, _pixel: Color32) -> u8 {
        0
    }
}

struct IndexPastPalette;

impl QuantizeStrategy for IndexPastPalette {
    fn pass_mode(&self) -> PassMode {
        PassMode::Single
    }

    fn build_palette(&mut self, _previous: Palette) -> Palette {
        Palette::new(vec![Color32::BLACK; 2])
    }

    fn map(&self, _pixel: Color32) -> u8 {
        2
    }
}

#[test_log::test]
fn grayscale_white_and_black() {
    let data = bgra(&[Color32::opaque(255, 255, 255), Color32::opaque(0, 0, 0)]);
    let source = PixelView::packed(&data, 2, 1).unwrap();
    let result = quantize(&source, GrayscaleStrategy::new(256).unwrap()).unwrap();

    let indices = result.pixels().to_packed();
    assert_eq!(indices, vec![255, 0]);
    assert_eq!(result.palette().get(indices[0]), Some(Color32::gray(255)));
    assert_eq!(result.palette().get(indices[1]), Some(Color32::gray(0)));
}

#[test]
fn uniform_red_with_every_strategy() {
    let red = Color32::new(255, 0, 0, 255);
    let data = bgra(&[red; 16]);
    let source = PixelView::packed(&data, 4, 4).unwrap();

    let fixed = Palette::new(vec![
        Color32::opaque(0, 0, 0),
        Color32::opaque(250, 10, 10),
        Color32::opaque(0, 0, 255),
    ]);
    let cases: Vec<(Box<dyn QuantizeStrategy>, Color32)> = vec![
        (Box::new(GrayscaleStrategy::default()), Color32::gray(76)),
        (Box::new(OctreeStrategy::new(255, 8).unwrap()), red),
        (Box::new(OctreeStrategy::new(15, 4).unwrap()), red),
        (
            Box::new(FixedPaletteStrategy::new(fixed).unwrap()),
            Color32::opaque(250, 10, 10),
        ),
    ];

    for (strategy, expected) in cases {
        let result = quantize(&source, strategy).unwrap();
        let indices = result.pixels().to_packed();
        assert_eq!(indices.len(), 16);
        assert!(indices.iter().all(|&i| i == indices[0]));
        assert!(result.palette_len() >= 1);
        assert_eq!(result.palette().get(indices[0]), Some(expected));
        assert_eq!(result.stats().map_calls, 1);
        assert_eq!(result.stats().cache_hits, 15);
    }
}

#[test]
fn uniform_image_maps_once() {
    for mode in [PassMode::Single, PassMode::TwoPass] {
        let observed = Rc::new(Cell::new(0));
        let mapped = Rc::new(Cell::new(0));
        let data = bgra(&[Color32::opaque(3, 4, 5); 7 * 5]);
        let source = PixelView::packed(&data, 7, 5).unwrap();
        let strategy = CountingStrategy {
            mode,
            observed: observed.clone(),
            mapped: mapped.clone(),
        };

        let result = quantize(&source, strategy).unwrap();

        assert_eq!(mapped.get(), 1);
        assert_eq!(result.stats().cache_hits, 34);
        let expected_observed = if mode == PassMode::TwoPass { 35 } else { 0 };
        assert_eq!(observed.get(), expected_observed);
    }
}

#[test]
fn single_pixel_image() {
    let mapped = Rc::new(Cell::new(0));
    let data = bgra(&[Color32::opaque(9, 9, 9)]);
    let source = PixelView::packed(&data, 1, 1).unwrap();
    let result = quantize(
        &source,
        CountingStrategy {
            mode: PassMode::Single,
            observed: Rc::new(Cell::new(0)),
            mapped: mapped.clone(),
        },
    )
    .unwrap();

    assert_eq!(result.pixels().to_packed().len(), 1);
    assert!(result.palette_len() > 0);
    assert_eq!(mapped.get(), 1);
    assert_eq!(result.stats().cache_hits, 0);

    for quality in [GifQuality::Grayscale, GifQuality::Bit4, GifQuality::Bit8] {
        let result = quantize(&source, quality.strategy().unwrap()).unwrap();
        assert_eq!((result.width(), result.height()), (1, 1));
        assert!(result.palette_len() > 0);
    }
}

#[test]
fn traversal_is_row_major_and_builds_first() {
    let (width, height) = (4usize, 3usize);
    let pixels: Vec<Color32> = (0..height)
        .flat_map(|y| (0..width).map(move |x| Color32::opaque(x as u8, y as u8, 0)))
        .collect();
    let data = bgra(&pixels);
    let events = Rc::new(RefCell::new(Vec::new()));
    let source = PixelView::packed(&data, width, height).unwrap();

    quantize(
        &source,
        RecordingStrategy {
            events: events.clone(),
        },
    )
    .unwrap();

    let events = events.borrow();
    let coords: Vec<(u8, u8)> = (0..height as u8)
        .flat_map(|y| (0..width as u8).map(move |x| (x, y)))
        .collect();
    let mut expected: Vec<Event> = coords.iter().map(|&(x, y)| Event::Observe(x, y)).collect();
    expected.push(Event::Palette);
    expected.extend(coords.iter().map(|&(x, y)| Event::Map(x, y)));
    assert_eq!(*events, expected);
}

#[test]
fn row_padding_is_ignored() {
    let (width, height) = (5usize, 4usize);
    let pixels = gradient(width, height);
    let packed = bgra(&pixels);

    // Same image with 12 bytes of noisy padding after every row.
    let stride = width * 4 + 12;
    let mut padded = Vec::new();
    for row in packed.chunks_exact(width * 4) {
        padded.extend_from_slice(row);
        padded.extend_from_slice(&[0xAB; 12]);
    }

    let a = quantize_bgra(&packed, width, height, width * 4, OctreeStrategy::new(8, 4).unwrap())
        .unwrap();
    let b = quantize_bgra(&padded, width, height, stride, OctreeStrategy::new(8, 4).unwrap())
        .unwrap();
    assert_eq!(a.pixels().to_packed(), b.pixels().to_packed());
    assert_eq!(a.palette(), b.palette());
}

#[test]
fn quantization_is_deterministic() {
    let (width, height) = (33usize, 17usize);
    let data = bgra(&gradient(width, height));
    let source = PixelView::packed(&data, width, height).unwrap();

    for quality in [GifQuality::Grayscale, GifQuality::Bit4, GifQuality::Bit8] {
        let a = quantize(&source, quality.strategy().unwrap()).unwrap();
        let b = quantize(&source, quality.strategy().unwrap()).unwrap();
        assert_eq!(a.pixels(), b.pixels(), "{quality:?}");
        assert_eq!(a.palette(), b.palette(), "{quality:?}");
    }
}

#[test]
fn indices_stay_inside_palette() {
    let (width, height) = (40usize, 30usize);
    let mut pixels = gradient(width, height);
    // A transparent block exercises the octree's reserved slot.
    for p in pixels.iter_mut().take(25) {
        p.a = 0;
    }
    let data = bgra(&pixels);
    let source = PixelView::packed(&data, width, height).unwrap();

    for quality in [GifQuality::Grayscale, GifQuality::Bit4, GifQuality::Bit8] {
        let result = quantize(&source, quality.strategy().unwrap()).unwrap();
        assert_eq!(result.width(), width);
        assert_eq!(result.height(), height);
        assert!(result.palette_len() <= 256);
        for &idx in &result.pixels().to_packed() {
            assert!((idx as usize) < result.palette_len(), "{quality:?}: {idx}");
        }
    }

    let result = quantize(&source, OctreeStrategy::new(15, 4).unwrap()).unwrap();
    assert_eq!(result.palette_len(), 16);
    assert_eq!(result.transparent_index(), Some(15));
    assert_eq!(result.pixels().get(0, 0).unwrap(), 15);
    assert_ne!(result.pixels().get(width - 1, height - 1).unwrap(), 15);
}

#[test]
fn zero_width_is_invalid() {
    assert!(matches!(
        quantize_bgra(&[], 0, 1, 0, GrayscaleStrategy::default()),
        Err(QuantizeError::InvalidImage(ImageDefect::ZeroDimension))
    ));
    assert!(matches!(
        quantize_bgra(&[0; 4], 1, 0, 4, GrayscaleStrategy::default()),
        Err(QuantizeError::InvalidImage(ImageDefect::ZeroDimension))
    ));
}

#[test]
fn short_stride_is_invalid() {
    assert!(matches!(
        quantize_bgra(&[0; 64], 4, 2, 12, GrayscaleStrategy::default()),
        Err(QuantizeError::InvalidImage(ImageDefect::StrideTooSmall { .. }))
    ));
}

#[test]
fn oversized_palette_is_an_error() {
    let data = bgra(&[Color32::BLACK; 4]);
    assert!(matches!(
        quantize_bgra(&data, 2, 2, 8, OversizedPalette),
        Err(QuantizeError::PaletteOverflow(257))
    ));
}

#[test]
fn index_past_palette_is_an_error() {
    let data = bgra(&[Color32::BLACK; 4]);
    assert!(matches!(
        quantize_bgra(&data, 2, 2, 8, IndexPastPalette),
        Err(QuantizeError::IndexOutOfPalette { index: 2, len: 2 })
    ));
}

#[test]
fn result_parts_transfer_ownership() {
    let data = bgra(&gradient(6, 2));
    let result = quantize_bgra(&data, 6, 2, 24, GrayscaleStrategy::new(16).unwrap()).unwrap();
    let (pixels, palette) = result.into_parts();
    assert_eq!(pixels.width(), 6);
    assert_eq!(pixels.stride(), 8);
    assert_eq!(palette.len(), 16);
}
