//! Quantize an image and write it as a GIF.
//!
//!   cargo run --example encode_gif --features gif -- <input> [output.gif] [default|grayscale|bit4|bit8]

use gifquant::gif_backend::encode_gif;
use gifquant::{GifQuality, PixelView};

fn parse_quality(arg: Option<&str>) -> GifQuality {
    match arg {
        Some("default") => GifQuality::Default,
        Some("grayscale") => GifQuality::Grayscale,
        Some("bit4") => GifQuality::Bit4,
        _ => GifQuality::Bit8,
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let input = args
        .get(1)
        .expect("usage: encode_gif <input> [output.gif] [default|grayscale|bit4|bit8]");
    let output = args.get(2).cloned().unwrap_or_else(|| {
        let stem = input.rsplit_once('.').map_or(input.as_str(), |(s, _)| s);
        format!("{stem}.gif")
    });
    let quality = parse_quality(args.get(3).map(String::as_str));

    let img = image::open(input).unwrap().to_rgba8();
    let (w, h) = (img.width() as usize, img.height() as usize);
    // gifquant reads B, G, R, A byte order.
    let bgra: Vec<u8> = img
        .pixels()
        .flat_map(|p| [p.0[2], p.0[1], p.0[0], p.0[3]])
        .collect();

    let source = PixelView::packed(&bgra, w, h).unwrap();
    let file = std::fs::File::create(&output).unwrap();
    encode_gif(&source, quality, std::io::BufWriter::new(file)).unwrap();
    eprintln!("{input} ({w}x{h}) → {output} ({quality:?})");
}
