use alloc::boxed::Box;

use crate::grayscale::GrayscaleStrategy;
use crate::octree::OctreeStrategy;
use crate::strategy::QuantizeStrategy;

/// Output presets for GIF encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GifQuality {
    /// No quantization here: the encoder receives true color and picks its own palette.
    Default,
    /// 256 gray levels.
    Grayscale,
    /// Octree, 15 colors + transparent, 4 bits per channel.
    Bit4,
    /// Octree, 255 colors + transparent, 4 bits per channel.
    #[default]
    Bit8,
}

impl GifQuality {
    /// A fresh strategy for one image, or `None` for pass-through.
    pub fn strategy(self) -> Option<Box<dyn QuantizeStrategy>> {
        match self {
            Self::Default => None,
            Self::Grayscale => Some(Box::new(GrayscaleStrategy::default())),
            Self::Bit4 => Some(Box::new(octree(15))),
            Self::Bit8 => Some(Box::new(octree(255))),
        }
    }
}

fn octree(max_colors: u32) -> OctreeStrategy {
    match OctreeStrategy::new(max_colors, 4) {
        Ok(s) => s,
        Err(_) => unreachable!("preset octree parameters are in range"),
    }
}
