/// A 32-bit pixel as it sits in memory: blue, green, red, alpha.
///
/// The packed view ([`Color32::argb`]) is the little-endian `u32` of those four
/// bytes, so it reads `0xAARRGGBB`. Two pixels are equal exactly when their
/// packed values are equal, which is what the output pass relies on when it
/// skips repeated pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color32 {
    pub b: u8,
    pub g: u8,
    pub r: u8,
    pub a: u8,
}

impl Color32 {
    /// Bytes per pixel in a source buffer.
    pub const SIZE: usize = 4;

    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { b, g, r, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn gray(v: u8) -> Self {
        Self::new(v, v, v, 255)
    }

    /// Packed `0xAARRGGBB` value.
    #[inline]
    pub const fn argb(self) -> u32 {
        u32::from_le_bytes(self.to_bgra_bytes())
    }

    #[inline]
    pub const fn from_argb(argb: u32) -> Self {
        Self::from_bgra_bytes(argb.to_le_bytes())
    }

    #[inline]
    pub const fn from_bgra_bytes(bytes: [u8; 4]) -> Self {
        Self {
            b: bytes[0],
            g: bytes[1],
            r: bytes[2],
            a: bytes[3],
        }
    }

    #[inline]
    pub const fn to_bgra_bytes(self) -> [u8; 4] {
        [self.b, self.g, self.r, self.a]
    }

    /// Squared Euclidean distance over the color channels, alpha excluded.
    pub fn distance_sq(self, other: Self) -> u32 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;
        (dr * dr + dg * dg + db * db) as u32
    }
}

impl From<rgb::RGBA8> for Color32 {
    fn from(p: rgb::RGBA8) -> Self {
        Self::new(p.r, p.g, p.b, p.a)
    }
}

impl From<Color32> for rgb::RGBA8 {
    fn from(c: Color32) -> Self {
        rgb::RGBA8 {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

impl From<rgb::RGB8> for Color32 {
    fn from(p: rgb::RGB8) -> Self {
        Self::opaque(p.r, p.g, p.b)
    }
}
