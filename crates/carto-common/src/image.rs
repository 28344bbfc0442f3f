//! RGBA bitmaps shared between the layer and the style resolver.
//!
//! Pattern fills are synthesized from small preloaded symbol bitmaps. A
//! bitmap remembers whether its pixels may be read back: images loaded from
//! another origin without CORS approval are drawable but not readable.

/// Decoded RGBA pixel data for a preloaded symbol image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    /// Width of the image in pixels.
    width: u32,
    /// Height of the image in pixels.
    height: u32,
    /// Raw RGBA pixel data (width * height * 4 bytes).
    rgba_data: Vec<u8>,
    /// False when the image came from a foreign origin and is tainted.
    origin_clean: bool,
}

impl Bitmap {
    /// Create a readable `Bitmap` from decoded RGBA pixel data.
    ///
    /// # Arguments
    ///
    /// * `width` - Width of the image in pixels
    /// * `height` - Height of the image in pixels
    /// * `rgba_data` - Raw RGBA pixel data (should be `width * height * 4` bytes;
    ///   missing trailing pixels read as transparent black)
    #[must_use]
    pub const fn new(width: u32, height: u32, rgba_data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            rgba_data,
            origin_clean: true,
        }
    }

    /// Create a bitmap whose pixels cannot be read back.
    #[must_use]
    pub const fn cross_origin(width: u32, height: u32, rgba_data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            rgba_data,
            origin_clean: false,
        }
    }

    /// Create a bitmap filled with one RGBA color.
    #[must_use]
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let len = width as usize * height as usize;
        Self::new(width, height, rgba.repeat(len))
    }

    /// Width of the image in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the image in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Whether the pixel data may be read back.
    #[must_use]
    pub const fn is_origin_clean(&self) -> bool {
        self.origin_clean
    }

    /// Raw RGBA pixel data.
    #[must_use]
    pub fn rgba_data(&self) -> &[u8] {
        &self.rgba_data
    }

    /// RGBA value of the pixel at `(x, y)`, or `None` outside the image.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.rgba_data.get(offset..offset + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}
