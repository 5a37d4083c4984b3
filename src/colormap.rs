//! # VOC Label Color Map
//!
//! The standard Pascal VOC palette, used to render label masks as RGB.
use crate::classes::{ClassId, NUM_LABEL_VALUES};
use image::{GrayImage, ImageBuffer, Rgb, Rgb32FImage, RgbImage};

/// Marker class rendered in light gray.
pub const UNKNOWN_CLASS: ClassId = 200;

/// Background marker rendered in black.
pub const BACKGROUND_MARKER: ClassId = 254;

/// The shared VOC color map.
pub const VOC_COLOR_MAP: ColorMap = ColorMap::voc();

/// A 256-entry table of RGB colors, indexed by label value.
#[derive(Clone, PartialEq, Eq)]
pub struct ColorMap {
    colors: [[u8; 3]; NUM_LABEL_VALUES],
}

impl std::fmt::Debug for ColorMap {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("ColorMap")
            .field("len", &self.colors.len())
            .finish()
    }
}

impl Default for ColorMap {
    fn default() -> Self {
        Self::voc()
    }
}

impl ColorMap {
    /// Builds the VOC palette.
    ///
    /// Bits 0, 1 and 2 of each successive 3-bit group of the index fill the
    /// red, green and blue channels from the most significant bit down.
    /// `254` and `255` are black; `200` is light gray.
    pub const fn voc() -> Self {
        let mut colors = [[0u8; 3]; NUM_LABEL_VALUES];

        let mut i = 0;
        while i < NUM_LABEL_VALUES {
            let mut c = i;
            let mut r = 0u8;
            let mut g = 0u8;
            let mut b = 0u8;

            let mut j = 0;
            while j < 8 {
                r |= ((c & 1) as u8) << (7 - j);
                g |= (((c >> 1) & 1) as u8) << (7 - j);
                b |= (((c >> 2) & 1) as u8) << (7 - j);
                c >>= 3;
                j += 1;
            }

            colors[i] = [r, g, b];
            i += 1;
        }

        colors[BACKGROUND_MARKER as usize] = [0, 0, 0];
        colors[255] = [0, 0, 0];
        colors[UNKNOWN_CLASS as usize] = [192, 192, 192];

        Self { colors }
    }

    /// The color of `class`.
    pub fn color(
        &self,
        class: ClassId,
    ) -> [u8; 3] {
        self.colors[class as usize]
    }

    /// The full table.
    pub fn colors(&self) -> &[[u8; 3]; NUM_LABEL_VALUES] {
        &self.colors
    }

    /// The table scaled to `[0.0, 1.0]`.
    pub fn normalized(&self) -> [[f32; 3]; NUM_LABEL_VALUES] {
        let mut out = [[0.0f32; 3]; NUM_LABEL_VALUES];
        for (dst, src) in out.iter_mut().zip(self.colors.iter()) {
            for k in 0..3 {
                dst[k] = src[k] as f32 / 255.0;
            }
        }
        out
    }

    /// Renders a label mask as an RGB image.
    pub fn decode(
        &self,
        mask: &GrayImage,
    ) -> RgbImage {
        ImageBuffer::from_fn(mask.width(), mask.height(), |x, y| {
            Rgb(self.color(mask.get_pixel(x, y).0[0]))
        })
    }

    /// Renders a label mask as an RGB image with channels in `[0.0, 1.0]`.
    pub fn decode_normalized(
        &self,
        mask: &GrayImage,
    ) -> Rgb32FImage {
        let table = self.normalized();
        ImageBuffer::from_fn(mask.width(), mask.height(), |x, y| {
            Rgb(table[mask.get_pixel(x, y).0[0] as usize])
        })
    }
}
