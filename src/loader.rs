//! # Image and Mask Decoding
use crate::error::{DecodeError, VocError};
use image::{DynamicImage, GrayImage, RgbImage};
use std::fmt::Debug;
use std::path::Path;

/// Decodes sample images and label masks.
pub trait ImageDecoder: Debug + Send + Sync {
    /// Decodes an RGB image.
    fn decode_image(
        &self,
        path: &Path,
    ) -> Result<RgbImage, VocError>;

    /// Decodes a single-channel class-id mask.
    fn decode_mask(
        &self,
        path: &Path,
    ) -> Result<GrayImage, VocError>;
}

/// An [`ImageDecoder`] reading files through the `image` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsImageDecoder;

impl FsImageDecoder {
    fn open(path: &Path) -> Result<DynamicImage, DecodeError> {
        image::open(path).map_err(|source| DecodeError::Image {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl ImageDecoder for FsImageDecoder {
    fn decode_image(
        &self,
        path: &Path,
    ) -> Result<RgbImage, VocError> {
        Ok(Self::open(path)?.into_rgb8())
    }

    fn decode_mask(
        &self,
        path: &Path,
    ) -> Result<GrayImage, VocError> {
        // Color conversion would blend class ids; only raw luma is accepted.
        match Self::open(path)? {
            DynamicImage::ImageLuma8(mask) => Ok(mask),
            other => Err(DecodeError::UnsupportedMask {
                path: path.to_path_buf(),
                color: other.color(),
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{assert_image_close, generate_gradient_pattern};
    use image::{ColorType, Luma};

    #[test]
    fn test_decode_image() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("img.png");

        let source = generate_gradient_pattern(12, 8);
        source.save(&path).unwrap();

        let decoded = FsImageDecoder.decode_image(&path).unwrap();
        assert_eq!(decoded.dimensions(), (12, 8));
        assert_image_close(&decoded, &source, None);
    }

    #[test]
    fn test_decode_mask() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("mask.png");

        let mask = GrayImage::from_fn(4, 3, |x, y| Luma([(x + y * 4) as u8 * 17]));
        mask.save(&path).unwrap();

        assert_eq!(FsImageDecoder.decode_mask(&path).unwrap(), mask);
    }

    #[test]
    fn test_decode_mask_rejects_rgb() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("mask.png");
        generate_gradient_pattern(4, 4).save(&path).unwrap();

        match FsImageDecoder.decode_mask(&path).unwrap_err() {
            VocError::Decode(DecodeError::UnsupportedMask { color, .. }) => {
                assert_eq!(color, ColorType::Rgb8);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = FsImageDecoder
            .decode_image(&temp_dir.path().join("nope.jpg"))
            .unwrap_err();
        assert!(matches!(err, VocError::Decode(DecodeError::Image { .. })));
    }
}
