//! Test fixtures: synthetic images and on-disk VOC trees.
use crate::config::{DEFAULT_LIST_DIR, IMAGE_DIR, MASK_DIR, Setting, Split};
use image::{GrayImage, ImageBuffer, Luma, Rgb, RgbImage};
use std::path::Path;

/// Generates a simple gradient pattern image.
pub fn generate_gradient_pattern(
    width: u32,
    height: u32,
) -> RgbImage {
    let r_scale = (width.max(2) - 1) as f32;
    let g_scale = (height.max(2) - 1) as f32;
    let b_scale = (width + height).max(3) as f32 - 2.0;

    ImageBuffer::from_fn(width, height, |x, y| {
        let a = x as f32 * 255.0;
        let b = y as f32 * 255.0;

        Rgb([
            (a / r_scale) as u8,
            (b / g_scale) as u8,
            ((a + b) / b_scale) as u8,
        ])
    })
}

/// A mask whose pixels cycle through `classes` in raster order.
pub fn striped_mask(
    width: u32,
    height: u32,
    classes: &[u8],
) -> GrayImage {
    ImageBuffer::from_fn(width, height, |x, y| {
        Luma([classes[((y * width + x) as usize) % classes.len()]])
    })
}

/// Asserts that two images are similar within a given tolerance.
///
/// `tolerance` defaults to 0.01 of the hybrid similarity score.
pub fn assert_image_close(
    actual: &RgbImage,
    expected: &RgbImage,
    tolerance: Option<f64>,
) {
    let tolerance = tolerance.unwrap_or(0.01);
    match image_compare::rgb_hybrid_compare(actual, expected) {
        Ok(similarity) => {
            let target_score = 1.0 - tolerance;
            assert!(
                similarity.score >= target_score,
                "Image similarity {} < target {target_score}",
                similarity.score
            );
        }
        Err(e) => panic!("Image comparison failed: {e:?}"),
    }
}

/// Writes a VOC tree under `root`.
///
/// Every sample gets `JPEGImages/<name>.jpg` and `SegmentationClassAug/<name>.png`;
/// all names go to the official val list.
pub fn write_voc_tree(
    root: &Path,
    samples: &[(&str, RgbImage, GrayImage)],
) {
    std::fs::create_dir_all(root.join(IMAGE_DIR)).unwrap();
    std::fs::create_dir_all(root.join(MASK_DIR)).unwrap();
    std::fs::create_dir_all(root.join("ImageSets/Segmentation")).unwrap();

    for (name, image, mask) in samples {
        image
            .save(root.join(IMAGE_DIR).join(format!("{name}.jpg")))
            .unwrap();
        mask.save(root.join(MASK_DIR).join(format!("{name}.png")))
            .unwrap();
    }

    let names: Vec<&str> = samples.iter().map(|(name, _, _)| *name).collect();
    std::fs::write(
        root.join("ImageSets/Segmentation/val.txt"),
        names.join("\n"),
    )
    .unwrap();
}

/// Writes a per-step sample list in the default list layout.
pub fn write_step_list(
    root: &Path,
    task: &str,
    setting: Setting,
    split: Split,
    step: usize,
    names: &[&str],
) {
    let dir = root.join(DEFAULT_LIST_DIR).join(task).join(setting.as_str());
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join(format!("{}_cls{step}.txt", split.as_str())),
        names.join("\n"),
    )
    .unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_gradient_pattern() {
        let image = generate_gradient_pattern(32, 32);
        assert_image_close(&image, &image, None);

        assert_eq!(image.get_pixel(0, 0), &Rgb([0, 0, 0]));
        assert_eq!(image.get_pixel(16, 16), &Rgb([131, 131, 131]));
        assert_eq!(image.get_pixel(31, 31), &Rgb([255, 255, 255]));
    }

    #[test]
    fn test_striped_mask() {
        let mask = striped_mask(3, 2, &[0, 7]);
        assert_eq!(mask.as_raw(), &vec![0, 7, 0, 7, 0, 7]);
    }
}
