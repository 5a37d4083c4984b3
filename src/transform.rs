//! # Paired Image / Label Transforms
//!
//! Geometric augmentation applied identically to an image and its label
//! mask. Labels are always resampled with nearest-neighbor filtering so no
//! new class ids are invented.
use anyhow::{Context, bail};
use image::imageops::{self, FilterType};
use image::{GrayImage, RgbImage};
use rand::{Rng, SeedableRng};
use std::fmt::Debug;
use std::sync::Arc;

/// Augmentation context, used by [`PairedTransform::apply`].
#[derive(Debug, Clone)]
pub struct PairedAugContext {
    /// The context random number generator.
    rng: rand::rngs::StdRng,
}

impl PairedAugContext {
    /// Construct a new context.
    pub fn new(rng: rand::rngs::StdRng) -> Self {
        Self { rng }
    }

    /// Construct a context seeded with `seed`.
    pub fn from_seed(seed: u64) -> Self {
        Self::new(rand::rngs::StdRng::seed_from_u64(seed))
    }

    /// Get a mutable reference to the context's random number generator.
    pub fn rng_mut(&mut self) -> &mut rand::rngs::StdRng {
        &mut self.rng
    }
}

/// A transform applied jointly to an image and its label mask.
pub trait PairedTransform: Debug + Send + Sync {
    /// Get the transform name.
    fn name(&self) -> &str;

    /// Apply the transform.
    ///
    /// # Arguments
    ///
    /// - `image`: the RGB image.
    /// - `label`: the label mask, same size as `image`.
    /// - `ctx`: the augmentation context.
    ///
    /// # Returns
    ///
    /// The transformed pair; both outputs share one size.
    fn apply(
        &self,
        image: RgbImage,
        label: GrayImage,
        ctx: &mut PairedAugContext,
    ) -> anyhow::Result<(RgbImage, GrayImage)>;
}

/// Validate a probability in the range ``[0.0, 1.0]``.
pub fn try_probability(prob: f64) -> anyhow::Result<f64> {
    if !(0.0..=1.0).contains(&prob) {
        bail!("probability must be in [0.0, 1.0]: {prob:?}");
    }
    Ok(prob)
}

/// Resizes both image and label to a fixed shape.
#[derive(Debug, Clone)]
pub struct PairedResize {
    width: u32,
    height: u32,
    filter: FilterType,
}

impl PairedResize {
    /// Creates a resize to `width` x `height`, filtering the image with `CatmullRom`.
    pub fn new(
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            width,
            height,
            filter: FilterType::CatmullRom,
        }
    }

    /// Extends the resize with an image filter; labels stay nearest-neighbor.
    pub fn with_filter(
        self,
        filter: FilterType,
    ) -> Self {
        Self { filter, ..self }
    }
}

impl PairedTransform for PairedResize {
    fn name(&self) -> &str {
        "resize"
    }

    fn apply(
        &self,
        image: RgbImage,
        label: GrayImage,
        _ctx: &mut PairedAugContext,
    ) -> anyhow::Result<(RgbImage, GrayImage)> {
        if image.dimensions() == (self.width, self.height) {
            return Ok((image, label));
        }
        let image = imageops::resize(&image, self.width, self.height, self.filter);
        let label = imageops::resize(&label, self.width, self.height, FilterType::Nearest);
        Ok((image, label))
    }
}

/// Flips both image and label horizontally with probability `prob`.
#[derive(Debug, Clone)]
pub struct PairedHorizontalFlip {
    prob: f64,
}

impl PairedHorizontalFlip {
    /// Creates a flip applied with probability `prob`.
    pub fn new(prob: f64) -> anyhow::Result<Self> {
        Ok(Self {
            prob: try_probability(prob)?,
        })
    }
}

impl PairedTransform for PairedHorizontalFlip {
    fn name(&self) -> &str {
        "horizontal_flip"
    }

    fn apply(
        &self,
        image: RgbImage,
        label: GrayImage,
        ctx: &mut PairedAugContext,
    ) -> anyhow::Result<(RgbImage, GrayImage)> {
        if ctx.rng_mut().random::<f64>() < self.prob {
            Ok((
                imageops::flip_horizontal(&image),
                imageops::flip_horizontal(&label),
            ))
        } else {
            Ok((image, label))
        }
    }
}

/// Crops the centered `width` x `height` window of both image and label.
#[derive(Debug, Clone)]
pub struct PairedCenterCrop {
    width: u32,
    height: u32,
}

impl PairedCenterCrop {
    /// Creates a center crop.
    pub fn new(
        width: u32,
        height: u32,
    ) -> Self {
        Self { width, height }
    }
}

impl PairedTransform for PairedCenterCrop {
    fn name(&self) -> &str {
        "center_crop"
    }

    fn apply(
        &self,
        image: RgbImage,
        label: GrayImage,
        _ctx: &mut PairedAugContext,
    ) -> anyhow::Result<(RgbImage, GrayImage)> {
        let (w, h) = image.dimensions();
        if w < self.width || h < self.height {
            bail!(
                "cannot crop {}x{} from a {w}x{h} image",
                self.width,
                self.height
            );
        }
        let x = (w - self.width) / 2;
        let y = (h - self.height) / 2;

        Ok((
            imageops::crop_imm(&image, x, y, self.width, self.height).to_image(),
            imageops::crop_imm(&label, x, y, self.width, self.height).to_image(),
        ))
    }
}

/// Applies a list of transforms in order.
#[derive(Debug, Clone, Default)]
pub struct PairedSequence {
    stages: Vec<Arc<dyn PairedTransform>>,
}

impl PairedSequence {
    /// Creates a sequence of `stages`.
    pub fn new(stages: Vec<Arc<dyn PairedTransform>>) -> Self {
        Self { stages }
    }

    /// Extends the sequence with another stage.
    pub fn with_stage<T>(
        mut self,
        stage: T,
    ) -> Self
    where
        T: PairedTransform + 'static,
    {
        self.stages.push(Arc::new(stage));
        self
    }

    /// The stages.
    pub fn stages(&self) -> &[Arc<dyn PairedTransform>] {
        &self.stages
    }
}

impl PairedTransform for PairedSequence {
    fn name(&self) -> &str {
        "sequence"
    }

    fn apply(
        &self,
        image: RgbImage,
        label: GrayImage,
        ctx: &mut PairedAugContext,
    ) -> anyhow::Result<(RgbImage, GrayImage)> {
        let mut pair = (image, label);
        for stage in &self.stages {
            pair = stage
                .apply(pair.0, pair.1, ctx)
                .with_context(|| format!("paired transform stage {:?} failed", stage.name()))?;
        }
        Ok(pair)
    }
}
