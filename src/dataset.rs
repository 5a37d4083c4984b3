//! # Class-Incremental VOC Segmentation Dataset
use crate::colormap::{ColorMap, VOC_COLOR_MAP};
use crate::config::{Split, VocConfig};
use crate::error::{ConfigError, DecodeError, VocError, VocResult};
use crate::index::{FileIndex, SplitListIndex, read_name_list};
use crate::loader::{FsImageDecoder, ImageDecoder};
use crate::remap::{LabelRemapper, RemapMode};
use crate::tasks::{TaskCatalog, VocTaskCatalog};
use crate::transform::{PairedAugContext, PairedTransform};
use burn::data::dataset::Dataset;
use burn::tensor::TensorData;
use image::{GrayImage, RgbImage};
use std::path::PathBuf;
use std::sync::Arc;

/// A loaded sample.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentationItem {
    /// The RGB image.
    pub image: RgbImage,

    /// The remapped label mask, same size as `image`.
    pub label: GrayImage,

    /// The sample base-name.
    pub file_name: String,
}

impl SegmentationItem {
    /// The label as an `i64` tensor of shape `[H, W]`.
    pub fn label_to_tensor_data(&self) -> TensorData {
        let (width, height) = self.label.dimensions();
        let data: Vec<i64> = self.label.as_raw().iter().map(|&v| v as i64).collect();
        TensorData::new(data, [height as usize, width as usize])
    }

    /// The image as an `f32` tensor of shape `[H, W, 3]`, scaled to `[0.0, 1.0]`.
    pub fn image_to_tensor_data(&self) -> TensorData {
        let (width, height) = self.image.dimensions();
        let data: Vec<f32> = self
            .image
            .as_raw()
            .iter()
            .map(|&v| v as f32 / 255.0)
            .collect();
        TensorData::new(data, [height as usize, width as usize, 3])
    }
}

/// Pascal VOC segmentation samples for one step of a class-incremental task.
///
/// Masks are remapped into the task's contiguous label space on load; see
/// [`LabelRemapper`].
#[derive(Debug)]
pub struct VocSegmentation {
    split: Split,
    step: usize,
    mode: RemapMode,
    seed: u64,

    file_names: Vec<String>,
    images: Vec<PathBuf>,
    masks: Vec<PathBuf>,

    remapper: LabelRemapper,
    color_map: ColorMap,

    decoder: Arc<dyn ImageDecoder>,
    transform: Option<Arc<dyn PairedTransform>>,
}

impl VocSegmentation {
    /// Opens `split` at `step` with the built-in VOC tasks, list files and decoder.
    pub fn new(
        config: &VocConfig,
        split: Split,
        step: usize,
    ) -> VocResult<Self> {
        Self::with_collaborators(
            config,
            split,
            step,
            &VocTaskCatalog,
            &SplitListIndex::new(config.list_dir()),
            Arc::new(FsImageDecoder),
        )
    }

    /// Opens `split` at `step` with explicit collaborators.
    ///
    /// # Arguments
    ///
    /// * `config` - the dataset configuration.
    /// * `split` - the split; [`Split::Test`] reads the official val list.
    /// * `step` - the class-incremental step.
    /// * `catalog` - resolves `config.task` into per-step classes.
    /// * `index` - lists the sample names of the train and val splits.
    /// * `decoder` - decodes images and masks on access.
    pub fn with_collaborators(
        config: &VocConfig,
        split: Split,
        step: usize,
        catalog: &dyn TaskCatalog,
        index: &dyn FileIndex,
        decoder: Arc<dyn ImageDecoder>,
    ) -> VocResult<Self> {
        let root = config.root();
        if !root.is_dir() {
            return Err(ConfigError::DatasetNotFound(root).into());
        }
        let mask_dir = config.mask_dir();
        if !mask_dir.exists() {
            return Err(ConfigError::MissingDirectory(mask_dir).into());
        }
        let image_dir = config.image_dir();

        let task = catalog.task_steps(&config.task)?;
        let remapper = LabelRemapper::new(&config.task, &task, step, config.visible_classes)?;

        let file_names = match split {
            Split::Test => read_name_list(config.val_list())?,
            _ => index.sample_names(&config.task, step, split, config.setting)?,
        };

        let images: Vec<PathBuf> = file_names
            .iter()
            .map(|name| image_dir.join(format!("{name}.jpg")))
            .collect();
        let masks: Vec<PathBuf> = file_names
            .iter()
            .map(|name| mask_dir.join(format!("{name}.png")))
            .collect();

        if images.len() != masks.len() {
            return Err(VocError::IndexMismatch {
                images: images.len(),
                masks: masks.len(),
            });
        }

        let mode = split.remap_mode(config.setting);

        tracing::info!(
            task = %config.task,
            step,
            split = %split,
            setting = %config.setting,
            samples = file_names.len(),
            classes = remapper.num_classes(),
            "opened VOC segmentation dataset"
        );

        Ok(Self {
            split,
            step,
            mode,
            seed: config.seed,
            file_names,
            images,
            masks,
            remapper,
            color_map: VOC_COLOR_MAP,
            decoder,
            transform: None,
        })
    }

    /// Extends the dataset with a paired transform applied after remapping.
    pub fn with_transform(
        self,
        transform: Arc<dyn PairedTransform>,
    ) -> Self {
        Self {
            transform: Some(transform),
            ..self
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Returns `true` if the dataset has no samples.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// The split.
    pub fn split(&self) -> Split {
        self.split
    }

    /// The class-incremental step.
    pub fn step(&self) -> usize {
        self.step
    }

    /// The remap mode applied to masks.
    pub fn mode(&self) -> RemapMode {
        self.mode
    }

    /// The label remapper.
    pub fn remapper(&self) -> &LabelRemapper {
        &self.remapper
    }

    /// The color map used by [`Self::decode_target`].
    pub fn color_map(&self) -> &ColorMap {
        &self.color_map
    }

    /// Sample base-names, in sample order.
    pub fn file_names(&self) -> &[String] {
        &self.file_names
    }

    /// Image paths, in sample order.
    pub fn image_paths(&self) -> &[PathBuf] {
        &self.images
    }

    /// Mask paths, in sample order.
    pub fn mask_paths(&self) -> &[PathBuf] {
        &self.masks
    }

    /// Loads sample `index`, seeding augmentation from the configured seed.
    pub fn try_get(
        &self,
        index: usize,
    ) -> VocResult<SegmentationItem> {
        self.try_get_with_seed(index, self.seed.wrapping_add(index as u64))
    }

    /// Loads sample `index` with an explicit augmentation seed.
    pub fn try_get_with_seed(
        &self,
        index: usize,
        seed: u64,
    ) -> VocResult<SegmentationItem> {
        if index >= self.len() {
            return Err(VocError::OutOfBounds {
                index,
                len: self.len(),
            });
        }
        let file_name = &self.file_names[index];
        tracing::debug!(index, file_name = %file_name, "loading sample");

        let image = self.decoder.decode_image(&self.images[index])?;
        let mut label = self.decoder.decode_mask(&self.masks[index])?;

        if image.dimensions() != label.dimensions() {
            return Err(DecodeError::ShapeMismatch {
                file_name: file_name.clone(),
                image: image.dimensions(),
                mask: label.dimensions(),
            }
            .into());
        }

        self.remapper.remap_in_place(&mut label, self.mode);

        let (image, label) = match &self.transform {
            Some(transform) => transform
                .apply(image, label, &mut PairedAugContext::from_seed(seed))
                .map_err(VocError::Transform)?,
            None => (image, label),
        };

        Ok(SegmentationItem {
            image,
            label,
            file_name: file_name.clone(),
        })
    }

    /// Renders a label mask with the VOC palette.
    pub fn decode_target(
        &self,
        mask: &GrayImage,
    ) -> RgbImage {
        self.color_map.decode(mask)
    }
}

impl Dataset<SegmentationItem> for VocSegmentation {
    fn get(
        &self,
        index: usize,
    ) -> Option<SegmentationItem> {
        if index >= self.images.len() {
            return None;
        }
        Some(
            self.try_get(index)
                .unwrap_or_else(|err| panic!("Failed to load sample {index}: {err}")),
        )
    }

    fn len(&self) -> usize {
        self.images.len()
    }
}
