//! # Burn Batching
use crate::dataset::SegmentationItem;
use anyhow::bail;
use burn::data::dataloader::batcher::Batcher;
use burn::prelude::{Backend, Int, Tensor, TensorData};

/// A batch of segmentation samples.
#[derive(Clone, Debug)]
pub struct SegmentationBatch<B: Backend> {
    /// Images scaled to `[0, 1]`; shape `[N, 3, H, W]`.
    pub images: Tensor<B, 4>,

    /// Remapped labels; shape `[N, H, W]`.
    pub targets: Tensor<B, 3, Int>,

    /// Sample base-names, in batch order.
    pub file_names: Vec<String>,
}

/// Stacks [`SegmentationItem`]s of a common size into a [`SegmentationBatch`].
#[derive(Clone, Debug, Default)]
pub struct SegmentationBatcher {}

impl SegmentationBatcher {
    /// Creates a new `SegmentationBatcher`.
    pub fn new() -> Self {
        Self {}
    }

    /// Builds a batch, reporting empty input and size mismatches.
    pub fn try_batch<B: Backend>(
        &self,
        items: Vec<SegmentationItem>,
        device: &B::Device,
    ) -> anyhow::Result<SegmentationBatch<B>> {
        let Some(first) = items.first() else {
            bail!("cannot batch zero items");
        };
        let (width, height) = first.image.dimensions();
        let [h, w] = [height as usize, width as usize];
        let n = items.len();

        let mut pixels: Vec<f32> = Vec::with_capacity(n * h * w * 3);
        let mut labels: Vec<i64> = Vec::with_capacity(n * h * w);
        let mut file_names = Vec::with_capacity(n);

        for item in items {
            if item.image.dimensions() != (width, height)
                || item.label.dimensions() != (width, height)
            {
                bail!(
                    "sample {:?} is {:?} with label {:?}; batch size is {:?}",
                    item.file_name,
                    item.image.dimensions(),
                    item.label.dimensions(),
                    (width, height)
                );
            }
            pixels.extend(item.image.as_raw().iter().map(|&v| v as f32 / 255.0));
            labels.extend(item.label.as_raw().iter().map(|&v| v as i64));
            file_names.push(item.file_name);
        }

        let images: Tensor<B, 4> = Tensor::from_data(
            TensorData::new(pixels, [n, h, w, 3]).convert::<B::FloatElem>(),
            device,
        );
        // Change from [N, H, W, C] to [N, C, H, W]
        let images = images.permute([0, 3, 1, 2]);

        let targets: Tensor<B, 3, Int> = Tensor::from_data(
            TensorData::new(labels, [n, h, w]).convert::<B::IntElem>(),
            device,
        );

        Ok(SegmentationBatch {
            images,
            targets,
            file_names,
        })
    }
}

impl<B: Backend> Batcher<B, SegmentationItem, SegmentationBatch<B>> for SegmentationBatcher {
    fn batch(
        &self,
        items: Vec<SegmentationItem>,
        device: &B::Device,
    ) -> SegmentationBatch<B> {
        self.try_batch(items, device)
            .expect("Failed to build segmentation batch")
    }
}
