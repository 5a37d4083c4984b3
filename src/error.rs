//! # Dataset Errors
//!
//! Construction-time checks fail fast with [`ConfigError`] or
//! [`VocError::IndexMismatch`]; per-sample failures surface as [`DecodeError`].
use crate::classes::ClassId;
use image::ColorType;
use std::path::PathBuf;

/// Convenience alias for results in this crate.
pub type VocResult<T> = Result<T, VocError>;

/// Invalid dataset layout or task configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The dataset root is not a directory.
    #[error("dataset not found or corrupted: {0}")]
    DatasetNotFound(PathBuf),

    /// A required dataset subdirectory is missing.
    #[error("required directory not found: {0}; prepare it before loading the dataset")]
    MissingDirectory(PathBuf),

    /// The task catalog has no task with this name.
    #[error("unknown task: {0:?}")]
    UnknownTask(String),

    /// The task defines no steps.
    #[error("task {0:?} defines no steps")]
    EmptyTask(String),

    /// The requested step is past the last step of the task.
    #[error("step {step} out of range for task {task:?} with {steps} steps")]
    StepOutOfRange {
        /// The task name.
        task: String,
        /// The requested step.
        step: usize,
        /// Number of steps in the task.
        steps: usize,
    },

    /// A class id appears more than once in the global class order.
    #[error("class {class} appears at positions {first} and {second} of the class order")]
    DuplicateClass {
        /// The repeated class.
        class: ClassId,
        /// Position of the first occurrence.
        first: usize,
        /// Position of the repeated occurrence.
        second: usize,
    },

    /// The global class order has more positions than non-ignore label values.
    #[error("class order has {0} entries; at most 255 fit below the ignore index")]
    TooManyClasses(usize),
}

/// Failure to read or decode a sample.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// A file could not be read.
    #[error("failed to read {path}")]
    Io {
        /// The file path.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// An image file could not be opened or decoded.
    #[error("failed to decode image {path}")]
    Image {
        /// The file path.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: image::ImageError,
    },

    /// A mask is not an 8-bit single channel image.
    #[error("mask {path} has color type {color:?}; expected 8-bit luma")]
    UnsupportedMask {
        /// The file path.
        path: PathBuf,
        /// The decoded color type.
        color: ColorType,
    },

    /// Image and mask dimensions disagree.
    #[error("image is {image:?} but mask is {mask:?} for sample {file_name:?}")]
    ShapeMismatch {
        /// The sample base-name.
        file_name: String,
        /// Image `(width, height)`.
        image: (u32, u32),
        /// Mask `(width, height)`.
        mask: (u32, u32),
    },
}

/// Top-level error for dataset construction and sample access.
#[derive(Debug, thiserror::Error)]
pub enum VocError {
    /// See [`ConfigError`].
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Image and mask lists have different lengths.
    #[error("image list has {images} entries but mask list has {masks}")]
    IndexMismatch {
        /// Number of image paths.
        images: usize,
        /// Number of mask paths.
        masks: usize,
    },

    /// See [`DecodeError`].
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Sample index past the end of the dataset.
    #[error("sample index {index} out of bounds for dataset of {len} samples")]
    OutOfBounds {
        /// The requested index.
        index: usize,
        /// The dataset length.
        len: usize,
    },

    /// A paired transform failed.
    #[error("paired transform failed")]
    Transform(#[source] anyhow::Error),
}
