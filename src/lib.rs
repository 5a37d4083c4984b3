#![warn(missing_docs)]
//!# cil-voc - Class-Incremental Pascal VOC Segmentation
//!
//! Loads Pascal VOC image / mask pairs for one step of a class-incremental
//! segmentation task, remapping raw class ids into the task's contiguous
//! label space, and renders label masks with the VOC palette.
//!
//! ```no_run
//! use burn::data::dataset::Dataset;
//! use cil_voc::{Split, VocConfig, VocSegmentation};
//!
//! let config = VocConfig::new("/data/VOC2012".to_string(), "15-1".to_string());
//! let train = VocSegmentation::new(&config, Split::Train, 1)?;
//! let item = train.get(0).unwrap();
//! let preview = train.decode_target(&item.label);
//! # Ok::<(), cil_voc::VocError>(())
//! ```

pub mod batcher;
pub mod classes;
pub mod colormap;
pub mod config;
pub mod dataset;
pub mod error;
pub mod index;
pub mod loader;
pub mod remap;
pub mod tasks;
pub mod transform;

#[cfg(test)]
#[allow(dead_code)]
pub(crate) mod test_util;

pub use batcher::{SegmentationBatch, SegmentationBatcher};
pub use classes::{ClassId, IGNORE_INDEX, TaskDefinition, VisibleClasses};
pub use colormap::{ColorMap, VOC_COLOR_MAP};
pub use config::{Setting, Split, VocConfig};
pub use dataset::{SegmentationItem, VocSegmentation};
pub use error::{ConfigError, DecodeError, VocError, VocResult};
pub use remap::{LabelRemapper, OrderingTable, RemapMode, TargetClassSet};
pub use tasks::{StaticTaskCatalog, TaskCatalog, VocTaskCatalog};
