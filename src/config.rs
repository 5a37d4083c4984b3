//! # Dataset Configuration
use crate::classes::VisibleClasses;
use crate::remap::RemapMode;
use burn::config::Config;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Directory of RGB images, relative to the dataset root.
pub const IMAGE_DIR: &str = "JPEGImages";

/// Directory of augmented single-channel masks, relative to the dataset root.
pub const MASK_DIR: &str = "SegmentationClassAug";

/// The official validation list, relative to the dataset root.
pub const VAL_LIST: &str = "ImageSets/Segmentation/val.txt";

/// Default directory of per-step sample lists, relative to the dataset root.
pub const DEFAULT_LIST_DIR: &str = "ImageSets/CIL";

/// Incremental-learning protocol used to build the training lists.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Setting {
    /// Images may contain classes of future steps; those pixels become background.
    #[default]
    Overlap,

    /// Images contain only current and past classes; unseen pixels become background.
    Disjoint,

    /// Masks are used unfiltered.
    Sequential,
}

impl Setting {
    /// The directory name used by the sample lists.
    pub fn as_str(self) -> &'static str {
        match self {
            Setting::Overlap => "overlap",
            Setting::Disjoint => "disjoint",
            Setting::Sequential => "sequential",
        }
    }
}

impl Display for Setting {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dataset split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Split {
    /// Per-step training images.
    Train,

    /// Per-step validation images.
    Val,

    /// The full official validation set, evaluated without filtering.
    Test,
}

impl Split {
    /// The split name used by the sample lists.
    pub fn as_str(self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Val => "val",
            Split::Test => "test",
        }
    }

    /// The remap mode for this split under `setting`.
    pub fn remap_mode(
        self,
        setting: Setting,
    ) -> RemapMode {
        match (self, setting) {
            (Split::Test, _) => RemapMode::Eval,
            (_, Setting::Sequential) => RemapMode::TrainSequential,
            (_, Setting::Overlap | Setting::Disjoint) => RemapMode::TrainFiltered,
        }
    }
}

impl Display for Split {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for a class-incremental VOC dataset.
#[derive(Config, Debug)]
pub struct VocConfig {
    /// Root of the VOC tree (holding `JPEGImages/`, `SegmentationClassAug/`, ...).
    pub data_root: String,

    /// Task name, e.g. `"15-1"`.
    pub task: String,

    /// Incremental protocol.
    #[config(default = "Setting::Overlap")]
    pub setting: Setting,

    /// Which classes stay labeled during filtered training.
    #[config(default = "VisibleClasses::Cumulative")]
    pub visible_classes: VisibleClasses,

    /// Directory of per-step sample lists; defaults to `<data_root>/ImageSets/CIL`.
    #[config(default = "Option::None")]
    pub list_root: Option<String>,

    /// Base seed for per-sample augmentation.
    #[config(default = 42)]
    pub seed: u64,
}

impl VocConfig {
    /// The dataset root.
    pub fn root(&self) -> PathBuf {
        PathBuf::from(&self.data_root)
    }

    /// Directory of RGB images.
    pub fn image_dir(&self) -> PathBuf {
        self.root().join(IMAGE_DIR)
    }

    /// Directory of label masks.
    pub fn mask_dir(&self) -> PathBuf {
        self.root().join(MASK_DIR)
    }

    /// Path of the official validation list.
    pub fn val_list(&self) -> PathBuf {
        self.root().join(VAL_LIST)
    }

    /// Directory of per-step sample lists.
    pub fn list_dir(&self) -> PathBuf {
        match &self.list_root {
            Some(dir) => PathBuf::from(dir),
            None => self.root().join(DEFAULT_LIST_DIR),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_remap_mode() {
        assert_eq!(Split::Test.remap_mode(Setting::Overlap), RemapMode::Eval);
        assert_eq!(Split::Test.remap_mode(Setting::Sequential), RemapMode::Eval);
        assert_eq!(
            Split::Train.remap_mode(Setting::Sequential),
            RemapMode::TrainSequential
        );
        assert_eq!(
            Split::Train.remap_mode(Setting::Disjoint),
            RemapMode::TrainFiltered
        );
        assert_eq!(
            Split::Val.remap_mode(Setting::Overlap),
            RemapMode::TrainFiltered
        );
    }

    #[test]
    fn test_paths() {
        let config = VocConfig::new("/data/voc".to_string(), "15-1".to_string());
        assert_eq!(config.image_dir(), PathBuf::from("/data/voc/JPEGImages"));
        assert_eq!(
            config.mask_dir(),
            PathBuf::from("/data/voc/SegmentationClassAug")
        );
        assert_eq!(
            config.val_list(),
            PathBuf::from("/data/voc/ImageSets/Segmentation/val.txt")
        );
        assert_eq!(config.list_dir(), PathBuf::from("/data/voc/ImageSets/CIL"));

        let config = config.with_list_root(Some("/lists".to_string()));
        assert_eq!(config.list_dir(), PathBuf::from("/lists"));
    }

    #[test]
    fn test_config_json() {
        let config = VocConfig::new("/data/voc".to_string(), "15-1".to_string())
            .with_setting(Setting::Disjoint)
            .with_visible_classes(VisibleClasses::CurrentStep);

        let json = serde_json::to_string_pretty(&config).unwrap();
        assert_eq!(
            json,
            indoc! {r#"
                {
                  "data_root": "/data/voc",
                  "task": "15-1",
                  "setting": "disjoint",
                  "visible_classes": "current_step",
                  "list_root": null,
                  "seed": 42
                }"#
            }
        );

        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("voc.json");
        config.save(&path).unwrap();
        let loaded = VocConfig::load(&path).unwrap();
        assert_eq!(loaded.setting, Setting::Disjoint);
        assert_eq!(loaded.visible_classes, VisibleClasses::CurrentStep);
        assert_eq!(loaded.data_root, "/data/voc");
        assert_eq!(loaded.seed, 42);
    }
}
