//! # Class-Incremental Label Remapping
//!
//! Raw VOC class ids are rewritten into the contiguous label space of a
//! class-incremental task: the label of a class is its position in the
//! task's global class order. Every table here is a fixed 256-entry array
//! indexed by the raw pixel value, so a remap is a single table pass.
use crate::classes::{ClassId, IGNORE_INDEX, NUM_LABEL_VALUES, TaskDefinition, VisibleClasses};
use crate::error::ConfigError;
use image::GrayImage;
use serde::{Deserialize, Serialize};

/// How a raw mask is filtered before reordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemapMode {
    /// Pixels outside the [`TargetClassSet`] become background (`0`) first.
    TrainFiltered,

    /// All pixels keep their raw class before reordering.
    TrainSequential,

    /// Evaluation; no filtering.
    Eval,
}

impl RemapMode {
    /// Whether this mode zeroes out classes outside the target set.
    pub fn filters(self) -> bool {
        matches!(self, RemapMode::TrainFiltered)
    }
}

/// Maps a raw class id to its position in the global class order.
///
/// Classes absent from the order map to [`IGNORE_INDEX`].
#[derive(Clone, PartialEq, Eq)]
pub struct OrderingTable {
    table: [ClassId; NUM_LABEL_VALUES],
    num_classes: usize,
}

impl std::fmt::Debug for OrderingTable {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        let mapped: Vec<(usize, ClassId)> = self
            .table
            .iter()
            .enumerate()
            .filter(|&(_, &p)| p != IGNORE_INDEX)
            .map(|(c, &p)| (c, p))
            .collect();
        f.debug_struct("OrderingTable")
            .field("num_classes", &self.num_classes)
            .field("mapped", &mapped)
            .finish()
    }
}

impl OrderingTable {
    /// Builds the inverse permutation of `order`.
    ///
    /// # Arguments
    ///
    /// * `order` - the global class order; `order[p]` is the class at position `p`.
    ///
    /// # Returns
    ///
    /// A table with `table[order[p]] == p`; or an error if a class repeats or the
    /// order does not fit below [`IGNORE_INDEX`].
    pub fn from_order(order: &[ClassId]) -> Result<Self, ConfigError> {
        if order.len() > IGNORE_INDEX as usize {
            return Err(ConfigError::TooManyClasses(order.len()));
        }

        let mut table = [IGNORE_INDEX; NUM_LABEL_VALUES];
        let mut seen: [Option<usize>; NUM_LABEL_VALUES] = [None; NUM_LABEL_VALUES];

        for (position, &class) in order.iter().enumerate() {
            if let Some(first) = seen[class as usize] {
                return Err(ConfigError::DuplicateClass {
                    class,
                    first,
                    second: position,
                });
            }
            seen[class as usize] = Some(position);
            table[class as usize] = position as ClassId;
        }

        Ok(Self {
            table,
            num_classes: order.len(),
        })
    }

    /// Position of `class` in the global order, or [`IGNORE_INDEX`].
    pub fn get(
        &self,
        class: ClassId,
    ) -> ClassId {
        self.table[class as usize]
    }

    /// Length of the global class order.
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// The raw lookup table.
    pub fn as_array(&self) -> &[ClassId; NUM_LABEL_VALUES] {
        &self.table
    }
}

/// Membership table for the classes visible at the current step.
///
/// [`IGNORE_INDEX`] is always a member.
#[derive(Clone, PartialEq, Eq)]
pub struct TargetClassSet {
    members: [bool; NUM_LABEL_VALUES],
}

impl std::fmt::Debug for TargetClassSet {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_set().entries(self.classes()).finish()
    }
}

impl TargetClassSet {
    /// Creates a set from `classes` plus [`IGNORE_INDEX`].
    pub fn new<I>(classes: I) -> Self
    where
        I: IntoIterator<Item = ClassId>,
    {
        let mut members = [false; NUM_LABEL_VALUES];
        for class in classes {
            members[class as usize] = true;
        }
        members[IGNORE_INDEX as usize] = true;
        Self { members }
    }

    /// Returns `true` if `class` is visible.
    pub fn contains(
        &self,
        class: ClassId,
    ) -> bool {
        self.members[class as usize]
    }

    /// The member classes, ascending.
    pub fn classes(&self) -> Vec<ClassId> {
        (0..NUM_LABEL_VALUES)
            .filter(|&c| self.members[c])
            .map(|c| c as ClassId)
            .collect()
    }
}

/// Remaps raw VOC masks into the label space of a class-incremental step.
///
/// Built once per dataset; immutable and freely shared afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelRemapper {
    order: Vec<ClassId>,
    ordering: OrderingTable,
    targets: TargetClassSet,

    /// `ordering` composed with the target-set filter.
    filtered: [ClassId; NUM_LABEL_VALUES],
}

impl LabelRemapper {
    /// Builds the remapper for `step` of a task.
    ///
    /// # Arguments
    ///
    /// * `task_name` - the task name, for error reporting.
    /// * `task` - the per-step class sets.
    /// * `step` - the current step.
    /// * `visible` - which classes the target set holds.
    pub fn new(
        task_name: &str,
        task: &TaskDefinition,
        step: usize,
        visible: VisibleClasses,
    ) -> Result<Self, ConfigError> {
        if task.is_empty() {
            return Err(ConfigError::EmptyTask(task_name.to_string()));
        }
        let visible_classes =
            task.visible_classes(step, visible)
                .ok_or_else(|| ConfigError::StepOutOfRange {
                    task: task_name.to_string(),
                    step,
                    steps: task.num_steps(),
                })?;

        let order = task.global_order();
        let ordering = OrderingTable::from_order(&order)?;

        tracing::trace!(
            task = task_name,
            step,
            num_classes = order.len(),
            "built class ordering table"
        );

        Ok(Self::from_parts(
            order,
            ordering,
            TargetClassSet::new(visible_classes),
        ))
    }

    /// Assembles a remapper from prebuilt tables.
    ///
    /// `order` must be the order `ordering` was built from.
    pub fn from_parts(
        order: Vec<ClassId>,
        ordering: OrderingTable,
        targets: TargetClassSet,
    ) -> Self {
        let mut filtered = [IGNORE_INDEX; NUM_LABEL_VALUES];
        let background = ordering.get(0);
        for (value, slot) in filtered.iter_mut().enumerate() {
            let value = value as ClassId;
            *slot = if targets.contains(value) {
                ordering.get(value)
            } else {
                background
            };
        }

        Self {
            order,
            ordering,
            targets,
            filtered,
        }
    }

    /// The global class order.
    pub fn global_order(&self) -> &[ClassId] {
        &self.order
    }

    /// The ordering table.
    pub fn ordering(&self) -> &OrderingTable {
        &self.ordering
    }

    /// The classes visible at this step.
    pub fn targets(&self) -> &TargetClassSet {
        &self.targets
    }

    /// Number of classes in the task, over all steps.
    pub fn num_classes(&self) -> usize {
        self.order.len()
    }

    /// The single lookup table that implements `mode`.
    pub fn table(
        &self,
        mode: RemapMode,
    ) -> &[ClassId; NUM_LABEL_VALUES] {
        if mode.filters() {
            &self.filtered
        } else {
            self.ordering.as_array()
        }
    }

    /// Remaps one raw pixel value.
    pub fn remap_value(
        &self,
        value: ClassId,
        mode: RemapMode,
    ) -> ClassId {
        self.table(mode)[value as usize]
    }

    /// Remaps raw labels in place.
    pub fn remap_in_place(
        &self,
        labels: &mut [ClassId],
        mode: RemapMode,
    ) {
        let table = self.table(mode);
        for v in labels.iter_mut() {
            *v = table[*v as usize];
        }
    }

    /// Returns a remapped copy of `mask`.
    pub fn remap(
        &self,
        mask: &GrayImage,
        mode: RemapMode,
    ) -> GrayImage {
        let mut out = mask.clone();
        self.remap_in_place(&mut out, mode);
        out
    }
}
