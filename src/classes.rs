//! # Class Ids and Task Definitions
use serde::{Deserialize, Serialize};

/// A raw label value; one per mask pixel.
pub type ClassId = u8;

/// Label value excluded from loss and metrics.
pub const IGNORE_INDEX: ClassId = 255;

/// Number of distinct [`ClassId`] values; the size of every lookup table.
pub const NUM_LABEL_VALUES: usize = 256;

/// Which classes count as visible at a training step.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibleClasses {
    /// Every class introduced at or before the step.
    #[default]
    Cumulative,

    /// Only the classes introduced at the step; earlier classes read as background.
    CurrentStep,
}

/// Ordered per-step class sets of a class-incremental task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDefinition {
    steps: Vec<Vec<ClassId>>,
}

impl TaskDefinition {
    /// Creates a task from its per-step class sets, in step order.
    pub fn new(steps: Vec<Vec<ClassId>>) -> Self {
        Self { steps }
    }

    /// The per-step class sets.
    pub fn steps(&self) -> &[Vec<ClassId>] {
        &self.steps
    }

    /// Number of steps.
    pub fn num_steps(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if the task has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Classes introduced at `step`, if the step exists.
    pub fn step_classes(
        &self,
        step: usize,
    ) -> Option<&[ClassId]> {
        self.steps.get(step).map(|s| s.as_slice())
    }

    /// All classes of all steps, concatenated in step order.
    ///
    /// A class's position in this sequence is its remapped label.
    pub fn global_order(&self) -> Vec<ClassId> {
        self.steps.iter().flatten().copied().collect()
    }

    /// Classes visible at `step` under `visible`; `None` past the last step.
    pub fn visible_classes(
        &self,
        step: usize,
        visible: VisibleClasses,
    ) -> Option<Vec<ClassId>> {
        if step >= self.steps.len() {
            return None;
        }
        Some(match visible {
            VisibleClasses::Cumulative => self.steps[..=step].iter().flatten().copied().collect(),
            VisibleClasses::CurrentStep => self.steps[step].clone(),
        })
    }
}

impl From<Vec<Vec<ClassId>>> for TaskDefinition {
    fn from(steps: Vec<Vec<ClassId>>) -> Self {
        Self::new(steps)
    }
}
