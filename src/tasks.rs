//! # Task Catalogs
//!
//! A [`TaskCatalog`] resolves a task name into its per-step class sets.
use crate::classes::{ClassId, TaskDefinition};
use crate::error::ConfigError;
use std::collections::BTreeMap;
use std::fmt::Debug;

/// Source of class-incremental task definitions for one dataset.
pub trait TaskCatalog: Debug + Send + Sync {
    /// Every step of `task`.
    fn task_steps(
        &self,
        task: &str,
    ) -> Result<TaskDefinition, ConfigError>;

    /// Classes introduced at `step` of `task`.
    fn step_classes(
        &self,
        task: &str,
        step: usize,
    ) -> Result<Vec<ClassId>, ConfigError> {
        let def = self.task_steps(task)?;
        def.step_classes(step)
            .map(|c| c.to_vec())
            .ok_or_else(|| ConfigError::StepOutOfRange {
                task: task.to_string(),
                step,
                steps: def.num_steps(),
            })
    }

    /// Names of the known tasks.
    fn task_names(&self) -> Vec<String>;
}

/// The class-incremental tasks commonly run on Pascal VOC.
///
/// Class `0` is background; `1..=20` are the VOC object classes.
#[derive(Debug, Default, Clone, Copy)]
pub struct VocTaskCatalog;

/// Names accepted by [`VocTaskCatalog`].
pub const VOC_TASKS: &[&str] = &["offline", "19-1", "15-5", "15-1", "15-5s", "10-1", "5-3", "2-2"];

/// Number of VOC classes, background included.
pub const VOC_NUM_CLASSES: usize = 21;

/// A base step of `0..=base` followed by `increment`-sized steps up to class 20.
fn base_then_increments(
    base: ClassId,
    increment: ClassId,
) -> TaskDefinition {
    let last = (VOC_NUM_CLASSES - 1) as ClassId;
    let mut steps = vec![(0..=base).collect::<Vec<_>>()];
    let mut next = base + 1;
    while next <= last {
        let end = (next + increment - 1).min(last);
        steps.push((next..=end).collect());
        next = end + 1;
    }
    TaskDefinition::new(steps)
}

impl TaskCatalog for VocTaskCatalog {
    fn task_steps(
        &self,
        task: &str,
    ) -> Result<TaskDefinition, ConfigError> {
        Ok(match task {
            "offline" => base_then_increments(20, 1),
            "19-1" => base_then_increments(19, 1),
            "15-5" => base_then_increments(15, 5),
            "15-1" | "15-5s" => base_then_increments(15, 1),
            "10-1" => base_then_increments(10, 1),
            "5-3" => base_then_increments(5, 3),
            "2-2" => base_then_increments(2, 2),
            _ => return Err(ConfigError::UnknownTask(task.to_string())),
        })
    }

    fn task_names(&self) -> Vec<String> {
        VOC_TASKS.iter().map(|s| s.to_string()).collect()
    }
}

/// An in-memory catalog of named tasks.
#[derive(Debug, Default, Clone)]
pub struct StaticTaskCatalog {
    tasks: BTreeMap<String, TaskDefinition>,
}

impl StaticTaskCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Extends the catalog with a task.
    pub fn with_task<T>(
        mut self,
        name: &str,
        task: T,
    ) -> Self
    where
        T: Into<TaskDefinition>,
    {
        self.tasks.insert(name.to_string(), task.into());
        self
    }
}

impl TaskCatalog for StaticTaskCatalog {
    fn task_steps(
        &self,
        task: &str,
    ) -> Result<TaskDefinition, ConfigError> {
        self.tasks
            .get(task)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownTask(task.to_string()))
    }

    fn task_names(&self) -> Vec<String> {
        self.tasks.keys().cloned().collect()
    }
}
