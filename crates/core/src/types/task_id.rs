//! Task identifiers and ordered task lists

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

/// Opaque name of a registered unit of work, e.g. `clean:dist` or `browserify`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Build `name:arg`
    pub fn with_arg(name: &str, arg: impl fmt::Display) -> Self {
        Self(format!("{name}:{arg}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split at the first `:` into the task name and its argument.
    ///
    /// `newer:copy:html` splits into `("newer", Some("copy:html"))`.
    pub fn split(&self) -> (&str, Option<&str>) {
        match self.0.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (&self.0, None),
        }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Deref for TaskId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Ordered sequence of task identifiers; execution order is list order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskList(Vec<TaskId>);

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: impl Into<TaskId>) {
        self.0.push(id.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TaskId> {
        self.0.iter()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|task| task.as_str() == id)
    }

    /// Identifiers as plain string slices, in order
    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(TaskId::as_str).collect()
    }
}

impl<T: Into<TaskId>> FromIterator<T> for TaskList {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl IntoIterator for TaskList {
    type Item = TaskId;
    type IntoIter = std::vec::IntoIter<TaskId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a TaskList {
    type Item = &'a TaskId;
    type IntoIter = std::slice::Iter<'a, TaskId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for TaskList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names().join(", "))
    }
}
