//! Task document model

use std::path::{Path, PathBuf};

/// A runnable script block attached to a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    /// Language tag from the fence info string.
    pub lang: String,
    /// Script source, exactly as written inside the fence.
    pub code: String,
}

/// One task parsed from a level-two heading.
#[derive(Debug, Clone)]
pub struct Task {
    /// Name used to invoke the task, taken from the heading text.
    pub name: String,
    /// First paragraph under the heading.
    pub description: String,
    /// Script blocks in document order.
    pub scripts: Vec<Script>,
    /// Glob patterns that must each match at least one file before the
    /// task is allowed to run.
    pub requires: Vec<String>,
}

/// A parsed task document.
#[derive(Debug, Clone)]
pub struct Document {
    /// Title from the level-one heading, or the file stem when absent.
    pub title: String,
    /// Path the document was loaded from.
    pub path: PathBuf,
    /// Directory task scripts run in.
    pub root: PathBuf,
    tasks: Vec<Task>,
}

impl Document {
    pub(crate) fn new(title: String, path: PathBuf, tasks: Vec<Task>) -> Self {
        let root = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Self {
            title,
            path,
            root,
            tasks,
        }
    }

    /// Tasks in document order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Look a task up by name.
    pub fn task(&self, name: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.name == name)
    }
}
