//! Markdown task document parsing
//!
//! A task document is plain markdown: the first level-one heading names the
//! document, each level-two heading starts a task, the first paragraph under
//! a heading is its description, fenced blocks with a language tag are its
//! scripts, and `requires` fences list glob patterns the task needs.

use std::path::Path;

use tracing::debug;

use crate::document::{Document, Script, Task};
use crate::error::DocumentError;

/// Fence info string that marks a block of requirement globs.
const REQUIRES_FENCE: &str = "requires";

/// Read and parse the task document at `path`.
pub fn load_document(path: &Path) -> Result<Document, DocumentError> {
    let content = std::fs::read_to_string(path).map_err(|source| DocumentError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_document(&content, path)
}

/// Parse markdown into a task document.
///
/// `path` is recorded on the document and supplies the fallback title; the
/// content is not read from it.
pub fn parse_document(content: &str, path: &Path) -> Result<Document, DocumentError> {
    let lines: Vec<&str> = content.lines().collect();
    let mut title: Option<String> = None;
    let mut tasks: Vec<Task> = Vec::new();
    let mut current: Option<TaskBuilder> = None;

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i].trim_end();

        if let Some(info) = line.strip_prefix("```") {
            let info = info.split_whitespace().next().unwrap_or("").to_string();
            let opened_at = i + 1;
            let mut body: Vec<&str> = Vec::new();
            loop {
                i += 1;
                if i >= lines.len() {
                    return Err(DocumentError::UnclosedFence { line: opened_at });
                }
                if lines[i].trim() == "```" {
                    break;
                }
                body.push(lines[i]);
            }
            if let Some(task) = current.as_mut() {
                task.block(&info, &body);
            }
            i += 1;
            continue;
        }

        if let Some(heading) = task_heading(line) {
            let name = heading.trim();
            if name.is_empty() {
                return Err(DocumentError::EmptyTaskName { line: i + 1 });
            }
            let taken = tasks.iter().any(|task| task.name == name)
                || current.as_ref().is_some_and(|task| task.name == name);
            if taken {
                return Err(DocumentError::DuplicateTask {
                    name: name.to_string(),
                    line: i + 1,
                });
            }
            if let Some(done) = current.take() {
                tasks.push(done.finish());
            }
            current = Some(TaskBuilder::new(name));
            i += 1;
            continue;
        }

        if line.starts_with('#') {
            // Other heading levels are structure, not description text. Only
            // the first level-one heading before any task names the document.
            if title.is_none() && current.is_none() {
                if let Some(text) = line.strip_prefix("# ") {
                    title = Some(text.trim().to_string());
                }
            }
            i += 1;
            continue;
        }

        if let Some(task) = current.as_mut() {
            task.text(line.trim());
        }
        i += 1;
    }

    if let Some(done) = current.take() {
        tasks.push(done.finish());
    }

    let title = title.unwrap_or_else(|| {
        path.file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("tasks")
            .to_string()
    });

    debug!(tasks = tasks.len(), title = %title, "parsed task document");
    Ok(Document::new(title, path.to_path_buf(), tasks))
}

/// Heading text when `line` is a level-two heading.
fn task_heading(line: &str) -> Option<&str> {
    if line == "##" {
        Some("")
    } else {
        line.strip_prefix("## ")
    }
}

struct TaskBuilder {
    name: String,
    description: Vec<String>,
    description_done: bool,
    scripts: Vec<Script>,
    requires: Vec<String>,
}

impl TaskBuilder {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: Vec::new(),
            description_done: false,
            scripts: Vec::new(),
            requires: Vec::new(),
        }
    }

    /// Plain prose line inside the task section.
    fn text(&mut self, line: &str) {
        if line.is_empty() {
            if !self.description.is_empty() {
                self.description_done = true;
            }
        } else if !self.description_done {
            self.description.push(line.to_string());
        }
    }

    /// Fenced block inside the task section.
    fn block(&mut self, info: &str, body: &[&str]) {
        if info == REQUIRES_FENCE {
            self.requires.extend(
                body.iter()
                    .map(|line| line.trim())
                    .filter(|line| !line.is_empty())
                    .map(str::to_string),
            );
        } else if !info.is_empty() {
            self.scripts.push(Script {
                lang: info.to_string(),
                code: body.join("\n"),
            });
        }
        // Any fence ends the description paragraph.
        self.description_done = true;
    }

    fn finish(self) -> Task {
        Task {
            name: self.name,
            description: self.description.join(" "),
            scripts: self.scripts,
            requires: self.requires,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "# Demo pipeline

Utilities for the demo service.

## build

Compile the service in release mode.

```sh
cargo build --release
```

## test

Run unit tests, then lint.

Second paragraph is not part of the description.

```requires

src/**/*.rs

```

```bash
cargo test
```

## docs
";

    fn parse(content: &str) -> Result<Document, DocumentError> {
        parse_document(content, Path::new("/work/taskmux.md"))
    }

    #[test]
    fn test_parses_title_and_tasks_in_order() {
        let document = parse(DOC).unwrap();
        assert_eq!(document.title, "Demo pipeline");

        let names: Vec<&str> = document.tasks().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["build", "test", "docs"]);
    }

    #[test]
    fn test_task_carries_description_and_script() {
        let document = parse(DOC).unwrap();
        let build = document.task("build").unwrap();
        assert_eq!(build.description, "Compile the service in release mode.");
        assert_eq!(
            build.scripts,
            [Script {
                lang: "sh".to_string(),
                code: "cargo build --release".to_string(),
            }]
        );
        assert!(build.requires.is_empty());
    }

    #[test]
    fn test_description_is_first_paragraph_only() {
        let document = parse(DOC).unwrap();
        let test = document.task("test").unwrap();
        assert_eq!(test.description, "Run unit tests, then lint.");
    }

    #[test]
    fn test_requires_fence_collects_patterns() {
        let document = parse(DOC).unwrap();
        let test = document.task("test").unwrap();
        assert_eq!(test.requires, ["src/**/*.rs"]);
        assert_eq!(test.scripts.len(), 1);
        assert_eq!(test.scripts[0].lang, "bash");
    }

    #[test]
    fn test_task_without_content_is_kept() {
        let document = parse(DOC).unwrap();
        let docs = document.task("docs").unwrap();
        assert!(docs.description.is_empty());
        assert!(docs.scripts.is_empty());
    }

    #[test]
    fn test_title_falls_back_to_file_stem() {
        let document = parse_document("## only\n", Path::new("/x/mytasks.md")).unwrap();
        assert_eq!(document.title, "mytasks");
    }

    #[test]
    fn test_duplicate_task_is_rejected() {
        let err = parse("## build\n\n## build\n").unwrap_err();
        assert!(matches!(
            err,
            DocumentError::DuplicateTask { ref name, line: 3 } if name == "build"
        ));
    }

    #[test]
    fn test_empty_task_heading_is_rejected() {
        let err = parse("##\n").unwrap_err();
        assert!(matches!(err, DocumentError::EmptyTaskName { line: 1 }));
    }

    #[test]
    fn test_unclosed_fence_is_rejected() {
        let err = parse("## build\n\n```sh\necho never closed\n").unwrap_err();
        assert!(matches!(err, DocumentError::UnclosedFence { line: 3 }));
    }

    #[test]
    fn test_fence_before_first_task_is_ignored() {
        let document = parse("```sh\necho preamble\n```\n\n## build\n").unwrap();
        assert!(document.task("build").unwrap().scripts.is_empty());
    }

    #[test]
    fn test_plain_fence_is_documentation_not_script() {
        let document = parse("## build\n\n```\njust an example\n```\n").unwrap();
        assert!(document.task("build").unwrap().scripts.is_empty());
    }

    #[test]
    fn test_heading_inside_fence_is_literal() {
        let document = parse("## build\n\n```sh\n## not a task\n```\n").unwrap();
        assert_eq!(document.tasks().len(), 1);
        assert_eq!(document.task("build").unwrap().scripts[0].code, "## not a task");
    }

    #[test]
    fn test_load_document_reads_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("taskmux.md");
        std::fs::write(&path, DOC).unwrap();

        let document = load_document(&path).unwrap();
        assert_eq!(document.title, "Demo pipeline");
        assert_eq!(document.root, temp.path());
        assert_eq!(document.path, path);
    }

    #[test]
    fn test_load_document_missing_file_is_read_error() {
        let err = load_document(Path::new("/definitely/not/here/taskmux.md")).unwrap_err();
        assert!(matches!(err, DocumentError::Read { .. }));
    }
}
