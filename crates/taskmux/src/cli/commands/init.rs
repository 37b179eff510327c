//! Init command

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use console::style;
use tracing::info;

use taskmux_core::DEFAULT_DOCUMENT_NAME;

use crate::cli::{init_tracing, output, Cli};

const STARTER_DOCUMENT: &str = r#"# Project Tasks

## hello

Say hello to check the setup.

```sh
echo "hello from taskmux"
```

## build

Build the project. Replace the script below with your real build.

```sh
echo "nothing to build yet"
```
"#;

/// Create a starter task document
#[derive(Debug, Args)]
pub struct InitCommand {
    /// Force overwrite an existing task document
    #[arg(short, long)]
    pub force: bool,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl InitCommand {
    /// Execute the init command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        init_tracing(cli);
        info!(force = self.force, "executing init command");
        let cwd = std::env::current_dir()?;
        let document_path = self
            .output
            .clone()
            .unwrap_or_else(|| cwd.join(DEFAULT_DOCUMENT_NAME));

        if document_path.exists() && !self.force {
            anyhow::bail!(
                "Task document already exists at {}. Use --force to overwrite.",
                document_path.display()
            );
        }

        std::fs::write(&document_path, STARTER_DOCUMENT)
            .with_context(|| format!("cannot write {}", document_path.display()))?;

        if !cli.quiet {
            output::success(&format!(
                "Created task document at {}",
                document_path.display()
            ));
            println!();
            println!("Next steps:");
            println!(
                "  1. Edit {} to define your tasks",
                document_path.display()
            );
            println!("  2. Run {} to see them", style("taskmux list").cyan());
            println!(
                "  3. Run {} to execute one",
                style("taskmux run hello").cyan()
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_creates_starter_document() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("taskmux.md");

        let cli = Cli::parse_from([
            "taskmux",
            "--quiet",
            "init",
            "--output",
            path.to_str().unwrap(),
        ]);
        cli.execute().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let document = taskmux_core::parse_document(&content, &path).unwrap();
        assert_eq!(document.title, "Project Tasks");
        assert!(document.task("hello").is_some());
        assert!(document.task("build").is_some());
    }

    #[test]
    fn test_refuses_to_overwrite_without_force() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("taskmux.md");
        std::fs::write(&path, "# Mine\n").unwrap();

        let cli = Cli::parse_from([
            "taskmux",
            "--quiet",
            "init",
            "--output",
            path.to_str().unwrap(),
        ]);
        assert!(cli.execute().is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Mine\n");
    }

    #[test]
    fn test_force_overwrites() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("taskmux.md");
        std::fs::write(&path, "# Mine\n").unwrap();

        let cli = Cli::parse_from([
            "taskmux",
            "--quiet",
            "init",
            "--force",
            "--output",
            path.to_str().unwrap(),
        ]);
        cli.execute().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# Project Tasks"));
    }
}
