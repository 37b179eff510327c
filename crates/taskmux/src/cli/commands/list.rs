//! List command

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use taskmux_core::{load_config_or_default, load_document, resolve_document, Document};

use crate::cli::{init_tracing, output, Cli, OutputFormat};

/// List tasks defined in the task document
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Path to the task document (overrides config and discovery)
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

impl ListCommand {
    /// Execute the list command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        init_tracing(cli);
        info!("executing list command");
        let cwd = std::env::current_dir()?;
        let (config, _) = load_config_or_default(&cwd)?;

        let document = match &self.file {
            Some(path) => load_document(path)?,
            None => load_document(&resolve_document(&cwd, &config.runner.document)?)?,
        };

        match cli.format {
            OutputFormat::Json => print_json(&document)?,
            OutputFormat::Text => print_text(cli, &document),
        }

        Ok(())
    }
}

fn print_json(document: &Document) -> anyhow::Result<()> {
    let listing = serde_json::json!({
        "title": document.title,
        "path": document.path.to_string_lossy(),
        "tasks": document.tasks().iter().map(|task| {
            serde_json::json!({
                "name": task.name,
                "description": task.description,
                "scripts": task.scripts.iter().map(|s| &s.lang).collect::<Vec<_>>(),
                "requires": task.requires,
            })
        }).collect::<Vec<_>>(),
    });
    println!("{}", serde_json::to_string_pretty(&listing)?);
    Ok(())
}

fn print_text(cli: &Cli, document: &Document) {
    println!("{}", output::header(&document.title));
    println!();

    if document.tasks().is_empty() {
        println!(
            "  {} in {}",
            style("no tasks defined").yellow(),
            document.path.display()
        );
        return;
    }

    let width = document
        .tasks()
        .iter()
        .map(|task| task.name.len())
        .max()
        .unwrap_or(0);

    for task in document.tasks() {
        if task.description.is_empty() {
            println!("  {}", style(&task.name).cyan());
        } else {
            // Pad before styling so escape codes do not skew the column.
            let padded = format!("{:<width$}", task.name);
            println!(
                "  {}  {}",
                style(padded).cyan(),
                style(&task.description).dim(),
            );
        }

        if cli.verbose {
            if !task.requires.is_empty() {
                println!("  {}", output::key_value("requires", &task.requires.join(", ")));
            }
            let langs: Vec<&str> = task.scripts.iter().map(|s| s.lang.as_str()).collect();
            if !langs.is_empty() {
                println!("  {}", output::key_value("scripts", &langs.join(", ")));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::Parser;
    use tempfile::TempDir;

    const DOC: &str = "# Demo\n\n## lint\n\nCheck the sources.\n\n```sh\necho lint\n```\n";

    #[test]
    fn test_lists_document_given_by_flag() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tasks.md");
        std::fs::write(&path, DOC).unwrap();

        let cli = Cli::parse_from([
            "taskmux",
            "--quiet",
            "list",
            "--file",
            path.to_str().unwrap(),
        ]);
        cli.execute().unwrap();
    }

    #[test]
    fn test_missing_document_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("absent.md");

        let cli = Cli::parse_from([
            "taskmux",
            "--quiet",
            "list",
            "--file",
            path.to_str().unwrap(),
        ]);
        assert!(cli.execute().is_err());
    }
}
