//! Run command - execute tasks with multiplexed console output

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use taskmux_console::{channel, Console, ConsoleError, ConsoleOptions};
use taskmux_core::{load_config_or_default, load_document, resolve_document, DocumentError, Task};
use taskmux_exec::{ExecutorOptions, TaskExecutor, TaskStatus};

use crate::cli::{output, Cli, OutputFormat};
use crate::exit_codes;

/// Run tasks from the task document
#[derive(Debug, Args)]
pub struct RunCommand {
    /// Tasks to run (names from the task document)
    #[arg(required = true)]
    pub tasks: Vec<String>,

    /// Path to the task document (overrides config and discovery)
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Maximum concurrent tasks
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Keep running remaining tasks when one fails
    #[arg(short, long)]
    pub keep_going: bool,
}

impl RunCommand {
    /// Execute the run command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(self.execute_async(cli))
    }

    async fn execute_async(&self, cli: &Cli) -> anyhow::Result<()> {
        let cwd = std::env::current_dir()?;
        let (config, _) = load_config_or_default(&cwd)?;

        let document = match &self.file {
            Some(path) => load_document(path)?,
            None => load_document(&resolve_document(&cwd, &config.runner.document)?)?,
        };

        let mut selected: Vec<Task> = Vec::with_capacity(self.tasks.len());
        for name in &self.tasks {
            let task = document
                .task(name)
                .ok_or_else(|| DocumentError::UnknownTask(name.clone()))?;
            selected.push(task.clone());
        }

        if self.jobs == Some(0) {
            anyhow::bail!("--jobs must be at least 1");
        }

        if !cli.quiet && cli.format == OutputFormat::Text {
            println!(
                "{} Running {} task{} from {}",
                style("→").blue(),
                selected.len(),
                if selected.len() == 1 { "" } else { "s" },
                style(document.path.display()).cyan()
            );
            println!();
        }

        // A document at the filesystem root has an empty parent.
        let root = if document.root.as_os_str().is_empty() {
            cwd.clone()
        } else {
            document.root.clone()
        };

        let options = ConsoleOptions {
            queue_capacity: config.console.queue_capacity,
            label_width: config.console.label_width,
        };
        let (console, router) = channel(std::io::stdout(), options);
        init_run_tracing(cli, &console);
        let routing = tokio::spawn(router.route());

        let executor = TaskExecutor::new(ExecutorOptions {
            jobs: self.jobs.unwrap_or(config.runner.jobs),
            keep_going: self.keep_going || config.runner.keep_going,
        });

        let started = Instant::now();
        let outcomes = executor.execute(&console.handle(), &root, &selected).await;

        // Wait for every queued line to reach the terminal.
        drain_console(console, routing).await?;

        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        let skipped = outcomes
            .iter()
            .filter(|o| matches!(o.status, TaskStatus::Skipped))
            .count();
        let failed: Vec<_> = outcomes
            .iter()
            .filter(|o| !o.is_success() && !matches!(o.status, TaskStatus::Skipped))
            .collect();

        if cli.format == OutputFormat::Json {
            let summary = serde_json::json!({
                "total": outcomes.len(),
                "succeeded": succeeded,
                "failed": failed.len(),
                "skipped": skipped,
                "duration_ms": started.elapsed().as_millis(),
                "tasks": outcomes.iter().map(|o| {
                    serde_json::json!({
                        "name": o.name,
                        "status": format!("{:?}", o.status),
                        "duration_ms": o.duration.as_millis(),
                    })
                }).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }

        if !cli.quiet && cli.format == OutputFormat::Text {
            println!();
            println!(
                "  {} {}/{} succeeded, {} failed, {} skipped ({:.1}s)",
                if failed.is_empty() {
                    style("✓").green().bold()
                } else {
                    style("✗").red().bold()
                },
                succeeded,
                outcomes.len(),
                failed.len(),
                skipped,
                started.elapsed().as_secs_f64()
            );
        }

        if !failed.is_empty() {
            if !cli.quiet && cli.format == OutputFormat::Text {
                for outcome in &failed {
                    match &outcome.status {
                        TaskStatus::ExitCode(code) => {
                            output::error(&format!("{}: exit code {}", outcome.name, code))
                        }
                        TaskStatus::Error(err) => {
                            output::error(&format!("{}: {}", outcome.name, err))
                        }
                        _ => {}
                    }
                }
            }
            output::error(&format!(
                "{} task{} failed",
                failed.len(),
                if failed.len() == 1 { "" } else { "s" }
            ));
            // Exit with the first failing task's own code when it has one.
            let code = match failed[0].status {
                TaskStatus::ExitCode(code) if code > 0 => code,
                _ => exit_codes::TASK_FAILED,
            };
            std::process::exit(code);
        }

        Ok(())
    }
}

/// Close the console and wait for the router to finish.
///
/// When the router dies early, `close` only sees the lost completion signal;
/// the join handle holds the write failure that stopped it, so that error is
/// surfaced instead.
async fn drain_console(
    console: Console,
    routing: tokio::task::JoinHandle<Result<(), ConsoleError>>,
) -> anyhow::Result<()> {
    if let Err(close_err) = console.close().await {
        return match routing.await? {
            Err(route_err) => Err(route_err.into()),
            Ok(()) => Err(close_err.into()),
        };
    }
    routing.await??;
    Ok(())
}

/// Route diagnostics through the console so they interleave with task
/// output instead of tearing it.
fn init_run_tracing(cli: &Cli, console: &Console) {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .without_time()
                .with_writer(console.log_writer("taskmux"))
                .with_filter(cli.log_filter("info")),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Write};
    use taskmux_console::{StreamKind, PALETTE};

    struct RejectingWriter;

    impl Write for RejectingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "terminal gone"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_drain_surfaces_the_write_failure() {
        let (console, router) = channel(RejectingWriter, ConsoleOptions::default());
        let routing = tokio::spawn(router.route());
        let scanner = console.scanner(PALETTE[0], StreamKind::Stdout, "boom");
        scanner.scan(b"line\n".as_slice()).await.unwrap();

        let err = drain_console(console, routing).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConsoleError>(),
            Some(ConsoleError::Write(_))
        ));
    }
}
