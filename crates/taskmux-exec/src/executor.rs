//! Concurrent task execution
//!
//! Tasks run under a concurrency limit, each holding one decoration pair
//! for as long as it runs. Every spawned script gets two stream scanners,
//! and a task does not count as finished until both scanners have handed
//! their last line to the console.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use taskmux_console::{ConsoleError, ConsoleHandle, DecorationPair, DecorationPool, StreamKind};
use taskmux_core::{Script, Task};

use crate::error::ExecError;
use crate::requires::check_requirements;
use crate::runner::{interpreter_for, spawn_script, RunningScript};

/// Options for the task executor
#[derive(Debug, Clone)]
pub struct ExecutorOptions {
    /// Maximum concurrent tasks
    pub jobs: usize,
    /// Keep running remaining tasks after one fails
    pub keep_going: bool,
}

impl Default for ExecutorOptions {
    fn default() -> Self {
        Self {
            jobs: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
            keep_going: false,
        }
    }
}

/// Result of a single task execution
#[derive(Debug)]
pub struct TaskOutcome {
    /// Task name as invoked
    pub name: String,
    /// Final status
    pub status: TaskStatus,
    /// Wall-clock time the task took
    pub duration: Duration,
}

impl TaskOutcome {
    /// Whether the task ran to completion with a zero exit.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Task execution status
#[derive(Debug)]
pub enum TaskStatus {
    /// Every script exited with code zero
    Success,
    /// A script exited with a nonzero code
    ExitCode(i32),
    /// The task could not run or stream its output
    Error(ExecError),
    /// The task was not started because an earlier task failed
    Skipped,
}

impl TaskStatus {
    /// Check if this status represents success
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Runs tasks concurrently, multiplexing their output onto one console.
#[derive(Debug)]
pub struct TaskExecutor {
    options: ExecutorOptions,
    pool: DecorationPool,
}

impl TaskExecutor {
    /// Create a new executor
    pub fn new(options: ExecutorOptions) -> Self {
        Self {
            options,
            pool: DecorationPool::new(),
        }
    }

    /// Run `tasks` in `root`, streaming their output through `console`.
    ///
    /// Outcomes come back in the order tasks were given, regardless of
    /// completion order. Unless `keep_going` is set, tasks not yet admitted
    /// when a failure lands are skipped; tasks already running always finish
    /// and drain their scanners.
    pub async fn execute(
        &self,
        console: &ConsoleHandle,
        root: &Path,
        tasks: &[Task],
    ) -> Vec<TaskOutcome> {
        let semaphore = Arc::new(Semaphore::new(self.options.jobs));
        let failed = Arc::new(AtomicBool::new(false));
        let mut handles: Vec<(String, Option<JoinHandle<TaskOutcome>>)> = Vec::new();

        info!(tasks = tasks.len(), jobs = self.options.jobs, "Running tasks");

        for task in tasks {
            if self.should_skip(&failed) {
                handles.push((task.name.clone(), None));
                continue;
            }

            let permit = semaphore.clone().acquire_owned().await.unwrap();
            // Admission may have blocked behind the task that failed.
            if self.should_skip(&failed) {
                handles.push((task.name.clone(), None));
                continue;
            }

            let console = console.clone();
            let pool = self.pool.clone();
            let name = task.name.clone();
            let task = task.clone();
            let root = root.to_path_buf();
            let failed = Arc::clone(&failed);

            let handle = tokio::spawn(async move {
                let outcome = run_task(console, pool, task, root).await;
                match &outcome.status {
                    TaskStatus::Success => info!(task = %outcome.name, "Task finished"),
                    TaskStatus::ExitCode(code) => {
                        error!(task = %outcome.name, code, "Task failed")
                    }
                    TaskStatus::Error(err) => {
                        error!(task = %outcome.name, error = %err, "Task failed")
                    }
                    TaskStatus::Skipped => {}
                }
                if !outcome.is_success() {
                    failed.store(true, Ordering::SeqCst);
                }
                drop(permit);
                outcome
            });

            handles.push((name, Some(handle)));
        }

        let mut outcomes = Vec::with_capacity(handles.len());
        for (name, handle) in handles {
            match handle {
                None => {
                    debug!(task = %name, "Task skipped after earlier failure");
                    outcomes.push(TaskOutcome {
                        name,
                        status: TaskStatus::Skipped,
                        duration: Duration::ZERO,
                    });
                }
                Some(handle) => match handle.await {
                    Ok(outcome) => outcomes.push(outcome),
                    // A worker only panics on a broken internal invariant.
                    Err(join_err) => std::panic::resume_unwind(join_err.into_panic()),
                },
            }
        }
        outcomes
    }

    fn should_skip(&self, failed: &AtomicBool) -> bool {
        !self.options.keep_going && failed.load(Ordering::SeqCst)
    }
}

/// Execute a single task
async fn run_task(
    console: ConsoleHandle,
    pool: DecorationPool,
    task: Task,
    root: PathBuf,
) -> TaskOutcome {
    let start = Instant::now();
    info!(task = %task.name, "Task started");

    // The pair is held for the whole task, both streams and all scripts.
    let guard = pool.acquire().await;
    let status = run_task_scripts(&console, guard.pair(), &task, &root).await;

    TaskOutcome {
        name: task.name,
        status,
        duration: start.elapsed(),
    }
}

async fn run_task_scripts(
    console: &ConsoleHandle,
    pair: DecorationPair,
    task: &Task,
    root: &Path,
) -> TaskStatus {
    if let Err(err) = check_requirements(root, &task.requires) {
        return TaskStatus::Error(err);
    }

    let mut ran_any = false;
    for script in &task.scripts {
        if interpreter_for(&script.lang).is_none() {
            debug!(task = %task.name, lang = %script.lang, "No interpreter for block, treating as documentation");
            continue;
        }
        ran_any = true;
        match run_script(console, pair, &task.name, script, root).await {
            Ok(0) => {}
            Ok(code) => return TaskStatus::ExitCode(code),
            Err(err) => return TaskStatus::Error(err),
        }
    }

    if !ran_any {
        return TaskStatus::Error(ExecError::NoScript(task.name.clone()));
    }
    TaskStatus::Success
}

/// Run one script, scanning both streams until they close.
async fn run_script(
    console: &ConsoleHandle,
    pair: DecorationPair,
    name: &str,
    script: &Script,
    root: &Path,
) -> Result<i32, ExecError> {
    let RunningScript {
        mut child,
        stdout,
        stderr,
    } = spawn_script(&script.lang, &script.code, root)?;

    let out_scanner = console.scanner(pair, StreamKind::Stdout, name);
    let err_scanner = console.scanner(pair, StreamKind::Stderr, name);
    let out = tokio::spawn(out_scanner.scan(stdout));
    let err = tokio::spawn(err_scanner.scan(stderr));

    let status = child.wait().await.map_err(ExecError::Wait)?;

    // Both scanners end at pipe EOF; a scan failure outranks the exit code.
    join_scanner(out).await?;
    join_scanner(err).await?;

    Ok(status.code().unwrap_or(-1))
}

async fn join_scanner(handle: JoinHandle<Result<(), ConsoleError>>) -> Result<(), ExecError> {
    match handle.await {
        Ok(result) => Ok(result?),
        // Scanner panics are invariant violations; keep unwinding.
        Err(join_err) => std::panic::resume_unwind(join_err.into_panic()),
    }
}
