//! Script interpreter resolution and process spawning

use std::path::Path;
use std::process::Stdio;

use tokio::process::{Child, ChildStderr, ChildStdout, Command};
use tracing::debug;

use crate::error::ExecError;

/// How a fence language maps onto an interpreter invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interpreter {
    /// Program looked up on PATH.
    pub command: &'static str,
    /// Flag that makes the program take the script as its next argument.
    pub flag: &'static str,
}

/// Language tags with a known interpreter.
const INTERPRETERS: &[(&[&str], Interpreter)] = &[
    (
        &["sh", "shell"],
        Interpreter {
            command: "sh",
            flag: "-c",
        },
    ),
    (
        &["bash"],
        Interpreter {
            command: "bash",
            flag: "-c",
        },
    ),
    (
        &["powershell", "posh"],
        Interpreter {
            command: "powershell",
            flag: "-Command",
        },
    ),
    (
        &["py", "python"],
        Interpreter {
            command: "python",
            flag: "-c",
        },
    ),
    (
        &["js", "javascript"],
        Interpreter {
            command: "node",
            flag: "-e",
        },
    ),
];

/// Interpreter for a fence language tag, when the language is known.
pub fn interpreter_for(lang: &str) -> Option<Interpreter> {
    INTERPRETERS
        .iter()
        .find(|(langs, _)| langs.contains(&lang))
        .map(|(_, interpreter)| *interpreter)
}

/// A spawned script with both output streams piped.
#[derive(Debug)]
pub struct RunningScript {
    pub child: Child,
    pub stdout: ChildStdout,
    pub stderr: ChildStderr,
}

/// Spawn `code` under the interpreter for `lang`, in directory `dir`.
pub fn spawn_script(lang: &str, code: &str, dir: &Path) -> Result<RunningScript, ExecError> {
    let interpreter =
        interpreter_for(lang).ok_or_else(|| ExecError::UnknownLanguage(lang.to_string()))?;
    let program =
        which::which(interpreter.command).map_err(|source| ExecError::InterpreterNotFound {
            command: interpreter.command.to_string(),
            source,
        })?;
    debug!(program = %program.display(), lang, "spawning script");

    let mut child = Command::new(program)
        .arg(interpreter.flag)
        .arg(code)
        .current_dir(dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| ExecError::Spawn {
            command: interpreter.command.to_string(),
            source,
        })?;

    let stdout = child
        .stdout
        .take()
        .ok_or(ExecError::MissingPipe("stdout"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or(ExecError::MissingPipe("stderr"))?;

    Ok(RunningScript {
        child,
        stdout,
        stderr,
    })
}
