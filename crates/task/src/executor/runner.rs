use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use taskwright_core::{EnvironmentVariables, Error, Result, TaskId};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;

/// A fully resolved external tool invocation
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocation {
    pub task: TaskId,
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub env: EnvironmentVariables,
    /// Prefix every output line with the task name
    pub prefix_output: bool,
}

impl ToolInvocation {
    fn spawn_error(&self, message: impl Into<String>) -> Error {
        Error::command_execution(&self.program, self.args.clone(), message, None)
    }
}

/// Starts external programs
///
/// The executor only talks to processes through this trait so tests can
/// record invocations instead of spawning real tools.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run to completion and return the exit code
    async fn run(&self, invocation: &ToolInvocation) -> Result<i32>;

    /// Start without waiting; the process lives until stopped or dropped
    async fn spawn(&self, invocation: &ToolInvocation) -> Result<BackgroundProcess>;
}

/// Handle on a tool started in the background
#[derive(Debug)]
pub struct BackgroundProcess {
    task: TaskId,
    child: Option<Child>,
    readers: Vec<JoinHandle<()>>,
}

impl BackgroundProcess {
    /// A handle with no process behind it, for runners that never spawn
    pub fn detached(task: TaskId) -> Self {
        Self {
            task,
            child: None,
            readers: Vec::new(),
        }
    }

    pub fn task(&self) -> &TaskId {
        &self.task
    }

    /// Kill the process if it is still running and wait for it
    pub async fn stop(mut self) -> Result<()> {
        if let Some(mut child) = self.child.take() {
            if child.try_wait()?.is_none() {
                tracing::debug!(task_name = %self.task, "stopping background task");
                child.start_kill()?;
            }
            child.wait().await?;
        }
        for reader in self.readers.drain(..) {
            let _ = reader.await;
        }
        Ok(())
    }
}

/// Runs tools as child processes of this one
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }

    fn start(&self, invocation: &ToolInvocation) -> Result<(Child, Vec<JoinHandle<()>>)> {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .current_dir(&invocation.cwd)
            .envs(invocation.env.iter())
            .kill_on_drop(true);

        if invocation.prefix_output {
            cmd.stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped());
        } else {
            cmd.stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit());
        }

        tracing::debug!(
            task_name = %invocation.task,
            program = %invocation.program,
            args = ?invocation.args,
            cwd = %invocation.cwd.display(),
            "spawning tool"
        );

        let mut child = cmd
            .spawn()
            .map_err(|e| invocation.spawn_error(format!("failed to spawn: {e}")))?;

        let mut readers = Vec::new();
        if let Some(stdout) = child.stdout.take() {
            readers.push(forward_lines(stdout, invocation.task.clone(), false));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(forward_lines(stderr, invocation.task.clone(), true));
        }
        Ok((child, readers))
    }
}

#[async_trait]
impl ProcessRunner for SystemRunner {
    async fn run(&self, invocation: &ToolInvocation) -> Result<i32> {
        let (mut child, readers) = self.start(invocation)?;
        let status = child
            .wait()
            .await
            .map_err(|e| invocation.spawn_error(e.to_string()))?;
        for reader in readers {
            let _ = reader.await;
        }
        Ok(status.code().unwrap_or(1))
    }

    async fn spawn(&self, invocation: &ToolInvocation) -> Result<BackgroundProcess> {
        let (child, readers) = self.start(invocation)?;
        Ok(BackgroundProcess {
            task: invocation.task.clone(),
            child: Some(child),
            readers,
        })
    }
}

fn forward_lines<S>(stream: S, task: TaskId, stderr: bool) -> JoinHandle<()>
where
    S: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(stream);
        let mut buf = Vec::new();
        // Drain to EOF so the tool never sees a closed pipe
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf);
                    let line = line.trim_end_matches(['\n', '\r']);
                    let written = if stderr {
                        writeln!(std::io::stderr().lock(), "[{task}] {line}")
                    } else {
                        writeln!(std::io::stdout().lock(), "[{task}] {line}")
                    };
                    if let Err(e) = written {
                        tracing::trace!(task_name = %task, error = %e, "dropped output line");
                    }
                }
                Err(e) => {
                    tracing::debug!(task_name = %task, error = %e, "stopped reading tool output");
                    break;
                }
            }
        }
    })
}
