//! Spawn a child, optionally feed it stdin, and collect its stdout.

use std::io::{self, Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::RunnerError;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Owns a running child and reaps it on drop, killing it first if needed.
pub(crate) struct ChildGuard {
    child: Child,
    command: String,
    reaped: bool,
}

impl ChildGuard {
    pub(crate) fn spawn(command: &mut Command, label: String) -> Result<Self, RunnerError> {
        let child = command.spawn()?;
        tracing::debug!(pid = child.id(), command = %label, "spawned interpreter");
        Ok(ChildGuard {
            child,
            command: label,
            reaped: false,
        })
    }

    /// Wait for exit. With a timeout, a child still running at the deadline
    /// is killed and reported as `Timeout`.
    pub(crate) fn wait(&mut self, timeout: Option<Duration>) -> Result<ExitStatus, RunnerError> {
        let Some(limit) = timeout else {
            let status = self.child.wait()?;
            self.reaped = true;
            return Ok(status);
        };

        let deadline = Instant::now() + limit;
        loop {
            if let Some(status) = self.child.try_wait()? {
                self.reaped = true;
                return Ok(status);
            }
            if Instant::now() >= deadline {
                tracing::warn!(pid = self.child.id(), command = %self.command, "timed out, killing");
                self.kill_and_reap();
                return Err(RunnerError::Timeout {
                    command: self.command.clone(),
                    timeout: limit,
                });
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    fn kill_and_reap(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
        self.reaped = true;
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if !self.reaped {
            self.kill_and_reap();
        }
    }
}

/// Run `command` to completion and return everything it wrote to stdout.
///
/// Stdout is drained on a separate thread while `input` is written, so a
/// child that fills its output pipe before reading all of its input cannot
/// deadlock us. Stderr is inherited.
pub(crate) fn capture(
    command: &mut Command,
    label: String,
    input: Option<&str>,
    timeout: Option<Duration>,
) -> Result<String, RunnerError> {
    command
        .stdin(if input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped());

    let mut guard = ChildGuard::spawn(command, label)?;

    let mut stdout = guard
        .child
        .stdout
        .take()
        .ok_or_else(|| io::Error::other("child stdout was not captured"))?;
    let reader = thread::spawn(move || -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        stdout.read_to_end(&mut buf)?;
        Ok(buf)
    });

    if let Some(code) = input {
        if let Some(mut stdin) = guard.child.stdin.take() {
            match stdin.write_all(code.as_bytes()).and_then(|()| stdin.flush()) {
                Ok(()) => {}
                // The child exited without reading all of its input; what it
                // printed is still the result.
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                    tracing::debug!("interpreter closed stdin early");
                }
                Err(e) => return Err(e.into()),
            }
            // Dropping stdin closes the pipe and signals end of input.
        }
    }

    let status = guard.wait(timeout)?;
    let bytes = reader.join().map_err(|_| RunnerError::ReaderPanicked)??;
    tracing::debug!(?status, bytes = bytes.len(), "interpreter exited");

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
