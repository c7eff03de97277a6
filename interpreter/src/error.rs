use std::path::PathBuf;
use std::time::Duration;

/// Failures of the interpreter environment itself.
///
/// Errors raised by example code are not represented here: the executor
/// turns them into `raises <ClassName>` output.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("interpreter not found: no `{name}` executable (searched {searched})")]
    InterpreterNotFound { name: String, searched: String },

    #[error("file does not exist: `{}'", .0.display())]
    FileNotFound(PathBuf),

    #[error("{command} failed with status {}", exit_label(.exit_code))]
    ProcessFailed {
        command: String,
        exit_code: Option<i32>,
    },

    #[error("{command} did not finish within {}s and was killed", .timeout.as_secs_f64())]
    Timeout { command: String, timeout: Duration },

    #[error("output reader thread panicked")]
    ReaderPanicked,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "unknown (terminated by signal)".to_string(),
    }
}
