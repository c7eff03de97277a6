use std::env;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use crate::capture::{self, ChildGuard};
use crate::error::RunnerError;
use crate::memo::Memo;

/// Environment variable that names the Ruby executable explicitly.
pub const RUBY_ENV: &str = "DOCMARK_RUBY";

/// Program searched for on `PATH` when nothing else is configured.
pub const DEFAULT_PROGRAM: &str = "ruby";

const WINDOWS_EXECUTABLE_EXTENSIONS: &[&str] = &["exe", "com", "bat", "cmd"];

/// An interpreter executable and the ways of running it.
///
/// The executable is resolved on first use and cached; every run spawns a
/// fresh process that is reaped before the call returns.
#[derive(Debug)]
pub struct Interpreter {
    program: String,
    /// Where resolution looked, for error messages.
    origin: String,
    executable: Memo<Option<PathBuf>>,
    timeout: Option<Duration>,
}

impl Interpreter {
    /// Ruby, taken from `DOCMARK_RUBY` when set, otherwise from `PATH`.
    pub fn ruby() -> Self {
        match env::var_os(RUBY_ENV) {
            Some(path) if !path.is_empty() => {
                let path = PathBuf::from(path);
                let origin = format!("{RUBY_ENV}={}", path.display());
                Interpreter {
                    program: DEFAULT_PROGRAM.to_string(),
                    origin,
                    executable: Memo::new(move || resolve_configured(&path)),
                    timeout: None,
                }
            }
            _ => Interpreter::named(DEFAULT_PROGRAM),
        }
    }

    /// Any program, resolved as a path if it contains a separator and by a
    /// `PATH` search otherwise.
    pub fn named(program: impl Into<String>) -> Self {
        let program = program.into();
        let name = program.clone();
        Interpreter {
            origin: "PATH".to_string(),
            executable: Memo::new(move || resolve(&name)),
            program,
            timeout: None,
        }
    }

    /// Use `path` as the executable. A bare name is still looked up on `PATH`.
    pub fn with_executable(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.origin = path.display().to_string();
        self.executable.set(resolve_configured(&path));
        self
    }

    /// Kill runs that take longer than `timeout`. `None` waits forever.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Absolute path of the executable.
    pub fn locate(&self) -> Result<PathBuf, RunnerError> {
        self.executable
            .get()
            .clone()
            .ok_or_else(|| RunnerError::InterpreterNotFound {
                name: self.program.clone(),
                searched: self.origin.clone(),
            })
    }

    /// Run in the foreground with inherited standard streams.
    pub fn run<I, S>(&self, args: I) -> Result<(), RunnerError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let executable = self.locate()?;
        let args: Vec<OsString> = args.into_iter().map(|a| a.as_ref().to_owned()).collect();
        let label = command_label(&executable, &args);

        let mut command = Command::new(&executable);
        command.args(&args);
        let mut guard = ChildGuard::spawn(&mut command, label.clone())?;
        let status = guard.wait(self.timeout)?;

        if status.success() {
            Ok(())
        } else {
            Err(RunnerError::ProcessFailed {
                command: label,
                exit_code: status.code(),
            })
        }
    }

    /// Run each file with warnings enabled (`-w`), stopping at the first failure.
    pub fn run_each_with_warnings<P: AsRef<Path>>(&self, files: &[P]) -> Result<(), RunnerError> {
        for file in files {
            let file = file.as_ref();
            if !file.is_file() {
                return Err(RunnerError::FileNotFound(file.to_path_buf()));
            }
            self.run([OsStr::new("-w"), file.as_os_str()])?;
        }
        Ok(())
    }

    /// Pipe `code` into the interpreter and return what it prints.
    pub fn run_code_and_capture(&self, code: &str) -> Result<String, RunnerError> {
        let executable = self.locate()?;
        let label = command_label(&executable, &[]);
        capture::capture(&mut Command::new(&executable), label, Some(code), self.timeout)
    }

    /// Run the interpreter on a file and return what it prints.
    pub fn run_file_and_capture(&self, path: &Path) -> Result<String, RunnerError> {
        if !path.is_file() {
            return Err(RunnerError::FileNotFound(path.to_path_buf()));
        }
        let executable = self.locate()?;
        let label = command_label(&executable, &[path.as_os_str().to_owned()]);
        let mut command = Command::new(&executable);
        command.arg(path);
        capture::capture(&mut command, label, None, self.timeout)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::ruby()
    }
}

/// File name to look for on a host: Windows-family hosts need an executable
/// extension, which is appended when `name` has none of the usual ones.
pub fn executable_file_name(name: &str, windows: bool) -> String {
    if !windows {
        return name.to_string();
    }
    let has_extension = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            WINDOWS_EXECUTABLE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        });
    if has_extension {
        name.to_string()
    } else {
        format!("{name}.exe")
    }
}

fn resolve(name: &str) -> Option<PathBuf> {
    let file_name = executable_file_name(name, cfg!(windows));
    let candidate = Path::new(&file_name);
    if candidate.components().count() > 1 {
        return resolve_explicit(candidate);
    }

    let found = env::var_os("PATH").and_then(|paths| {
        env::split_paths(&paths)
            .map(|dir| dir.join(&file_name))
            .find(|path| path.is_file())
    });
    let found = found.and_then(|path| std::path::absolute(path).ok());
    tracing::debug!(program = name, executable = ?found, "resolved interpreter");
    found
}

/// A configured executable: a bare name is searched for on `PATH`.
fn resolve_configured(path: &Path) -> Option<PathBuf> {
    if path.components().count() > 1 {
        resolve_explicit(path)
    } else {
        resolve(&path.to_string_lossy())
    }
}

fn resolve_explicit(path: &Path) -> Option<PathBuf> {
    if path.is_file() {
        std::path::absolute(path).ok()
    } else {
        tracing::debug!(path = %path.display(), "configured interpreter is not a file");
        None
    }
}

fn command_label(executable: &Path, args: &[OsString]) -> String {
    let mut label = executable.display().to_string();
    for arg in args {
        label.push(' ');
        label.push_str(&arg.to_string_lossy());
    }
    format!("`{label}`")
}
