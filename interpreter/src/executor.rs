use std::io::Write;
use std::path::{Path, PathBuf};

use docmark::Example;

use crate::error::RunnerError;
use crate::runner::Interpreter;

/// Name bound to the rescued exception in the wrapped code.
const EXCEPTION_VARIABLE: &str = "__docmark_exception";

/// Runs examples one at a time, each in a fresh interpreter process.
#[derive(Debug)]
pub struct Executor<'a> {
    interpreter: &'a Interpreter,
    /// Directory prepended to `$LOAD_PATH` so examples can `require` the
    /// library being documented.
    lib_path: PathBuf,
}

impl<'a> Executor<'a> {
    pub fn new(interpreter: &'a Interpreter, lib_path: impl Into<PathBuf>) -> Self {
        Executor {
            interpreter,
            lib_path: lib_path.into(),
        }
    }

    /// Execute the example and return its output, minus one trailing newline.
    ///
    /// The code runs from a temporary file rather than stdin so that
    /// file-scoped constructs (`__FILE__`, `require_relative`) behave. The
    /// file is removed on every path out of this function.
    pub fn capture(&self, example: &Example) -> Result<String, RunnerError> {
        let code = wrap_code(&example.code, &self.lib_path);

        let mut file = tempfile::Builder::new()
            .prefix("docmark-example-")
            .suffix(".rb")
            .tempfile()?;
        file.write_all(code.as_bytes())?;
        file.flush()?;
        let path = file.into_temp_path();
        tracing::debug!(index = example.index, path = %path.display(), "running example");

        let output = self.interpreter.run_file_and_capture(&path)?;
        Ok(chomp(&output).to_string())
    }

    /// Execute the example and hand `(expected, actual, index)` to `on_result`.
    ///
    /// Deciding pass or fail is left to the callback.
    pub fn run<F, R>(&self, example: &Example, on_result: F) -> Result<R, RunnerError>
    where
        F: FnOnce(&str, &str, usize) -> R,
    {
        let actual = self.capture(example)?;
        Ok(on_result(&example.expected, &actual, example.index))
    }
}

/// Surround example code with the load-path setup and a rescue clause that
/// prints `raises <ClassName>` instead of letting the exception escape.
pub fn wrap_code(code: &str, lib_path: &Path) -> String {
    let lib = ruby_string_literal(&lib_path.display().to_string());
    let mut wrapped = String::with_capacity(code.len() + 128);
    wrapped.push_str(&format!("$LOAD_PATH.unshift {lib}\nbegin\n"));
    wrapped.push_str(code);
    if !code.ends_with('\n') {
        wrapped.push('\n');
    }
    wrapped.push_str(&format!(
        "rescue Exception => {EXCEPTION_VARIABLE}\n  puts \"raises #{{{EXCEPTION_VARIABLE}.class}}\"\nend\n"
    ));
    wrapped
}

/// Remove exactly one trailing line terminator (`\n`, `\r\n` or `\r`).
pub fn chomp(output: &str) -> &str {
    output
        .strip_suffix("\r\n")
        .or_else(|| output.strip_suffix('\n'))
        .or_else(|| output.strip_suffix('\r'))
        .unwrap_or(output)
}

/// Double-quoted Ruby string literal with no interpolation.
fn ruby_string_literal(value: &str) -> String {
    let mut literal = String::with_capacity(value.len() + 2);
    literal.push('"');
    for c in value.chars() {
        match c {
            '\\' | '"' | '#' => {
                literal.push('\\');
                literal.push(c);
            }
            _ => literal.push(c),
        }
    }
    literal.push('"');
    literal
}
