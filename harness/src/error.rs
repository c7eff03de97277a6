use std::fmt;
use std::io;
use std::path::PathBuf;

use docmark::ParseError;
use interpreter::RunnerError;

/// One example that did not pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleFailure {
    pub index: usize,
    pub message: String,
}

impl fmt::Display for ExampleFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "example {}: ", self.index)?;
        let mut lines = self.message.lines();
        if let Some(first) = lines.next() {
            f.write_str(first)?;
        }
        for line in lines {
            write!(f, "\n  {line}")?;
        }
        Ok(())
    }
}

/// Why a documentation section did not pass.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("cannot read `{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Runner(#[from] RunnerError),

    #[error(
        "{} of {examples} examples failed in section `{section}' of `{document}'{}",
        .failures.len(),
        failure_lines(.failures)
    )]
    Failures {
        document: String,
        section: String,
        examples: usize,
        failures: Vec<ExampleFailure>,
    },
}

fn failure_lines(failures: &[ExampleFailure]) -> String {
    failures
        .iter()
        .map(|failure| format!("\n  {}", failure.to_string().replace('\n', "\n  ")))
        .collect()
}
