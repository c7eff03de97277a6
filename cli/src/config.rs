use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Read from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "docmark.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read `{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config `{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Which adapter builds the test cases.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    /// A group per document, a nested group per section.
    #[default]
    Spec,
    /// A suite per document, a named test per section.
    Unit,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory prepended to the interpreter's load path.
    #[serde(default)]
    pub lib: Option<PathBuf>,

    #[serde(default)]
    pub style: Style,

    #[serde(default)]
    pub interpreter: InterpreterConfig,

    /// Documents and the sections of each to run.
    #[serde(default)]
    pub documents: Vec<DocumentConfig>,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct InterpreterConfig {
    /// Executable path, or a bare name searched for on `PATH`.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Kill an example after this many seconds. Unset waits forever.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DocumentConfig {
    pub path: PathBuf,
    pub sections: Vec<String>,
}

impl Config {
    pub fn parse(source: &str, path: &Path) -> Result<Config, ConfigError> {
        let mut config: Config = toml::from_str(source).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(base) = path.parent() {
            config.rebase(base);
        }
        Ok(config)
    }

    /// Load `explicit`, or `docmark.toml` if it exists, or the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !path.is_file() {
                    tracing::debug!("no {DEFAULT_CONFIG_FILE}; using defaults");
                    return Ok(Config::default());
                }
                path
            }
        };

        let source = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded config");
        Config::parse(&source, &path)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.interpreter.timeout_secs.map(Duration::from_secs)
    }

    /// Relative paths in the file are relative to the file's directory.
    fn rebase(&mut self, base: &Path) {
        if base.as_os_str().is_empty() {
            return;
        }
        if let Some(lib) = &mut self.lib {
            *lib = join_relative(base, lib);
        }
        if let Some(program) = &mut self.interpreter.path {
            // A bare name is looked up on PATH, not next to the config.
            if program.components().count() > 1 {
                *program = join_relative(base, program);
            }
        }
        for document in &mut self.documents {
            document.path = join_relative(base, &document.path);
        }
    }
}

fn join_relative(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
