//! Turn documentation examples into test cases.
//!
//! A [`Harness`] pairs an interpreter with the library directory examples may
//! `require`. Sections are run with [`run_doc_section`], or adapted into
//! spec-style groups ([`to_spec_cases`]) and unit-style suites
//! ([`to_unit_test_cases`]) whose cases can be run by any test driver.

mod compare;
mod error;
mod section;
pub mod spec;
pub mod unit;

use std::path::{Path, PathBuf};

use interpreter::{Executor, Interpreter};

pub use compare::{Compare, Equality};
pub use error::{ExampleFailure, HarnessError};
pub use section::{SectionReport, run_doc_section, run_section_file};
pub use spec::{SpecCase, SpecGroup, SpecSection, to_spec_cases};
pub use unit::{
    UnitTestCase, UnitTestRegistry, UnitTestSuite, suite_name, test_name, to_unit_test_cases,
};

/// Directory examples load the documented library from when nothing else is set.
pub const DEFAULT_LIB_DIR: &str = "lib";

/// Interpreter and load path shared by every example run.
#[derive(Debug)]
pub struct Harness {
    interpreter: Interpreter,
    lib_path: PathBuf,
}

impl Harness {
    pub fn new(interpreter: Interpreter) -> Self {
        Harness {
            interpreter,
            lib_path: default_lib_path(),
        }
    }

    pub fn with_lib_path(mut self, lib_path: impl Into<PathBuf>) -> Self {
        self.lib_path = lib_path.into();
        self
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    pub fn executor(&self) -> Executor<'_> {
        Executor::new(&self.interpreter, &self.lib_path)
    }
}

impl Default for Harness {
    fn default() -> Self {
        Harness::new(Interpreter::ruby())
    }
}

fn default_lib_path() -> PathBuf {
    std::path::absolute(DEFAULT_LIB_DIR).unwrap_or_else(|_| PathBuf::from(DEFAULT_LIB_DIR))
}

/// Run `sections` of `doc` with Ruby and exact comparison, panicking with
/// every failure message if any example fails.
///
/// ```no_run
/// #[test]
/// fn readme() {
///     harness::assert_doc_sections("README.rdoc", &["Synopsis", "Usage"]);
/// }
/// ```
pub fn assert_doc_sections(doc: impl AsRef<Path>, sections: &[&str]) {
    let harness = Harness::default();
    let messages: Vec<String> = sections
        .iter()
        .filter_map(|section| {
            run_section_file(&harness, doc.as_ref(), section, &Equality)
                .and_then(SectionReport::into_result)
                .err()
        })
        .map(|err| err.to_string())
        .collect();

    if !messages.is_empty() {
        panic!("{}", messages.join("\n\n"));
    }
}
