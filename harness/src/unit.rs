//! Unit-style cases: one suite per document, one named test per section.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::Harness;
use crate::compare::Compare;
use crate::error::HarnessError;
use crate::section::{SectionReport, run_section_file};

/// A document's tests, named `Test<document>` with separators removed.
#[derive(Debug)]
pub struct UnitTestSuite<'a> {
    pub name: String,
    pub cases: Vec<UnitTestCase<'a>>,
}

/// One test method covering every example of one section.
pub struct UnitTestCase<'a> {
    pub name: String,
    document: PathBuf,
    section: String,
    harness: &'a Harness,
    compare: Arc<dyn Compare + Send + Sync + 'a>,
}

impl UnitTestCase<'_> {
    pub fn document(&self) -> &Path {
        &self.document
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    /// Run every example of the section, returning the example count.
    pub fn run(&self) -> Result<usize, HarnessError> {
        run_section_file(self.harness, &self.document, &self.section, &*self.compare)
            .and_then(SectionReport::into_result)
    }
}

impl fmt::Debug for UnitTestCase<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitTestCase")
            .field("name", &self.name)
            .field("document", &self.document)
            .field("section", &self.section)
            .finish_non_exhaustive()
    }
}

/// Hands out test names that are unique across one run.
///
/// A name that is already taken gets `_2`, `_3`, ... appended. Registering a
/// `(document, section)` pair a second time yields nothing.
#[derive(Debug, Default)]
pub struct UnitTestRegistry {
    taken: HashSet<String>,
    registered: HashMap<(String, String), String>,
}

impl UnitTestRegistry {
    pub fn new() -> Self {
        UnitTestRegistry::default()
    }

    /// Claim a name for `section` of `document`, or `None` if the pair is
    /// already registered.
    pub fn register(&mut self, document: &str, section: &str) -> Option<String> {
        let key = (document.to_string(), section.to_string());
        if let Some(existing) = self.registered.get(&key) {
            tracing::warn!(document, section, name = %existing, "section registered twice; ignoring");
            return None;
        }

        let base = test_name(document, section);
        let mut name = base.clone();
        let mut suffix = 2;
        while self.taken.contains(&name) {
            name = format!("{base}_{suffix}");
            suffix += 1;
        }
        if name != base {
            tracing::debug!(document, section, %name, "test name collided; renamed");
        }

        self.taken.insert(name.clone());
        self.registered.insert(key, name.clone());
        Some(name)
    }

    /// Number of distinct `(document, section)` pairs registered.
    pub fn len(&self) -> usize {
        self.registered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }

    /// Build a suite for `sections` of `doc`, skipping pairs registered
    /// earlier in this run.
    pub fn to_unit_test_cases<'a, S, C>(
        &mut self,
        harness: &'a Harness,
        doc: impl AsRef<Path>,
        sections: &[S],
        compare: C,
    ) -> UnitTestSuite<'a>
    where
        S: AsRef<str>,
        C: Compare + Send + Sync + 'a,
    {
        let document = doc.as_ref().to_path_buf();
        let document_name = document.display().to_string();
        let compare: Arc<dyn Compare + Send + Sync + 'a> = Arc::new(compare);

        let cases = sections
            .iter()
            .filter_map(|section| {
                let section = section.as_ref();
                let name = self.register(&document_name, section)?;
                Some(UnitTestCase {
                    name,
                    document: document.clone(),
                    section: section.to_string(),
                    harness,
                    compare: Arc::clone(&compare),
                })
            })
            .collect();

        UnitTestSuite {
            name: suite_name(&document_name),
            cases,
        }
    }
}

/// Build a suite for `sections` of `doc` with a fresh registry.
///
/// Names are unique within this one call only. Separate calls never see each
/// other, so registering the same pair twice yields two cases with the same
/// name. Share a [`UnitTestRegistry`] across the run to prevent that.
pub fn to_unit_test_cases<'a, S, C>(
    harness: &'a Harness,
    doc: impl AsRef<Path>,
    sections: &[S],
    compare: C,
) -> UnitTestSuite<'a>
where
    S: AsRef<str>,
    C: Compare + Send + Sync + 'a,
{
    UnitTestRegistry::new().to_unit_test_cases(harness, doc, sections, compare)
}

/// `test_<document>_<section>` with every character outside `[A-Za-z0-9]`
/// replaced by `_`.
pub fn test_name(document: &str, section: &str) -> String {
    format!("test_{}_{}", identifier(document), identifier(section))
}

/// `Test<document>` with every character outside `[A-Za-z0-9]` removed.
pub fn suite_name(document: &str) -> String {
    let stripped: String = document
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();
    format!("Test{stripped}")
}

fn identifier(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
