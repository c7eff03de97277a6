use std::path::Path;

use docmark::{Document, find_section, parse_block, split_examples};

use crate::Harness;
use crate::compare::Compare;
use crate::error::{ExampleFailure, HarnessError};

/// Outcome of every example in one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionReport {
    pub document: String,
    pub section: String,
    /// Number of example blocks found, including ones that failed to parse.
    pub examples: usize,
    pub failures: Vec<ExampleFailure>,
}

impl SectionReport {
    fn new(document: String, section: &str) -> Self {
        SectionReport {
            document,
            section: section.to_string(),
            examples: 0,
            failures: Vec::new(),
        }
    }

    fn record(&mut self, index: usize, verdict: Result<(), String>) {
        self.examples += 1;
        if let Err(message) = verdict {
            tracing::debug!(
                document = %self.document,
                section = %self.section,
                index,
                "example failed"
            );
            self.failures.push(ExampleFailure { index, message });
        }
    }

    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of examples that passed.
    pub fn passed_count(&self) -> usize {
        self.examples - self.failures.len()
    }

    /// `Ok` with the example count, or [`HarnessError::Failures`].
    pub fn into_result(self) -> Result<usize, HarnessError> {
        if self.passed() {
            Ok(self.examples)
        } else {
            Err(HarnessError::Failures {
                document: self.document,
                section: self.section,
                examples: self.examples,
                failures: self.failures,
            })
        }
    }
}

/// Run every example of `section` and collect each comparison verdict.
///
/// A failing example never stops the ones after it. A block that does not
/// parse is recorded as that example's failure. A missing section, or an
/// interpreter that cannot be run, aborts with the error.
pub fn run_doc_section<C>(
    harness: &Harness,
    doc: &Document,
    section: &str,
    compare: &C,
) -> Result<SectionReport, HarnessError>
where
    C: Compare + ?Sized,
{
    let found = find_section(doc, section)?;
    let executor = harness.executor();
    let mut report = SectionReport::new(doc.name(), section);
    tracing::debug!(document = %report.document, section, "running section");

    for raw in split_examples(&found) {
        let verdict = match parse_block(&raw) {
            Ok(example) => {
                executor.run(&example, |expected, actual, index| {
                    compare.compare(expected, actual, index)
                })?
            }
            Err(err) => Err(err.to_string()),
        };
        report.record(raw.index, verdict);
    }

    tracing::debug!(
        document = %report.document,
        section,
        examples = report.examples,
        failures = report.failures.len(),
        "section finished"
    );
    Ok(report)
}

/// Read the document at `path` and run one of its sections.
pub fn run_section_file<C>(
    harness: &Harness,
    path: &Path,
    section: &str,
    compare: &C,
) -> Result<SectionReport, HarnessError>
where
    C: Compare + ?Sized,
{
    let doc = Document::read(path).map_err(|source| HarnessError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    run_doc_section(harness, &doc, section, compare)
}
