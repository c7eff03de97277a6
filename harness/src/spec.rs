//! Spec-style cases: one group per document, one nested group per section,
//! each holding a single case.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::Harness;
use crate::compare::Compare;
use crate::error::HarnessError;
use crate::section::{SectionReport, run_section_file};

/// Description of the one case generated for each section.
pub const CASE_DESCRIPTION: &str = "should run as claimed";

/// Cases for one document, titled with the document name.
#[derive(Debug)]
pub struct SpecGroup<'a> {
    pub title: String,
    pub sections: Vec<SpecSection<'a>>,
}

/// Cases for one section, titled ``section `<name>'``.
#[derive(Debug)]
pub struct SpecSection<'a> {
    pub title: String,
    pub cases: Vec<SpecCase<'a>>,
}

/// A runnable case. The document is read when the case runs.
pub struct SpecCase<'a> {
    pub description: String,
    document: PathBuf,
    section: String,
    harness: &'a Harness,
    compare: Arc<dyn Compare + Send + Sync + 'a>,
}

impl<'a> SpecGroup<'a> {
    /// Every case with the section group it belongs to, in registration order.
    pub fn cases(&self) -> impl Iterator<Item = (&SpecSection<'a>, &SpecCase<'a>)> {
        self.sections
            .iter()
            .flat_map(|section| section.cases.iter().map(move |case| (section, case)))
    }

    pub fn len(&self) -> usize {
        self.sections.iter().map(|s| s.cases.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SpecCase<'_> {
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

impl fmt::Debug for SpecCase<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpecCase")
            .field("description", &self.description)
            .field("document", &self.document)
            .field("section", &self.section)
            .finish_non_exhaustive()
    }
}

/// Build a group of spec-style cases for `sections` of `doc`.
pub fn to_spec_cases<'a, S, C>(
    harness: &'a Harness,
    doc: impl AsRef<Path>,
    sections: &[S],
    compare: C,
) -> SpecGroup<'a>
where
    S: AsRef<str>,
    C: Compare + Send + Sync + 'a,
{
    let document = doc.as_ref().to_path_buf();
    let compare: Arc<dyn Compare + Send + Sync + 'a> = Arc::new(compare);

    let sections = sections
        .iter()
        .map(|section| {
            let section = section.as_ref();
            SpecSection {
                title: format!("section `{section}'"),
                cases: vec![SpecCase {
                    description: CASE_DESCRIPTION.to_string(),
                    document: document.clone(),
                    section: section.to_string(),
                    harness,
                    compare: Arc::clone(&compare),
                }],
            }
        })
        .collect();

    SpecGroup {
        title: document.display().to_string(),
        sections,
    }
}
