use harness::{HarnessError, SpecGroup, UnitTestSuite};

struct Failure {
    title: String,
    reason: String,
}

/// Running totals across every group or suite in one invocation.
#[derive(Default)]
pub struct Summary {
    passed: usize,
    failed: usize,
    examples: usize,
    failures: Vec<Failure>,
}

impl Summary {
    fn record(
        &mut self,
        indent: &str,
        label: &str,
        title: String,
        result: Result<usize, HarnessError>,
        no_color: bool,
    ) {
        match result {
            Ok(examples) => {
                self.passed += 1;
                self.examples += examples;
                eprintln!(
                    "{}{}  {} ({})",
                    indent,
                    pass_label(no_color),
                    label,
                    plural(examples, "example")
                );
            }
            Err(err) => {
                self.failed += 1;
                eprintln!("{}{}  {}", indent, fail_label(no_color), label);
                self.failures.push(Failure {
                    title,
                    reason: err.to_string(),
                });
            }
        }
    }
}

fn pass_label(no_color: bool) -> &'static str {
    if no_color { "PASS" } else { "\x1b[32mPASS\x1b[0m" }
}

fn fail_label(no_color: bool) -> &'static str {
    if no_color { "FAIL" } else { "\x1b[31mFAIL\x1b[0m" }
}

fn bold(s: &str, no_color: bool) -> String {
    if no_color {
        s.to_string()
    } else {
        format!("\x1b[1m{}\x1b[0m", s)
    }
}

fn plural(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("1 {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

/// Run a spec-style group, printing a line per case.
pub fn run_spec_group(group: &SpecGroup<'_>, summary: &mut Summary, no_color: bool) {
    eprintln!();
    eprintln!("{}", bold(&group.title, no_color));
    for section in &group.sections {
        eprintln!("  {}", section.title);
        for case in &section.cases {
            let title = format!("{} {}", group.title, section.title);
            summary.record("    ", &case.description, title, case.run(), no_color);
        }
    }
}

/// Run a unit-style suite, printing a line per test.
pub fn run_unit_suite(suite: &UnitTestSuite<'_>, summary: &mut Summary, no_color: bool) {
    eprintln!();
    eprintln!("{}", bold(&suite.name, no_color));
    for case in &suite.cases {
        let title = format!("{}::{}", suite.name, case.name);
        summary.record("  ", &case.name, title, case.run(), no_color);
    }
}

/// Print the failures section and the summary line.
/// Returns exit code: 0 = all pass, 1 = any failure.
pub fn report(summary: &Summary, no_color: bool) -> i32 {
    if !summary.failures.is_empty() {
        eprintln!();
        eprintln!("failures:");
        for f in &summary.failures {
            eprintln!();
            eprintln!("  --- {} ---", f.title);
            for line in f.reason.lines() {
                eprintln!("  {}", line);
            }
        }
    }

    eprintln!();
    let examples = plural(summary.examples, "example");
    if summary.failed == 0 {
        let ok = if no_color { "ok" } else { "\x1b[32mok\x1b[0m" };
        eprintln!(
            "test result: {}. {} passed, 0 failed ({} run)",
            ok, summary.passed, examples
        );
        0
    } else {
        let failed = if no_color { "FAILED" } else { "\x1b[31mFAILED\x1b[0m" };
        eprintln!(
            "test result: {}. {} passed, {} failed (of {})",
            failed,
            summary.passed,
            summary.failed,
            summary.passed + summary.failed
        );
        1
    }
}
