use std::cell::RefCell;

use docmark::Document;
use harness::{Equality, Harness, HarnessError, run_doc_section};
use interpreter::{Interpreter, RunnerError};

const THREE_EXAMPLES: &str = "\
= Guide

== Usage

  puts 1
  # => 1

Two separators make the next block ambiguous:

  puts 2
  #### output:
  2
  #### output:
  2

Back to normal:

  puts 3
  # => 3

== Other
";

fn missing_interpreter() -> Harness {
    Harness::new(Interpreter::named("docmark-no-such-interpreter"))
}

#[test]
fn missing_section_aborts() {
    let doc = Document::new("guide.rdoc", THREE_EXAMPLES);
    let err = run_doc_section(&missing_interpreter(), &doc, "Install", &Equality).unwrap_err();
    match err {
        HarnessError::Parse(parse) => {
            assert!(parse.is_section_not_found());
            assert_eq!(
                parse.to_string(),
                "couldn't find section `Install' of `guide.rdoc'"
            );
        }
        other => panic!("expected a parse error, got {:?}", other),
    }
}

#[test]
fn missing_interpreter_aborts() {
    let doc = Document::new("guide.rdoc", THREE_EXAMPLES);
    let err = run_doc_section(&missing_interpreter(), &doc, "Usage", &Equality).unwrap_err();
    assert!(matches!(
        err,
        HarnessError::Runner(RunnerError::InterpreterNotFound { .. })
    ));
}

#[test]
fn section_without_examples_passes() {
    let doc = Document::new("guide.rdoc", THREE_EXAMPLES);
    let report = run_doc_section(&missing_interpreter(), &doc, "Other", &Equality).unwrap();
    assert_eq!(report.examples, 0);
    assert!(report.passed());
    assert_eq!(report.into_result().unwrap(), 0);
}

#[cfg(unix)]
mod with_cat {
    use super::*;

    /// `cat` prints the wrapped example back, so every example "runs".
    fn cat() -> Harness {
        Harness::new(Interpreter::named("cat")).with_lib_path("/project/lib")
    }

    #[test]
    fn every_example_runs_after_a_failure() {
        let doc = Document::new("guide.rdoc", THREE_EXAMPLES);
        let seen = RefCell::new(Vec::new());
        let fail_first = |expected: &str, actual: &str, index: usize| {
            seen.borrow_mut().push((index, expected.to_string()));
            assert!(actual.contains("$LOAD_PATH.unshift \"/project/lib\""));
            if index == 0 {
                Err("first one fails".to_string())
            } else {
                Ok(())
            }
        };

        let report = run_doc_section(&cat(), &doc, "Usage", &fail_first).unwrap();

        // Example 1 never reaches the comparison: it has two separators.
        assert_eq!(
            seen.into_inner(),
            vec![(0, "1".to_string()), (2, "3".to_string())]
        );
        assert_eq!(report.examples, 3);
        assert_eq!(report.passed_count(), 1);
        let indices: Vec<usize> = report.failures.iter().map(|f| f.index).collect();
        assert_eq!(indices, vec![0, 1]);
        assert_eq!(report.failures[0].message, "first one fails");
        assert!(report.failures[1].message.contains("example 1 of section `Usage'"));
    }

    #[test]
    fn failures_name_document_section_and_index() {
        let doc = Document::new("guide.rdoc", THREE_EXAMPLES);
        let err = run_doc_section(&cat(), &doc, "Usage", &Equality)
            .unwrap()
            .into_result()
            .unwrap_err();

        let text = err.to_string();
        assert!(text.starts_with("3 of 3 examples failed in section `Usage' of `guide.rdoc'"));
        assert!(text.contains("\n  example 0: output mismatch"));
        assert!(text.contains("\n  example 1: parse error"));
        assert!(text.contains("\n  example 2: output mismatch"));
        match err {
            HarnessError::Failures {
                document,
                section,
                examples,
                failures,
            } => {
                assert_eq!(document, "guide.rdoc");
                assert_eq!(section, "Usage");
                assert_eq!(examples, 3);
                assert_eq!(failures.len(), 3);
            }
            other => panic!("expected failures, got {:?}", other),
        }
    }

    #[test]
    fn shell_lines_never_reach_the_interpreter() {
        let doc = Document::new(
            "guide.rdoc",
            "== Install\n\n  % gem install thing\n  require 'thing'\n  # => true\n",
        );
        let actual = RefCell::new(String::new());
        let record = |_: &str, output: &str, _: usize| {
            *actual.borrow_mut() = output.to_string();
            Ok::<(), String>(())
        };
        run_doc_section(&cat(), &doc, "Install", &record).unwrap();
        let actual = actual.into_inner();
        assert!(actual.contains("require 'thing'"));
        assert!(!actual.contains("gem install"));
    }
}

mod with_ruby {
    use super::*;

    fn ruby() -> Harness {
        let interpreter = Interpreter::ruby();
        interpreter.locate().expect("ruby interpreter");
        Harness::new(interpreter)
    }

    #[test]
    #[ignore = "needs a ruby interpreter"]
    fn inline_and_split_forms_pass() {
        let harness = ruby();
        let doc = Document::new(
            "README.rdoc",
            "== example\n\n  puts 1 + 1\n  # => 2\n\nor\n\n  raise \"boom\"\n  #### output:\n  raises RuntimeError\n",
        );
        let report = run_doc_section(&harness, &doc, "example", &Equality).unwrap();
        assert_eq!(report.failures, vec![]);
        assert_eq!(report.examples, 2);
    }

    #[test]
    #[ignore = "needs a ruby interpreter"]
    fn definitions_carry_across_blank_lines() {
        let harness = ruby();
        let doc = Document::new(
            "README.rdoc",
            "== s\n\n  def greet\n    'hi'\n  end\n\n  puts greet  # => hi\n\nprose\n",
        );
        let report = run_doc_section(&harness, &doc, "s", &Equality).unwrap();
        assert_eq!(report.examples, 1);
        assert_eq!(report.failures, vec![]);
    }

    #[test]
    #[ignore = "needs a ruby interpreter"]
    fn wrong_claim_fails_with_index() {
        let harness = ruby();
        let doc = Document::new(
            "README.rdoc",
            "== example\n\n  puts 1\n  # => 1\n\nand\n\n  puts 2 + 2\n  # => 5\n",
        );
        let report = run_doc_section(&harness, &doc, "example", &Equality).unwrap();
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].index, 1);
        assert_eq!(
            report.failures[0].message,
            "output mismatch\n  expected: \"5\"\n  actual:   \"4\""
        );
    }
}
