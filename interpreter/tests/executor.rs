use std::path::Path;

use docmark::{Document, Example, ExampleForm, parse_section};
use interpreter::{Executor, Interpreter, RunnerError, wrap_code};

/// Ruby from `PATH`; the tests using it are ignored unless asked for.
fn ruby() -> Interpreter {
    let ruby = Interpreter::ruby();
    ruby.locate().expect("ruby interpreter");
    ruby
}

fn example(index: usize, code: &str, expected: &str) -> Example {
    Example {
        index,
        code: code.to_string(),
        expected: expected.to_string(),
        form: ExampleForm::Inline,
        span: 0..0,
    }
}

#[cfg(unix)]
#[test]
fn callback_receives_expected_actual_and_index() {
    let cat = Interpreter::named("cat");
    let executor = Executor::new(&cat, "/project/lib");
    let ex = example(3, "puts 1\n", "1");

    let (expected, actual, index) = executor
        .run(&ex, |expected, actual, index| {
            (expected.to_string(), actual.to_string(), index)
        })
        .unwrap();

    assert_eq!(expected, "1");
    assert_eq!(index, 3);
    // `cat` echoes the wrapped file back, minus the final newline.
    let wrapped = wrap_code("puts 1\n", Path::new("/project/lib"));
    assert_eq!(actual, wrapped.strip_suffix('\n').unwrap());
}

#[cfg(unix)]
#[test]
fn temp_file_is_removed_after_capture() {
    // `echo` prints the temp file path it was given.
    let echo = Interpreter::named("echo");
    let executor = Executor::new(&echo, "lib");
    let actual = executor.capture(&example(0, "1\n", "")).unwrap();
    let path = Path::new(&actual);
    assert!(path.file_name().unwrap().to_string_lossy().starts_with("docmark-example-"));
    assert!(!path.exists());
}

#[test]
fn missing_interpreter_is_reported() {
    let missing = Interpreter::named("docmark-no-such-interpreter");
    let executor = Executor::new(&missing, "lib");
    let err = executor.capture(&example(0, "1\n", "")).unwrap_err();
    assert!(matches!(err, RunnerError::InterpreterNotFound { .. }));
}

#[test]
#[ignore = "needs a ruby interpreter"]
fn round_trip_through_ruby() {
    let ruby = ruby();
    let output = ruby.run_code_and_capture("puts 1 + 1").unwrap();
    assert_eq!(interpreter::chomp(&output), "2");
}

#[test]
#[ignore = "needs a ruby interpreter"]
fn inline_example_passes() {
    let ruby = ruby();
    let doc = Document::new("README.rdoc", "== example\n\n  p 1 + 1\n  # => 2\n");
    let examples = parse_section(&doc, "example").unwrap();
    let executor = Executor::new(&ruby, "lib");
    let same = executor
        .run(&examples[0], |expected, actual, _| expected == actual)
        .unwrap();
    assert!(same);
}

#[test]
#[ignore = "needs a ruby interpreter"]
fn raised_exceptions_become_output() {
    let ruby = ruby();
    let doc = Document::new(
        "README.rdoc",
        "== example\n\n  raise \"boom\"\n  #### output:\n  raises RuntimeError\n",
    );
    let examples = parse_section(&doc, "example").unwrap();
    let executor = Executor::new(&ruby, "lib");
    let actual = executor.capture(&examples[0]).unwrap();
    assert_eq!(actual, "raises RuntimeError");
    assert_eq!(actual, examples[0].expected);
}

#[test]
#[ignore = "needs a ruby interpreter"]
fn output_before_the_exception_is_kept() {
    let ruby = ruby();
    let executor = Executor::new(&ruby, "lib");
    let actual = executor
        .capture(&example(0, "  puts 'before'\n  Integer('x')\n", ""))
        .unwrap();
    assert_eq!(actual, "before\nraises ArgumentError");
}

#[test]
#[ignore = "needs a ruby interpreter"]
fn examples_can_require_the_library() {
    let ruby = ruby();
    let lib = tempfile::tempdir().unwrap();
    std::fs::write(
        lib.path().join("greeter.rb"),
        "module Greeter\n  def self.hi\n    'hi'\n  end\nend\n",
    )
    .unwrap();

    let executor = Executor::new(&ruby, lib.path());
    let actual = executor
        .capture(&example(0, "  require 'greeter'\n  puts Greeter.hi\n", "hi"))
        .unwrap();
    assert_eq!(actual, "hi");
}

#[test]
#[ignore = "needs a ruby interpreter"]
fn examples_run_in_separate_processes() {
    let ruby = ruby();
    let executor = Executor::new(&ruby, "lib");
    executor.capture(&example(0, "$shared = 1\n", "")).unwrap();
    let actual = executor
        .capture(&example(1, "p defined?($shared) ? $shared : nil\n", ""))
        .unwrap();
    assert_eq!(actual, "nil");
}

#[test]
#[ignore = "needs a ruby interpreter"]
fn warnings_run_succeeds_and_fails() {
    let ruby = ruby();
    let dir = tempfile::tempdir().unwrap();
    let ok = dir.path().join("ok.rb");
    let bad = dir.path().join("bad.rb");
    std::fs::write(&ok, "x = 1\nputs x\n").unwrap();
    std::fs::write(&bad, "exit 3\n").unwrap();

    ruby.run_each_with_warnings(&[&ok]).unwrap();
    let err = ruby.run_each_with_warnings(&[&ok, &bad]).unwrap_err();
    assert!(matches!(err, RunnerError::ProcessFailed { exit_code: Some(3), .. }));
}
