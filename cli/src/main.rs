mod config;
mod test_runner;

use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use tracing_subscriber::EnvFilter;

use config::{Config, Style};
use docmark::{Document, ExampleForm, ParseError};
use harness::{Equality, Harness, UnitTestRegistry};
use interpreter::Interpreter;
use test_runner::Summary;

#[derive(Parser)]
#[command(
    name = "docmark",
    version,
    about = "Run the code examples in rdoc documentation"
)]
struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Ruby executable (default: $DOCMARK_RUBY, then `ruby` on PATH)
    #[arg(long, global = true, value_name = "PATH")]
    ruby: Option<PathBuf>,

    /// Directory added to the load path of every example (default: ./lib)
    #[arg(long, global = true, value_name = "DIR")]
    lib: Option<PathBuf>,

    /// Kill an example that runs longer than this many seconds
    #[arg(long, global = true, value_name = "SECS")]
    timeout: Option<u64>,

    /// Config file (default: ./docmark.toml if present)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run sections as spec-style groups
    Spec(SectionArgs),

    /// Run sections as unit-style tests
    Test(SectionArgs),

    /// Run every document listed in the config file
    Check(CheckArgs),

    /// List the section headers of a document
    Sections {
        /// Documentation file
        doc: PathBuf,
    },

    /// Print the examples of a section as they will be run
    Extract {
        /// Documentation file
        doc: PathBuf,

        /// Section name (exact match)
        section: String,
    },

    /// Run Ruby files with warnings enabled, stopping at the first failure
    Exec {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[derive(clap::Args)]
struct SectionArgs {
    /// Documentation file
    doc: PathBuf,

    /// Section names (exact match)
    #[arg(required = true)]
    sections: Vec<String>,
}

#[derive(clap::Args)]
struct CheckArgs {
    /// Override the style from the config file
    #[arg(long, value_enum)]
    style: Option<Style>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };
    let harness = build_harness(&cli, &config);

    let exit_code = match cli.command {
        Command::Spec(args) => {
            let group = harness::to_spec_cases(&harness, &args.doc, &args.sections, Equality);
            let mut summary = Summary::default();
            test_runner::run_spec_group(&group, &mut summary, cli.no_color);
            test_runner::report(&summary, cli.no_color)
        }
        Command::Test(args) => {
            let suite = harness::to_unit_test_cases(&harness, &args.doc, &args.sections, Equality);
            let mut summary = Summary::default();
            test_runner::run_unit_suite(&suite, &mut summary, cli.no_color);
            test_runner::report(&summary, cli.no_color)
        }
        Command::Check(args) => do_check(&harness, &config, args.style, cli.no_color),
        Command::Sections { doc } => do_sections(&doc),
        Command::Extract { doc, section } => do_extract(&doc, &section, cli.no_color),
        Command::Exec { files } => match harness.interpreter().run_each_with_warnings(&files) {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("error: {}", e);
                1
            }
        },
    };
    process::exit(exit_code);
}

/// Command-line flags win over the config file.
fn build_harness(cli: &Cli, config: &Config) -> Harness {
    let mut interpreter = Interpreter::ruby();
    if let Some(path) = cli.ruby.as_ref().or(config.interpreter.path.as_ref()) {
        interpreter = interpreter.with_executable(path);
    }
    let timeout = cli.timeout.map(Duration::from_secs).or(config.timeout());
    let harness = Harness::new(interpreter.with_timeout(timeout));

    match cli.lib.as_ref().or(config.lib.as_ref()) {
        Some(lib) => {
            let lib = std::path::absolute(lib).unwrap_or_else(|_| lib.clone());
            harness.with_lib_path(lib)
        }
        None => harness,
    }
}

fn color_choice(no_color: bool) -> ColorChoice {
    if no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    }
}

fn read_document(path: &Path) -> Result<Document, String> {
    Document::read(path).map_err(|e| format!("cannot read '{}': {}", path.display(), e))
}

fn emit_parse_errors(
    files: &SimpleFiles<String, String>,
    errors: &[ParseError],
    no_color: bool,
) {
    let writer = StandardStream::stderr(color_choice(no_color));
    let config = term::Config::default();
    for error in errors {
        let diagnostic = error.to_diagnostic();
        let _ = term::emit_to_write_style(&mut writer.lock(), &config, files, &diagnostic);
    }
}

/// Every parse error in the named sections, without running anything.
fn collect_parse_errors(doc: &Document, sections: &[String]) -> Vec<ParseError> {
    let mut errors = Vec::new();
    for section in sections {
        match docmark::find_section(doc, section) {
            Ok(found) => errors.extend(
                docmark::split_examples(&found).filter_map(|raw| docmark::parse_block(&raw).err()),
            ),
            Err(e) => errors.push(e),
        }
    }
    errors
}

fn do_check(harness: &Harness, config: &Config, style: Option<Style>, no_color: bool) -> i32 {
    if config.documents.is_empty() {
        eprintln!(
            "error: no documents to check (add [[documents]] to {})",
            config::DEFAULT_CONFIG_FILE
        );
        return 1;
    }

    // Point at malformed examples in the source before running anything.
    let mut files = SimpleFiles::new();
    let mut errors = Vec::new();
    for entry in &config.documents {
        match read_document(&entry.path) {
            Ok(doc) => {
                let file_id = files.add(doc.name(), doc.source.clone());
                errors.extend(collect_parse_errors(&doc.with_file_id(file_id), &entry.sections));
            }
            Err(e) => eprintln!("error: {}", e),
        }
    }
    emit_parse_errors(&files, &errors, no_color);

    let mut summary = Summary::default();
    match style.unwrap_or(config.style) {
        Style::Spec => {
            for entry in &config.documents {
                let group = harness::to_spec_cases(harness, &entry.path, &entry.sections, Equality);
                test_runner::run_spec_group(&group, &mut summary, no_color);
            }
        }
        Style::Unit => {
            let mut registry = UnitTestRegistry::new();
            for entry in &config.documents {
                let suite =
                    registry.to_unit_test_cases(harness, &entry.path, &entry.sections, Equality);
                test_runner::run_unit_suite(&suite, &mut summary, no_color);
            }
        }
    }
    test_runner::report(&summary, no_color)
}

fn do_sections(path: &Path) -> i32 {
    let doc = match read_document(path) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("error: {}", e);
            return 1;
        }
    };

    let headers = docmark::list_sections(&doc);
    if headers.is_empty() {
        eprintln!("no section headers in {}", path.display());
        return 1;
    }
    for header in headers {
        let pad = "  ".repeat(header.depth.saturating_sub(1));
        let marker = "=".repeat(header.depth);
        println!("{}{} {}", pad, marker, header.name);
    }
    0
}

fn do_extract(path: &Path, section: &str, no_color: bool) -> i32 {
    let doc = match read_document(path) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("error: {}", e);
            return 1;
        }
    };

    let mut files = SimpleFiles::new();
    let file_id = files.add(doc.name(), doc.source.clone());
    let doc = doc.with_file_id(file_id);

    let examples = match docmark::parse_section(&doc, section) {
        Ok(examples) => examples,
        Err(e) => {
            emit_parse_errors(&files, &[e], no_color);
            return 1;
        }
    };

    for example in &examples {
        let form = match example.form {
            ExampleForm::Inline => "inline",
            ExampleForm::Split => "split",
        };
        println!(
            "--- example {} ({} form, line {}) ---",
            example.index,
            form,
            doc.line_of(example.span.start)
        );
        print!("{}", example.code);
        if !example.code.ends_with('\n') {
            println!();
        }
        println!("--- expected ---");
        println!("{}", example.expected);
    }
    0
}
