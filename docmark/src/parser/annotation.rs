use crate::example::{
    Example, ExampleForm, INDENT, INLINE_MARKER, OUTPUT_SEPARATOR, RawBlock, SHELL_MARKER,
};
use crate::parser::error::{ParseError, ParseErrorKind};
use crate::parser::structural::lines;

/// `  #### output:` with nothing but whitespace after it.
fn is_output_separator(line: &str) -> bool {
    line.strip_prefix(OUTPUT_SEPARATOR)
        .is_some_and(|rest| rest.trim().is_empty())
}

/// Illustrative shell command such as `  % rake install`.
fn is_shell_line(line: &str) -> bool {
    line.trim_start().starts_with(SHELL_MARKER)
}

pub(crate) fn parse_block(raw: &RawBlock<'_>) -> Result<Example, ParseError> {
    let base = raw.span.start;
    let separators: Vec<_> = lines(raw.text, base)
        .filter(|line| is_output_separator(line.text))
        .collect();

    let (code, expected, form) = match separators.as_slice() {
        [] => (raw.text, inline_expected(raw.text), ExampleForm::Inline),
        [separator] => {
            let code = &raw.text[..separator.start - base];
            let output = &raw.text[separator.end - base..];
            (code, split_expected(output), ExampleForm::Split)
        }
        [_, second, ..] => {
            return Err(ParseError::error(
                ParseErrorKind::AmbiguousBlock,
                format!(
                    "parse error in example {} of section `{}': {} `#### output:` separators",
                    raw.index,
                    raw.section,
                    separators.len()
                ),
                second.start..second.start + second.text.len(),
                raw.file_id,
            )
            .with_note("separate code from its output with exactly one `#### output:` line"));
        }
    };

    if code.trim().is_empty() {
        return Err(ParseError::error(
            ParseErrorKind::EmptyCode,
            format!(
                "parse error in example {} of section `{}': no code before `#### output:`",
                raw.index, raw.section
            ),
            raw.span.clone(),
            raw.file_id,
        ));
    }

    let code: String = code
        .split_inclusive('\n')
        .filter(|line| !is_shell_line(line))
        .collect();

    tracing::debug!(
        section = raw.section,
        index = raw.index,
        ?form,
        "parsed example"
    );

    Ok(Example {
        index: raw.index,
        code,
        expected,
        form,
        span: raw.span.clone(),
    })
}

/// Join the text after every `# => ` marker, one expected line per marker.
fn inline_expected(text: &str) -> String {
    lines(text, 0)
        .filter_map(|line| {
            line.text
                .find(INLINE_MARKER)
                .map(|at| &line.text[at + INLINE_MARKER.len()..])
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Output lines after the separator, with the indentation unit removed.
fn split_expected(output: &str) -> String {
    lines(output, 0)
        .map(|line| line.text.strip_prefix(INDENT).unwrap_or(line.text))
        .collect::<Vec<_>>()
        .join("\n")
}
