use std::ops::Range;

/// Indentation that marks a line as part of an example.
pub const INDENT: &str = "  ";

/// Trailing-comment marker for inline expectations: `1 + 1 # => 2`.
pub const INLINE_MARKER: &str = "# => ";

/// Separator line between code and output in the split form.
pub const OUTPUT_SEPARATOR: &str = "  #### output:";

/// Leading character of shell illustrations (`  % gem install foo`).
pub const SHELL_MARKER: char = '%';

/// One indented run of lines inside a section body, not yet interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock<'a> {
    /// 0-based position of the block within its section.
    pub index: usize,
    /// Name of the section the block was found in.
    pub section: &'a str,
    /// The block's lines, terminators included.
    pub text: &'a str,
    /// Byte span of `text` within the document source.
    pub span: Range<usize>,
    pub file_id: usize,
}

/// Which notation supplied the expected output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExampleForm {
    /// Zero or more `# => value` trailing comments.
    Inline,
    /// Code, a `#### output:` line, then the output verbatim.
    Split,
}

/// A runnable example and the output it claims to produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Example {
    pub index: usize,
    /// Code to execute, with shell illustrations removed.
    pub code: String,
    pub expected: String,
    pub form: ExampleForm,
    /// Byte span of the originating block in the document source.
    pub span: Range<usize>,
}
