use std::ops::Range;

/// Character that opens a header line. The length of the run is the depth.
pub const HEADER_MARKER: char = '=';

/// A header line of the form `=(1+) <name>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header<'a> {
    /// Number of marker characters: 1 is the shallowest level.
    pub depth: usize,
    /// Header text after the separator, trailing whitespace removed.
    pub name: &'a str,
    /// Byte span of the header line (without terminator) in the document.
    pub span: Range<usize>,
}

impl<'a> Header<'a> {
    /// Recognize a header in a single line (line terminator already removed).
    ///
    /// A marker run followed by anything other than a space, a tab or the end
    /// of the line is ordinary text (`=begin`, `==>`), not a header.
    pub fn parse(line: &'a str, offset: usize) -> Option<Self> {
        let depth = line.chars().take_while(|&c| c == HEADER_MARKER).count();
        if depth == 0 {
            return None;
        }

        let rest = &line[depth..];
        let name = match rest.chars().next() {
            None => "",
            Some(' ' | '\t') => rest[1..].trim_end(),
            Some(_) => return None,
        };

        Some(Header {
            depth,
            name,
            span: offset..offset + line.len(),
        })
    }
}

/// A named section of a document and its raw body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<'a> {
    pub name: &'a str,
    /// Marker depth of the opening header.
    pub depth: usize,
    pub header_span: Range<usize>,
    /// Everything between the header line and the next header of the same
    /// or shallower depth (or the end of the document).
    pub body: &'a str,
    /// Byte offset of `body` within the document source.
    pub body_offset: usize,
    pub file_id: usize,
}

impl Section<'_> {
    pub fn body_span(&self) -> Range<usize> {
        self.body_offset..self.body_offset + self.body.len()
    }
}
