use std::iter::FusedIterator;

use crate::document::Document;
use crate::example::{INDENT, RawBlock};
use crate::parser::error::{ParseError, ParseErrorKind};
use crate::section::{Header, Section};

// ---------------------------------------------------------------------------
// Lines
// ---------------------------------------------------------------------------

/// A source line with its byte offsets.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Line<'a> {
    /// Offset of the first byte of the line.
    pub start: usize,
    /// Offset just past the line terminator.
    pub end: usize,
    /// Line content without `\n` / `\r\n`.
    pub text: &'a str,
}

/// Iterate the lines of `source`, reporting offsets shifted by `base`.
pub(crate) fn lines(source: &str, base: usize) -> impl Iterator<Item = Line<'_>> {
    let mut offset = base;
    source.split_inclusive('\n').map(move |raw| {
        let start = offset;
        offset += raw.len();
        Line {
            start,
            end: offset,
            text: raw.trim_end_matches(['\n', '\r']),
        }
    })
}

// ---------------------------------------------------------------------------
// Scan state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Looking for the requested header.
    SeekingHeader,
    /// Inside a section body, between example blocks.
    InBody,
    /// Inside an example block that started at `start`.
    InBlock { start: usize },
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

pub(crate) fn find_section<'a>(doc: &'a Document, name: &str) -> Result<Section<'a>, ParseError> {
    let source = doc.source.as_str();
    let mut state = ScanState::SeekingHeader;
    let mut opening: Option<(Header<'a>, usize)> = None;
    let mut open_depth = 0;
    let mut body_end = source.len();

    for line in lines(source, 0) {
        let Some(header) = Header::parse(line.text, line.start) else {
            continue;
        };
        match state {
            // A bare marker line has no name and can never be looked up.
            ScanState::SeekingHeader if !header.name.is_empty() && header.name == name => {
                open_depth = header.depth;
                opening = Some((header, line.end));
                state = ScanState::InBody;
            }
            ScanState::InBody if header.depth <= open_depth => {
                body_end = line.start;
                break;
            }
            _ => {}
        }
    }

    let Some((header, body_start)) = opening else {
        return Err(section_not_found(doc, name));
    };

    tracing::debug!(
        document = %doc.name(),
        section = name,
        depth = header.depth,
        bytes = body_end - body_start,
        "found section"
    );

    Ok(Section {
        name: header.name,
        depth: header.depth,
        header_span: header.span,
        body: &source[body_start..body_end],
        body_offset: body_start,
        file_id: doc.file_id,
    })
}

fn section_not_found(doc: &Document, name: &str) -> ParseError {
    let available: Vec<String> = lines(&doc.source, 0)
        .filter_map(|line| Header::parse(line.text, line.start))
        .filter(|h| !h.name.is_empty())
        .map(|h| format!("`{}'", h.name))
        .collect();

    let error = ParseError::error(
        ParseErrorKind::SectionNotFound,
        format!("couldn't find section `{}' of `{}'", name, doc.name()),
        0..0,
        doc.file_id,
    );
    if available.is_empty() {
        error.with_note("the document has no section headers")
    } else {
        error.with_note(format!("available sections: {}", available.join(", ")))
    }
}

// ---------------------------------------------------------------------------
// Example blocks
// ---------------------------------------------------------------------------

/// A block starts at a line indented by exactly one unit.
fn starts_block(line: &str) -> bool {
    line.strip_prefix(INDENT)
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| !c.is_whitespace())
}

/// Once open, a block runs until a line that starts with a non-whitespace
/// character: prose or a header.
fn closes_block(line: &str) -> bool {
    line.chars().next().is_some_and(|c| !c.is_whitespace())
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Lazy iterator over the example blocks of one section.
///
/// Blocks come out in order of appearance with gapless indices starting at
/// zero. The iterator cannot be rewound; call `split_examples` again to
/// rescan.
#[derive(Debug, Clone)]
pub struct RawBlocks<'a> {
    section: &'a str,
    body: &'a str,
    body_offset: usize,
    file_id: usize,
    /// Byte position within `body` of the next unread line.
    cursor: usize,
    next_index: usize,
    state: ScanState,
}

impl<'a> RawBlocks<'a> {
    pub(crate) fn new(section: &Section<'a>) -> Self {
        RawBlocks {
            section: section.name,
            body: section.body,
            body_offset: section.body_offset,
            file_id: section.file_id,
            cursor: 0,
            next_index: 0,
            state: ScanState::InBody,
        }
    }

    fn emit(&mut self, start: usize, end: usize) -> RawBlock<'a> {
        let index = self.next_index;
        self.next_index += 1;
        self.state = ScanState::InBody;
        RawBlock {
            index,
            section: self.section,
            text: &self.body[start..end],
            span: self.body_offset + start..self.body_offset + end,
            file_id: self.file_id,
        }
    }
}

impl<'a> Iterator for RawBlocks<'a> {
    type Item = RawBlock<'a>;

    fn next(&mut self) -> Option<RawBlock<'a>> {
        let body = self.body;
        let mut end = self.cursor;

        for line in lines(&body[self.cursor..], self.cursor) {
            self.cursor = line.end;
            match self.state {
                // Blank lines stay inside the block, but only up to the last
                // indented line: trailing ones are left out of its text.
                ScanState::InBlock { .. } if is_blank(line.text) => {}
                // A prose or header line closes the block. It can never open
                // one, so it is consumed here.
                ScanState::InBlock { start } if closes_block(line.text) => {
                    return Some(self.emit(start, end));
                }
                ScanState::InBlock { .. } => end = line.end,
                _ if starts_block(line.text) => {
                    self.state = ScanState::InBlock { start: line.start };
                    end = line.end;
                }
                _ => {}
            }
        }

        match self.state {
            ScanState::InBlock { start } => Some(self.emit(start, end)),
            _ => None,
        }
    }
}

impl FusedIterator for RawBlocks<'_> {}
