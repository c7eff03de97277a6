pub mod error;
mod annotation;
mod structural;

pub use error::{ParseError, ParseErrorKind};
pub use structural::RawBlocks;

use crate::document::Document;
use crate::example::{Example, RawBlock};
use crate::section::{Header, Section};

/// Locate the section whose header text is exactly `name`.
///
/// Only the first matching header is used. The body runs until the next
/// header of the same or shallower depth; deeper headers belong to it.
pub fn find_section<'a>(doc: &'a Document, name: &str) -> Result<Section<'a>, ParseError> {
    structural::find_section(doc, name)
}

/// Split a section body into its indented example blocks, in order.
pub fn split_examples<'a>(section: &Section<'a>) -> RawBlocks<'a> {
    RawBlocks::new(section)
}

/// Interpret one raw block as an example in inline or split form.
pub fn parse_block(raw: &RawBlock<'_>) -> Result<Example, ParseError> {
    annotation::parse_block(raw)
}

/// Find a section and parse every example in it, stopping at the first error.
pub fn parse_section(doc: &Document, name: &str) -> Result<Vec<Example>, ParseError> {
    let section = find_section(doc, name)?;
    split_examples(&section)
        .map(|raw| parse_block(&raw))
        .collect()
}

/// Every header in the document, in order of appearance.
pub fn list_sections(doc: &Document) -> Vec<Header<'_>> {
    structural::lines(&doc.source, 0)
        .filter_map(|line| Header::parse(line.text, line.start))
        .collect()
}
