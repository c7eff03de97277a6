pub mod document;
pub mod example;
pub mod parser;
pub mod section;

pub use document::Document;
pub use example::{Example, ExampleForm, RawBlock};
pub use parser::{
    ParseError, ParseErrorKind, RawBlocks, find_section, list_sections, parse_block,
    parse_section, split_examples,
};
pub use section::{Header, Section};
