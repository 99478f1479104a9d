//! Naming-convention parsing for drive folder and file names.

pub mod content_code;
pub mod parser;

pub use content_code::parse_content_code;
pub use parser::{NodeKind, ParsedName, parse, parse_as};
