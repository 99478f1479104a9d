//! Property extraction from drive descriptions.

pub mod extractor;

pub use extractor::{
    extract_copy_text, extract_form_url, extract_properties, extract_property,
};
