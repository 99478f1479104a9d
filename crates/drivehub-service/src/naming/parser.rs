//! Naming-convention parser.
//!
//! Folder and file names encode their place in the portal:
//!
//! ```text
//! 01_tab_Product Overview_inactive
//! ^^ ^^^ ^^^^^^^^^^^^^^^^ ^^^^^^^^
//! |  |   display name     suffix: node is inactive
//! |  role keyword
//! order
//! ```
//!
//! Every segment is optional. Parsing never fails: a name with no
//! recognizable tokens keeps order 0, the fallback role and its raw text.

use serde::{Deserialize, Serialize};

use drivehub_entity::hierarchy::{ContentCode, Role};

use super::content_code::parse_content_code;

/// Segment separator of the folder grammar.
const SEPARATOR: char = '_';

/// Suffix marking a node inactive.
const INACTIVE_SUFFIX: &str = "inactive";

/// Whether the name belongs to a folder or a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Folder: fallback role is [`Role::Generic`].
    Folder,
    /// File: fallback role is [`Role::File`]; a trailing extension is kept
    /// out of the grammar and re-attached to the display name.
    File,
}

impl NodeKind {
    /// The kind matching a drive node's folder flag.
    pub fn of(is_folder: bool) -> Self {
        if is_folder { Self::Folder } else { Self::File }
    }

    fn fallback_role(self) -> Role {
        match self {
            Self::Folder => Role::Generic,
            Self::File => Role::File,
        }
    }
}

/// Result of parsing a raw name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedName {
    /// Leading order number, 0 when absent.
    pub order: u32,
    /// Keyword role, or the fallback for the node kind.
    pub role: Role,
    /// Name with convention tokens removed.
    pub display_name: String,
    /// Consumed leading tokens, in name order.
    pub prefixes: Vec<String>,
    /// Consumed trailing tokens, in name order.
    pub suffixes: Vec<String>,
    /// False when an `_inactive` suffix was present.
    pub is_active: bool,
    /// Decomposed content-file code, for names in that grammar.
    pub content_code: Option<ContentCode>,
}

/// Parse a folder name.
pub fn parse(raw_name: &str) -> ParsedName {
    parse_as(raw_name, NodeKind::Folder)
}

/// Parse a raw name of the given kind.
pub fn parse_as(raw_name: &str, kind: NodeKind) -> ParsedName {
    if kind == NodeKind::File {
        if let Some(code) = parse_content_code(raw_name) {
            return ParsedName {
                order: code.serial,
                role: Role::File,
                display_name: raw_name.to_string(),
                prefixes: Vec::new(),
                suffixes: Vec::new(),
                is_active: true,
                content_code: Some(code),
            };
        }
    }

    let (stem, extension) = match kind {
        NodeKind::File => split_extension(raw_name),
        NodeKind::Folder => (raw_name, None),
    };

    let segments: Vec<&str> = stem.split(SEPARATOR).collect();
    let mut rest = segments.as_slice();
    let mut prefixes = Vec::new();
    let mut suffixes = Vec::new();

    let mut order = 0;
    if let Some((first, tail)) = rest.split_first() {
        if let Some(n) = leading_order(first) {
            order = n;
            prefixes.push(first.to_string());
            rest = tail;
        }
    }

    let mut role = kind.fallback_role();
    if let Some((first, tail)) = rest.split_first() {
        if let Some(keyword) = Role::from_keyword(first) {
            role = keyword;
            prefixes.push(first.to_string());
            rest = tail;
        }
    }

    let mut is_active = true;
    if let Some((last, head)) = rest.split_last() {
        // A bare "inactive" name is a display name, not a suffix.
        if last.eq_ignore_ascii_case(INACTIVE_SUFFIX) && (!head.is_empty() || !prefixes.is_empty())
        {
            is_active = false;
            suffixes.push(last.to_string());
            rest = head;
        }
    }

    let display_name = if rest.is_empty() || rest.iter().all(|s| s.is_empty()) {
        raw_name.to_string()
    } else {
        let mut name = rest.join("_");
        if let Some(ext) = extension {
            name.push('.');
            name.push_str(ext);
        }
        name
    };

    ParsedName {
        order,
        role,
        display_name,
        prefixes,
        suffixes,
        is_active,
        content_code: None,
    }
}

/// An all-digit leading segment that fits the order type.
fn leading_order(segment: &str) -> Option<u32> {
    if segment.is_empty() || !segment.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && !ext.is_empty()
                && ext.len() <= 8
                && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            (stem, Some(ext))
        }
        _ => (name, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_role_and_name() {
        let parsed = parse("01_tab_Overview");
        assert_eq!(parsed.order, 1);
        assert_eq!(parsed.role, Role::Tab);
        assert_eq!(parsed.display_name, "Overview");
        assert_eq!(parsed.prefixes, vec!["01", "tab"]);
        assert!(parsed.suffixes.is_empty());
        assert!(parsed.is_active);
    }

    #[test]
    fn test_every_keyword() {
        for (i, role) in Role::KEYWORDS.into_iter().enumerate() {
            let raw = format!("{:02}_{}_Name", i + 3, role.as_str());
            let parsed = parse(&raw);
            assert_eq!(parsed.order, i as u32 + 3, "{raw}");
            assert_eq!(parsed.role, role, "{raw}");
            assert_eq!(parsed.display_name, "Name", "{raw}");
        }
    }

    #[test]
    fn test_keyword_is_case_insensitive() {
        assert_eq!(parse("2_SECTION_Specs").role, Role::Section);
        assert_eq!(parse("2_googleslide_Deck").role, Role::GoogleSlide);
    }

    #[test]
    fn test_role_without_order() {
        let parsed = parse("sidebar_Resources");
        assert_eq!(parsed.order, 0);
        assert_eq!(parsed.role, Role::Sidebar);
        assert_eq!(parsed.display_name, "Resources");
    }

    #[test]
    fn test_missing_order_defaults_to_zero() {
        let parsed = parse("Product Catalogue");
        assert_eq!(parsed.order, 0);
        assert_eq!(parsed.role, Role::Generic);
        assert_eq!(parsed.display_name, "Product Catalogue");
        assert!(parsed.prefixes.is_empty());
    }

    #[test]
    fn test_later_numbers_are_not_order() {
        let parsed = parse("Report_2024_Final");
        assert_eq!(parsed.order, 0);
        assert_eq!(parsed.display_name, "Report_2024_Final");

        let parsed = parse("03_section_Launch_2024");
        assert_eq!(parsed.order, 3);
        assert_eq!(parsed.display_name, "Launch_2024");
    }

    #[test]
    fn test_inactive_suffix() {
        let parsed = parse("04_modal_Signup_inactive");
        assert!(!parsed.is_active);
        assert_eq!(parsed.display_name, "Signup");
        assert_eq!(parsed.suffixes, vec!["inactive"]);

        let parsed = parse("Archive_INACTIVE");
        assert!(!parsed.is_active);
        assert_eq!(parsed.display_name, "Archive");

        let bare = parse("inactive");
        assert!(bare.is_active);
        assert_eq!(bare.display_name, "inactive");
    }

    #[test]
    fn test_only_tokens_falls_back_to_raw_name() {
        let parsed = parse("05_tab");
        assert_eq!(parsed.order, 5);
        assert_eq!(parsed.role, Role::Tab);
        assert_eq!(parsed.display_name, "05_tab");

        assert_eq!(parse("").display_name, "");
        assert_eq!(parse("07").order, 7);
    }

    #[test]
    fn test_file_keeps_extension() {
        let parsed = parse_as("02_button_Download Brochure.pdf", NodeKind::File);
        assert_eq!(parsed.order, 2);
        assert_eq!(parsed.role, Role::Button);
        assert_eq!(parsed.display_name, "Download Brochure.pdf");

        let parsed = parse_as("notes_inactive.txt", NodeKind::File);
        assert!(!parsed.is_active);
        assert_eq!(parsed.display_name, "notes.txt");

        let plain = parse_as("price list.xlsx", NodeKind::File);
        assert_eq!(plain.role, Role::File);
        assert_eq!(plain.display_name, "price list.xlsx");
    }

    #[test]
    fn test_content_code_passes_through() {
        let parsed = parse_as("A-A-2503-0080-01-00-01.pdf", NodeKind::File);
        assert_eq!(parsed.display_name, "A-A-2503-0080-01-00-01.pdf");
        assert_eq!(parsed.order, 80);
        assert_eq!(parsed.role, Role::File);
        assert!(parsed.content_code.is_some());

        let folder = parse("A-A-2503-0080-01-00-01");
        assert!(folder.content_code.is_none());
        assert_eq!(folder.order, 0);
    }

    #[test]
    fn test_overflowing_order_is_not_order() {
        let parsed = parse("99999999999_tab_Big");
        assert_eq!(parsed.order, 0);
        assert_eq!(parsed.role, Role::Generic);
        assert_eq!(parsed.display_name, "99999999999_tab_Big");
    }

    #[test]
    fn test_parse_is_deterministic() {
        assert_eq!(parse("01_tab_Overview"), parse("01_tab_Overview"));
    }
}
