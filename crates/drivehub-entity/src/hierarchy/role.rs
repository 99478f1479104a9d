//! Role tags assigned by the naming convention.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Semantic category of a hierarchy node.
///
/// Keyword roles come from a name segment (`01_tab_Overview`); `Generic`
/// and `File` are the fallbacks for folders and files without a keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    /// Top-level client area.
    Client,
    /// Sidebar navigation group.
    Sidebar,
    /// Tab inside a page.
    Tab,
    /// Section inside a tab.
    Section,
    /// Action button.
    Button,
    /// Embedded Vimeo video.
    Vimeo,
    /// Embedded Google Slides deck.
    GoogleSlide,
    /// Embedded Google Form.
    GoogleForm,
    /// Modal dialog.
    Modal,
    /// Folder without a keyword.
    Generic,
    /// File without a keyword.
    File,
}

impl Role {
    /// Every role that can appear as a name keyword, in match order.
    pub const KEYWORDS: [Role; 9] = [
        Self::Client,
        Self::Sidebar,
        Self::Tab,
        Self::Section,
        Self::Button,
        Self::Vimeo,
        Self::GoogleSlide,
        Self::GoogleForm,
        Self::Modal,
    ];

    /// Match a name segment against the keyword roles, ignoring case.
    pub fn from_keyword(segment: &str) -> Option<Self> {
        Self::KEYWORDS
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(segment))
    }

    /// Whether this role was produced by a keyword rather than a fallback.
    pub fn is_keyword(&self) -> bool {
        !matches!(self, Self::Generic | Self::File)
    }

    /// Return the role as its convention keyword.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Sidebar => "sidebar",
            Self::Tab => "tab",
            Self::Section => "section",
            Self::Button => "button",
            Self::Vimeo => "vimeo",
            Self::GoogleSlide => "googleSlide",
            Self::GoogleForm => "googleForm",
            Self::Modal => "modal",
            Self::Generic => "generic",
            Self::File => "file",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = drivehub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(role) = Self::from_keyword(s) {
            return Ok(role);
        }
        match s.to_lowercase().as_str() {
            "generic" => Ok(Self::Generic),
            "file" => Ok(Self::File),
            _ => Err(drivehub_core::AppError::validation(format!(
                "Invalid role: '{s}'"
            ))),
        }
    }
}
