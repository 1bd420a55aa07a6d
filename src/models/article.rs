//! Article model shared by every source adapter.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::sources::SourceError;

/// A BibTeX block exactly as the source produced it.
///
/// Field order, escaping and whitespace differ between sources and are not
/// normalized.
pub type CitationText = String;

/// A single search hit, reduced to what the picker needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSummary {
    /// Source-specific identifier, only meaningful to the source that issued it
    pub id: String,

    /// Article title
    pub title: String,

    /// Author names, comma-separated
    pub authors: String,
}

impl ArticleSummary {
    /// Create a new summary
    pub fn new(id: impl Into<String>, title: impl Into<String>, authors: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            authors: authors.into(),
        }
    }
}

/// The paper databases that can be searched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SourceKind {
    #[default]
    Acm,
    Google,
    Ieee,
}

impl SourceKind {
    /// Every supported source, in display order
    pub const ALL: [SourceKind; 3] = [SourceKind::Acm, SourceKind::Google, SourceKind::Ieee];

    /// The case-sensitive token for this source
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Acm => "ACM",
            SourceKind::Google => "GOOGLE",
            SourceKind::Ieee => "IEEE",
        }
    }

    /// Returns the display name of the source
    pub fn name(&self) -> &'static str {
        match self {
            SourceKind::Acm => "ACM Digital Library",
            SourceKind::Google => "Google Scholar",
            SourceKind::Ieee => "IEEE Xplore",
        }
    }

    /// Resolve a source token, falling back to ACM for anything unrecognized.
    pub fn lookup(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            tracing::warn!("Unknown source '{}', falling back to ACM", name);
            SourceKind::Acm
        })
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACM" => Ok(SourceKind::Acm),
            "GOOGLE" => Ok(SourceKind::Google),
            "IEEE" => Ok(SourceKind::Ieee),
            other => Err(SourceError::UnknownSource(other.to_string())),
        }
    }
}
