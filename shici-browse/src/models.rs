//! Poem records
//!
//! [`RawPoem`] is the wire shape of one entry in a dataset shard. [`Poem`] is the
//! normalized form held by the library and served by the API.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One record of a shard as published by the dataset
///
/// Every field is optional; unknown fields (e.g. `id`, `strains`) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RawPoem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub paragraphs: Option<Vec<String>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Script-normalized poem
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Poem {
    /// Position in the merged sequence of the current load session
    pub id: usize,
    pub title: String,
    /// May carry a dynasty prefix such as `[唐] 李白`
    pub author: String,
    pub paragraphs: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Content hash that survives reloads, unlike `id`
    #[serde(default)]
    pub fingerprint: String,
}

impl Poem {
    /// All paragraphs joined without separator
    pub fn content(&self) -> String {
        self.paragraphs.concat()
    }

    /// Dynasty tag from a `[tag]` author prefix, if present
    pub fn dynasty(&self) -> Option<&str> {
        dynasty_tag(&self.author)
    }
}

/// Script shown to the reader, persisted in the `langMode` slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum LanguageMode {
    /// Text converted to simplified script (flag `"cn"`)
    #[default]
    #[serde(rename = "cn")]
    Simplified,
    /// Text kept as published (flag `"tw"`)
    #[serde(rename = "tw")]
    Traditional,
}

impl LanguageMode {
    pub fn as_flag(self) -> &'static str {
        match self {
            LanguageMode::Simplified => "cn",
            LanguageMode::Traditional => "tw",
        }
    }

    /// `"cn"` means simplified; any other stored value means traditional
    pub fn from_flag(flag: &str) -> Self {
        if flag.trim() == "cn" {
            LanguageMode::Simplified
        } else {
            LanguageMode::Traditional
        }
    }
}

/// Extract `tag` from an author field of the form `[tag] name`
pub fn dynasty_tag(author: &str) -> Option<&str> {
    let rest = author.strip_prefix('[')?;
    let end = rest.find(']')?;
    let tag = rest[..end].trim();
    if tag.is_empty() {
        None
    } else {
        Some(tag)
    }
}

/// SHA-256 over title, author and first paragraph, hex encoded
pub fn fingerprint(title: &str, author: &str, paragraphs: &[String]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(title.as_bytes());
    hasher.update([0x1f]);
    hasher.update(author.as_bytes());
    hasher.update([0x1f]);
    if let Some(first) = paragraphs.first() {
        hasher.update(first.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}
