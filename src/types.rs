//! Core types for parsed replies

use serde::{Deserialize, Serialize};
use std::fmt;

/// A contiguous run of lines sharing one classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    /// Lines of the fragment joined with `\n`
    content: String,

    /// Quoted history (`>` lines, or the block opened by a quote header)
    quoted: bool,

    /// Starts with a quote header such as "On DATE, NAME wrote:"
    answer: bool,

    /// Matched a signature pattern
    signature: bool,
}

impl Fragment {
    #[must_use]
    pub fn new(content: impl Into<String>, quoted: bool, answer: bool, signature: bool) -> Self {
        Self {
            content: content.into(),
            quoted,
            answer,
            signature,
        }
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// The fragment's physical lines, in order
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.content.split('\n')
    }

    #[must_use]
    pub const fn is_quoted(&self) -> bool {
        self.quoted
    }

    #[must_use]
    pub const fn is_answer(&self) -> bool {
        self.answer
    }

    #[must_use]
    pub const fn is_signature(&self) -> bool {
        self.signature
    }

    /// No content besides whitespace
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Excluded from the visible reply: quoted, signature or empty
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.quoted || self.signature || self.is_empty()
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content)
    }
}

/// A parsed email body as an ordered list of fragments
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    fragments: Vec<Fragment>,
}

impl Email {
    #[must_use]
    pub const fn new(fragments: Vec<Fragment>) -> Self {
        Self { fragments }
    }

    /// Fragments in reading order, top of the message first
    #[must_use]
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    #[must_use]
    pub fn into_fragments(self) -> Vec<Fragment> {
        self.fragments
    }

    /// The reply itself: every fragment that is not hidden
    #[must_use]
    pub fn visible_text(&self) -> String {
        self.join(|f| !f.is_hidden())
    }

    /// Quoted history
    #[must_use]
    pub fn quoted_text(&self) -> String {
        self.join(Fragment::is_quoted)
    }

    /// Fragments introduced by a quote header
    #[must_use]
    pub fn answer_text(&self) -> String {
        self.join(Fragment::is_answer)
    }

    fn join(&self, keep: impl Fn(&Fragment) -> bool) -> String {
        self.fragments
            .iter()
            .filter(|f| keep(f))
            .map(Fragment::content)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
