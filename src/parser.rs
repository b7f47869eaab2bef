//! Reply parser entry points

use crate::builder::FragmentBuilder;
use crate::config::PatternConfig;
use crate::error::Result;
use crate::lines;
use crate::patterns::PatternRegistry;
use crate::signature::SignatureClassifier;
use crate::types::Email;
use tracing::debug;

/// Splits email bodies into fragments using its own pattern registry.
///
/// Custom patterns added to a parser stay in effect for every later call until
/// the matching reset. Parsing borrows the parser immutably, so to share one
/// configuration across threads wrap a single parser in `Arc<RwLock<_>>`.
#[derive(Debug, Clone, Default)]
pub struct EmailReplyParser {
    registry: PatternRegistry,
}

impl EmailReplyParser {
    /// Parser using only the built-in patterns
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_registry(registry: PatternRegistry) -> Self {
        Self { registry }
    }

    pub fn from_config(config: &PatternConfig) -> Result<Self> {
        PatternRegistry::from_config(config).map(Self::with_registry)
    }

    #[must_use]
    pub const fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    pub const fn registry_mut(&mut self) -> &mut PatternRegistry {
        &mut self.registry
    }

    /// Parse `text` into its fragments
    #[must_use]
    pub fn read(&self, text: &str) -> Email {
        let normalized = lines::normalize(text);
        let lines = lines::split_lines(&normalized);

        let raw = FragmentBuilder::new(&self.registry).build(&lines);
        let fragments = SignatureClassifier::new(&self.registry).classify(raw);

        debug!(
            "Parsed {} lines into {} fragments",
            lines.len(),
            fragments.len()
        );

        Email::new(fragments)
    }

    /// The visible reply, without quotes, signatures or answer headers
    #[must_use]
    pub fn parse_reply(&self, text: &str) -> String {
        self.read(text).visible_text()
    }

    /// The quoted history
    #[must_use]
    pub fn parse_replied(&self, text: &str) -> String {
        self.read(text).quoted_text()
    }

    pub fn add_quote_header_regex(&mut self, pattern: &str) -> Result<&mut Self> {
        self.registry.add_quote_header_pattern(pattern)?;
        Ok(self)
    }

    pub fn add_quote_header_regexes<I, S>(&mut self, patterns: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.registry.add_quote_header_patterns(patterns)?;
        Ok(self)
    }

    pub fn add_signature_regex(&mut self, pattern: &str) -> Result<&mut Self> {
        self.registry.add_signature_pattern(pattern)?;
        Ok(self)
    }

    pub fn add_signature_regexes<I, S>(&mut self, patterns: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.registry.add_signature_patterns(patterns)?;
        Ok(self)
    }

    /// Drop custom quote-header patterns
    pub fn reset_quote_header_regexes(&mut self) -> &mut Self {
        self.registry.reset_quote_header_patterns();
        self
    }

    /// Drop custom signature patterns
    pub fn reset_signature_regexes(&mut self) -> &mut Self {
        self.registry.reset_signature_patterns();
        self
    }
}

/// Parse `text` with the built-in patterns
#[must_use]
pub fn read(text: &str) -> Email {
    EmailReplyParser::new().read(text)
}

/// Visible reply of `text` using the built-in patterns
#[must_use]
pub fn parse_reply(text: &str) -> String {
    read(text).visible_text()
}

/// Quoted history of `text` using the built-in patterns
#[must_use]
pub fn parse_replied(text: &str) -> String {
    read(text).quoted_text()
}
