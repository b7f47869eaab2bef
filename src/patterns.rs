//! Quote-header and signature pattern registry
//!
//! Each registry holds two independent pattern sets. A set is a fixed list of
//! built-in defaults plus an ordered list of custom patterns; custom patterns
//! are checked first and a match by any pattern counts. Custom patterns live
//! until the set is reset.

use crate::config::PatternConfig;
use crate::error::{PatternError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use tracing::{debug, trace};

/// Built-in quote-header patterns.
///
/// Headers are matched against a single line, or against up to three wrapped
/// lines joined with a space, so `^` and `$` anchor the whole header.
const QUOTE_HEADER_PATTERNS: &[&str] = &[
    // English: "On Tue, Mar 1, 2011 at 6:02 PM, Name <a@b.c> wrote:"
    // An apostrophe in the name defeats this pattern; such headers are
    // picked up by the builder's detached-header fallback instead.
    r"^\s*On\s[^']+\swrote\s?:\s*$",
    // Zoho: "---- On Mon, 01 Oct 2019 10:00 Name <a@b.c> wrote ----"
    r"(?i)^\s*-{2,}\s*On\s.+\swrote\s*-{2,}\s*$",
    // French
    r"^\s*Le\s.+\s(?:a\s)?écrit\s?:\s*$",
    // Spanish
    r"^\s*El\s.+\sescribió\s?:\s*$",
    // Italian
    r"^\s*Il\s.+\s(?:ha\s)?scritto\s?:\s*$",
    // Dutch
    r"^\s*Op\s.+\sschreef\s.*:\s*$",
    // German
    r"^\s*Am\s.+\sschrieb\s.*:\s*$",
    r"^\s*[^>\s].*\s<.+>\sschrieb\s?:\s*$",
    // Polish
    r"^\s*(?:W\sdniu|Dnia)\s.+\s(?:pisze|napisał(?:\(a\)|a)?)\s?:\s*$",
    r"^\s*[^>\s].*\snapisa[lł](?:\(a\)|a)?\s?:\s*$",
    // Portuguese
    r"^\s*Em\s.+\sescreveu\s?:\s*$",
    // Russian
    r"^\s*[^>\s].*\s(?:написал(?:\(а\)|а)?|пишет)\s?:\s*$",
    r"^\s*(?:[^>\s].*)?\d{4}\sг\.,?\sв\s\d{1,2}:\d{2},?\s.+:\s*$",
    // Finnish
    r"^\s*[^>\s].*\skirjoitti\s?:\s*$",
    // Danish, Norwegian, Swedish
    r"^\s*Den\s.+\sskrev\s.*:\s*$",
    r"^\s*[[:alpha:]]{3,4}\.\s.+\sskrev\s.*:\s*$",
    // Chinese, Korean, Japanese
    r"^\s*在.+写道：\s*$",
    r"^\s*20\d{2}\..+\s작성:\s*$",
    r"^\s*20\d{2}/.+のメッセージ:\s*$",
    // "2012-10-01 12:00 GMT+02:00 Name <a@b.c>:"
    r"^\s*20\d{2}-(?:0?[1-9]|1[012])-(?:0?[1-9]|[12][0-9]|3[01])\s[0-2]?[0-9]:\d{2}\s.+:\s*$",
    // Outlook style "From: Name <a@b.c>" blocks
    r"(?i)^\s*(?:from|de|van|da|von|od|fra|från|от|lähettäjä)\s?:.+\s?[\[<].+[\]>]",
    r"(?i)^\s*from\s?:\s*\S+@\S+\s*$",
    // "-----Original Message-----" and friends
    r"(?i)^\s*-{2,}\s*(?:original message|forwarded message|message d'origine|mail original|message transféré|mensaje original|messaggio originale|ursprüngliche nachricht|oorspronkelijk bericht|mensagem original|oprindelig meddelelse|opprinnelig melding|originalmeddelande|alkuperäinen viesti|wiadomość oryginalna|исходное сообщение)\s*-{2,}\s*$",
    r"(?i)^\s*begin forwarded message\s?:\s*$",
];

/// Built-in signature patterns, each tested against a single line.
const SIGNATURE_PATTERNS: &[&str] = &[
    r"^\s*-{2,4}\s*$",
    r"^-- \S.*$",
    r"^\s*_{2,}\s*$",
    r"^\s*\+{30,}\s*$",
    r"^\s*={30,}\s*$",
    r"^\s*Sent from (?:my )?\S+(?:\s+\S+){0,3}\s*$",
    r"^\s*Sent (?:with|via) \S+(?:\s+\S+){0,4}\s*$",
    r"^\s*Get Outlook for \S+\s*$",
    r"^\s*Envoyé (?:de|depuis) (?:mon )?\S+(?:\s+\S+){0,3}\s*$",
    r"^\s*Von meinem \S+(?:\s+\S+){0,2} gesendet\s*$",
    r"^\s*Enviado (?:desde|do|de) (?:mi |meu )?\S+(?:\s+\S+){0,3}\s*$",
    r"^\s*Inviato da (?:il mio )?\S+(?:\s+\S+){0,3}\s*$",
    r"(?i)^\s*(?:best|kind|warm|warmest)\s+(?:regards|wishes)\s*,?\s*$",
    r"(?i)^\s*(?:regards|sincerely)\s*,?\s*$",
];

static DEFAULT_QUOTE_HEADERS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| compile_defaults(QUOTE_HEADER_PATTERNS));

static DEFAULT_SIGNATURES: LazyLock<Vec<Regex>> =
    LazyLock::new(|| compile_defaults(SIGNATURE_PATTERNS));

fn compile_defaults(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("built-in pattern must compile"))
        .collect()
}

/// Which of the two pattern sets a pattern belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    QuoteHeader,
    Signature,
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QuoteHeader => write!(f, "quote header"),
            Self::Signature => write!(f, "signature"),
        }
    }
}

/// Ordered custom patterns layered over a fixed default list
#[derive(Debug, Clone)]
pub struct PatternSet {
    kind: PatternKind,
    defaults: &'static [Regex],
    custom: Vec<Regex>,
}

impl PatternSet {
    fn new(kind: PatternKind) -> Self {
        let defaults = match kind {
            PatternKind::QuoteHeader => DEFAULT_QUOTE_HEADERS.as_slice(),
            PatternKind::Signature => DEFAULT_SIGNATURES.as_slice(),
        };

        Self {
            kind,
            defaults,
            custom: Vec::new(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> PatternKind {
        self.kind
    }

    #[must_use]
    pub fn defaults(&self) -> &[Regex] {
        self.defaults
    }

    #[must_use]
    pub fn custom(&self) -> &[Regex] {
        &self.custom
    }

    /// Patterns in matching order: custom first, then defaults
    pub fn iter(&self) -> impl Iterator<Item = &Regex> {
        self.custom.iter().chain(self.defaults.iter())
    }

    /// First pattern matching `text`, if any
    #[must_use]
    pub fn first_match(&self, text: &str) -> Option<&Regex> {
        self.iter().find(|re| re.is_match(text))
    }

    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.first_match(text).is_some()
    }

    pub fn push(&mut self, regex: Regex) {
        trace!("Registered {} pattern: {}", self.kind, regex.as_str());
        self.custom.push(regex);
    }

    /// Compile and append `patterns`.
    ///
    /// Either every pattern is registered or, when one fails to compile,
    /// none of them is.
    pub fn extend<I, S>(&mut self, patterns: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let compiled = compile_all(self.kind, patterns)?;
        self.custom.reserve(compiled.len());
        for regex in compiled {
            self.push(regex);
        }

        Ok(())
    }

    /// Drop all custom patterns, leaving the built-in defaults
    pub fn reset(&mut self) {
        debug!(
            "Resetting {} patterns ({} custom removed)",
            self.kind,
            self.custom.len()
        );
        self.custom.clear();
    }
}

fn compile_all<I, S>(kind: PatternKind, patterns: I) -> Result<Vec<Regex>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    patterns
        .into_iter()
        .map(|p| compile(kind, p.as_ref()))
        .collect()
}

fn compile(kind: PatternKind, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| PatternError::InvalidRegex {
        kind,
        pattern: pattern.to_string(),
        source,
    })
}

/// Quote-header and signature patterns used while parsing
#[derive(Debug, Clone)]
pub struct PatternRegistry {
    quote_headers: PatternSet,
    signatures: PatternSet,
}

impl Default for PatternRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternRegistry {
    /// Registry holding only the built-in patterns
    #[must_use]
    pub fn new() -> Self {
        Self {
            quote_headers: PatternSet::new(PatternKind::QuoteHeader),
            signatures: PatternSet::new(PatternKind::Signature),
        }
    }

    /// Registry with the custom patterns of `config` applied
    pub fn from_config(config: &PatternConfig) -> Result<Self> {
        let mut registry = Self::new();
        registry.apply_config(config)?;
        Ok(registry)
    }

    #[must_use]
    pub const fn quote_headers(&self) -> &PatternSet {
        &self.quote_headers
    }

    #[must_use]
    pub const fn signatures(&self) -> &PatternSet {
        &self.signatures
    }

    #[must_use]
    pub const fn set(&self, kind: PatternKind) -> &PatternSet {
        match kind {
            PatternKind::QuoteHeader => &self.quote_headers,
            PatternKind::Signature => &self.signatures,
        }
    }

    pub const fn set_mut(&mut self, kind: PatternKind) -> &mut PatternSet {
        match kind {
            PatternKind::QuoteHeader => &mut self.quote_headers,
            PatternKind::Signature => &mut self.signatures,
        }
    }

    pub fn add_quote_header_pattern(&mut self, pattern: &str) -> Result<()> {
        self.quote_headers.extend([pattern])
    }

    pub fn add_quote_header_patterns<I, S>(&mut self, patterns: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.quote_headers.extend(patterns)
    }

    /// Register an already compiled quote-header pattern
    pub fn add_quote_header_regex(&mut self, regex: Regex) {
        self.quote_headers.push(regex);
    }

    pub fn add_signature_pattern(&mut self, pattern: &str) -> Result<()> {
        self.signatures.extend([pattern])
    }

    pub fn add_signature_patterns<I, S>(&mut self, patterns: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.signatures.extend(patterns)
    }

    /// Register an already compiled signature pattern
    pub fn add_signature_regex(&mut self, regex: Regex) {
        self.signatures.push(regex);
    }

    pub fn reset_quote_header_patterns(&mut self) {
        self.quote_headers.reset();
    }

    pub fn reset_signature_patterns(&mut self) {
        self.signatures.reset();
    }

    #[must_use]
    pub fn match_quote_header(&self, text: &str) -> bool {
        self.quote_headers.is_match(text)
    }

    #[must_use]
    pub fn match_signature(&self, text: &str) -> bool {
        self.signatures.is_match(text)
    }

    /// Register the custom patterns listed in `config`.
    ///
    /// Both lists are compiled before anything is registered, so a failure
    /// leaves the registry untouched.
    pub fn apply_config(&mut self, config: &PatternConfig) -> Result<()> {
        let quote_headers = compile_all(PatternKind::QuoteHeader, &config.quote_headers)?;
        let signatures = compile_all(PatternKind::Signature, &config.signatures)?;

        for regex in quote_headers {
            self.quote_headers.push(regex);
        }
        for regex in signatures {
            self.signatures.push(regex);
        }

        debug!(
            "Applied pattern config: {} quote header, {} signature patterns",
            config.quote_headers.len(),
            config.signatures.len()
        );
        Ok(())
    }

    /// Export the custom patterns as a configuration document
    #[must_use]
    pub fn to_config(&self) -> PatternConfig {
        PatternConfig {
            quote_headers: source_strings(self.quote_headers.custom()),
            signatures: source_strings(self.signatures.custom()),
        }
    }
}

fn source_strings(patterns: &[Regex]) -> Vec<String> {
    patterns.iter().map(|re| re.as_str().to_string()).collect()
}
