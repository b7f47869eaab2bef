// Enforce at crate level
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! Email Reply Parser
//!
//! Splits a plain-text email body into fragments so the new reply can be told
//! apart from quoted history, answer headers and signatures.
//!
//! # Features
//!
//! - Quote detection from `>` markers and localized quote headers
//! - Quote headers wrapped over up to three lines
//! - Signature detection by line patterns
//! - Custom quote-header and signature patterns, also loadable from JSON
//!
//! # Example
//!
//! ```rust
//! use email_reply_parser::EmailReplyParser;
//!
//! let body = "Thanks, that works!\n\nOn Jan 1, 2013, Jane <jane@example.com> wrote:\n\n> Try restarting it.";
//!
//! let mut parser = EmailReplyParser::new();
//! parser.add_signature_regex(r"^Posted using MyApp$").unwrap();
//!
//! let email = parser.read(body);
//! assert_eq!(email.fragments().len(), 2);
//! assert_eq!(email.visible_text(), "Thanks, that works!\n");
//! assert!(email.quoted_text().contains("Try restarting it."));
//! ```

mod builder;
mod config;
mod error;
mod lines;
mod parser;
mod patterns;
mod signature;
mod types;

pub use builder::MAX_HEADER_LINES;
pub use config::PatternConfig;
pub use error::{PatternError, Result};
pub use lines::{normalize, split_lines};
pub use parser::{EmailReplyParser, parse_replied, parse_reply, read};
pub use patterns::{PatternKind, PatternRegistry, PatternSet};
pub use types::{Email, Fragment};

pub use regex::Regex;
