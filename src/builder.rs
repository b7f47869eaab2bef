//! Grouping of lines into body, quoted and answer fragments
//!
//! Quote headers are located first, then the lines are walked from the bottom
//! of the message up. Walking upwards lets a quote header claim everything
//! below it up to the next boundary without lookahead past the header itself.

use crate::lines::{is_blank, is_quoted};
use crate::patterns::PatternRegistry;
use regex::Regex;
use std::sync::LazyLock;
use tracing::trace;

/// Longest run of physical lines a wrapped quote header may span.
///
/// A header wrapped over more lines is not matched against the patterns. If
/// its last line still closes like a header ("... wrote:") and the block names
/// a sender address, the block becomes a fragment of its own.
pub const MAX_HEADER_LINES: usize = 3;

/// Longest block an unrecognized header may claim above its closing line.
const MAX_DETACHED_HEADER_LINES: usize = 2 * MAX_HEADER_LINES;

/// Closing line of a header no pattern recognized, e.g. one wrapped over
/// more than [`MAX_HEADER_LINES`] lines or with an unusual sender name.
static HEADER_TAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:^|\s)(?:wrote|a\s[ée]crit|schrieb|escribi[óo]|scritto|pisze|napisa[lł](?:\(a\)|a)?|escreveu|написал(?:\(а\)|а)?|пишет|kirjoitti|skrev)\s?:\s*$",
    )
    .expect("header tail pattern must compile")
});

static SENDER_ADDRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S@\S").expect("sender address pattern must compile"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderRole {
    None,
    Start,
    Continuation,
}

/// A closed fragment awaiting signature classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFragment<'a> {
    pub lines: Vec<&'a str>,
    pub quoted: bool,
    pub answer: bool,
}

/// Header placement over the lines of a message
struct HeaderLayout {
    roles: Vec<HeaderRole>,
    // A fragment boundary lies directly below the line.
    cut_below: Vec<bool>,
}

/// Lines collected bottom-up for the fragment currently open
struct Accumulator<'a> {
    lines: Vec<&'a str>,
    quoted: bool,
    answer: bool,
    // Top line is a header start; only further header lines may join.
    sealed: bool,
}

impl<'a> Accumulator<'a> {
    const fn new(quoted: bool) -> Self {
        Self {
            lines: Vec::new(),
            quoted,
            answer: false,
            sealed: false,
        }
    }

    /// Whether the line directly above the fragment belongs to it
    fn accepts(&self, line: &str, quoted: bool, in_header: bool) -> bool {
        if self.sealed {
            return in_header;
        }
        self.quoted == quoted || (self.quoted && (in_header || is_blank(line)))
    }

    fn close(mut self) -> RawFragment<'a> {
        self.lines.reverse();
        RawFragment {
            lines: self.lines,
            quoted: self.quoted,
            answer: self.answer,
        }
    }
}

pub struct FragmentBuilder<'r> {
    registry: &'r PatternRegistry,
}

impl<'r> FragmentBuilder<'r> {
    #[must_use]
    pub const fn new(registry: &'r PatternRegistry) -> Self {
        Self { registry }
    }

    /// Group `lines` into fragments, top of the message first
    #[must_use]
    pub fn build<'a>(&self, lines: &[&'a str]) -> Vec<RawFragment<'a>> {
        let layout = self.header_layout(lines);
        let mut closed = Vec::new();
        let mut open: Option<Accumulator<'a>> = None;

        for (i, &line) in lines.iter().enumerate().rev() {
            let role = layout.roles[i];
            let quoted = is_quoted(line);
            let in_header = role != HeaderRole::None;
            let cut = layout.cut_below[i];

            if let Some(done) = open.take_if(|acc| cut || !acc.accepts(line, quoted, in_header)) {
                closed.push(done.close());
            }

            let acc = open.get_or_insert_with(|| Accumulator::new(quoted));
            acc.lines.push(line);

            // A header opens its fragment; only a header stacked directly
            // above it may still join.
            if role == HeaderRole::Start {
                acc.quoted = true;
                acc.answer = true;
                acc.sealed = true;
            }
        }

        if let Some(done) = open.take() {
            closed.push(done.close());
        }

        closed.reverse();
        closed
    }

    fn header_layout(&self, lines: &[&str]) -> HeaderLayout {
        let mut layout = HeaderLayout {
            roles: vec![HeaderRole::None; lines.len()],
            cut_below: vec![false; lines.len()],
        };
        let mut floor = 0;

        for (end, line) in lines.iter().enumerate() {
            if is_blank(line) {
                continue;
            }

            let start = if let Some(start) = self.header_start(lines, floor, end) {
                trace!("Quote header on lines {}..={}", start + 1, end + 1);
                start
            } else if let Some(start) = detached_header_start(lines, floor, end) {
                trace!("Unrecognized header on lines {}..={}", start + 1, end + 1);
                layout.cut_below[end] = true;
                start
            } else {
                continue;
            };

            layout.roles[start] = HeaderRole::Start;
            for role in &mut layout.roles[start + 1..=end] {
                *role = HeaderRole::Continuation;
            }
            floor = end + 1;
        }

        layout
    }

    /// Start of the shortest header window ending at `end`, if any.
    ///
    /// Windows never reach below `floor` and never contain blank lines.
    fn header_start(&self, lines: &[&str], floor: usize, end: usize) -> Option<usize> {
        (1..=MAX_HEADER_LINES)
            .map_while(|span| (end + 1).checked_sub(span).filter(|start| *start >= floor))
            .take_while(|&start| !is_blank(lines[start]))
            .find(|&start| {
                let window = &lines[start..=end];
                match window {
                    [single] => self.registry.match_quote_header(single),
                    _ => self.registry.match_quote_header(&window.join(" ")),
                }
            })
    }
}

/// Top of the block closed by an unrecognized header line at `end`.
///
/// The block is the run of non-blank, unquoted lines ending at `end`, capped
/// at [`MAX_DETACHED_HEADER_LINES`]. It must name a sender address.
fn detached_header_start(lines: &[&str], floor: usize, end: usize) -> Option<usize> {
    let line = lines[end];
    if is_quoted(line) || !HEADER_TAIL.is_match(line) {
        return None;
    }

    let lowest = floor.max((end + 1).saturating_sub(MAX_DETACHED_HEADER_LINES));
    let start = (lowest..=end)
        .rev()
        .take_while(|&i| !is_blank(lines[i]) && !is_quoted(lines[i]))
        .last()?;

    lines[start..=end]
        .iter()
        .any(|l| SENDER_ADDRESS.is_match(l))
        .then_some(start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lines::split_lines;

    fn build(registry: &PatternRegistry, text: &str) -> Vec<(String, bool, bool)> {
        let lines = split_lines(text);
        FragmentBuilder::new(registry)
            .build(&lines)
            .into_iter()
            .map(|f| (f.lines.join("\n"), f.quoted, f.answer))
            .collect()
    }

    #[test]
    fn test_header_opens_quoted_fragment() {
        let registry = PatternRegistry::new();
        let fragments = build(
            &registry,
            "Thanks!\n\nOn Jan 1, 2013, X wrote:\n\n> quoted line",
        );

        assert_eq!(
            fragments,
            vec![
                ("Thanks!\n".to_string(), false, false),
                ("On Jan 1, 2013, X wrote:\n\n> quoted line".to_string(), true, true),
            ]
        );
    }

    #[test]
    fn test_header_without_blank_line_above() {
        let registry = PatternRegistry::new();
        let fragments = build(
            &registry,
            "Sounds good.\nFrom: Jane <jane@example.com>\nSent: Monday\n\nOriginal body",
        );

        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0], ("Sounds good.".to_string(), false, false));
        assert!(fragments[1].1 && fragments[1].2);
        assert!(fragments[1].0.ends_with("Original body"));
    }

    #[test]
    fn test_stacked_headers_share_fragment() {
        let registry = PatternRegistry::new();
        let fragments = build(
            &registry,
            "Done.\n\n-----Original Message-----\nFrom: Foo <foo@bar.com>\nSent: Monday\n\nBody",
        );

        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0], ("Done.\n".to_string(), false, false));
        assert!(fragments[1].0.starts_with("-----Original Message-----\nFrom:"));
        assert!(fragments[1].2);
    }

    #[test]
    fn test_wrapped_header_merged() {
        let registry = PatternRegistry::new();
        let lines = split_lines(
            "Hi\n\nOn Tue, Oct 1, 2019 at 10:00 AM Foo Bar <foo@bar.com>\nwrote:\n\n> quoted",
        );
        let roles = FragmentBuilder::new(&registry).header_layout(&lines).roles;

        assert_eq!(roles[2], HeaderRole::Start);
        assert_eq!(roles[3], HeaderRole::Continuation);
        assert_eq!(roles[5], HeaderRole::None);
    }

    #[test]
    fn test_shortest_window_wins() {
        let registry = PatternRegistry::new();
        let lines = split_lines(
            "On the other hand, we could wait.\nOn Wed, Dec 9, 2015 at 1:00 PM, X <x@example.com> wrote:",
        );
        let roles = FragmentBuilder::new(&registry).header_layout(&lines).roles;

        assert_eq!(roles, vec![HeaderRole::None, HeaderRole::Start]);
    }

    #[test]
    fn test_long_header_detached_from_quote() {
        let registry = PatternRegistry::new();
        let fragments = build(
            &registry,
            "Thanks, that fixed it.\n\nOn Tuesday, October 1, 2019 at 10:00 AM\nCentral European Summer Time,\nSomebody With A Long Name\n<somebody@example.com> wrote:\n\n> old text",
        );

        assert_eq!(
            fragments,
            vec![
                ("Thanks, that fixed it.\n".to_string(), false, false),
                (
                    "On Tuesday, October 1, 2019 at 10:00 AM\nCentral European Summer Time,\nSomebody With A Long Name\n<somebody@example.com> wrote:".to_string(),
                    true,
                    true
                ),
                ("\n> old text".to_string(), true, false),
            ]
        );
    }

    #[test]
    fn test_header_tail_without_sender_is_body() {
        let registry = PatternRegistry::new();
        let lines = split_lines("Here is what the reviewer wrote:\n\nLooks fine to me.");
        let layout = FragmentBuilder::new(&registry).header_layout(&lines);

        assert!(layout.roles.iter().all(|r| *r == HeaderRole::None));
        assert!(!layout.cut_below.contains(&true));
    }

    #[test]
    fn test_quoted_header_stays_in_quote() {
        let registry = PatternRegistry::new();
        let fragments = build(
            &registry,
            "Agreed.\n\n> Passt mir.\n> Hans Muster <hans@example.com> schrieb:\n> > Termin am Montag?",
        );

        assert_eq!(fragments.len(), 2);
        assert_eq!(
            fragments[1],
            (
                "\n> Passt mir.\n> Hans Muster <hans@example.com> schrieb:\n> > Termin am Montag?".to_string(),
                true,
                false
            )
        );
    }

    #[test]
    fn test_bare_marker_keeps_quote_open() {
        let registry = PatternRegistry::new();
        let fragments = build(&registry, "Reply\n> one\n>\n> two");

        assert_eq!(
            fragments,
            vec![
                ("Reply".to_string(), false, false),
                ("> one\n>\n> two".to_string(), true, false),
            ]
        );
    }

    #[test]
    fn test_inline_replies_alternate() {
        let registry = PatternRegistry::new();
        let fragments = build(&registry, "> question\nanswer\n> second\nsecond answer");

        let flags: Vec<bool> = fragments.iter().map(|f| f.1).collect();
        assert_eq!(flags, vec![true, false, true, false]);
    }
}
