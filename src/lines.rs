//! Line splitting

use std::borrow::Cow;

/// Turn `\r\n` and lone `\r` line endings into `\n`
#[must_use]
pub fn normalize(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Split normalized text into physical lines.
///
/// Blank lines are kept as empty elements and an empty input yields a single
/// empty line.
#[must_use]
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n').collect()
}

/// True for lines starting with a `>` quote marker
#[must_use]
pub fn is_quoted(line: &str) -> bool {
    line.trim_start().starts_with('>')
}

#[must_use]
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}
