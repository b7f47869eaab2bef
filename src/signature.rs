//! Signature classification

use crate::builder::RawFragment;
use crate::lines::is_blank;
use crate::patterns::PatternRegistry;
use crate::types::Fragment;

/// Marks signature blocks in body fragments.
///
/// Every line of a body fragment matching a signature pattern starts a
/// signature fragment that runs to the next signature line or the end of the
/// body fragment. Quoted and answer fragments are passed through untouched.
pub struct SignatureClassifier<'r> {
    registry: &'r PatternRegistry,
}

impl<'r> SignatureClassifier<'r> {
    #[must_use]
    pub const fn new(registry: &'r PatternRegistry) -> Self {
        Self { registry }
    }

    #[must_use]
    pub fn classify(&self, raw: Vec<RawFragment<'_>>) -> Vec<Fragment> {
        let mut fragments = Vec::with_capacity(raw.len());

        for fragment in raw {
            if fragment.quoted || fragment.answer {
                fragments.push(Fragment::new(
                    fragment.lines.join("\n"),
                    fragment.quoted,
                    fragment.answer,
                    false,
                ));
                continue;
            }

            self.split_signatures(&fragment.lines, &mut fragments);
        }

        fragments
    }

    fn split_signatures(&self, lines: &[&str], out: &mut Vec<Fragment>) {
        let starts: Vec<usize> = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| !is_blank(line) && self.registry.match_signature(line))
            .map(|(i, _)| i)
            .collect();

        let body_end = starts.first().copied().unwrap_or(lines.len());
        if body_end > 0 {
            out.push(Fragment::new(lines[..body_end].join("\n"), false, false, false));
        }

        for (n, &start) in starts.iter().enumerate() {
            let end = starts.get(n + 1).copied().unwrap_or(lines.len());
            out.push(Fragment::new(lines[start..end].join("\n"), false, false, true));
        }
    }
}
