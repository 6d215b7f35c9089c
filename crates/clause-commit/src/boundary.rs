use crate::rules::RuleSet;
use crate::types::CommitReason;

/// A cut point in buffered text. Everything before `cut` is safe to commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boundary {
    /// Byte offset of the cut.
    pub cut: usize,
    /// Char count of the committable prefix, for length guards.
    pub chars: usize,
    pub reason: CommitReason,
}

/// Find the best cut point in `text`, if any. Priority order:
///
/// 1. hard terminal punctuation — cut after the *last* mark in the set;
/// 2. sentence-final lexical suffix, unless the text ends on a connective;
/// 3. soft (comma-class) punctuation, only when the tail beyond the mark is
///    at least `rules.soft_tail_min_chars` long.
pub fn find_boundary(text: &str, rules: &RuleSet) -> Option<Boundary> {
    if let Some((idx, ch)) = text
        .char_indices()
        .rev()
        .find(|(_, c)| rules.hard_punct.contains(c))
    {
        let cut = idx + ch.len_utf8();
        return Some(Boundary {
            cut,
            chars: text[..cut].chars().count(),
            reason: CommitReason::Punct,
        });
    }

    if !rules.ends_with_hold(text) && rules.ends_with_final(text) {
        let cut = text.trim_end().len();
        return Some(Boundary {
            cut,
            chars: text[..cut].chars().count(),
            reason: CommitReason::FinalEnding,
        });
    }

    if let Some((idx, ch)) = text
        .char_indices()
        .rev()
        .find(|(_, c)| rules.soft_punct.contains(c))
    {
        let cut = idx + ch.len_utf8();
        if text[cut..].chars().count() >= rules.soft_tail_min_chars {
            return Some(Boundary {
                cut,
                chars: text[..cut].chars().count(),
                reason: CommitReason::SoftPunct,
            });
        }
    }

    None
}
