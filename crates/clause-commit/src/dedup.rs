use crate::normalize::normalize;

/// Remove from `interim` the portion already confirmed by `last_committed`.
///
/// Exact byte prefix is the fast path. Failing that, the comparison is
/// retried under whitespace-insensitive normalization, which tolerates a
/// recognizer that re-renders spacing differently between partial updates.
/// When no confirmed prefix is found, `interim` is returned unchanged.
pub fn strip_committed_prefix<'a>(interim: &'a str, last_committed: &str) -> &'a str {
    if last_committed.is_empty() {
        return interim;
    }

    if let Some(rest) = interim.strip_prefix(last_committed) {
        return rest.trim_start();
    }

    if !starts_with_loose(interim, last_committed) {
        return interim;
    }

    // Walk the raw interim counting only non-redundant-whitespace chars until
    // we have consumed as many as the normalized committed prefix holds.
    let want = normalize(last_committed).chars().count();
    let mut seen = 0usize;
    let mut prev_space = true;

    for (idx, ch) in interim.char_indices() {
        if ch.is_whitespace() {
            if !prev_space {
                seen += 1;
            }
            prev_space = true;
        } else {
            seen += 1;
            prev_space = false;
        }
        if seen >= want {
            return interim[idx + ch.len_utf8()..].trim_start();
        }
    }

    interim
}

fn starts_with_loose(full: &str, prefix: &str) -> bool {
    let p = normalize(prefix);
    !p.is_empty() && normalize(full).starts_with(&p)
}
