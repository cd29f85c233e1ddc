use std::cmp::Ordering;

/// Whether `remote_tag` orders strictly after `local_version`.
///
/// Both sides may carry one leading non-digit prefix character (for
/// example a leading `v`). The remainders are compared as dot-separated
/// numeric tuples, padding missing trailing components with 0, so
/// `"1.2"` and `"1.2.0"` are equal. A side with any non-numeric component
/// is not comparable and the answer is `false` — the comparator fails
/// toward "no update" rather than an update loop.
#[must_use]
pub fn is_newer(remote_tag: &str, local_version: &str) -> bool {
    match (
        parse_components(remote_tag),
        parse_components(local_version),
    ) {
        (Some(remote), Some(local)) => compare_padded(&remote, &local) == Ordering::Greater,
        _ => false,
    }
}

/// Strip one leading non-digit prefix character from a release tag.
#[must_use]
pub fn strip_version_prefix(tag: &str) -> &str {
    let tag = tag.trim();
    match tag.chars().next() {
        Some(first) if !first.is_ascii_digit() => &tag[first.len_utf8()..],
        _ => tag,
    }
}

fn parse_components(version: &str) -> Option<Vec<u64>> {
    let version = strip_version_prefix(version);
    if version.is_empty() {
        return None;
    }
    version
        .split('.')
        .map(|component| component.parse::<u64>().ok())
        .collect()
}

fn compare_padded(a: &[u64], b: &[u64]) -> Ordering {
    let len = a.len().max(b.len());
    for index in 0..len {
        let left = a.get(index).copied().unwrap_or(0);
        let right = b.get(index).copied().unwrap_or(0);
        match left.cmp(&right) {
            Ordering::Equal => {}
            ordering => return ordering,
        }
    }
    Ordering::Equal
}
