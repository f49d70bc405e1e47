//! "Did you mean" suggestions for unknown type names.

/// Returns the candidates within `max_distance` edits of `query`, closest
/// first. Ties keep candidate order; duplicates are dropped.
pub fn suggest<I, S>(query: &str, candidates: I, max_distance: usize, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut scored: Vec<(usize, String)> = Vec::new();
    for candidate in candidates {
        let candidate = candidate.as_ref();
        if candidate == query || scored.iter().any(|(_, seen)| seen == candidate) {
            continue;
        }
        let dist = edit_distance(query, candidate);
        if dist <= max_distance {
            scored.push((dist, candidate.to_string()));
        }
    }
    scored.sort_by_key(|(dist, _)| *dist);
    scored.into_iter().take(limit).map(|(_, name)| name).collect()
}

fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
