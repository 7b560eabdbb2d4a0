//! "Did you mean" matching for unrecognized long options and enum values.

/// Minimum similarity before an unknown long option gets a suggestion.
pub const LONG_NAME_THRESHOLD: f64 = 0.75;
/// Enum values must score strictly above this to get a suggestion.
pub const ENUM_THRESHOLD: f64 = 0.5;

/// Edit distance where insertions, deletions, substitutions and swaps of
/// two adjacent chars each cost 1 (optimal string alignment).
///
/// Unlike plain Levenshtein, a swap is one edit rather than two, so a
/// transposed name such as `jbos` still scores 0.75 against `jobs` and
/// earns a suggestion.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    // Three rolling rows of the (|a|+1) x (|b|+1) matrix.
    let mut before: Vec<usize> = vec![0; b.len() + 1];
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            let mut best = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
            if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                best = best.min(before[j - 2] + 1);
            }
            curr[j] = best;
        }
        std::mem::swap(&mut before, &mut prev);
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Closest candidate and its similarity `1 - distance / max(len)`.
///
/// Returns `None` for inputs of one char or less and for an empty
/// candidate set. Ties keep the earliest candidate.
pub fn closest<'a, I>(input: &str, candidates: I) -> Option<(&'a str, f64)>
where
    I: IntoIterator<Item = &'a str>,
{
    let input_len = input.chars().count();
    if input_len <= 1 {
        return None;
    }

    let mut best: Option<(&'a str, usize)> = None;
    for candidate in candidates {
        let distance = edit_distance(input, candidate);
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((candidate, distance));
        }
    }

    best.map(|(candidate, distance)| {
        let denom = input_len.max(candidate.chars().count()) as f64;
        let similarity = if denom > 0.0 {
            1.0 - distance as f64 / denom
        } else {
            0.0
        };
        (candidate, similarity)
    })
}
