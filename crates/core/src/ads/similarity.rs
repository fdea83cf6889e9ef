//! Near-duplicate removal by title similarity.
//!
//! Catalog searches often return the same product in several sizes or
//! editions ("Disk 1TB", "Disk 2TB", ...). An ad slot should show distinct
//! products, so titles scoring above a threshold collapse onto the first one.

use crate::model::ItemRecord;

/// Similarity of two strings as a percentage in `0.0..=100.0`.
///
/// Gestalt pattern matching over chars: the longest common substring counts
/// as matched, then the pieces left and right of it are matched recursively.
/// The score is `2 * matched / (len_a + len_b) * 100`. Ties on the longest
/// substring resolve to the first occurrence, which can make the raw count
/// depend on argument order, so the larger of both orders is reported.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }

    let matched = matching_chars(&a, &b).max(matching_chars(&b, &a));
    (matched * 2) as f64 * 100.0 / total as f64
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let (start_a, start_b, len) = longest_common_run(a, b);
    if len == 0 {
        return 0;
    }

    len + matching_chars(&a[..start_a], &b[..start_b]) + matching_chars(&a[start_a + len..], &b[start_b + len..])
}

/// Longest common substring as `(start_in_a, start_in_b, len)`.
fn longest_common_run(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    if a.is_empty() || b.is_empty() {
        return best;
    }

    // runs[j + 1] = length of the common run ending at a[i], b[j]
    let mut prev = vec![0usize; b.len() + 1];
    let mut runs = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        for (j, cb) in b.iter().enumerate() {
            runs[j + 1] = if ca == cb { prev[j] + 1 } else { 0 };
            let len = runs[j + 1];
            if len > best.2 {
                best = (i + 1 - len, j + 1 - len, len);
            }
        }
        std::mem::swap(&mut prev, &mut runs);
    }

    best
}

/// Drop items whose title is more than `threshold_percent` similar to an
/// earlier surviving item.
///
/// For each pair `i < j` scoring above the threshold, `j` is removed unless
/// `i` was itself removed; a removed item never knocks out later ones, so a
/// cluster keeps its first member. Survivors keep their relative order. A
/// threshold of zero (or below) keeps everything.
pub fn dedupe(items: Vec<ItemRecord>, threshold_percent: f64) -> Vec<ItemRecord> {
    if threshold_percent <= 0.0 || items.len() < 2 {
        return items;
    }

    let mut removed = vec![false; items.len()];
    for i in 0..items.len() {
        if removed[i] {
            continue;
        }
        for j in (i + 1)..items.len() {
            if !removed[j] && similarity(&items[i].title, &items[j].title) > threshold_percent {
                removed[j] = true;
            }
        }
    }

    items
        .into_iter()
        .zip(removed)
        .filter_map(|(item, gone)| (!gone).then_some(item))
        .collect()
}
