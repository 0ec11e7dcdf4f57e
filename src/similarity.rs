/*!
 * String similarity via longest matching blocks.
 *
 * Provides the classic matching-blocks similarity ratio used by the chunking
 * heuristic to align translated output against its source prefix, and by tag
 * injection to sanity-check a reconstructed translation.
 */

use std::collections::HashMap;

/// Calculate the matching-blocks similarity ratio between two strings (0.0-1.0)
///
/// The ratio is `2*M / T` where `M` is the total number of characters across
/// all matching blocks and `T` is the combined character length of both
/// strings. Two empty strings are fully similar.
pub fn match_ratio(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let total = a_chars.len() + b_chars.len();

    if total == 0 {
        return 1.0;
    }

    // Recursively split around the longest matching block, iteratively via
    // an explicit region stack.
    let mut matches = 0usize;
    let mut regions = vec![(0, a_chars.len(), 0, b_chars.len())];

    while let Some((a_lo, a_hi, b_lo, b_hi)) = regions.pop() {
        let (i, j, size) = longest_match(&a_chars, &b_chars, a_lo, a_hi, b_lo, b_hi);
        if size > 0 {
            matches += size;
            regions.push((a_lo, i, b_lo, j));
            regions.push((i + size, a_hi, j + size, b_hi));
        }
    }

    2.0 * matches as f64 / total as f64
}

/// Find the longest matching block within a region of both strings
///
/// Returns (start in a, start in b, length). On ties the block starting
/// earliest in `a` wins, then earliest in `b`.
fn longest_match(
    a: &[char],
    b: &[char],
    a_lo: usize,
    a_hi: usize,
    b_lo: usize,
    b_hi: usize,
) -> (usize, usize, usize) {
    let mut best_i = a_lo;
    let mut best_j = b_lo;
    let mut best_size = 0usize;

    // run_lengths[j] = length of the match run ending at b[j] for the
    // previous position in a
    let mut run_lengths: HashMap<usize, usize> = HashMap::new();

    for i in a_lo..a_hi {
        let mut new_runs: HashMap<usize, usize> = HashMap::new();

        for j in b_lo..b_hi {
            if b[j] == a[i] {
                let previous = if j > b_lo {
                    run_lengths.get(&(j - 1)).copied().unwrap_or(0)
                } else {
                    0
                };
                let run = previous + 1;
                new_runs.insert(j, run);

                if run > best_size {
                    best_i = i + 1 - run;
                    best_j = j + 1 - run;
                    best_size = run;
                }
            }
        }

        run_lengths = new_runs;
    }

    (best_i, best_j, best_size)
}
