//! Lexicographic permutations of index sequences
//!
//! Yields every ordering of `0..n` starting from the identity and ending with
//! the reversed sequence, so callers that keep the "first best" ordering get a
//! deterministic result. An empty sequence has exactly one (empty) ordering.

/// Iterator over all orderings of `0..n`
#[derive(Debug, Clone)]
pub struct Permutations {
    indices: Vec<usize>,
    started: bool,
    exhausted: bool,
}

impl Permutations {
    /// Permutations of `0..n`
    pub fn new(n: usize) -> Self {
        Self {
            indices: (0..n).collect(),
            started: false,
            exhausted: false,
        }
    }

    /// Number of orderings, saturating at `u64::MAX`
    pub fn count_for(n: usize) -> u64 {
        (1..=n as u64).fold(1u64, |acc, k| acc.saturating_mul(k))
    }

    /// Rearrange `indices` into the next ordering; `false` once the last one was reached.
    fn advance(&mut self) -> bool {
        let n = self.indices.len();
        if n < 2 {
            return false;
        }

        // Rightmost ascent
        let mut i = n - 1;
        while i > 0 && self.indices[i - 1] >= self.indices[i] {
            i -= 1;
        }
        if i == 0 {
            return false;
        }

        let pivot = i - 1;
        let mut j = n - 1;
        while self.indices[j] <= self.indices[pivot] {
            j -= 1;
        }
        self.indices.swap(pivot, j);
        self.indices[i..].reverse();
        true
    }
}

impl Iterator for Permutations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        if !self.started {
            self.started = true;
        } else if !self.advance() {
            self.exhausted = true;
            return None;
        }
        Some(self.indices.clone())
    }
}
