//! "Did you mean" lookup over a fixed vocabulary.

/// Distance between two words. Smaller is closer, `0` means equal.
pub type Distance = fn(&str, &str) -> usize;

/// Positional mismatches over the shared prefix plus the length difference.
#[must_use]
pub fn hamming(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mismatches = a.iter().zip(&b).filter(|(x, y)| x != y).count();
    mismatches + a.len().abs_diff(b.len())
}

/// Unit-cost edit distance (insert, delete, substitute).
#[must_use]
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    // Row i of the (len(a)+1) x (len(b)+1) table, starting at D[0][j] = j.
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j]
            } else {
                1 + prev[j].min(prev[j + 1]).min(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// An ordered vocabulary paired with a distance function.
#[derive(Debug, Clone)]
pub struct DistanceDictionary<'a> {
    words: &'a [&'a str],
    distance: Distance,
}

impl<'a> DistanceDictionary<'a> {
    #[must_use]
    pub const fn new(words: &'a [&'a str], distance: Distance) -> Self {
        Self { words, distance }
    }

    /// Dictionary using [`levenshtein`].
    #[must_use]
    pub const fn levenshtein(words: &'a [&'a str]) -> Self {
        Self::new(words, levenshtein)
    }

    #[must_use]
    pub const fn words(&self) -> &'a [&'a str] {
        self.words
    }

    /// Closest word and its distance. Ties go to the earliest word.
    /// `None` only for an empty vocabulary.
    #[must_use]
    pub fn nearest_with_distance(&self, input: &str) -> Option<(&'a str, usize)> {
        let mut best: Option<(&'a str, usize)> = None;
        for &word in self.words {
            let d = (self.distance)(input, word);
            if best.is_none_or(|(_, current)| d < current) {
                best = Some((word, d));
            }
        }
        best
    }

    /// Closest word to `input`. Ties go to the earliest word.
    #[must_use]
    pub fn find_nearest(&self, input: &str) -> Option<&'a str> {
        self.nearest_with_distance(input).map(|(word, _)| word)
    }
}
