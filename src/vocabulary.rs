//! Word list the falling objects draw from

use rand::Rng;

/// Built-in word list
pub const DEFAULT_WORDS: &[&str] = &[
    "ACCESS", "ADMIN", "ALGORITHM", "AUTH", "BINARY", "CLIENT", "CODE", "CYBER", "DATA",
    "DEBUG", "DECRYPT", "ENCRYPT", "FIREWALL", "HACK", "MALWARE", "MATRIX", "NETWORK", "NEURAL",
    "PROTOCOL", "QUANTUM", "SERVER", "SYSTEM", "TROJAN", "VIRUS", "ZONE",
];

/// A fixed vocabulary; words are stored trimmed and upper-cased
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    words: Vec<String>,
}

impl Vocabulary {
    /// Build from arbitrary words; blank entries are dropped
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_uppercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    /// The built-in word list
    pub fn builtin() -> Self {
        Self::new(DEFAULT_WORDS)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Uniform random pick, `None` when the list is empty
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        if self.words.is_empty() {
            return None;
        }
        let index = rng.random_range(0..self.words.len());
        Some(self.words[index].as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn normalizes_and_drops_blanks() {
        let vocab = Vocabulary::new(["  hack ", "", "Code", "   "]);
        assert_eq!(vocab.words(), ["HACK", "CODE"]);
    }

    #[test]
    fn empty_vocabulary_picks_nothing() {
        let mut rng = Pcg32::seed_from_u64(1);
        assert!(Vocabulary::new(Vec::<String>::new()).pick(&mut rng).is_none());
    }

    #[test]
    fn picks_come_from_the_list() {
        let vocab = Vocabulary::builtin();
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..100 {
            let word = vocab.pick(&mut rng).unwrap();
            assert!(DEFAULT_WORDS.contains(&word));
        }
    }
}
