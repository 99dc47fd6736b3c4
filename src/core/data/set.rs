use std::fmt;

const WORD_BITS: usize = 64;

/// Fixed-universe bit vector over symbol (or node) indices. The universe
/// size is chosen once, when analysis begins, and never changes afterwards.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct SymbolSet {
    len: usize,
    words: Vec<u64>,
}

impl SymbolSet {
    pub fn new(len: usize) -> SymbolSet {
        SymbolSet {
            len,
            words: vec![0; (len + WORD_BITS - 1) / WORD_BITS],
        }
    }

    /// A set containing every index of the universe except `without`.
    pub fn full(len: usize, without: usize) -> SymbolSet {
        let mut set = SymbolSet::new(len);
        for i in 0..len {
            set.add(i);
        }
        set.remove(without);
        set
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn add(&mut self, index: usize) {
        if index < self.len {
            self.words[index / WORD_BITS] |= 1u64 << (index % WORD_BITS);
        }
    }

    pub fn remove(&mut self, index: usize) {
        if index < self.len {
            self.words[index / WORD_BITS] &= !(1u64 << (index % WORD_BITS));
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        index < self.len && self.words[index / WORD_BITS] & (1u64 << (index % WORD_BITS)) != 0
    }

    /// Unions `other` into `self`, returning true if any new index appeared.
    /// The return value drives fixpoint change detection.
    pub fn or(&mut self, other: &SymbolSet) -> bool {
        let mut grew = false;
        for (word, &other_word) in self.words.iter_mut().zip(other.words.iter()) {
            let merged = *word | other_word;
            if merged != *word {
                *word = merged;
                grew = true;
            }
        }
        grew
    }

    pub fn subtract(&mut self, other: &SymbolSet) {
        for (word, &other_word) in self.words.iter_mut().zip(other.words.iter()) {
            *word &= !other_word;
        }
    }

    pub fn intersects(&self, other: &SymbolSet) -> bool {
        self.words
            .iter()
            .zip(other.words.iter())
            .any(|(&a, &b)| a & b != 0)
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&word| word == 0)
    }

    pub fn count(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }

    pub fn iter<'set>(&'set self) -> impl Iterator<Item = usize> + 'set {
        (0..self.len).filter(move |&i| self.contains(i))
    }
}

impl fmt::Display for SymbolSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let indices: Vec<String> = self.iter().map(|i| i.to_string()).collect();
        write!(f, "{{{}}}", indices.join(", "))
    }
}
