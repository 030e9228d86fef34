use std::fmt;

use crate::error::{Error, Result};
use crate::iter::Ones;
use crate::word::Word;

/// Number of bits held by one backing word.
pub const WORD_BITS: usize = u32::BITS as usize;

/// Number of backing words needed to address `capacity` bits.
///
/// ```
/// use atomic_bitset::word_count_for;
///
/// assert_eq!(word_count_for(0), 0);
/// assert_eq!(word_count_for(32), 1);
/// assert_eq!(word_count_for(33), 2);
/// ```
pub const fn word_count_for(capacity: usize) -> usize {
    capacity.div_ceil(WORD_BITS)
}

/// Splits a bit index into its word index and the single-bit mask inside
/// that word. Bit `j` of word `w` is logical index `w * 32 + j`.
#[inline]
const fn locate(index: usize) -> (usize, u32) {
    (index / WORD_BITS, 1 << (index % WORD_BITS))
}

/// Fixed-capacity bitmap safe to share between threads.
///
/// Point operations ([`set`], [`unset`], [`is_set`]) are single atomic steps
/// on one word and are linearizable. Aggregate operations walk the words in
/// index order with an independent atomic access per word; under concurrent
/// writers they may see a mix of states from different points in time.
///
/// [`set`]: ConcurrentBitmap::set
/// [`unset`]: ConcurrentBitmap::unset
/// [`is_set`]: ConcurrentBitmap::is_set
#[derive(Default)]
pub struct ConcurrentBitmap {
    words: Box<[Word]>,
}

impl ConcurrentBitmap {
    /// Create a bitmap able to hold at least `capacity` bits, all unset.
    ///
    /// The capacity is rounded up to a multiple of [`WORD_BITS`], so
    /// [`len`](Self::len) may exceed `capacity`.
    pub fn new(capacity: usize) -> Self {
        let words = std::iter::repeat_with(Word::new)
            .take(word_count_for(capacity))
            .collect();
        Self { words }
    }

    /// Number of addressable bits. Always a multiple of [`WORD_BITS`].
    #[inline]
    pub fn len(&self) -> usize {
        self.words.len() * WORD_BITS
    }

    /// Check if the bitmap has zero capacity.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Number of backing 32-bit words.
    #[inline]
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Set bit `index` to 1.
    ///
    /// Returns `true` if this call flipped the bit, `false` if it was
    /// already set.
    #[inline]
    pub fn set(&self, index: usize) -> Result<bool> {
        let (word, mask) = self.word_for(index)?;
        Ok(word.set_bits(mask) & mask == 0)
    }

    /// Clear bit `index` to 0.
    ///
    /// Returns `true` if this call flipped the bit, `false` if it was
    /// already clear.
    #[inline]
    pub fn unset(&self, index: usize) -> Result<bool> {
        let (word, mask) = self.word_for(index)?;
        Ok(word.clear_bits(mask) & mask != 0)
    }

    /// Check whether bit `index` is set.
    #[inline]
    pub fn is_set(&self, index: usize) -> Result<bool> {
        let (word, mask) = self.word_for(index)?;
        Ok(word.test_bits(mask))
    }

    /// Clear every bit, one word at a time in index order.
    ///
    /// Not atomic as a whole: a concurrent reader may observe some words
    /// already cleared and others not yet, and a concurrent `set` on a word
    /// that has already been cleared survives.
    pub fn clear(&self) {
        for word in self.words.iter() {
            word.store(0);
        }
    }

    /// Count set bits.
    ///
    /// Each word is loaded independently, so with concurrent writers the
    /// result need not match the population at any single instant.
    pub fn count(&self) -> usize {
        self.load_words()
            .map(|bits| bits.count_ones() as usize)
            .sum()
    }

    /// Iterate over the indices of set bits in ascending order.
    ///
    /// A word is loaded when the iterator reaches it, not when the iterator
    /// is created.
    pub fn iter(&self) -> Ones<'_> {
        Ones::new(&self.words)
    }

    /// Collect the indices of set bits in ascending order.
    ///
    /// Returns an empty vector when no bit is set. Same per-word consistency
    /// as [`count`](Self::count).
    pub fn to_vec(&self) -> Vec<usize> {
        self.iter().collect()
    }

    /// Raw backing words, each loaded as the iterator reaches it.
    fn load_words(&self) -> impl Iterator<Item = u32> + '_ {
        self.words.iter().map(Word::load)
    }

    fn word_for(&self, index: usize) -> Result<(&Word, u32)> {
        let (word, mask) = locate(index);
        self.words
            .get(word)
            .map(|w| (w, mask))
            .ok_or_else(|| Error::IndexOutOfRange {
                index,
                len: self.len(),
            })
    }
}

impl<'a> IntoIterator for &'a ConcurrentBitmap {
    type Item = usize;
    type IntoIter = Ones<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for ConcurrentBitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcurrentBitmap")
            .field("len", &self.len())
            .field("ones", &self.to_vec())
            .finish()
    }
}
