use std::iter::{Enumerate, FusedIterator};
use std::slice;

use crate::bitmap::WORD_BITS;
use crate::word::Word;

/// Iterator over the indices of set bits, in ascending order.
///
/// Created by [`ConcurrentBitmap::iter`](crate::ConcurrentBitmap::iter).
/// Words are loaded lazily, one at a time.
#[derive(Debug)]
pub struct Ones<'a> {
    words: Enumerate<slice::Iter<'a, Word>>,
    current: u32,
    base: usize,
}

impl<'a> Ones<'a> {
    pub(crate) fn new(words: &'a [Word]) -> Self {
        Self {
            words: words.iter().enumerate(),
            current: 0,
            base: 0,
        }
    }
}

impl Iterator for Ones<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        while self.current == 0 {
            let (idx, word) = self.words.next()?;
            self.current = word.load();
            self.base = idx * WORD_BITS;
        }
        let bit = self.current.trailing_zeros() as usize;
        // drop lowest set bit
        self.current &= self.current - 1;
        Some(self.base + bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let pending = self.current.count_ones() as usize;
        let upper = self
            .words
            .len()
            .checked_mul(WORD_BITS)
            .and_then(|rest| rest.checked_add(pending));
        (pending, upper)
    }
}

impl FusedIterator for Ones<'_> {}
