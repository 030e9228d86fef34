use std::sync::atomic::{AtomicU32, Ordering};

/// One 32-bit cell of the bitmap.
///
/// All reads and writes go through the inner atomic. Updates use `AcqRel`,
/// loads `Acquire` and stores `Release`, so a bit observed set also makes
/// visible whatever the setter wrote before setting it. Nothing is ordered
/// across different words.
#[derive(Debug)]
pub(crate) struct Word(AtomicU32);

impl Word {
    /// Create a zeroed word.
    pub(crate) const fn new() -> Self {
        Self(AtomicU32::new(0))
    }

    /// Load the current bits.
    #[inline]
    pub(crate) fn load(&self) -> u32 {
        self.0.load(Ordering::Acquire)
    }

    /// Overwrite all bits.
    #[inline]
    pub(crate) fn store(&self, value: u32) {
        self.0.store(value, Ordering::Release);
    }

    /// Set the bits in `mask`, returning the previous value.
    #[inline]
    pub(crate) fn set_bits(&self, mask: u32) -> u32 {
        self.0.fetch_or(mask, Ordering::AcqRel)
    }

    /// Clear the bits in `mask`, returning the previous value.
    #[cfg(not(feature = "cas-unset"))]
    #[inline]
    pub(crate) fn clear_bits(&self, mask: u32) -> u32 {
        self.0.fetch_and(!mask, Ordering::AcqRel)
    }

    /// Clear the bits in `mask`, returning the previous value.
    ///
    /// Retries until the exchange lands on the latest value. A failed
    /// exchange means another thread changed the word, so the loop is
    /// lock-free but not wait-free.
    #[cfg(feature = "cas-unset")]
    pub(crate) fn clear_bits(&self, mask: u32) -> u32 {
        let mut current = self.load();
        loop {
            if current & mask == 0 {
                return current;
            }
            match self.0.compare_exchange_weak(
                current,
                current & !mask,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(previous) => return previous,
                Err(actual) => current = actual,
            }
        }
    }

    /// Check whether any bit of `mask` is set.
    #[inline]
    pub(crate) fn test_bits(&self, mask: u32) -> bool {
        self.load() & mask != 0
    }
}

#[cfg(test)]
mod tests {
    use super::Word;

    #[test]
    fn new_is_zero() {
        let word = Word::new();
        assert_eq!(word.load(), 0);
    }

    #[test]
    fn store_then_load() {
        let word = Word::new();
        word.store(0xdead_beef);
        assert_eq!(word.load(), 0xdead_beef);
    }

    #[test]
    fn set_bits_returns_previous() {
        let word = Word::new();
        word.store(0b1010);
        assert_eq!(word.set_bits(0b1100), 0b1010);
        assert_eq!(word.load(), 0b1110);
    }

    #[test]
    fn clear_bits_returns_previous() {
        let word = Word::new();
        word.store(0b1110);
        assert_eq!(word.clear_bits(0b0100), 0b1110);
        assert_eq!(word.load(), 0b1010);
    }

    #[test]
    fn clear_bits_on_clear_bit_keeps_others() {
        let word = Word::new();
        word.store(0b1010);
        assert_eq!(word.clear_bits(0b0001), 0b1010);
        assert_eq!(word.load(), 0b1010);
    }

    #[test]
    fn test_bits_checks_mask() {
        let word = Word::new();
        word.set_bits(1 << 31);
        assert!(word.test_bits(1 << 31));
        assert!(!word.test_bits(1 << 30));
    }

    #[test]
    fn concurrent_clears_do_not_lose_bits() {
        let word = Word::new();
        word.store(u32::MAX);
        std::thread::scope(|s| {
            for bit in 0..16 {
                let word = &word;
                s.spawn(move || {
                    word.clear_bits(1 << bit);
                });
            }
        });
        assert_eq!(word.load(), 0xffff_0000);
    }
}
