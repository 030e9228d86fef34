//! Fixed-capacity bitmap that can be shared between threads without a lock.
//!
//! Bits live in 32-bit words and every access to a word is a single atomic
//! operation, so point updates on different bits of the same word never
//! clobber each other. Aggregate operations ([`ConcurrentBitmap::count`],
//! [`ConcurrentBitmap::to_vec`], [`ConcurrentBitmap::clear`]) visit words one
//! at a time and are not atomic across words.
//!
//! ```
//! use atomic_bitset::ConcurrentBitmap;
//!
//! let bitmap = ConcurrentBitmap::new(10);
//! assert_eq!(bitmap.len(), 32);
//!
//! bitmap.set(3)?;
//! bitmap.set(9)?;
//! bitmap.set(31)?;
//! assert_eq!(bitmap.to_vec(), vec![3, 9, 31]);
//! assert_eq!(bitmap.count(), 3);
//!
//! bitmap.unset(9)?;
//! assert_eq!(bitmap.to_vec(), vec![3, 31]);
//! # Ok::<(), atomic_bitset::Error>(())
//! ```

mod bitmap;
mod error;
mod iter;
mod word;

pub use bitmap::{word_count_for, ConcurrentBitmap, WORD_BITS};
pub use error::{Error, Result};
pub use iter::Ones;
